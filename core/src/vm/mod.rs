//! Word-based stack machine that runs compiled programs.

mod machine;
mod runtime;
mod stack;
mod trace;

#[cfg(test)]
mod runtime_test;

pub use machine::Machine;
pub use runtime::{ExecutionMode, Program, execute};
pub use stack::Stack;
