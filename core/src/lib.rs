//! Compiler and word-based stack machine for line-oriented RPN programs.
//!
//! See [`api::RuntimeEvaluator`] for the entry point.

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod api;
pub mod casting;
pub mod catalog;
pub mod compiler;
pub mod decompiler;
pub mod memory;
pub mod parser;
pub mod status;
pub mod types;
pub mod variables;
pub mod vm;

pub use api::{Error, RuntimeEvaluator};
pub use status::Status;
pub use types::{TypeTag, Value};
