//! Numeric type tags and the closed set of Rust types that carry them.
//!
//! Every operand the evaluator handles is one of ten fixed-width numeric
//! types. [`TypeTag`] names them at compile time, [`Numeric`] ties each tag to
//! its Rust primitive, and [`Value`] carries a value of any of them when the
//! concrete type is only known at runtime (tracing, decompilation, the CLI).

mod numeric;
mod tag;
mod value;

pub use numeric::{FloatMath, Numeric, Wide};
pub use tag::TypeTag;
pub use value::Value;

#[cfg(test)]
mod types_test;
