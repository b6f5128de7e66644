//! Public API for compiling and running RPN programs.
//!
//! [`RuntimeEvaluator`] owns one program through its whole lifecycle:
//! variable extraction, type and memory binding, compilation, and any
//! number of executions. Failures at the boundary are reported as [`Error`],
//! with [`Diagnostic`]s located in the program text.
//!
//! # Example
//!
//! ```
//! use rteval_core::api::RuntimeEvaluator;
//! use rteval_core::types::TypeTag;
//! use rteval_core::vm::ExecutionMode;
//!
//! let source = "READ a\nREAD b\nADD\nWRITE sum";
//! let mut evaluator = RuntimeEvaluator::new(source);
//! evaluator.extract_variables().unwrap();
//! evaluator.set_input_variable_type("a".into(), TypeTag::Int32);
//! evaluator.set_input_variable_type("b".into(), TypeTag::Int32);
//! evaluator.compile().unwrap();
//!
//! evaluator.set_input_value("a".into(), 40i32);
//! evaluator.set_input_value("b".into(), 2i32);
//! assert!(evaluator.execute(ExecutionMode::Fast, None).is_ok());
//! assert_eq!(evaluator.output_value::<i32>("sum".into()), Some(42));
//! ```

pub mod error;
pub mod evaluator;
pub mod options;


pub use error::{Diagnostic, Error, RelatedInfo, Severity};
pub use evaluator::RuntimeEvaluator;
pub use options::{CompilationOptions, EvaluatorOptions, ExecutionOptions, TraceOptions};
