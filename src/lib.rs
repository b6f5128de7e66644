//! rteval - a runtime evaluator for line-oriented RPN programs
//!
//! # Overview
//!
//! Programs are written one instruction per line in reverse-Polish form and
//! operate on fixed-width numeric types. They are compiled once, with every
//! operator resolved against the operand types, and then executed as often
//! as needed on a word-based stack machine that does not allocate. This
//! makes them a good fit for control loops that evaluate user-supplied
//! formulas at a fixed rate.
//!
//! # Quick Start
//!
//! ```
//! use rteval::{ExecutionMode, RuntimeEvaluator, TypeTag};
//!
//! let source = "\
//! READ theta
//! SIN
//! CONST int64 2
//! POW
//! READ theta
//! COS
//! CONST int64 2
//! POW
//! ADD
//! WRITE y";
//!
//! let mut evaluator = RuntimeEvaluator::new(source);
//! evaluator.extract_variables().unwrap();
//! evaluator.set_input_variable_type("theta".into(), TypeTag::Float64);
//! evaluator.compile().unwrap();
//!
//! evaluator.set_input_value("theta".into(), 3.14f64);
//! let status = evaluator.execute(ExecutionMode::Fast, None);
//! assert!(status.is_ok());
//!
//! let y = evaluator.output_value::<f64>("y".into()).unwrap();
//! assert!((y - 1.0).abs() < 1e-9);
//! ```
//!
//! # Execution Modes
//!
//! 1. **Fast**: no checks between instructions
//! 2. **Safe**: stack bounds checked after every instruction
//! 3. **Debug**: like safe, and every instruction is traced to a writer
//!
//! Numeric problems (saturation, division by zero) never stop a run. They
//! are accumulated into the returned [`Status`].

// Re-export public API from rteval_core
pub use rteval_core::api::{
    CompilationOptions, Diagnostic, Error, EvaluatorOptions, ExecutionOptions, RelatedInfo,
    RuntimeEvaluator, Severity, TraceOptions,
};

// Re-export the building blocks callers touch directly
pub use rteval_core::catalog::{self, Catalog, OperatorDescriptor};
pub use rteval_core::compiler::{CompileError, CompileErrorKind};
pub use rteval_core::decompiler::DecompileError;
pub use rteval_core::status::Status;
pub use rteval_core::types::{self, Numeric, TypeTag, Value};
pub use rteval_core::variables::{VarRef, VariableDescriptor};
pub use rteval_core::vm::{ExecutionMode, Machine};

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
