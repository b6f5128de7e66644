//! Configuration options for the evaluator.

use crate::compiler::DEFAULT_TYPE_STACK_DEPTH;
use crate::vm::ExecutionMode;

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use rteval_core::api::CompilationOptions;
///
/// let options = CompilationOptions {
///     max_type_stack_depth: 64,
/// };
/// assert_eq!(CompilationOptions::default().max_type_stack_depth, 32);
/// # let _ = options;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Capacity of the compile-time type stack. Programs that hold more
    /// values at once fail with a type stack overflow.
    ///
    /// Default: 32
    pub max_type_stack_depth: usize,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            max_type_stack_depth: DEFAULT_TYPE_STACK_DEPTH,
        }
    }
}

/// What the debug trace shows next to each instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOptions {
    /// Prefix values with their type, as in `(float64)3`.
    pub show_types: bool,
    /// Print the values flowing in and out of each instruction.
    pub show_values: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            show_types: true,
            show_values: true,
        }
    }
}

/// Configuration options for execution.
///
/// # Example
///
/// ```
/// use rteval_core::api::{ExecutionOptions, TraceOptions};
/// use rteval_core::vm::ExecutionMode;
///
/// let options = ExecutionOptions {
///     mode: ExecutionMode::Debug,
///     trace: TraceOptions {
///         show_types: false,
///         show_values: true,
///     },
/// };
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionOptions {
    /// Default: `Safe`
    pub mode: ExecutionMode,
    pub trace: TraceOptions,
}

/// Configuration options for a [`RuntimeEvaluator`](super::RuntimeEvaluator).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluatorOptions {
    pub compilation: CompilationOptions,
    /// Used by [`RuntimeEvaluator::run`](super::RuntimeEvaluator::run).
    pub execution: ExecutionOptions,
}
