//! Public error types for the evaluator API.
//!
//! Internal errors are converted to these types at API boundaries, so
//! callers can render them without knowing which pass failed.

use core::fmt;

use crate::compiler::CompileError;
use crate::decompiler::DecompileError;
use crate::parser::{ParseError, Span};
use crate::status::Status;
use crate::{String, Vec, format};

/// Public error type for all evaluator operations.
#[derive(Debug)]
pub enum Error {
    /// Invalid API usage (e.g., unknown variable, executing before compiling).
    Api(String),

    /// Extraction or compilation failed.
    ///
    /// Carries the program text so diagnostics can be rendered in context.
    Compilation {
        diagnostics: Vec<Diagnostic>,
        source: String,
    },

    /// Execution finished with a non-empty status.
    Execution(Status),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Api(msg) => write!(f, "API error: {}", msg),
            Error::Compilation { diagnostics, .. } => {
                let error_count = diagnostics
                    .iter()
                    .filter(|d| d.severity == Severity::Error)
                    .count();
                write!(f, "Compilation failed with {} error(s)", error_count)?;
                if let Some(first) = diagnostics.first() {
                    write!(f, ": {}", first.message)?;
                }
                Ok(())
            }
            Error::Execution(status) => write!(f, "Execution finished with status {}", status),
        }
    }
}

impl std::error::Error for Error {}

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Byte range of the offending line or token.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Suggestions on how to fix the issue.
    pub help: Vec<String>,

    /// Error code (e.g., "C001") for documentation lookup.
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Compilation cannot succeed.
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g., "first written here").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Error::Compilation {
            diagnostics: Vec::from([err.to_diagnostic()]),
            source: err.source,
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Compilation {
            diagnostics: Vec::from([err.to_diagnostic()]),
            source: err.source,
        }
    }
}

impl From<DecompileError> for Error {
    fn from(err: DecompileError) -> Self {
        Error::Api(format!("cannot decompile: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompileErrorKind;

    #[test]
    fn test_compile_error_keeps_source() {
        let err = CompileError::new(
            CompileErrorKind::OutputNotFound { name: "z".into() },
            Span::new(7, 14),
        )
        .with_source("READ x\nWRITE z");
        let err = Error::from(err);
        match &err {
            Error::Compilation {
                diagnostics,
                source,
            } => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].code.as_deref(), Some("C006"));
                assert_eq!(source, "READ x\nWRITE z");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Compilation failed with 1 error(s): output variable z not found"
        );
    }

    #[test]
    fn test_execution_error_reports_status() {
        let err = Error::Execution(Status::OVERFLOW | Status::NOT_COMPLETED);
        assert_eq!(
            err.to_string(),
            "Execution finished with status notCompleted | overflow"
        );
    }
}
