//! Compilation errors.

use alloc::string::ToString;
use ecow::EcoString;

use crate::api::{Diagnostic, Severity};
use crate::parser::{ParseError, Span};
use crate::status::Status;
use crate::variables::CONSTANT_PREFIX;
use crate::{String, Vec, format, vec};

/// A compilation failure, located on the offending line.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub span: Span,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// Malformed line or reserved opcode in source
    Syntax(ParseError),
    /// Wrong number of operands for a command
    ArgumentCount {
        command: EcoString,
        expected: usize,
        found: usize,
    },
    /// The same output appears in two `WRITE` lines
    DuplicateOutput { name: EcoString },
    /// `WRITE` to an output that this program already wrote
    OutputAlreadyWritten { name: EcoString },
    /// Type name that is unknown or not numeric
    UnsupportedType { name: EcoString },
    /// Variable without a numeric type at compile time
    UntypedVariable { name: EcoString },
    OutputNotFound { name: EcoString },
    /// `pending_output` is set when an output of that name exists but is
    /// written later in the program.
    InputNotFound {
        name: EcoString,
        pending_output: bool,
    },
    /// No operator accepts the current type stack
    OperatorNotFound { command: EcoString, types: String },
    InvalidLiteral { type_name: EcoString, text: EcoString },
    TypeStackOverflow { capacity: usize },
    /// `WRITE` of an untyped output with nothing on the stack
    MissingSourceType { name: EcoString },
    /// Values left on the type stack at the end of the program
    IncompleteSequence { left: usize },
    /// Data memory layout does not fit the address space
    AddressOverflow { name: EcoString },
    /// Variable name using the prefix reserved for literals
    ReservedName { name: EcoString },
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            source: String::new(),
        }
    }

    /// Attaches the program text, for rendering.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// The status flags this failure maps to.
    pub fn status(&self) -> Status {
        use CompileErrorKind::*;
        match &self.kind {
            Syntax(_) => Status::SYNTAX_ERROR,
            ArgumentCount { .. }
            | DuplicateOutput { .. }
            | OutputAlreadyWritten { .. }
            | ReservedName { .. } => {
                Status::ILLEGAL_OPERATION
            }
            UnsupportedType { .. }
            | UntypedVariable { .. }
            | OutputNotFound { .. }
            | OperatorNotFound { .. } => Status::UNSUPPORTED_FEATURE,
            InputNotFound { pending_output, .. } => {
                if *pending_output {
                    Status::UNSUPPORTED_FEATURE | Status::NOT_COMPLETED
                } else {
                    Status::UNSUPPORTED_FEATURE
                }
            }
            InvalidLiteral { .. } | TypeStackOverflow { .. } | MissingSourceType { .. } => {
                Status::FATAL_ERROR
            }
            IncompleteSequence { .. } => Status::INTERNAL_SETUP_ERROR,
            AddressOverflow { .. } => Status::OUT_OF_RANGE,
        }
    }

    pub fn message(&self) -> String {
        use CompileErrorKind::*;
        match &self.kind {
            Syntax(err) => err.to_diagnostic().message,
            ArgumentCount {
                command,
                expected,
                found,
            } => format!(
                "{} expects {} argument(s), found {}",
                command, expected, found
            ),
            DuplicateOutput { name } => {
                format!("output variable {} is written more than once", name)
            }
            OutputAlreadyWritten { name } => format!("output variable {} already written", name),
            UnsupportedType { name } => format!("{} is not a numeric type", name),
            UntypedVariable { name } => format!("variable {} has no numeric type", name),
            OutputNotFound { name } => format!("output variable {} not found", name),
            InputNotFound { name, .. } => format!("input variable {} not found", name),
            OperatorNotFound { command, types } => {
                format!("command {}({}) not found", command, types)
            }
            InvalidLiteral { type_name, text } => {
                format!("cannot convert {} to {}", text, type_name)
            }
            TypeStackOverflow { capacity } => {
                format!("type stack exhausted ({} entries)", capacity)
            }
            MissingSourceType { name } => {
                format!("nothing on the stack to infer the type of {}", name)
            }
            IncompleteSequence { left } => format!(
                "operation sequence is incomplete: {} data left in stack",
                left
            ),
            AddressOverflow { name } => {
                format!("data memory exhausted while placing {}", name)
            }
            ReservedName { name } => format!("variable name {} is reserved", name),
        }
    }

    /// Convert to a Diagnostic for API boundary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        use CompileErrorKind::*;
        if let Syntax(err) = &self.kind {
            return err.to_diagnostic();
        }
        let (code, help) = match &self.kind {
            Syntax(_) => ("P000", vec![]),
            ArgumentCount { .. } => ("C001", vec![]),
            DuplicateOutput { .. } => (
                "C002",
                vec!["An output can be written once; READ it back to reuse the value".to_string()],
            ),
            OutputAlreadyWritten { .. } => ("C003", vec![]),
            UnsupportedType { .. } => (
                "C004",
                vec![
                    "Use one of int8, int16, int32, int64, uint8, uint16, uint32, uint64, float32, float64"
                        .to_string(),
                ],
            ),
            UntypedVariable { .. } => (
                "C005",
                vec!["Set the variable type after extracting variables".to_string()],
            ),
            OutputNotFound { .. } => ("C006", vec![]),
            InputNotFound { pending_output, .. } => (
                "C007",
                if *pending_output {
                    vec!["The output of that name is only written later".to_string()]
                } else {
                    vec![]
                },
            ),
            OperatorNotFound { .. } => (
                "C008",
                vec!["Insert a CAST to a type the operator accepts".to_string()],
            ),
            InvalidLiteral { .. } => ("C009", vec![]),
            TypeStackOverflow { .. } => ("C010", vec![]),
            MissingSourceType { .. } => ("C011", vec![]),
            IncompleteSequence { .. } => (
                "C012",
                vec!["Every value pushed must be consumed, usually by a WRITE".to_string()],
            ),
            AddressOverflow { .. } => ("C013", vec![]),
            ReservedName { .. } => (
                "C014",
                vec![format!("Names starting with {} are reserved for CONST literals", CONSTANT_PREFIX)],
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.message(),
            span: self.span.clone(),
            related: Vec::new(),
            help,
            code: Some(code.to_string()),
        }
    }
}

impl core::fmt::Display for CompileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;
        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        let span = err.span.clone();
        let source = err.source.clone();
        Self {
            kind: CompileErrorKind::Syntax(err),
            span,
            source,
        }
    }
}
