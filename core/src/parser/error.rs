use alloc::string::ToString;

use crate::api::{Diagnostic, Severity};
use crate::parser::{Rule, Span};
use crate::{String, Vec, format, vec};

/// Parser error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Unexpected character in a line
    UnexpectedToken { expected: String, found: String },
    /// `RREAD`/`RWRITE` written in source
    ReservedOpcode { name: String },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: String, span: Span) -> Self {
        Self { kind, source, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => (
                format!("Expected {}, found {}", expected, found),
                Some("P001"),
                vec![],
            ),
            ParseErrorKind::ReservedOpcode { name } => (
                format!("'{}' is reserved and cannot be used in source", name),
                Some("P002"),
                vec![format!(
                    "Write '{}' instead; remote access is selected when memory is bound",
                    name.trim_start_matches('R')
                )],
            ),
            ParseErrorKind::Other { message } => (message.clone(), Some("P999"), vec![]),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.span.clone(),
            related: Vec::new(),
            help,
            code: code.map(|s| s.to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;

        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }

        for help_msg in &diagnostic.help {
            write!(f, "\nhelp: {}", help_msg)?;
        }

        Ok(())
    }
}

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => {
            let expected = format_expected_rules(&positives);
            let found = describe_found(source, span.0.start, &negatives);
            ParseErrorKind::UnexpectedToken { expected, found }
        }
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, source.to_string(), span)
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    let mut concepts: Vec<&str> = Vec::new();

    for rule in rules {
        let concept = match rule {
            Rule::command | Rule::instruction => "command",
            Rule::operand => "operand",
            Rule::annotation | Rule::type_group => "type annotation",
            Rule::EOI => "end of input",
            _ => "end of line",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "end of line".to_string(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

fn describe_found(source: &str, pos: usize, negatives: &[Rule]) -> String {
    if let Some(rule) = negatives.first() {
        return format!("{:?}", rule);
    }
    match source.get(pos..).and_then(|rest| rest.chars().next()) {
        Some(c) => format!("'{}'", c.escape_default()),
        None => "end of input".to_string(),
    }
}
