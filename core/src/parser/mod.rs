//! Reader for line-oriented RPN source.

pub mod error;
pub mod parser;
mod syntax;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{Rule, RpnParser, parse};
pub use syntax::{RpnLine, Span};

#[cfg(test)]
mod parse_test;
