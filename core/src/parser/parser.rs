use ecow::EcoString;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use smallvec::SmallVec;

use crate::Vec;
use crate::catalog::{REMOTE_READ, REMOTE_WRITE};
use crate::parser::error::{ParseError, ParseErrorKind, convert_pest_error};
use crate::parser::{RpnLine, Span};

#[derive(Parser)]
#[grammar = "parser/rpn.pest"]
pub struct RpnParser;

/// Parses a whole program into its non-empty lines.
pub fn parse(source: &str) -> Result<Vec<RpnLine>, ParseError> {
    let program = RpnParser::parse(Rule::program, source)
        .map_err(|err| convert_pest_error(err, source))?
        .next();

    let mut lines = Vec::new();
    let Some(program) = program else {
        return Ok(lines);
    };

    let mut number = 0;
    for pair in program.into_inner() {
        if pair.as_rule() != Rule::line {
            continue;
        }
        number += 1;
        if let Some(instruction) = pair.into_inner().next() {
            lines.push(parse_instruction(instruction, number, source)?);
        }
    }
    Ok(lines)
}

fn parse_instruction(pair: Pair<Rule>, number: usize, source: &str) -> Result<RpnLine, ParseError> {
    let start = pair.as_span().start();
    let mut end = start;
    let mut command = EcoString::new();
    let mut params = SmallVec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::command => {
                end = inner.as_span().end();
                let text = inner.as_str();
                if text == REMOTE_READ || text == REMOTE_WRITE {
                    return Err(ParseError::new(
                        ParseErrorKind::ReservedOpcode {
                            name: text.into(),
                        },
                        source.into(),
                        inner.as_span().into(),
                    ));
                }
                command = EcoString::from(text);
            }
            Rule::operand => {
                end = inner.as_span().end();
                params.push(EcoString::from(inner.as_str()));
            }
            // Annotations carry no information the compiler does not derive.
            _ => {}
        }
    }

    Ok(RpnLine {
        number,
        span: Span::new(start, end),
        command,
        params,
    })
}
