use crate::compiler::{CompileError, CompileErrorKind, VariableSet};
use crate::format;
use crate::memory::{DataAddress, UNASSIGNED};
use crate::parser::{self, RpnLine};
use crate::types::TypeTag;
use crate::variables::CONSTANT_PREFIX;

/// First pass: builds fresh variable tables from the program text.
///
/// `READ` names become inputs unless already written as outputs, `WRITE`
/// names become outputs, and each `CONST` becomes a typed input placed at the
/// next constant address.
pub fn extract_variables(source: &str) -> Result<VariableSet, CompileError> {
    let result = parser::parse(source)
        .map_err(CompileError::from)
        .and_then(|lines| extract_lines(&lines));
    result.map_err(|err| {
        let err = err.with_source(source);
        tracing::error!(code = ?err.to_diagnostic().code, "{}", err.message());
        err
    })
}

fn extract_lines(lines: &[RpnLine]) -> Result<VariableSet, CompileError> {
    let mut vars = VariableSet::default();
    let mut next_constant: usize = 0;

    for line in lines {
        match line.command.as_str() {
            "READ" => {
                let name = variable_name(line)?;
                if vars.outputs.find(name).is_some() {
                    continue;
                }
                if vars.inputs.add(name, TypeTag::Void, UNASSIGNED).is_err() {
                    tracing::info!(name, line = line.number, "input variable already registered");
                }
            }
            "WRITE" => {
                let name = variable_name(line)?;
                if vars.outputs.add(name, TypeTag::Void, UNASSIGNED).is_err() {
                    return Err(error(
                        line,
                        CompileErrorKind::DuplicateOutput { name: name.into() },
                    ));
                }
            }
            "CONST" => {
                expect_params(line, 2)?;
                let type_name = line.param(0).unwrap_or_default();
                let tag = numeric_type(line, type_name)?;
                let name = format!("{}{}", CONSTANT_PREFIX, next_constant);
                let address = next_constant;
                next_constant += tag.word_size();
                if next_constant >= UNASSIGNED as usize {
                    return Err(error(
                        line,
                        CompileErrorKind::AddressOverflow {
                            name: name.as_str().into(),
                        },
                    ));
                }
                vars.inputs
                    .add(name.as_str(), tag, address as DataAddress)
                    .map_err(|_| {
                        error(
                            line,
                            CompileErrorKind::ReservedName {
                                name: name.as_str().into(),
                            },
                        )
                    })?;
            }
            _ => {}
        }
    }

    vars.start_of_variables = next_constant as DataAddress;
    tracing::debug!(
        inputs = vars.inputs.len(),
        outputs = vars.outputs.len(),
        start_of_variables = vars.start_of_variables,
        "variables extracted"
    );
    Ok(vars)
}

pub(super) fn error(line: &RpnLine, kind: CompileErrorKind) -> CompileError {
    CompileError::new(kind, line.span.clone())
}

pub(super) fn expect_params(line: &RpnLine, expected: usize) -> Result<(), CompileError> {
    if line.params.len() == expected {
        Ok(())
    } else {
        Err(error(
            line,
            CompileErrorKind::ArgumentCount {
                command: line.command.clone(),
                expected,
                found: line.params.len(),
            },
        ))
    }
}

pub(super) fn single_param(line: &RpnLine) -> Result<&str, CompileError> {
    expect_params(line, 1)?;
    Ok(line.param(0).unwrap_or_default())
}

/// The single operand of a `READ`/`WRITE`, which must not use the constant
/// prefix.
fn variable_name(line: &RpnLine) -> Result<&str, CompileError> {
    let name = single_param(line)?;
    if name.starts_with(CONSTANT_PREFIX) {
        return Err(error(line, CompileErrorKind::ReservedName { name: name.into() }));
    }
    Ok(name)
}

pub(super) fn numeric_type(line: &RpnLine, name: &str) -> Result<TypeTag, CompileError> {
    TypeTag::from_name(name)
        .filter(|tag| tag.is_numeric())
        .ok_or_else(|| error(line, CompileErrorKind::UnsupportedType { name: name.into() }))
}
