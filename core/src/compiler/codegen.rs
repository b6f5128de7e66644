use crate::api::CompilationOptions;
use crate::catalog::{Catalog, REMOTE_READ, REMOTE_WRITE};
use crate::compiler::extract::{error, expect_params, numeric_type, single_param};
use crate::compiler::{CompileError, CompileErrorKind, TypeStack, VariableSet};
use crate::memory::{CodeMemory, DataAddress, DataMemory, POINTER_WORDS, UNASSIGNED};
use crate::parser::{self, RpnLine, Span};
use crate::types::{TypeTag, Value};
use crate::variables::{CONSTANT_PREFIX, VariableDescriptor};
use crate::{Vec, format};

/// Words reserved for an output whose type is only known once its `WRITE`
/// is compiled: enough for any numeric type.
const UNTYPED_OUTPUT_WORDS: usize = 2;

/// Result of a successful compile.
#[derive(Debug, Clone, Default)]
pub struct CompiledProgram {
    pub code: CodeMemory,
    /// Zeroed variables with the constants filled in and external pointers
    /// stored in their slots.
    pub data: DataMemory,
    /// Deepest point of the evaluation stack, in words.
    pub stack_words: usize,
}

/// Second pass: places variables, type-checks every line and emits code.
///
/// Output types left `Void` by the caller are inferred from the value being
/// written and recorded in `vars`. Inferred types and placements from an
/// earlier compile are discarded first, so the same tables can be compiled
/// again after rebinding.
pub fn compile(
    source: &str,
    vars: &mut VariableSet,
    catalog: &Catalog,
    options: &CompilationOptions,
) -> Result<CompiledProgram, CompileError> {
    let result = parser::parse(source)
        .map_err(CompileError::from)
        .and_then(|lines| {
            let mut generator = CodeGenerator::new(vars, catalog, options)?;
            for line in &lines {
                generator.line(line)?;
            }
            generator.finish(lines.last().map(|l| l.span.clone()).unwrap_or_default())
        });
    result.map_err(|err| {
        let err = err.with_source(source);
        tracing::error!(code = ?err.to_diagnostic().code, "{}", err.message());
        err
    })
}

struct CodeGenerator<'a> {
    vars: &'a mut VariableSet,
    catalog: &'a Catalog,
    types: TypeStack,
    code: CodeMemory,
    data: DataMemory,
    data_stack_size: usize,
    max_stack_size: usize,
    next_constant: usize,
}

impl<'a> CodeGenerator<'a> {
    fn new(
        vars: &'a mut VariableSet,
        catalog: &'a Catalog,
        options: &CompilationOptions,
    ) -> Result<Self, CompileError> {
        let size = allocate(vars)?;
        let mut data = DataMemory::new(size);
        for var in vars.inputs.iter().chain(vars.outputs.iter()) {
            if let Some(pointer) = var.external {
                data.write_pointer(var.location, pointer.as_ptr());
            }
        }
        Ok(Self {
            vars,
            catalog,
            types: TypeStack::new(options.max_type_stack_depth),
            code: Vec::new(),
            data,
            data_stack_size: 0,
            max_stack_size: 0,
            next_constant: 0,
        })
    }

    fn push_type(&mut self, line: &RpnLine, tag: TypeTag) -> Result<(), CompileError> {
        self.types.push(tag).map_err(|full| {
            error(
                line,
                CompileErrorKind::TypeStackOverflow {
                    capacity: full.capacity,
                },
            )
        })
    }

    fn line(&mut self, line: &RpnLine) -> Result<(), CompileError> {
        let mut command = line.command.as_str();
        let mut match_output = false;
        let mut operand: Option<DataAddress> = None;

        match command {
            "CAST" => {
                let tag = numeric_type(line, single_param(line)?)?;
                self.push_type(line, tag)?;
                match_output = true;
            }
            "WRITE" => {
                let name = single_param(line)?;
                let top = self.types.peek(0);
                let var = self.vars.outputs.find_mut(name).ok_or_else(|| {
                    error(line, CompileErrorKind::OutputNotFound { name: name.into() })
                })?;
                if var.used {
                    return Err(error(
                        line,
                        CompileErrorKind::OutputAlreadyWritten { name: name.into() },
                    ));
                }
                if var.external.is_some() {
                    command = REMOTE_WRITE;
                }
                if var.type_tag == TypeTag::Void {
                    let tag = top.ok_or_else(|| {
                        error(line, CompileErrorKind::MissingSourceType { name: name.into() })
                    })?;
                    var.type_tag = tag;
                    var.type_inferred = true;
                    tracing::debug!(name, r#type = %tag, "output type inferred");
                }
                var.used = true;
                let (tag, location) = (var.type_tag, var.location);
                self.push_type(line, tag)?;
                match_output = true;
                operand = Some(location);
            }
            "READ" => {
                let name = single_param(line)?;
                let var = self.resolve_read(line, name)?;
                if var.external.is_some() {
                    command = REMOTE_READ;
                }
                let (tag, location) = (var.type_tag, var.location);
                self.push_type(line, tag)?;
                match_output = true;
                operand = Some(location);
            }
            "CONST" => {
                expect_params(line, 2)?;
                let type_name = line.param(0).unwrap_or_default();
                let text = line.param(1).unwrap_or_default();
                let tag = numeric_type(line, type_name)?;
                let location = self.place_constant(line, tag, text)?;
                self.push_type(line, tag)?;
                match_output = true;
                operand = Some(location);
                command = "READ";
            }
            _ => expect_params(line, 0)?,
        }

        let opcode = self
            .catalog
            .find_match(
                command,
                &mut self.types,
                match_output,
                &mut self.data_stack_size,
            )
            .ok_or_else(|| {
                error(
                    line,
                    CompileErrorKind::OperatorNotFound {
                        command: command.into(),
                        types: self.types.snapshot(match_output),
                    },
                )
            })?;

        self.max_stack_size = self.max_stack_size.max(self.data_stack_size);
        self.code.push(opcode);
        if let Some(address) = operand {
            self.code.push(address);
        }
        Ok(())
    }

    /// An output already written by this program shadows an input of the
    /// same name.
    fn resolve_read(&self, line: &RpnLine, name: &str) -> Result<&VariableDescriptor, CompileError> {
        if let Some(var) = self.vars.outputs.find(name).filter(|v| v.used) {
            return Ok(var);
        }
        self.vars.inputs.find(name).ok_or_else(|| {
            error(
                line,
                CompileErrorKind::InputNotFound {
                    name: name.into(),
                    pending_output: self.vars.outputs.find(name).is_some(),
                },
            )
        })
    }

    /// Converts a literal into the slot reserved for it by extraction.
    fn place_constant(
        &mut self,
        line: &RpnLine,
        tag: TypeTag,
        text: &str,
    ) -> Result<DataAddress, CompileError> {
        let name = format!("{}{}", CONSTANT_PREFIX, self.next_constant);
        self.next_constant += tag.word_size();

        let var = self
            .vars
            .inputs
            .find(&name)
            .filter(|v| v.type_tag == tag)
            .ok_or_else(|| {
                error(
                    line,
                    CompileErrorKind::InputNotFound {
                        name: name.as_str().into(),
                        pending_output: false,
                    },
                )
            })?;
        let location = var.location;

        let written = Value::parse(tag, text)
            .map(|value| self.data.write_value(location, value))
            .unwrap_or(false);
        if !written {
            return Err(error(
                line,
                CompileErrorKind::InvalidLiteral {
                    type_name: tag.name().into(),
                    text: text.into(),
                },
            ));
        }
        Ok(location)
    }

    fn finish(self, last_span: Span) -> Result<CompiledProgram, CompileError> {
        if !self.types.is_empty() {
            return Err(CompileError::new(
                CompileErrorKind::IncompleteSequence {
                    left: self.types.len(),
                },
                last_span,
            ));
        }
        tracing::debug!(
            code_words = self.code.len(),
            data_words = self.data.len(),
            stack_words = self.max_stack_size,
            "program compiled"
        );
        Ok(CompiledProgram {
            code: self.code,
            data: self.data,
            stack_words: self.max_stack_size,
        })
    }
}

/// Places inputs after the constants, then outputs. Returns the data memory
/// size in words.
fn allocate(vars: &mut VariableSet) -> Result<usize, CompileError> {
    for var in vars.inputs.iter_mut().filter(|v| !v.is_constant()) {
        var.location = UNASSIGNED;
    }
    for var in vars.outputs.iter_mut() {
        var.location = UNASSIGNED;
        var.used = false;
        if var.type_inferred {
            var.type_tag = TypeTag::Void;
            var.type_inferred = false;
        }
    }

    let mut next = vars.start_of_variables as usize;
    for var in vars.inputs.iter_mut() {
        if !var.type_tag.is_numeric() {
            return Err(untyped(var));
        }
        if var.location != UNASSIGNED {
            continue;
        }
        let words = if var.external.is_some() {
            POINTER_WORDS
        } else {
            var.type_tag.word_size()
        };
        next = place(var, next, words)?;
    }

    for var in vars.outputs.iter_mut() {
        let words = match (var.external.is_some(), var.type_tag) {
            (true, TypeTag::Void) => return Err(untyped(var)),
            (true, _) => POINTER_WORDS,
            (false, TypeTag::Void) => UNTYPED_OUTPUT_WORDS,
            (false, tag) => tag.word_size(),
        };
        next = place(var, next, words)?;
    }
    Ok(next)
}

fn place(var: &mut VariableDescriptor, next: usize, words: usize) -> Result<usize, CompileError> {
    let end = next + words;
    if end >= UNASSIGNED as usize {
        return Err(CompileError::new(
            CompileErrorKind::AddressOverflow {
                name: var.name.clone(),
            },
            Span::default(),
        ));
    }
    var.location = next as DataAddress;
    Ok(end)
}

fn untyped(var: &VariableDescriptor) -> CompileError {
    CompileError::new(
        CompileErrorKind::UntypedVariable {
            name: var.name.clone(),
        },
        Span::default(),
    )
}
