//! Listings of compiled code.
//!
//! [`decompile`] turns code memory back into RPN text that compiles to the
//! same code. The same formatting is used by the debug executor, which also
//! shows the values flowing through each instruction.

use core::fmt::Write;

use crate::String;
use crate::catalog::{Catalog, Opcode, OperatorDescriptor, REMOTE_READ, REMOTE_WRITE};
use crate::memory::{CodeWord, DataAddress, DataMemory};
use crate::types::{TypeTag, Value};
use crate::variables::{Symbols, VariableDescriptor};
use crate::vm::Stack;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecompileError {
    #[error("no variable or constant at address {address}")]
    UnknownAddress { address: DataAddress },
    #[error("unknown opcode {opcode} at code offset {offset}")]
    UnknownOpcode { opcode: Opcode, offset: usize },
    #[error("missing address operand at code offset {offset}")]
    MissingOperand { offset: usize },
    #[error("program is not compiled")]
    NotCompiled,
}

/// Renders the whole program, one instruction per line.
///
/// With `show_types`, every line is annotated with its operand and result
/// types, e.g. `ADD (int32,int32) => (int32)`.
pub fn decompile(
    code: &[CodeWord],
    catalog: &Catalog,
    symbols: Symbols<'_>,
    data: &DataMemory,
    show_types: bool,
) -> Result<String, DecompileError> {
    let mut out = String::new();
    let mut cursor = 0;
    while cursor < code.len() {
        let decoded = decode(code, cursor, catalog)?;
        cursor = decoded.next;
        let text = InstructionText {
            descriptor: decoded.descriptor,
            operand: decoded.operand,
            symbols,
            show_types,
        };
        out.push_str(text.mnemonic());
        text.write_operand(&mut out)?;
        text.write_inputs(&mut out, " ", None);
        text.write_outputs(&mut out, data, None)?;
        out.push('\n');
    }
    Ok(out)
}

/// Whether instructions named `name` carry an address operand.
pub(crate) fn has_operand(name: &str) -> bool {
    matches!(name, "READ" | "WRITE") || name == REMOTE_READ || name == REMOTE_WRITE
}

pub(crate) struct Decoded<'a> {
    pub descriptor: &'a OperatorDescriptor,
    pub operand: Option<DataAddress>,
    /// Offset of the following instruction.
    pub next: usize,
}

pub(crate) fn decode<'a>(
    code: &[CodeWord],
    offset: usize,
    catalog: &'a Catalog,
) -> Result<Decoded<'a>, DecompileError> {
    let opcode = code
        .get(offset)
        .copied()
        .ok_or(DecompileError::MissingOperand { offset })?;
    let descriptor = catalog
        .descriptor(opcode)
        .ok_or(DecompileError::UnknownOpcode { opcode, offset })?;
    if !has_operand(descriptor.name) {
        return Ok(Decoded {
            descriptor,
            operand: None,
            next: offset + 1,
        });
    }
    let operand = code
        .get(offset + 1)
        .copied()
        .ok_or(DecompileError::MissingOperand { offset: offset + 1 })?;
    Ok(Decoded {
        descriptor,
        operand: Some(operand),
        next: offset + 2,
    })
}

/// The text of one instruction, apart from its mnemonic.
pub(crate) struct InstructionText<'a> {
    pub descriptor: &'a OperatorDescriptor,
    pub operand: Option<DataAddress>,
    pub symbols: Symbols<'a>,
    pub show_types: bool,
}

impl InstructionText<'_> {
    /// The name as written in source: constants read back as `CONST`, and
    /// the remote variants as plain `READ`/`WRITE`.
    pub fn mnemonic(&self) -> &'static str {
        match self.descriptor.name {
            "READ" if self.operand.is_some_and(|a| self.symbols.is_constant(a)) => "CONST",
            REMOTE_READ => "READ",
            REMOTE_WRITE => "WRITE",
            name => name,
        }
    }

    /// The variable written by a `WRITE`, or the target type of a `CAST`.
    pub fn write_operand(&self, out: &mut String) -> Result<(), DecompileError> {
        match self.descriptor.name {
            "CAST" => {
                if let Some(tag) = self.descriptor.output_types().first() {
                    let _ = write!(out, " {}", tag);
                }
            }
            "WRITE" | REMOTE_WRITE => {
                let name = &self.variable()?.name;
                let _ = write!(out, " {}", name);
            }
            _ => {}
        }
        Ok(())
    }

    /// The input group, top of stack first. Values are peeked from `stack`
    /// when given, so this must run before the instruction does.
    pub fn write_inputs(&self, out: &mut String, prefix: &str, stack: Option<&Stack>) {
        let types = self.descriptor.input_types();
        if types.is_empty() || !(self.show_types || stack.is_some()) {
            return;
        }
        out.push_str(prefix);
        self.write_group(out, types, stack);
    }

    /// The variable or literal read by a `READ`, then the result group.
    /// Values are peeked from `stack`, after the instruction has run.
    pub fn write_outputs(
        &self,
        out: &mut String,
        data: &DataMemory,
        stack: Option<&Stack>,
    ) -> Result<(), DecompileError> {
        if matches!(self.descriptor.name, "READ" | REMOTE_READ) {
            let address = self.address()?;
            let var = self.variable()?;
            if self.symbols.is_constant(address) {
                let value = data
                    .read_value(var.type_tag, address)
                    .ok_or(DecompileError::UnknownAddress { address })?;
                let _ = write!(out, " {} {}", var.type_tag, value);
            } else {
                let _ = write!(out, " {}", var.name);
            }
        }

        let types = self
            .descriptor
            .output_types()
            .get(..self.descriptor.outputs)
            .unwrap_or(&[]);
        if !types.is_empty() && (self.show_types || stack.is_some()) {
            out.push_str(" => ");
            self.write_group(out, types, stack);
        }
        Ok(())
    }

    fn write_group(&self, out: &mut String, types: &[TypeTag], stack: Option<&Stack>) {
        out.push('(');
        let mut words_below = 0;
        for (i, &tag) in types.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let value = stack.and_then(|s| s.peek_value(tag, words_below));
            words_below += tag.word_size();
            decorate(out, tag, value, self.show_types);
        }
        out.push(')');
    }

    fn address(&self) -> Result<DataAddress, DecompileError> {
        self.operand
            .ok_or(DecompileError::MissingOperand { offset: 0 })
    }

    fn variable(&self) -> Result<&VariableDescriptor, DecompileError> {
        let address = self.address()?;
        self.symbols
            .find(address)
            .ok_or(DecompileError::UnknownAddress { address })
    }
}

/// `(type)value`, `type` or `value`.
fn decorate(out: &mut String, tag: TypeTag, value: Option<Value>, show_types: bool) {
    match (show_types, value) {
        (true, Some(value)) => {
            let _ = write!(out, "({}){}", tag, value);
        }
        (false, Some(value)) => {
            let _ = write!(out, "{}", value);
        }
        (_, None) => {
            let _ = write!(out, "{}", tag);
        }
    }
}
