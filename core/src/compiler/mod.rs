//! Two-pass compiler from RPN text to code memory.
//!
//! ## Passes
//!
//! 1. [`extract_variables`] collects the names read and written by the
//!    program and places the `CONST` literals at the bottom of data memory.
//! 2. [`compile`] places the remaining variables, then walks the lines again
//!    with a [`TypeStack`], selecting one catalog operator per line and
//!    emitting its opcode (plus an address operand for variable access).
//!
//! Between the passes the caller supplies input types and may bind variables
//! to its own memory.

mod codegen;
mod error;
mod extract;
mod type_stack;


pub use codegen::{CompiledProgram, compile};
pub use error::{CompileError, CompileErrorKind};
pub use extract::extract_variables;
pub use type_stack::{DEFAULT_TYPE_STACK_DEPTH, TypeStack, TypeStackFull};

use crate::memory::DataAddress;
use crate::variables::{Symbols, VariableTable};

/// Input and output tables of one program.
#[derive(Debug, Clone, Default)]
pub struct VariableSet {
    pub inputs: VariableTable,
    pub outputs: VariableTable,
    /// First address after the constants.
    pub start_of_variables: DataAddress,
}

impl VariableSet {
    pub fn symbols(&self) -> Symbols<'_> {
        Symbols {
            inputs: &self.inputs,
            outputs: &self.outputs,
            start_of_variables: self.start_of_variables,
        }
    }
}
