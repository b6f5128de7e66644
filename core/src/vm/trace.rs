//! Instruction-by-instruction trace written by the debug executor.
//!
//! ```text
//! [line]-[stackPtr]-[codePtr]::[CODE] stack-in => stack-out
//! 1 - 0 - 0 :: READ  x => ((float64)3)
//! 2 - 2 - 2 :: READ  x => ((float64)3)
//! 3 - 4 - 4 :: MUL ((float64)3,(float64)3) => ((float64)9)
//! 4 - 2 - 5 :: WRITE  y((float64)9)
//! 0 - 7 :: END
//! ```

use std::io;

use core::fmt::Write as _;

use crate::String;
use crate::api::TraceOptions;
use crate::decompiler::{InstructionText, decode};
use crate::status::Status;
use crate::vm::Machine;
use crate::vm::runtime::{Program, checked, step};

const HEADER: &str = "[line]-[stackPtr]-[codePtr]::[CODE] stack-in => stack-out\n";

pub(crate) struct Tracer<'s, 'p> {
    sink: &'s mut dyn io::Write,
    program: Program<'p>,
    options: TraceOptions,
    line: String,
}

impl<'s, 'p> Tracer<'s, 'p> {
    pub fn new(sink: &'s mut dyn io::Write, program: Program<'p>, options: TraceOptions) -> Self {
        Self {
            sink,
            program,
            options,
            line: String::new(),
        }
    }

    /// Executes the whole program, tracing each instruction, and stops like
    /// the safe loop does.
    pub fn run(&mut self, machine: &mut Machine<'_>) {
        if !self.emit(machine, HEADER) {
            return;
        }
        let mut number = 1;
        while !machine.at_end() {
            let stack_offset = machine.stack().offset();
            let cursor = machine.cursor();
            let decoded = match decode(self.program.code, cursor, self.program.catalog) {
                Ok(decoded) => decoded,
                Err(err) => {
                    machine.raise(Status::FATAL_ERROR);
                    tracing::warn!(%err, "cannot trace instruction");
                    return;
                }
            };
            let text = InstructionText {
                descriptor: decoded.descriptor,
                operand: decoded.operand,
                symbols: self.program.symbols,
                show_types: self.options.show_types,
            };

            self.line.clear();
            let _ = write!(
                self.line,
                "{} - {} - {} :: {} ",
                number, stack_offset, cursor, decoded.descriptor.name
            );
            let described = text.write_operand(&mut self.line);
            let values = self.options.show_values;
            text.write_inputs(&mut self.line, "", values.then(|| machine.stack()));

            let executed = step(machine, self.program.catalog);

            let described = described.and_then(|()| {
                text.write_outputs(
                    &mut self.line,
                    machine.data(),
                    values.then(|| machine.stack()),
                )
            });
            if let Err(err) = described {
                tracing::warn!(%err, "cannot describe instruction");
            }
            if !machine.status().is_ok() {
                self.line.push_str(" <ERROR> ");
            }
            self.line.push('\n');

            let line = core::mem::take(&mut self.line);
            let written = self.emit(machine, &line);
            self.line = line;
            if !(executed && written && checked(machine)) {
                return;
            }
            number += 1;
        }
    }

    /// Writes the closing line when the run raised nothing.
    pub fn finish(&mut self, machine: &mut Machine<'_>) {
        if !machine.status().is_ok() {
            return;
        }
        let end = format!(
            "{} - {} :: END",
            machine.stack().offset(),
            machine.cursor()
        );
        if self.emit(machine, &end) {
            let _ = self.sink.flush();
        }
    }

    fn emit(&mut self, machine: &mut Machine<'_>, text: &str) -> bool {
        match self.sink.write_all(text.as_bytes()) {
            Ok(()) => true,
            Err(err) => {
                machine.raise(Status::FATAL_ERROR);
                tracing::warn!(%err, "trace sink failed");
                false
            }
        }
    }
}
