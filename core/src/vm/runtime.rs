use std::io;

use crate::api::TraceOptions;
use crate::catalog::Catalog;
use crate::memory::{CodeWord, DataMemory};
use crate::status::Status;
use crate::variables::Symbols;
use crate::vm::trace::Tracer;
use crate::vm::{Machine, Stack};

/// How much checking the executor does between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    /// No checks at all.
    Fast,
    /// Stack bounds are checked after every instruction.
    #[default]
    Safe,
    /// Like `Safe`, and every instruction is traced to a sink.
    Debug,
}

/// The read-only half of an execution: compiled code and what is needed to
/// run and describe it.
#[derive(Debug, Clone, Copy)]
pub struct Program<'a> {
    pub code: &'a [CodeWord],
    pub catalog: &'a Catalog,
    pub symbols: Symbols<'a>,
}

/// Runs `program` once from the start.
///
/// Numeric flags raised by operators accumulate without stopping the run.
/// `Safe` and `Debug` stop at the first stack violation or non-numeric flag
/// and add `NOT_COMPLETED` when code was left unexecuted. `Debug` requires a
/// sink and reports `PARAMETERS_ERROR` without one.
pub fn execute(
    program: Program<'_>,
    stack: &mut Stack,
    data: &mut DataMemory,
    mode: ExecutionMode,
    trace: TraceOptions,
    sink: Option<&mut dyn io::Write>,
) -> Status {
    stack.reset();
    let mut machine = Machine::new(program.code, stack, data);

    match mode {
        ExecutionMode::Fast => {
            while !machine.at_end() {
                if !step(&mut machine, program.catalog) {
                    break;
                }
            }
        }
        ExecutionMode::Safe => {
            while !machine.at_end() {
                if !step(&mut machine, program.catalog) || !checked(&mut machine) {
                    break;
                }
            }
            interrupted(&mut machine);
        }
        ExecutionMode::Debug => match sink {
            Some(sink) => {
                let mut tracer = Tracer::new(sink, program, trace);
                tracer.run(&mut machine);
                interrupted(&mut machine);
                tracer.finish(&mut machine);
            }
            None => {
                machine.raise(Status::PARAMETERS_ERROR);
                tracing::warn!("debug mode requested without a sink");
            }
        },
    }

    let offset = machine.stack().offset();
    if offset != 0 {
        machine.raise(Status::INTERNAL_SETUP_ERROR);
        tracing::warn!(offset, "stack pointer not back to origin");
    }
    let status = machine.status();
    if !status.is_ok() {
        tracing::debug!(%status, ?mode, "execution finished with flags");
    }
    status
}

/// Executes the instruction at the cursor. Returns `false` on an opcode the
/// catalog does not know.
#[inline]
pub(crate) fn step(machine: &mut Machine<'_>, catalog: &Catalog) -> bool {
    let opcode = machine.next_word();
    match catalog.function(opcode) {
        Some(function) => {
            function(machine);
            true
        }
        None => {
            machine.raise(Status::FATAL_ERROR);
            tracing::warn!(opcode, offset = machine.cursor() - 1, "unknown opcode");
            false
        }
    }
}

/// Post-instruction checks shared by the safe and debug loops. Returns
/// whether execution may continue.
#[inline]
pub(crate) fn checked(machine: &mut Machine<'_>) -> bool {
    let stack = machine.stack();
    if !stack.in_bounds() {
        let (offset, capacity) = (stack.offset(), stack.capacity());
        machine.raise(Status::OUT_OF_RANGE);
        tracing::warn!("stack over/under flow {} [0 - {}]", offset, capacity);
        return false;
    }
    !machine.status().is_fatal()
}

fn interrupted(machine: &mut Machine<'_>) {
    if !machine.at_end() {
        machine.raise(Status::NOT_COMPLETED);
        tracing::warn!(
            cursor = machine.cursor(),
            len = machine.code().len(),
            "code execution interrupted"
        );
    }
}
