use std::io;

use pretty_assertions::assert_eq;

use crate::api::{CompilationOptions, TraceOptions};
use crate::catalog::catalog;
use crate::compiler::{CompiledProgram, VariableSet, compile, extract_variables};
use crate::status::Status;
use crate::test_utils::init_test_logging;
use crate::types::TypeTag;
use crate::vm::{ExecutionMode, Program, Stack, execute};

struct Compiled {
    vars: VariableSet,
    program: CompiledProgram,
    stack: Stack,
}

impl Compiled {
    fn new(source: &str, inputs: &[(&str, TypeTag)]) -> Self {
        let mut vars = extract_variables(source).unwrap();
        for (name, tag) in inputs {
            vars.inputs.find_mut(name).unwrap().type_tag = *tag;
        }
        let program = compile(source, &mut vars, catalog(), &CompilationOptions::default()).unwrap();
        let stack = Stack::new(program.stack_words);
        Self {
            vars,
            program,
            stack,
        }
    }

    fn input_address(&self, name: &str) -> u16 {
        self.vars.inputs.find(name).unwrap().location
    }

    fn output_address(&self, name: &str) -> u16 {
        self.vars.outputs.find(name).unwrap().location
    }

    fn run(&mut self, mode: ExecutionMode, sink: Option<&mut dyn io::Write>) -> Status {
        let program = Program {
            code: &self.program.code,
            catalog: catalog(),
            symbols: self.vars.symbols(),
        };
        execute(
            program,
            &mut self.stack,
            &mut self.program.data,
            mode,
            TraceOptions::default(),
            sink,
        )
    }
}

fn square() -> Compiled {
    let mut compiled = Compiled::new("READ x\nREAD x\nMUL\nWRITE y", &[("x", TypeTag::Float64)]);
    let x = compiled.input_address("x");
    compiled.program.data.write::<f64>(x, 3.0);
    compiled
}

struct BrokenSink;

impl io::Write for BrokenSink {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_every_mode_computes_the_same_result() {
    init_test_logging();
    for mode in [ExecutionMode::Fast, ExecutionMode::Safe, ExecutionMode::Debug] {
        let mut compiled = square();
        let mut trace = Vec::new();
        let status = compiled.run(mode, Some(&mut trace));
        assert_eq!(status, Status::empty(), "{:?}", mode);
        let y = compiled.output_address("y");
        assert_eq!(compiled.program.data.read::<f64>(y), 9.0, "{:?}", mode);
        assert_eq!(compiled.stack.offset(), 0);
        assert_eq!(trace.is_empty(), mode != ExecutionMode::Debug);
    }
}

#[test]
fn test_repeated_runs_are_deterministic() {
    let mut compiled = square();
    let y = compiled.output_address("y");
    let first = compiled.run(ExecutionMode::Safe, None);
    let first_y = compiled.program.data.read::<f64>(y);
    let second = compiled.run(ExecutionMode::Safe, None);
    assert_eq!(first, second);
    assert_eq!(compiled.program.data.read::<f64>(y), first_y);
}

#[test]
fn test_saturating_cast_completes_with_flag() {
    let mut compiled = Compiled::new("CONST uint16 256\nCAST uint8\nWRITE r", &[]);
    let status = compiled.run(ExecutionMode::Safe, None);
    assert_eq!(status, Status::OUT_OF_RANGE);
    let r = compiled.output_address("r");
    assert_eq!(compiled.vars.outputs.find("r").unwrap().type_tag, TypeTag::UInt8);
    assert_eq!(compiled.program.data.read::<u8>(r), 255);
    assert_eq!(compiled.stack.offset(), 0);
}

#[test]
fn test_integer_division_by_zero_flags_overflow() {
    let mut compiled = Compiled::new("CONST int32 7\nCONST int32 0\nDIV\nWRITE q", &[]);
    let q = compiled.output_address("q");
    compiled.program.data.write::<i32>(q, 99);
    let status = compiled.run(ExecutionMode::Fast, None);
    assert_eq!(status, Status::OVERFLOW);
    assert_eq!(compiled.program.data.read::<i32>(q), 0);
}

#[test]
fn test_numeric_flags_do_not_stop_safe_mode() {
    let mut compiled = Compiled::new(
        "CONST int32 1\nCONST int32 0\nDIV\nWRITE q\nCONST int8 -1\nCAST uint8\nWRITE r",
        &[],
    );
    let status = compiled.run(ExecutionMode::Safe, None);
    assert_eq!(status, Status::OVERFLOW | Status::OUT_OF_RANGE);
    let r = compiled.output_address("r");
    assert_eq!(compiled.program.data.read::<u8>(r), 0);
}

#[test]
fn test_debug_without_sink_is_a_parameters_error() {
    let mut compiled = square();
    let status = compiled.run(ExecutionMode::Debug, None);
    assert_eq!(status, Status::PARAMETERS_ERROR);
    let y = compiled.output_address("y");
    assert_eq!(compiled.program.data.read::<f64>(y), 0.0);
}

#[test]
fn test_debug_trace_lists_every_instruction() {
    let mut compiled = square();
    let mut trace = Vec::new();
    let status = compiled.run(ExecutionMode::Debug, Some(&mut trace));
    assert_eq!(status, Status::empty());
    assert_eq!(
        String::from_utf8(trace).unwrap(),
        "[line]-[stackPtr]-[codePtr]::[CODE] stack-in => stack-out\n\
         1 - 0 - 0 :: READ  x => ((float64)3)\n\
         2 - 2 - 2 :: READ  x => ((float64)3)\n\
         3 - 4 - 4 :: MUL ((float64)3,(float64)3) => ((float64)9)\n\
         4 - 2 - 5 :: WRITE  y((float64)9)\n\
         0 - 7 :: END"
    );
}

#[test]
fn test_debug_trace_marks_flagged_instructions() {
    let mut compiled = Compiled::new("CONST uint16 256\nCAST uint8\nWRITE r", &[]);
    let mut trace = Vec::new();
    let status = compiled.run(ExecutionMode::Debug, Some(&mut trace));
    assert_eq!(status, Status::OUT_OF_RANGE);
    let trace = String::from_utf8(trace).unwrap();
    let lines: Vec<&str> = trace.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "1 - 0 - 0 :: READ  uint16 256 => ((uint16)256)");
    assert_eq!(
        lines[2],
        "2 - 1 - 2 :: CAST  uint8((uint16)256) => ((uint8)255) <ERROR> "
    );
    assert!(lines[3].ends_with("<ERROR> "));
    assert!(!trace.contains("END"));
}

#[test]
fn test_safe_mode_catches_truncated_stack() {
    init_test_logging();
    let mut compiled = square();
    assert_eq!(compiled.stack.capacity(), 4);
    compiled.stack.truncate(2);

    let status = compiled.run(ExecutionMode::Safe, None);
    assert!(status.contains(Status::OUT_OF_RANGE));
    assert!(status.contains(Status::NOT_COMPLETED));
    assert!(status.contains(Status::INTERNAL_SETUP_ERROR));
    // Stopped right after the second READ.
    assert_eq!(compiled.stack.offset(), 4);
    let y = compiled.output_address("y");
    assert_eq!(compiled.program.data.read::<f64>(y), 0.0);
}

#[test]
fn test_failing_sink_is_fatal() {
    let mut compiled = square();
    let mut sink = BrokenSink;
    let status = compiled.run(ExecutionMode::Debug, Some(&mut sink));
    assert_eq!(status, Status::FATAL_ERROR | Status::NOT_COMPLETED);
}

#[test]
fn test_unknown_opcode_stops_every_mode() {
    let vars = VariableSet::default();
    let code = [u16::MAX];
    for mode in [ExecutionMode::Fast, ExecutionMode::Safe] {
        let mut stack = Stack::new(0);
        let mut data = crate::memory::DataMemory::new(0);
        let program = Program {
            code: &code,
            catalog: catalog(),
            symbols: vars.symbols(),
        };
        let status = execute(
            program,
            &mut stack,
            &mut data,
            mode,
            TraceOptions::default(),
            None,
        );
        assert!(status.contains(Status::FATAL_ERROR), "{:?}", mode);
    }
}
