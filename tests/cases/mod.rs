#![allow(dead_code)]

use rteval::{CompileError, ExecutionMode, RuntimeEvaluator, Status, Value};

pub struct Run {
    pub evaluator: RuntimeEvaluator,
    pub status: Status,
}

/// Extracts, types the inputs after the values given, compiles and runs once.
pub fn run(
    source: &str,
    inputs: &[(&str, Value)],
    mode: ExecutionMode,
) -> Result<Run, CompileError> {
    let mut evaluator = RuntimeEvaluator::new(source);
    evaluator.extract_variables()?;
    for (name, value) in inputs {
        assert!(
            evaluator.set_input_variable_type((*name).into(), value.type_tag()),
            "no input variable {}",
            name
        );
    }
    evaluator.compile()?;
    for (name, value) in inputs {
        assert!(evaluator.set_input_variable_value((*name).into(), *value));
    }
    let status = evaluator.execute(mode, None);
    Ok(Run { evaluator, status })
}

/// Compiles a program that is expected to be rejected.
pub fn compile_error(source: &str, inputs: &[(&str, Value)]) -> CompileError {
    match run(source, inputs, ExecutionMode::Safe) {
        Ok(run) => panic!(
            "{:?} compiled and finished with status {}",
            source, run.status
        ),
        Err(err) => err,
    }
}

macro_rules! test_case {
    (
        $name:ident,
        input: $input:expr,
        $(inputs: { $($in_name:ident: $in_value:expr),* $(,)? },)?
        error: $error:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let inputs: Vec<(&str, rteval::Value)> =
                vec![$($((stringify!($in_name), $in_value)),*)?];
            let err = crate::cases::compile_error($input, &inputs);
            assert_eq!(err.status(), $error, "{}", err);
        }
    };
    (
        $name:ident,
        input: $input:expr,
        $(inputs: { $($in_name:ident: $in_value:expr),* $(,)? },)?
        $(outputs: { $($out_name:ident: $out_value:expr),* $(,)? },)?
        $(status: $status:expr,)?
    ) => {
        #[test]
        fn $name() {
            let inputs: Vec<(&str, rteval::Value)> =
                vec![$($((stringify!($in_name), $in_value)),*)?];
            for mode in [rteval::ExecutionMode::Fast, rteval::ExecutionMode::Safe] {
                let run = crate::cases::run($input, &inputs, mode)
                    .unwrap_or_else(|err| panic!("{}", err));
                #[allow(unused_mut)]
                let mut expected = rteval::Status::empty();
                $(expected = $status;)?
                assert_eq!(run.status, expected, "{:?}", mode);
                $($(
                    assert_eq!(
                        run.evaluator.variable_value(stringify!($out_name).into()),
                        Some($out_value),
                        "{} in {:?}",
                        stringify!($out_name),
                        mode,
                    );
                )*)?
            }
        }
    };
}
