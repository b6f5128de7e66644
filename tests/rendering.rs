use rteval::{Error, RuntimeEvaluator, TypeTag, render_error_to_string_no_color};

fn failure(source: &str, inputs: &[(&str, TypeTag)]) -> Error {
    let mut evaluator = RuntimeEvaluator::new(source);
    if let Err(err) = evaluator.extract_variables() {
        return err.into();
    }
    for (name, tag) in inputs {
        evaluator.set_input_variable_type((*name).into(), *tag);
    }
    evaluator.compile().unwrap_err().into()
}

#[test]
fn compilation_errors_point_at_the_line() {
    let error = failure("READ x\nREAD x\nMUL\nCAST text\nWRITE y", &[("x", TypeTag::Int8)]);
    assert!(
        error.to_string().starts_with("Compilation failed with 1 error(s): "),
        "{}",
        error
    );

    let output = render_error_to_string_no_color(&error);
    assert!(output.contains("CAST text"), "{}", output);
    assert!(output.contains("text is not a numeric type"), "{}", output);
}

#[test]
fn duplicate_outputs_are_reported_during_extraction() {
    let error = failure("CONST int8 1\nWRITE y\nCONST int8 2\nWRITE y", &[]);
    let output = render_error_to_string_no_color(&error);
    assert!(output.contains("WRITE y"), "{}", output);
    assert!(output.contains("Error"), "{}", output);
}

#[test]
fn api_errors_render_as_a_single_line() {
    let error = Error::Api("program is not compiled".to_string());
    assert_eq!(
        render_error_to_string_no_color(&error),
        "API error: program is not compiled\n"
    );
}
