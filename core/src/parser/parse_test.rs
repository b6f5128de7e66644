use pretty_assertions::assert_eq;

use super::*;

fn commands(source: &str) -> Vec<(usize, String, Vec<String>)> {
    parse(source)
        .unwrap()
        .into_iter()
        .map(|line| {
            (
                line.number,
                line.command.to_string(),
                line.params.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn test_simple_program() {
    let source = "READ x\nCONST float64 2\nMUL\nWRITE y";
    assert_eq!(
        commands(source),
        vec![
            (1, "READ".to_string(), vec!["x".to_string()]),
            (
                2,
                "CONST".to_string(),
                vec!["float64".to_string(), "2".to_string()]
            ),
            (3, "MUL".to_string(), vec![]),
            (4, "WRITE".to_string(), vec!["y".to_string()]),
        ]
    );
}

#[test]
fn test_separators_and_blank_lines() {
    let source = "\n  READ,\tx  \r\n\n\tCONST  int8,,-3\n";
    assert_eq!(
        commands(source),
        vec![
            (2, "READ".to_string(), vec!["x".to_string()]),
            (
                4,
                "CONST".to_string(),
                vec!["int8".to_string(), "-3".to_string()]
            ),
        ]
    );
}

#[test]
fn test_empty_source() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("\n\n \n").unwrap().is_empty());
}

#[test]
fn test_extra_operands_are_kept() {
    let lines = parse("READ a b c d").unwrap();
    assert_eq!(lines[0].params.len(), 4);
}

#[test]
fn test_type_annotations_are_ignored() {
    let source = "READ theta => (float64)\nSIN (float64) => (float64)\nCAST uint8 (float64) => (uint8)\nWRITE y (uint8,uint8)";
    assert_eq!(
        commands(source),
        vec![
            (1, "READ".to_string(), vec!["theta".to_string()]),
            (2, "SIN".to_string(), vec![]),
            (3, "CAST".to_string(), vec!["uint8".to_string()]),
            (4, "WRITE".to_string(), vec!["y".to_string()]),
        ]
    );
}

#[test]
fn test_line_spans() {
    let source = "READ x\n  ADD";
    let lines = parse(source).unwrap();
    assert_eq!(lines[0].span, Span::new(0, 6));
    assert_eq!(lines[1].span.str_of(source), "ADD");
}

#[test]
fn test_reserved_opcodes_are_rejected() {
    for source in ["RREAD x", "READ x\nRWRITE y"] {
        let err = parse(source).unwrap_err();
        assert!(
            matches!(err.kind, ParseErrorKind::ReservedOpcode { .. }),
            "{:?}",
            err.kind
        );
    }
}

#[test]
fn test_stray_parenthesis() {
    let err = parse("READ x)").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    assert_eq!(err.span.0.start, 6);
}
