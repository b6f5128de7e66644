use pretty_assertions::assert_eq;

use super::*;
use crate::compiler::TypeStack;
use crate::types::TypeTag;

fn stack_of(tags: &[TypeTag]) -> TypeStack {
    let mut stack = TypeStack::default();
    for &tag in tags {
        stack.push(tag).unwrap();
    }
    stack
}

fn select(
    name: &str,
    tags: &[TypeTag],
    match_output: bool,
) -> Option<&'static OperatorDescriptor> {
    let mut stack = stack_of(tags);
    let mut size = 0;
    let opcode = catalog().find_match(name, &mut stack, match_output, &mut size)?;
    catalog().descriptor(opcode)
}

fn nop(_: &mut Machine<'_>) {}

#[test]
fn test_standard_catalog_is_built() {
    let catalog = catalog();
    assert!(!catalog.is_empty());
    assert_eq!(catalog.opcodes("READ").len(), 10);
    assert_eq!(catalog.opcodes(REMOTE_READ).len(), 10);
    assert_eq!(catalog.opcodes("CAST").len(), 100);
    // Ten same-type writes plus seventeen converting ones.
    assert_eq!(catalog.opcodes("WRITE").len(), 27);
    assert_eq!(catalog.opcodes(REMOTE_WRITE).len(), 27);
    assert_eq!(catalog.opcodes("NOT").len(), 1);
    assert!(catalog.opcodes("NOPE").is_empty());

    let first = catalog.descriptor(0).unwrap();
    assert_eq!(first.name, "READ");
    assert_eq!(first.output_types(), &[TypeTag::Float64]);
}

#[test]
fn test_every_descriptor_is_consistent() {
    for (opcode, descriptor) in catalog().iter() {
        assert_eq!(
            descriptor.types.len(),
            descriptor.inputs + descriptor.outputs.max(descriptor.output_types().len()),
            "{:?}",
            descriptor
        );
        assert_eq!(
            catalog().function(opcode).map(|f| f as usize),
            Some(descriptor.function as usize)
        );
    }
}

#[test]
fn test_first_fit_keeps_int32_addition_narrow() {
    let add = select("ADD", &[TypeTag::Int32, TypeTag::Int32], false).unwrap();
    assert_eq!(add.output_types(), &[TypeTag::Int32]);

    let add = select("ADD", &[TypeTag::Int8, TypeTag::Int8], false).unwrap();
    assert_eq!(add.output_types(), &[TypeTag::Int32]);

    let sub = select("SUB", &[TypeTag::UInt32, TypeTag::UInt32], false).unwrap();
    assert_eq!(sub.output_types(), &[TypeTag::Int32]);
}

#[test]
fn test_mixed_rows_match_both_orders() {
    let a = select("MUL", &[TypeTag::Int64, TypeTag::UInt8], false).unwrap();
    let b = select("MUL", &[TypeTag::UInt8, TypeTag::Int64], false).unwrap();
    assert_eq!(a.output_types(), &[TypeTag::Int64]);
    assert_eq!(b.output_types(), &[TypeTag::Int64]);
    assert_eq!(a.input_types(), &[TypeTag::UInt8, TypeTag::Int64]);
    assert_eq!(b.input_types(), &[TypeTag::Int64, TypeTag::UInt8]);

    let eq = select("EQ", &[TypeTag::UInt16, TypeTag::UInt32], false).unwrap();
    assert_eq!(eq.output_types(), &[TypeTag::UInt8]);
    assert!(select("EQ", &[TypeTag::Int8, TypeTag::UInt8], false).is_none());
}

#[test]
fn test_pow_with_integer_exponent() {
    let pow = select("POW", &[TypeTag::Float64, TypeTag::Int64], false).unwrap();
    assert_eq!(pow.input_types(), &[TypeTag::Int64, TypeTag::Float64]);
    assert_eq!(pow.output_types(), &[TypeTag::Float64]);

    let pow = select("POW", &[TypeTag::Float32, TypeTag::UInt8], false).unwrap();
    assert_eq!(pow.output_types(), &[TypeTag::Float32]);
    assert!(select("POW", &[TypeTag::Int64, TypeTag::Float64], false).is_none());
}

#[test]
fn test_find_match_commits_stack_effect() {
    let mut stack = stack_of(&[TypeTag::Float64, TypeTag::Float64]);
    let mut size = 4;
    let opcode = catalog().find_match("MUL", &mut stack, false, &mut size).unwrap();
    assert_eq!(catalog().descriptor(opcode).unwrap().name, "MUL");
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.peek(0), Some(TypeTag::Float64));
    assert_eq!(size, 2);
}

#[test]
fn test_find_match_with_destination() {
    // Source int64 below the destination uint8 pushed by the compiler.
    let mut stack = stack_of(&[TypeTag::Int64, TypeTag::UInt8]);
    let mut size = 2;
    let opcode = catalog().find_match("WRITE", &mut stack, true, &mut size).unwrap();
    let write = catalog().descriptor(opcode).unwrap();
    assert_eq!(write.types.as_slice(), &[TypeTag::Int64, TypeTag::UInt8]);
    assert!(stack.is_empty());
    assert_eq!(size, 0);

    // A narrowing write that is not registered.
    let mut stack = stack_of(&[TypeTag::Float64, TypeTag::Int8]);
    assert!(catalog().find_match("WRITE", &mut stack, true, &mut size).is_none());
}

#[test]
fn test_failed_match_leaves_stack_untouched() {
    let mut stack = stack_of(&[TypeTag::Int32]);
    let before = stack.clone();
    let mut size = 1;
    assert!(catalog().find_match("SIN", &mut stack, false, &mut size).is_none());
    assert_eq!(stack, before);
    assert_eq!(size, 1);
}

#[test]
fn test_register_rejects_untyped_descriptor() {
    let mut catalog = Catalog::new();
    assert_eq!(
        catalog.register(OperatorDescriptor::new("NOP", &[], &[], nop)),
        Err(CatalogError::Untyped { name: "NOP" })
    );
    assert!(catalog.is_empty());
}

#[test]
fn test_register_fails_when_full() {
    let mut catalog = Catalog::new();
    for i in 0..MAX_OPERATORS {
        assert_eq!(
            catalog.add("NOP", &[TypeTag::UInt8], &[], nop),
            Ok(i as Opcode)
        );
    }
    assert_eq!(
        catalog.add("NOP", &[TypeTag::UInt8], &[], nop),
        Err(CatalogError::Full {
            name: "NOP",
            capacity: MAX_OPERATORS,
        })
    );
    assert_eq!(catalog.len(), MAX_OPERATORS);
    assert_eq!(catalog.opcodes("NOP").len(), MAX_OPERATORS);
}
