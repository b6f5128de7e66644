//! Boolean operators over `uint8` truth values.

use super::{Catalog, CatalogError};
use crate::types::TypeTag;
use crate::vm::Machine;

fn and(m: &mut Machine<'_>) {
    let x1: u8 = m.pop();
    let x2: u8 = m.pop();
    m.push(u8::from(x2 != 0 && x1 != 0));
}

fn or(m: &mut Machine<'_>) {
    let x1: u8 = m.pop();
    let x2: u8 = m.pop();
    m.push(u8::from(x2 != 0 || x1 != 0));
}

/// Boolean inequality, not a bitwise xor.
fn xor(m: &mut Machine<'_>) {
    let x1: u8 = m.pop();
    let x2: u8 = m.pop();
    m.push(u8::from((x2 != 0) != (x1 != 0)));
}

fn not(m: &mut Machine<'_>) {
    let x: u8 = m.pop();
    m.push(u8::from(x == 0));
}

const BOOL: TypeTag = TypeTag::UInt8;

pub(super) fn register_logic(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.add("AND", &[BOOL, BOOL], &[BOOL], and)?;
    catalog.add("OR", &[BOOL, BOOL], &[BOOL], or)?;
    catalog.add("XOR", &[BOOL, BOOL], &[BOOL], xor)?;
    Ok(())
}

pub(super) fn register_not(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.add("NOT", &[BOOL], &[BOOL], not)?;
    Ok(())
}
