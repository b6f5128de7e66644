//! `READ`, `WRITE`, `CAST` and their remote variants.

use super::{
    Catalog, CatalogError, OperatorDescriptor, REMOTE_READ, REMOTE_WRITE, for_each_numeric,
};
use crate::casting::safe_convert;
use crate::status::Status;
use crate::types::Numeric;
use crate::vm::Machine;

fn read<T: Numeric>(m: &mut Machine<'_>) {
    let address = m.next_word();
    let value: T = m.read(address);
    m.push(value);
}

fn write<T: Numeric>(m: &mut Machine<'_>) {
    let address = m.next_word();
    let value: T = m.pop();
    m.write(address, value);
}

fn read_remote<T: Numeric>(m: &mut Machine<'_>) {
    let address = m.next_word();
    let value: T = m.read_external(address);
    m.push(value);
}

fn write_remote<T: Numeric>(m: &mut Machine<'_>) {
    let address = m.next_word();
    let value: T = m.pop();
    m.write_external(address, value);
}

fn write_converting<Tin: Numeric, Tout: Numeric>(m: &mut Machine<'_>) {
    let address = m.next_word();
    let value = convert::<Tin, Tout>(m);
    m.write(address, value);
}

fn write_remote_converting<Tin: Numeric, Tout: Numeric>(m: &mut Machine<'_>) {
    let address = m.next_word();
    let value = convert::<Tin, Tout>(m);
    m.write_external(address, value);
}

fn cast<Tin: Numeric, Tout: Numeric>(m: &mut Machine<'_>) {
    let value = convert::<Tin, Tout>(m);
    m.push(value);
}

#[inline]
fn convert<Tin: Numeric, Tout: Numeric>(m: &mut Machine<'_>) -> Tout {
    let (value, faithful) = safe_convert::<Tin, Tout>(m.pop());
    if !faithful {
        m.raise(Status::OUT_OF_RANGE);
    }
    value
}

fn register_read<T: Numeric>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.add("READ", &[], &[T::TAG], read::<T>)?;
    Ok(())
}

fn register_write<T: Numeric>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.register(OperatorDescriptor::store("WRITE", T::TAG, T::TAG, write::<T>))?;
    Ok(())
}

fn register_remote_read<T: Numeric>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.add(REMOTE_READ, &[], &[T::TAG], read_remote::<T>)?;
    Ok(())
}

fn register_remote_write<T: Numeric>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.register(OperatorDescriptor::store(
        REMOTE_WRITE,
        T::TAG,
        T::TAG,
        write_remote::<T>,
    ))?;
    Ok(())
}

fn register_cast<Tin: Numeric, Tout: Numeric>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.add("CAST", &[Tin::TAG], &[Tout::TAG], cast::<Tin, Tout>)?;
    Ok(())
}

fn register_casts_from<Tin: Numeric>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    for_each_numeric!(catalog, register_cast, Tin);
    Ok(())
}

fn register_converting_write<Tin: Numeric, Tout: Numeric>(
    catalog: &mut Catalog,
) -> Result<(), CatalogError> {
    catalog.register(OperatorDescriptor::store(
        "WRITE",
        Tin::TAG,
        Tout::TAG,
        write_converting::<Tin, Tout>,
    ))?;
    catalog.register(OperatorDescriptor::store(
        REMOTE_WRITE,
        Tin::TAG,
        Tout::TAG,
        write_remote_converting::<Tin, Tout>,
    ))?;
    Ok(())
}

pub(super) fn register_reads(catalog: &mut Catalog) -> Result<(), CatalogError> {
    for_each_numeric!(catalog, register_read);
    Ok(())
}

pub(super) fn register_writes(catalog: &mut Catalog) -> Result<(), CatalogError> {
    for_each_numeric!(catalog, register_write);
    Ok(())
}

pub(super) fn register_casts(catalog: &mut Catalog) -> Result<(), CatalogError> {
    for_each_numeric!(catalog, register_casts_from);
    Ok(())
}

pub(super) fn register_remote_reads(catalog: &mut Catalog) -> Result<(), CatalogError> {
    for_each_numeric!(catalog, register_remote_read);
    Ok(())
}

pub(super) fn register_remote_writes(catalog: &mut Catalog) -> Result<(), CatalogError> {
    for_each_numeric!(catalog, register_remote_write);
    Ok(())
}

/// Narrowing writes accepted without an explicit `CAST`.
pub(super) fn register_converting_writes(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_converting_write::<u64, u8>(catalog)?;
    register_converting_write::<u64, u16>(catalog)?;
    register_converting_write::<u64, u32>(catalog)?;

    register_converting_write::<i64, u8>(catalog)?;
    register_converting_write::<i64, u16>(catalog)?;
    register_converting_write::<i64, u32>(catalog)?;
    register_converting_write::<i64, u64>(catalog)?;
    register_converting_write::<i64, i8>(catalog)?;
    register_converting_write::<i64, i16>(catalog)?;
    register_converting_write::<i64, i32>(catalog)?;

    register_converting_write::<u32, u8>(catalog)?;
    register_converting_write::<u32, u16>(catalog)?;

    register_converting_write::<i32, u8>(catalog)?;
    register_converting_write::<i32, u16>(catalog)?;
    register_converting_write::<i32, u32>(catalog)?;
    register_converting_write::<i32, i8>(catalog)?;
    register_converting_write::<i32, i16>(catalog)?;
    Ok(())
}
