//! Comparisons. Every comparison yields a `uint8` truth value.

use super::{Catalog, CatalogError, for_each_numeric};
use crate::casting::safe_convert;
use crate::status::Status;
use crate::types::{Numeric, TypeTag};
use crate::vm::Machine;

pub(super) trait Comparison {
    const NAME: &'static str;
    fn test<T: Numeric>(lhs: T, rhs: T) -> bool;
}

macro_rules! comparison {
    ($($marker:ident => $name:literal, |$a:ident, $b:ident| $body:expr;)*) => {$(
        pub(super) struct $marker;

        impl Comparison for $marker {
            const NAME: &'static str = $name;

            #[inline]
            fn test<T: Numeric>($a: T, $b: T) -> bool {
                $body
            }
        }
    )*};
}

comparison! {
    Equal => "EQ", |a, b| a.approx_eq(b);
    NotEqual => "NEQ", |a, b| !a.approx_eq(b);
    Greater => "GT", |a, b| a > b;
    Less => "LT", |a, b| a < b;
    GreaterEq => "GTE", |a, b| a >= b;
    LessEq => "LTE", |a, b| a <= b;
}

fn compare<C: Comparison, T: Numeric>(m: &mut Machine<'_>) {
    let x1: T = m.pop();
    let x2: T = m.pop();
    m.push(u8::from(C::test(x2, x1)));
}

/// Both operands are converted to `Ttest` first. A value that does not fit
/// makes the comparison false.
fn compare_mixed<C: Comparison, T1: Numeric, T2: Numeric, Ttest: Numeric>(m: &mut Machine<'_>) {
    let (x1, ok1) = safe_convert::<T1, Ttest>(m.pop());
    let (x2, ok2) = safe_convert::<T2, Ttest>(m.pop());
    let result = if ok1 && ok2 {
        C::test(x2, x1)
    } else {
        m.raise(Status::OUT_OF_RANGE);
        false
    };
    m.push(u8::from(result));
}

const BOOL: TypeTag = TypeTag::UInt8;

fn register_same<C: Comparison, T: Numeric>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.add(C::NAME, &[T::TAG, T::TAG], &[BOOL], compare::<C, T>)?;
    Ok(())
}

fn register_same_all<C: Comparison>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    for_each_numeric!(catalog, register_same, C);
    Ok(())
}

/// Registers `A op B` and `B op A`, both tested as `B`.
fn register_pair<C: Comparison, A: Numeric, B: Numeric>(
    catalog: &mut Catalog,
) -> Result<(), CatalogError> {
    catalog.add(C::NAME, &[A::TAG, B::TAG], &[BOOL], compare_mixed::<C, A, B, B>)?;
    catalog.add(C::NAME, &[B::TAG, A::TAG], &[BOOL], compare_mixed::<C, B, A, B>)?;
    Ok(())
}

fn register_mixed_all<C: Comparison>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_pair::<C, i8, i32>(catalog)?;
    register_pair::<C, i16, i32>(catalog)?;
    register_pair::<C, u8, i32>(catalog)?;
    register_pair::<C, u16, i32>(catalog)?;
    register_pair::<C, u32, i32>(catalog)?;

    register_pair::<C, i8, i64>(catalog)?;
    register_pair::<C, i16, i64>(catalog)?;
    register_pair::<C, i32, i64>(catalog)?;
    register_pair::<C, u8, i64>(catalog)?;
    register_pair::<C, u16, i64>(catalog)?;
    register_pair::<C, u32, i64>(catalog)?;
    register_pair::<C, u64, i64>(catalog)?;

    register_pair::<C, u8, u32>(catalog)?;
    register_pair::<C, u16, u32>(catalog)?;

    register_pair::<C, i8, u64>(catalog)?;
    register_pair::<C, i16, u64>(catalog)?;
    register_pair::<C, i32, u64>(catalog)?;
    register_pair::<C, u8, u64>(catalog)?;
    register_pair::<C, u16, u64>(catalog)?;
    register_pair::<C, u32, u64>(catalog)?;
    Ok(())
}

pub(super) fn register_same_type(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_same_all::<Equal>(catalog)?;
    register_same_all::<NotEqual>(catalog)?;
    register_same_all::<Greater>(catalog)?;
    register_same_all::<Less>(catalog)?;
    register_same_all::<GreaterEq>(catalog)?;
    register_same_all::<LessEq>(catalog)?;
    Ok(())
}

pub(super) fn register_mixed(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_mixed_all::<Equal>(catalog)?;
    register_mixed_all::<NotEqual>(catalog)?;
    register_mixed_all::<Greater>(catalog)?;
    register_mixed_all::<Less>(catalog)?;
    register_mixed_all::<GreaterEq>(catalog)?;
    register_mixed_all::<LessEq>(catalog)?;
    Ok(())
}
