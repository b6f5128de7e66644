//! `ADD`, `SUB`, `MUL`, `DIV` and `NEG`.
//!
//! Integer rows come in three flavours, chosen per signature:
//!
//! - plain: operands are widened to a result type that cannot overflow
//! - saturating: the result clamps and raises `OVERFLOW`/`UNDERFLOW`
//! - checked: operands are first converted to the result type; one that
//!   does not fit yields zero and `OVERFLOW`, otherwise they are combined
//!   with saturation
//!
//! Only the signatures registered here exist; `int8 + int8`, for instance,
//! yields an `int32`.

use super::{Catalog, CatalogError, OperatorFn};
use crate::casting::{safe_convert, widen};
use crate::status::Status;
use crate::types::{Numeric, Wide};
use crate::vm::Machine;

trait BinaryOp {
    const NAME: &'static str;
    fn plain<T: Numeric>(lhs: T, rhs: T) -> (T, Status);
    fn saturating<T: Numeric>(lhs: T, rhs: T) -> (T, Status);
}

struct Add;
struct Sub;
struct Mul;
struct Div;

impl BinaryOp for Add {
    const NAME: &'static str = "ADD";

    #[inline]
    fn plain<T: Numeric>(lhs: T, rhs: T) -> (T, Status) {
        (lhs.add_plain(rhs), Status::empty())
    }

    #[inline]
    fn saturating<T: Numeric>(lhs: T, rhs: T) -> (T, Status) {
        lhs.add_saturating(rhs)
    }
}

impl BinaryOp for Sub {
    const NAME: &'static str = "SUB";

    #[inline]
    fn plain<T: Numeric>(lhs: T, rhs: T) -> (T, Status) {
        (lhs.sub_plain(rhs), Status::empty())
    }

    #[inline]
    fn saturating<T: Numeric>(lhs: T, rhs: T) -> (T, Status) {
        lhs.sub_saturating(rhs)
    }
}

impl BinaryOp for Mul {
    const NAME: &'static str = "MUL";

    #[inline]
    fn plain<T: Numeric>(lhs: T, rhs: T) -> (T, Status) {
        (lhs.mul_plain(rhs), Status::empty())
    }

    #[inline]
    fn saturating<T: Numeric>(lhs: T, rhs: T) -> (T, Status) {
        lhs.mul_saturating(rhs)
    }
}

/// Division never faults: a zero divisor yields zero and `OVERFLOW`.
impl BinaryOp for Div {
    const NAME: &'static str = "DIV";

    #[inline]
    fn plain<T: Numeric>(lhs: T, rhs: T) -> (T, Status) {
        lhs.div_checked(rhs)
    }

    #[inline]
    fn saturating<T: Numeric>(lhs: T, rhs: T) -> (T, Status) {
        lhs.div_checked(rhs)
    }
}

#[derive(Clone, Copy)]
enum Flavour {
    Plain,
    Saturating,
    Checked,
}

use Flavour::{Checked, Plain, Saturating};

fn plain<Op: BinaryOp, T1: Numeric, T2: Numeric, Tout: Numeric>(m: &mut Machine<'_>) {
    let x1: T1 = m.pop();
    let x2: T2 = m.pop();
    let (result, status) = Op::plain(widen::<T2, Tout>(x2), widen::<T1, Tout>(x1));
    m.raise(status);
    m.push(result);
}

fn saturating<Op: BinaryOp, T1: Numeric, T2: Numeric, Tout: Numeric>(m: &mut Machine<'_>) {
    let x1: T1 = m.pop();
    let x2: T2 = m.pop();
    let (result, status) = Op::saturating(widen::<T2, Tout>(x2), widen::<T1, Tout>(x1));
    m.raise(status);
    m.push(result);
}

/// Operands that do not fit `Tout` make the result zero with `OVERFLOW`.
fn checked<Op: BinaryOp, T1: Numeric, T2: Numeric, Tout: Numeric>(m: &mut Machine<'_>) {
    let (x1, ok1) = safe_convert::<T1, Tout>(m.pop());
    let (x2, ok2) = safe_convert::<T2, Tout>(m.pop());
    if !(ok1 && ok2) {
        m.raise(Status::OVERFLOW);
        m.push(Tout::default());
        return;
    }
    let (result, status) = Op::saturating(x2, x1);
    m.raise(status);
    m.push(result);
}

fn pick<Op: BinaryOp, T1: Numeric, T2: Numeric, Tout: Numeric>(flavour: Flavour) -> OperatorFn {
    match flavour {
        Plain => plain::<Op, T1, T2, Tout>,
        Saturating => saturating::<Op, T1, T2, Tout>,
        Checked => checked::<Op, T1, T2, Tout>,
    }
}

/// `T op T -> Tout`.
fn same<Op: BinaryOp, T: Numeric, Tout: Numeric>(
    catalog: &mut Catalog,
    flavour: Flavour,
) -> Result<(), CatalogError> {
    let function = pick::<Op, T, T, Tout>(flavour);
    catalog.add(Op::NAME, &[T::TAG, T::TAG], &[Tout::TAG], function)?;
    Ok(())
}

/// `A op B -> Tout` and `B op A -> Tout`.
fn mixed<Op: BinaryOp, A: Numeric, B: Numeric, Tout: Numeric>(
    catalog: &mut Catalog,
    flavour: Flavour,
) -> Result<(), CatalogError> {
    catalog.add(
        Op::NAME,
        &[A::TAG, B::TAG],
        &[Tout::TAG],
        pick::<Op, A, B, Tout>(flavour),
    )?;
    catalog.add(
        Op::NAME,
        &[B::TAG, A::TAG],
        &[Tout::TAG],
        pick::<Op, B, A, Tout>(flavour),
    )?;
    Ok(())
}

fn register_float<Op: BinaryOp>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    same::<Op, f64, f64>(catalog, Saturating)?;
    same::<Op, f32, f32>(catalog, Saturating)?;
    Ok(())
}

pub(super) fn register_float_arithmetic(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_float::<Add>(catalog)?;
    register_float::<Sub>(catalog)?;
    register_float::<Mul>(catalog)?;
    register_float::<Div>(catalog)?;
    Ok(())
}

/// Mixed-width rows shared by `ADD`, `MUL` and `DIV`.
fn register_mixed_widening<Op: BinaryOp>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    mixed::<Op, i8, i32, i32>(catalog, Saturating)?;
    mixed::<Op, i16, i32, i32>(catalog, Saturating)?;
    mixed::<Op, u8, i32, i32>(catalog, Saturating)?;
    mixed::<Op, u16, i32, i32>(catalog, Saturating)?;
    mixed::<Op, u32, i32, i32>(catalog, Checked)?;

    mixed::<Op, i8, i64, i64>(catalog, Saturating)?;
    mixed::<Op, i16, i64, i64>(catalog, Saturating)?;
    mixed::<Op, i32, i64, i64>(catalog, Saturating)?;
    mixed::<Op, u8, i64, i64>(catalog, Saturating)?;
    mixed::<Op, u16, i64, i64>(catalog, Saturating)?;
    mixed::<Op, u32, i64, i64>(catalog, Saturating)?;
    mixed::<Op, u64, i64, i64>(catalog, Checked)?;

    mixed::<Op, u8, u32, u32>(catalog, Saturating)?;
    mixed::<Op, u16, u32, u32>(catalog, Saturating)?;

    mixed::<Op, u8, u64, u64>(catalog, Saturating)?;
    mixed::<Op, u16, u64, u64>(catalog, Saturating)?;
    mixed::<Op, u32, u64, u64>(catalog, Saturating)?;
    Ok(())
}

/// `ADD` and `MUL`. The saturating same-width rows come before the widening
/// ones, so `int32 ADD int32` stays `int32`.
fn register_widening<Op: BinaryOp>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    same::<Op, i8, i32>(catalog, Plain)?;
    same::<Op, i16, i32>(catalog, Plain)?;
    same::<Op, i32, i32>(catalog, Saturating)?;
    same::<Op, i32, i64>(catalog, Plain)?;
    same::<Op, i64, i64>(catalog, Saturating)?;
    same::<Op, u8, u32>(catalog, Plain)?;
    same::<Op, u16, u32>(catalog, Plain)?;
    same::<Op, u32, u32>(catalog, Saturating)?;
    same::<Op, u32, u64>(catalog, Plain)?;
    same::<Op, u64, u64>(catalog, Saturating)?;
    register_mixed_widening::<Op>(catalog)
}

fn register_subtraction(catalog: &mut Catalog) -> Result<(), CatalogError> {
    same::<Sub, i8, i32>(catalog, Plain)?;
    same::<Sub, i16, i32>(catalog, Plain)?;
    same::<Sub, i32, i32>(catalog, Saturating)?;
    same::<Sub, i64, i64>(catalog, Saturating)?;
    same::<Sub, u8, i32>(catalog, Plain)?;
    same::<Sub, u16, i32>(catalog, Plain)?;
    same::<Sub, u32, i32>(catalog, Checked)?;
    same::<Sub, u64, i64>(catalog, Checked)?;

    mixed::<Sub, i8, i32, i32>(catalog, Saturating)?;
    mixed::<Sub, i16, i32, i32>(catalog, Saturating)?;
    mixed::<Sub, u8, i32, i32>(catalog, Saturating)?;
    mixed::<Sub, u16, i32, i32>(catalog, Saturating)?;
    mixed::<Sub, u32, i32, i32>(catalog, Checked)?;

    mixed::<Sub, i8, i64, i64>(catalog, Saturating)?;
    mixed::<Sub, i16, i64, i64>(catalog, Saturating)?;
    mixed::<Sub, i32, i64, i64>(catalog, Saturating)?;
    mixed::<Sub, u8, i64, i64>(catalog, Saturating)?;
    mixed::<Sub, u16, i64, i64>(catalog, Saturating)?;
    mixed::<Sub, u32, i64, i64>(catalog, Saturating)?;
    mixed::<Sub, u64, i64, i64>(catalog, Checked)?;

    mixed::<Sub, u8, u32, i32>(catalog, Checked)?;
    mixed::<Sub, u16, u32, i32>(catalog, Checked)?;

    mixed::<Sub, u8, u64, i64>(catalog, Checked)?;
    mixed::<Sub, u16, u64, i64>(catalog, Checked)?;
    mixed::<Sub, u32, u64, i64>(catalog, Checked)?;
    Ok(())
}

fn register_division(catalog: &mut Catalog) -> Result<(), CatalogError> {
    same::<Div, i8, i32>(catalog, Plain)?;
    same::<Div, i16, i32>(catalog, Plain)?;
    same::<Div, i32, i32>(catalog, Plain)?;
    same::<Div, i64, i64>(catalog, Plain)?;
    same::<Div, u8, u32>(catalog, Plain)?;
    same::<Div, u16, u32>(catalog, Plain)?;
    same::<Div, u32, u32>(catalog, Plain)?;
    same::<Div, u64, u64>(catalog, Plain)?;
    register_mixed_widening::<Div>(catalog)
}

pub(super) fn register_integer_arithmetic(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_widening::<Add>(catalog)?;
    register_subtraction(catalog)?;
    register_widening::<Mul>(catalog)?;
    register_division(catalog)?;
    Ok(())
}

// ============================================================================
// Negation
// ============================================================================

fn neg<Tin: Numeric, Tout: Numeric>(m: &mut Machine<'_>) {
    let x: Tin = m.pop();
    let negated = match x.widen() {
        Wide::Int(v) => Wide::Int(-v),
        Wide::Float(v) => Wide::Float(-v),
    };
    let (result, faithful) = Tout::narrow(negated);
    if !faithful {
        let below = match negated {
            Wide::Int(v) => v < 0,
            Wide::Float(v) => v < 0.0,
        };
        m.raise(if below {
            Status::UNDERFLOW
        } else {
            Status::OVERFLOW
        });
    }
    m.push(result);
}

fn register_neg_row<Tin: Numeric, Tout: Numeric>(
    catalog: &mut Catalog,
) -> Result<(), CatalogError> {
    catalog.add("NEG", &[Tin::TAG], &[Tout::TAG], neg::<Tin, Tout>)?;
    Ok(())
}

pub(super) fn register_neg(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_neg_row::<f64, f64>(catalog)?;
    register_neg_row::<f32, f32>(catalog)?;
    register_neg_row::<i64, i64>(catalog)?;
    register_neg_row::<i32, i32>(catalog)?;
    register_neg_row::<i16, i16>(catalog)?;
    register_neg_row::<i8, i8>(catalog)?;
    register_neg_row::<u8, i16>(catalog)?;
    register_neg_row::<u16, i32>(catalog)?;
    register_neg_row::<u32, i64>(catalog)?;
    register_neg_row::<u64, i64>(catalog)?;
    Ok(())
}
