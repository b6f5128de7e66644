//! Transcendental functions on floats.

use super::{Catalog, CatalogError};
use crate::casting::widen;
use crate::types::{FloatMath, Numeric};
use crate::vm::Machine;

trait UnaryMath {
    const NAME: &'static str;
    fn apply(x: f64) -> f64;
}

macro_rules! unary_math {
    ($($marker:ident => $name:literal, $method:ident;)*) => {$(
        struct $marker;

        impl UnaryMath for $marker {
            const NAME: &'static str = $name;

            #[inline]
            fn apply(x: f64) -> f64 {
                x.$method()
            }
        }
    )*};
}

unary_math! {
    Sin => "SIN", sin;
    Cos => "COS", cos;
    Tan => "TAN", tan;
    Exp => "EXP", exp;
    Log => "LOG", ln;
    Log10 => "LOG10", log10;
}

fn unary<F: UnaryMath, T: FloatMath>(m: &mut Machine<'_>) {
    let x: T = m.pop();
    m.push(T::from_f64(F::apply(x.to_f64())));
}

/// `base exponent POW`: the exponent is on top.
fn pow<T: FloatMath>(m: &mut Machine<'_>) {
    let exponent: T = m.pop();
    let base: T = m.pop();
    m.push(T::from_f64(base.to_f64().powf(exponent.to_f64())));
}

fn pow_integer<T: FloatMath, E: Numeric>(m: &mut Machine<'_>) {
    let exponent: E = m.pop();
    let base: T = m.pop();
    m.push(T::from_f64(base.to_f64().powf(widen::<E, f64>(exponent))));
}

fn register_unary<F: UnaryMath>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    catalog.add(F::NAME, &[f32::TAG], &[f32::TAG], unary::<F, f32>)?;
    catalog.add(F::NAME, &[f64::TAG], &[f64::TAG], unary::<F, f64>)?;
    Ok(())
}

pub(super) fn register_functions(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_unary::<Sin>(catalog)?;
    register_unary::<Cos>(catalog)?;
    register_unary::<Tan>(catalog)?;
    register_unary::<Exp>(catalog)?;
    register_unary::<Log>(catalog)?;
    register_unary::<Log10>(catalog)?;
    catalog.add("POW", &[f32::TAG, f32::TAG], &[f32::TAG], pow::<f32>)?;
    catalog.add("POW", &[f64::TAG, f64::TAG], &[f64::TAG], pow::<f64>)?;
    Ok(())
}

fn register_pow_integer<T: FloatMath>(catalog: &mut Catalog) -> Result<(), CatalogError> {
    macro_rules! exponents {
        ($($e:ty),*) => {$(
            catalog.add("POW", &[<$e>::TAG, T::TAG], &[T::TAG], pow_integer::<T, $e>)?;
        )*};
    }
    exponents!(u64, i64, u32, i32, u16, i16, u8, i8);
    Ok(())
}

/// Float base raised to an integer exponent.
pub(super) fn register_mixed_pow(catalog: &mut Catalog) -> Result<(), CatalogError> {
    register_pow_integer::<f64>(catalog)?;
    register_pow_integer::<f32>(catalog)?;
    Ok(())
}
