//! Numeric conversions between the supported types.
//!
//! Conversions never fault. A value that does not fit its destination is
//! clamped to the nearest bound and reported as unfaithful, so callers can
//! raise `OUT_OF_RANGE` and continue.
//!
//! - integer to integer: exact or clamped
//! - float to integer: truncated toward zero; NaN becomes zero and fails
//! - integer to float: always succeeds (may round)
//! - float64 to float32: clamped to `±f32::MAX` when finite and too large

use crate::types::Numeric;

/// Converts `value` to `Tout`, saturating at the bounds of `Tout`.
///
/// The flag is `false` when the result is not a faithful representation of
/// the input magnitude.
#[inline]
pub fn safe_convert<Tin: Numeric, Tout: Numeric>(value: Tin) -> (Tout, bool) {
    Tout::narrow(value.widen())
}

/// Converts a value known to fit its destination (widening rows of the
/// operator tables).
#[inline]
pub fn widen<Tin: Numeric, Tout: Numeric>(value: Tin) -> Tout {
    safe_convert::<Tin, Tout>(value).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_narrowing_saturates() {
        assert_eq!(safe_convert::<u16, u8>(256), (255, false));
        assert_eq!(safe_convert::<u16, u8>(255), (255, true));
        assert_eq!(safe_convert::<i32, u8>(-1), (0, false));
        assert_eq!(safe_convert::<i64, i8>(-1000), (-128, false));
        assert_eq!(safe_convert::<u64, i64>(u64::MAX), (i64::MAX, false));
    }

    #[test]
    fn test_integer_widening_is_exact() {
        assert_eq!(safe_convert::<i8, i64>(-5), (-5, true));
        assert_eq!(safe_convert::<u32, u64>(u32::MAX), (u32::MAX as u64, true));
    }

    #[test]
    fn test_float_to_integer() {
        assert_eq!(safe_convert::<f64, i32>(3.9), (3, true));
        assert_eq!(safe_convert::<f64, i32>(-3.9), (-3, true));
        assert_eq!(safe_convert::<f64, u8>(300.0), (255, false));
        assert_eq!(safe_convert::<f64, u8>(-0.5), (0, true));
        assert_eq!(safe_convert::<f64, u8>(-1.0), (0, false));
        assert_eq!(safe_convert::<f64, i64>(f64::NAN), (0, false));
        assert_eq!(safe_convert::<f64, u64>(1.0e20), (u64::MAX, false));
    }

    #[test]
    fn test_float_narrowing() {
        let (v, ok) = safe_convert::<f64, f32>(1.0e300);
        assert_eq!(v, f32::MAX);
        assert!(!ok);

        let (v, ok) = safe_convert::<f64, f32>(-1.0e300);
        assert_eq!(v, f32::MIN);
        assert!(!ok);

        assert_eq!(safe_convert::<f64, f32>(1.5), (1.5, true));
        let (v, ok) = safe_convert::<f64, f32>(f64::INFINITY);
        assert!(v.is_infinite() && ok);
    }

    #[test]
    fn test_integer_to_float() {
        assert_eq!(safe_convert::<i64, f64>(-42), (-42.0, true));
        assert_eq!(safe_convert::<u8, f32>(200), (200.0, true));
    }
}
