use core::fmt::{Debug, Display};

use crate::memory::{WORD_BYTES, words_for_bytes};
use crate::status::Status;
use crate::types::{TypeTag, Value};

/// Lossless intermediate form used for conversions between numeric types.
///
/// Every supported integer fits in an `i128`; both float widths fit in `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wide {
    Int(i128),
    Float(f64),
}

/// A fixed-width numeric type that can live on the evaluation stack or in
/// data memory.
///
/// Implemented for exactly `i8`..`i64`, `u8`..`u64`, `f32` and `f64`.
pub trait Numeric: Copy + Default + PartialOrd + Debug + Display + 'static {
    const TAG: TypeTag;

    /// Words occupied on the stack and in data memory.
    const WORDS: usize = words_for_bytes(core::mem::size_of::<Self>());

    /// Native-endian bytes, zero padded to eight.
    fn to_bytes(self) -> [u8; 8];

    /// Inverse of [`Numeric::to_bytes`]; trailing bytes are ignored.
    fn from_bytes(bytes: [u8; 8]) -> Self;

    fn widen(self) -> Wide;

    /// Converts from the intermediate form, saturating at the bounds of
    /// `Self`. The flag is `false` when the value could not be represented.
    fn narrow(wide: Wide) -> (Self, bool);

    fn into_value(self) -> Value;

    /// Parses a literal as written after `CONST <type>`.
    fn parse_literal(text: &str) -> Option<Self>;

    /// Equality used by `EQ`/`NEQ`: exact for integers, within one machine
    /// epsilon for floats.
    fn approx_eq(self, other: Self) -> bool;

    fn is_zero(self) -> bool;

    /// `self + rhs` without overflow detection (wraps on integers).
    fn add_plain(self, rhs: Self) -> Self;
    fn sub_plain(self, rhs: Self) -> Self;
    fn mul_plain(self, rhs: Self) -> Self;

    /// Saturating arithmetic. Integers clamp to their bounds and report
    /// `OVERFLOW` or `UNDERFLOW`; floats follow IEEE rules and never flag.
    fn add_saturating(self, rhs: Self) -> (Self, Status);
    fn sub_saturating(self, rhs: Self) -> (Self, Status);
    fn mul_saturating(self, rhs: Self) -> (Self, Status);

    /// Division that never faults: an integer divisor of zero yields zero and
    /// `OVERFLOW`.
    fn div_checked(self, rhs: Self) -> (Self, Status);
}

/// Floating point types, evaluated through `f64` by the math functions.
pub trait FloatMath: Numeric {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

fn read_padded<const N: usize>(bytes: [u8; 8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

fn write_padded(src: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[..src.len()].copy_from_slice(src);
    out
}

/// Splits an integer literal into sign, radix and digits.
fn parse_integer(text: &str) -> Option<i128> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if body.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        if hex.starts_with(['+', '-']) {
            return None;
        }
        i128::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<i128>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn clamp_status<T: PartialEq>(value: T, max: T) -> Status {
    if value == max {
        Status::OVERFLOW
    } else {
        Status::UNDERFLOW
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $tag:ident),* $(,)?) => {$(
        impl Numeric for $ty {
            const TAG: TypeTag = TypeTag::$tag;

            #[inline]
            fn to_bytes(self) -> [u8; 8] {
                write_padded(&self.to_ne_bytes())
            }

            #[inline]
            fn from_bytes(bytes: [u8; 8]) -> Self {
                <$ty>::from_ne_bytes(read_padded(bytes))
            }

            #[inline]
            fn widen(self) -> Wide {
                Wide::Int(self as i128)
            }

            fn narrow(wide: Wide) -> (Self, bool) {
                match wide {
                    Wide::Int(value) => match <$ty>::try_from(value) {
                        Ok(v) => (v, true),
                        Err(_) if value < 0 => (<$ty>::MIN, false),
                        Err(_) => (<$ty>::MAX, false),
                    },
                    Wide::Float(value) => {
                        if value.is_nan() {
                            return (0, false);
                        }
                        let truncated = value.trunc();
                        // `as` saturates; the bounds test decides whether it had to.
                        let fits = truncated >= <$ty>::MIN as f64
                            && truncated < <$ty>::MAX as f64 + 1.0;
                        (value as $ty, fits)
                    }
                }
            }

            fn into_value(self) -> Value {
                Value::$tag(self)
            }

            fn parse_literal(text: &str) -> Option<Self> {
                parse_integer(text).and_then(|v| <$ty>::try_from(v).ok())
            }

            #[inline]
            fn approx_eq(self, other: Self) -> bool {
                self == other
            }

            #[inline]
            fn is_zero(self) -> bool {
                self == 0
            }

            #[inline]
            fn add_plain(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn sub_plain(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn mul_plain(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn add_saturating(self, rhs: Self) -> (Self, Status) {
                match self.checked_add(rhs) {
                    Some(v) => (v, Status::empty()),
                    None => {
                        let v = <$ty>::saturating_add(self, rhs);
                        (v, clamp_status(v, <$ty>::MAX))
                    }
                }
            }

            #[inline]
            fn sub_saturating(self, rhs: Self) -> (Self, Status) {
                match self.checked_sub(rhs) {
                    Some(v) => (v, Status::empty()),
                    None => {
                        let v = <$ty>::saturating_sub(self, rhs);
                        (v, clamp_status(v, <$ty>::MAX))
                    }
                }
            }

            #[inline]
            fn mul_saturating(self, rhs: Self) -> (Self, Status) {
                match self.checked_mul(rhs) {
                    Some(v) => (v, Status::empty()),
                    None => {
                        let v = <$ty>::saturating_mul(self, rhs);
                        (v, clamp_status(v, <$ty>::MAX))
                    }
                }
            }

            #[inline]
            fn div_checked(self, rhs: Self) -> (Self, Status) {
                if rhs == 0 {
                    return (0, Status::OVERFLOW);
                }
                match self.checked_div(rhs) {
                    Some(v) => (v, Status::empty()),
                    // MIN / -1
                    None => (<$ty>::MAX, Status::OVERFLOW),
                }
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($ty:ty => $tag:ident),* $(,)?) => {$(
        impl Numeric for $ty {
            const TAG: TypeTag = TypeTag::$tag;

            #[inline]
            fn to_bytes(self) -> [u8; 8] {
                write_padded(&self.to_ne_bytes())
            }

            #[inline]
            fn from_bytes(bytes: [u8; 8]) -> Self {
                <$ty>::from_ne_bytes(read_padded(bytes))
            }

            #[inline]
            fn widen(self) -> Wide {
                Wide::Float(self as f64)
            }

            fn narrow(wide: Wide) -> (Self, bool) {
                match wide {
                    Wide::Int(value) => (value as $ty, true),
                    Wide::Float(value) => {
                        if value.is_finite() && value.abs() > <$ty>::MAX as f64 {
                            let bound = if value < 0.0 { <$ty>::MIN } else { <$ty>::MAX };
                            (bound, false)
                        } else {
                            (value as $ty, true)
                        }
                    }
                }
            }

            fn into_value(self) -> Value {
                Value::$tag(self)
            }

            fn parse_literal(text: &str) -> Option<Self> {
                text.parse::<$ty>().ok()
            }

            #[inline]
            fn approx_eq(self, other: Self) -> bool {
                let difference = self - other;
                difference < <$ty>::EPSILON && difference > -<$ty>::EPSILON
            }

            #[inline]
            fn is_zero(self) -> bool {
                self == 0.0
            }

            #[inline]
            fn add_plain(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn sub_plain(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn mul_plain(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn add_saturating(self, rhs: Self) -> (Self, Status) {
                (self + rhs, Status::empty())
            }

            #[inline]
            fn sub_saturating(self, rhs: Self) -> (Self, Status) {
                (self - rhs, Status::empty())
            }

            #[inline]
            fn mul_saturating(self, rhs: Self) -> (Self, Status) {
                (self * rhs, Status::empty())
            }

            #[inline]
            fn div_checked(self, rhs: Self) -> (Self, Status) {
                (self / rhs, Status::empty())
            }
        }

        impl FloatMath for $ty {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $ty
            }
        }
    )*};
}

impl_integer! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
}

impl_float! {
    f32 => Float32,
    f64 => Float64,
}

static_assertions::const_assert!(<f64 as Numeric>::WORDS * WORD_BYTES == 8);
static_assertions::const_assert!(<u8 as Numeric>::WORDS == 1);
