use pretty_assertions::assert_eq;

use crate::status::Status;
use crate::types::{Numeric, TypeTag, Value, Wide};

#[test]
fn test_names_round_trip() {
    for tag in TypeTag::NUMERIC {
        assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
        assert!(tag.is_numeric());
    }
    assert_eq!(TypeTag::from_name("void"), Some(TypeTag::Void));
    assert!(!TypeTag::Void.is_numeric());
    assert_eq!(TypeTag::from_name("Float64"), None);
    assert_eq!(TypeTag::from_name("double"), None);
}

#[test]
fn test_sizes() {
    assert_eq!(TypeTag::Int8.word_size(), 1);
    assert_eq!(TypeTag::UInt16.word_size(), 1);
    assert_eq!(TypeTag::Float32.word_size(), 1);
    assert_eq!(TypeTag::Int64.word_size(), 2);
    assert_eq!(TypeTag::Float64.byte_size(), 8);
    assert_eq!(TypeTag::Void.word_size(), 0);
    assert_eq!(<u8 as Numeric>::WORDS, 1);
    assert_eq!(<f64 as Numeric>::WORDS, 2);
}

#[test]
fn test_parse_integer_literals() {
    assert_eq!(Value::parse(TypeTag::Int8, "-128"), Some(Value::Int8(-128)));
    assert_eq!(Value::parse(TypeTag::Int8, "128"), None);
    assert_eq!(Value::parse(TypeTag::UInt16, "0xFFFF"), Some(Value::UInt16(u16::MAX)));
    assert_eq!(Value::parse(TypeTag::UInt8, "-1"), None);
    assert_eq!(Value::parse(TypeTag::UInt64, "+42"), Some(Value::UInt64(42)));
    assert_eq!(Value::parse(TypeTag::Int32, "1.5"), None);
    assert_eq!(Value::parse(TypeTag::Int32, ""), None);
    assert_eq!(Value::parse(TypeTag::Void, "1"), None);
}

#[test]
fn test_parse_rejects_repeated_signs() {
    assert_eq!(Value::parse(TypeTag::Int32, "--5"), None);
    assert_eq!(Value::parse(TypeTag::Int32, "+-5"), None);
    assert_eq!(Value::parse(TypeTag::Int64, "-0x-5"), None);
    assert_eq!(Value::parse(TypeTag::Int64, "0x+5"), None);
    assert_eq!(Value::parse(TypeTag::Int64, "-0x5"), Some(Value::Int64(-5)));
}

#[test]
fn test_parse_float_literals() {
    assert_eq!(Value::parse(TypeTag::Float64, "3.14"), Some(Value::Float64(3.14)));
    assert_eq!(Value::parse(TypeTag::Float64, "1e-3"), Some(Value::Float64(0.001)));
    assert_eq!(Value::parse(TypeTag::Float32, "2"), Some(Value::Float32(2.0)));
    assert_eq!(Value::parse(TypeTag::Float32, "two"), None);
}

#[test]
fn test_bytes_round_trip_through_value() {
    let value = Value::Int16(-2);
    let decoded = Value::from_bytes(TypeTag::Int16, value.to_bytes());
    assert_eq!(decoded, Some(value));
    assert_eq!(value.type_tag(), TypeTag::Int16);
    assert_eq!(value.to_string(), "-2");
}

#[test]
fn test_narrow_saturates() {
    assert_eq!(u8::narrow(Wide::Int(256)), (255, false));
    assert_eq!(u8::narrow(Wide::Int(-1)), (0, false));
    assert_eq!(i16::narrow(Wide::Int(-300)), (-300, true));
    assert_eq!(i32::narrow(Wide::Float(1e12)), (i32::MAX, false));
    assert_eq!(u32::narrow(Wide::Float(f64::NAN)), (0, false));
    assert_eq!(i8::narrow(Wide::Float(-3.9)), (-3, true));
    assert_eq!(f32::narrow(Wide::Float(1e300)), (f32::MAX, false));
    assert_eq!(f64::narrow(Wide::Int(7)), (7.0, true));
}

#[test]
fn test_saturating_arithmetic_flags() {
    assert_eq!(i8::MAX.add_saturating(1), (i8::MAX, Status::OVERFLOW));
    assert_eq!(i8::MIN.sub_saturating(1), (i8::MIN, Status::UNDERFLOW));
    assert_eq!(0u32.sub_saturating(1), (0, Status::UNDERFLOW));
    assert_eq!(i32::MIN.mul_saturating(2), (i32::MIN, Status::UNDERFLOW));
    assert_eq!(3i64.mul_saturating(-4), (-12, Status::empty()));
    assert_eq!(f64::MAX.add_saturating(f64::MAX).1, Status::empty());
}

#[test]
fn test_integer_division_by_zero() {
    assert_eq!(7i32.div_checked(0), (0, Status::OVERFLOW));
    assert_eq!(7u8.div_checked(2), (3, Status::empty()));
    assert_eq!(i64::MIN.div_checked(-1), (i64::MAX, Status::OVERFLOW));
}

#[test]
fn test_float_equality_uses_epsilon() {
    assert!(15.3f64.approx_eq(15.3));
    assert!(!15.299999999f64.approx_eq(15.3));
    assert!(1.0f32.approx_eq(1.0 + f32::EPSILON / 2.0));
    assert!(!1u8.approx_eq(2));
}
