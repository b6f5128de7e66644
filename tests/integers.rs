#[macro_use]
mod cases;

use rteval::{Status, Value};

test_case!(
    small_signed_addition_widens,
    input: "CONST int8 127\nCONST int8 1\nADD\nWRITE r",
    outputs: { r: Value::Int32(128) },
);

test_case!(
    int32_addition_saturates,
    input: "CONST int32 2147483647\nCONST int32 1\nADD\nWRITE r",
    outputs: { r: Value::Int32(i32::MAX) },
    status: Status::OVERFLOW,
);

test_case!(
    int64_multiplication_saturates_low,
    input: "CONST int64 -9223372036854775808\nCONST int64 2\nMUL\nWRITE r",
    outputs: { r: Value::Int64(i64::MIN) },
    status: Status::UNDERFLOW,
);

test_case!(
    unsigned_multiplication_widens,
    input: "CONST uint8 200\nCONST uint8 200\nMUL\nWRITE r",
    outputs: { r: Value::UInt32(40000) },
);

test_case!(
    hexadecimal_literals,
    input: "CONST uint16 0xFFFF\nCONST uint16 1\nADD\nWRITE r",
    outputs: { r: Value::UInt32(65536) },
);

test_case!(
    unsigned_subtraction_is_signed,
    input: "CONST uint32 3\nCONST uint32 5\nSUB\nWRITE r",
    outputs: { r: Value::Int32(-2) },
);

test_case!(
    unsigned_subtraction_that_does_not_fit_is_zero,
    input: "CONST uint32 4000000000\nCONST uint32 1\nSUB\nWRITE r",
    outputs: { r: Value::Int32(0) },
    status: Status::OVERFLOW,
);

test_case!(
    mixed_sign_division_that_does_not_fit_is_zero,
    input: "CONST uint32 4000000000\nCONST int32 2\nDIV\nWRITE r",
    outputs: { r: Value::Int32(0) },
    status: Status::OVERFLOW,
);

test_case!(
    mixed_sign_addition_that_fits,
    input: "CONST uint32 7\nCONST int32 -9\nADD\nWRITE r",
    outputs: { r: Value::Int32(-2) },
);

test_case!(
    repeated_sign_is_an_invalid_literal,
    input: "CONST int32 --5\nWRITE r",
    error: Status::FATAL_ERROR,
);

test_case!(
    constant_prefix_is_reserved,
    input: "READ Constant@0\nCONST int32 5\nADD\nWRITE r",
    error: Status::ILLEGAL_OPERATION,
);

test_case!(
    mixed_multiplication_uses_wider_type,
    input: "CONST uint8 5\nCONST int64 -7\nMUL\nWRITE r",
    outputs: { r: Value::Int64(-35) },
);

test_case!(
    division_truncates_toward_zero,
    input: "CONST int32 7\nCONST int32 -2\nDIV\nWRITE r",
    outputs: { r: Value::Int32(-3) },
);

test_case!(
    small_division_widens,
    input: "CONST int16 -7\nCONST int16 2\nDIV\nWRITE r",
    outputs: { r: Value::Int32(-3) },
);

test_case!(
    division_by_zero,
    input: "READ a\nREAD b\nDIV\nWRITE q",
    inputs: { a: Value::Int64(10), b: Value::Int64(0) },
    outputs: { q: Value::Int64(0) },
    status: Status::OVERFLOW,
);

test_case!(
    negating_unsigned_goes_signed,
    input: "CONST uint8 200\nNEG\nWRITE r",
    outputs: { r: Value::Int16(-200) },
);

test_case!(
    inputs_feed_arithmetic,
    input: "READ a\nREAD b\nSUB\nREAD c\nMUL\nWRITE r",
    inputs: { a: Value::Int64(10), b: Value::Int64(4), c: Value::Int64(-3) },
    outputs: { r: Value::Int64(-18) },
);

test_case!(
    arithmetic_needs_two_operands,
    input: "CONST int32 1\nADD\nWRITE r",
    error: Status::UNSUPPORTED_FEATURE,
);

test_case!(
    plain_operators_take_no_operands,
    input: "CONST int32 1\nCONST int32 2\nADD 3\nWRITE r",
    error: Status::ILLEGAL_OPERATION,
);
