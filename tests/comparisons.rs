#[macro_use]
mod cases;

use rteval::{Status, Value};

test_case!(
    less_than,
    input: "CONST int32 3\nCONST int32 5\nLT\nWRITE r",
    outputs: { r: Value::UInt8(1) },
);

test_case!(
    greater_or_equal_on_equal_values,
    input: "CONST int16 5\nCONST int16 5\nGTE\nWRITE r",
    outputs: { r: Value::UInt8(1) },
);

test_case!(
    greater_than_is_ordered,
    input: "CONST float32 1.5\nCONST float32 2.5\nGT\nWRITE r",
    outputs: { r: Value::UInt8(0) },
);

test_case!(
    float_equality_within_epsilon,
    input: "READ x\nCONST float64 15.3\nEQ\nWRITE same\nREAD x\nCONST float64 15.299999999\nNEQ\nWRITE differs",
    inputs: { x: Value::Float64(15.3) },
    outputs: { same: Value::UInt8(1), differs: Value::UInt8(1) },
);

test_case!(
    mixed_widths_compare_as_wider,
    input: "CONST uint16 70\nCONST uint32 70\nEQ\nWRITE r",
    outputs: { r: Value::UInt8(1) },
);

test_case!(
    negative_against_unsigned_is_out_of_range,
    input: "CONST int8 -1\nCONST uint64 5\nLT\nWRITE r",
    outputs: { r: Value::UInt8(0) },
    status: Status::OUT_OF_RANGE,
);

test_case!(
    logic_on_comparisons,
    input: "CONST float64 1.5\nCONST float64 2.5\nLT\nCONST int32 4\nCONST int32 4\nEQ\nAND\nWRITE r",
    outputs: { r: Value::UInt8(1) },
);

test_case!(
    xor_is_boolean,
    input: "CONST uint8 2\nCONST uint8 1\nXOR\nWRITE r",
    outputs: { r: Value::UInt8(0) },
);

test_case!(
    or_and_not,
    input: "CONST uint8 0\nCONST uint8 0\nOR\nNOT\nWRITE r",
    outputs: { r: Value::UInt8(1) },
);

test_case!(
    no_comparison_between_unrelated_types,
    input: "CONST int8 1\nCONST uint8 1\nEQ\nWRITE r",
    error: Status::UNSUPPORTED_FEATURE,
);
