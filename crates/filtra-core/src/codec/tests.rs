use super::{
    CodecError, DecodeLimits, FORMAT_VERSION, decode, decode_with_limits, encode,
    encode_with_limits, read_operator, write_operator,
};
use crate::{
    operator::{Operator, OperatorError},
    value::Value,
    wildcard::{PatternError, WildcardFormat, WildcardPattern},
};
use proptest::prelude::*;

// ---- helpers -----------------------------------------------------------

fn eq(attribute: &str, value: impl Into<Value>) -> Operator {
    Operator::equal_to(attribute, value).expect("valid equal_to")
}

fn like(attribute: &str, pattern: &str, case_sensitive: bool) -> Operator {
    let pattern =
        WildcardPattern::new(pattern, WildcardFormat { case_sensitive }).expect("valid pattern");
    Operator::like(attribute, pattern).expect("valid like")
}

fn header(kind: u8) -> Vec<u8> {
    let mut bytes = FORMAT_VERSION.to_be_bytes().to_vec();
    bytes.push(kind);
    bytes
}

fn push_str(bytes: &mut Vec<u8>, s: &[u8]) {
    bytes.extend_from_slice(&u32::try_from(s.len()).expect("short").to_be_bytes());
    bytes.extend_from_slice(s);
}

fn nested_not(depth: usize) -> Operator {
    (1..depth).fold(Operator::TRUE, |inner, _| Operator::not(inner))
}

fn sample_tree() -> Operator {
    Operator::or([
        Operator::and([
            eq("age", 30),
            Operator::greater_than("score", 2.5).expect("valid"),
            Operator::not(eq("name", Value::Null)),
        ])
        .expect("non-empty"),
        Operator::in_("city", ["NYC", "LA"]).expect("valid"),
        like("name", "J[a-c]?n*", false),
        Operator::less_than("flag", true).expect("valid"),
        Operator::FALSE,
    ])
    .expect("non-empty")
}

// ---- layout ------------------------------------------------------------

#[test]
fn leaf_layout_is_stable() {
    let bytes = encode(&eq("a", 1)).expect("encode");

    let mut expected = header(0x05);
    push_str(&mut expected, b"a");
    expected.push(0x02);
    expected.extend_from_slice(&1_i64.to_be_bytes());

    assert_eq!(bytes, expected);
}

#[test]
fn every_node_carries_its_own_version() {
    let bytes = encode(&Operator::not(Operator::TRUE)).expect("encode");
    assert_eq!(bytes, [0, 0, 0, 0, 0x04, 0, 0, 0, 0, 0x00]);
}

#[test]
fn like_layout_carries_text_and_case_flag() {
    let bytes = encode(&like("n", "a*", false)).expect("encode");

    let mut expected = header(0x09);
    push_str(&mut expected, b"n");
    push_str(&mut expected, b"a*");
    expected.push(0);

    assert_eq!(bytes, expected);
}

// ---- round trip --------------------------------------------------------

#[test]
fn sample_tree_survives_encoding() {
    let op = sample_tree();
    let decoded = decode(&encode(&op).expect("encode")).expect("decode");

    assert_eq!(decoded, op);
    assert_eq!(decoded.to_string(), op.to_string());
}

#[test]
fn stream_reads_leave_following_bytes() {
    let mut buf = Vec::new();
    write_operator(&mut buf, &eq("a", 1)).expect("write");
    write_operator(&mut buf, &Operator::FALSE).expect("write");

    let mut input = buf.as_slice();
    assert_eq!(read_operator(&mut input).expect("first"), eq("a", 1));
    assert_eq!(read_operator(&mut input).expect("second"), Operator::FALSE);
    assert!(input.is_empty());
}

// ---- rejection ---------------------------------------------------------

#[test]
fn unknown_version_is_rejected_with_the_version() {
    let mut bytes = 7_i32.to_be_bytes().to_vec();
    bytes.push(0x00);

    let err = decode(&bytes).expect_err("version 7 is unknown");
    assert!(matches!(err, CodecError::UnsupportedVersion { version: 7 }));
    assert!(err.to_string().contains('7'));
}

#[test]
fn unknown_version_in_a_child_is_rejected() {
    let mut bytes = header(0x04);
    bytes.extend_from_slice(&(-1_i32).to_be_bytes());
    bytes.push(0x00);

    assert!(matches!(
        decode(&bytes),
        Err(CodecError::UnsupportedVersion { version: -1 })
    ));
}

#[test]
fn unknown_tags_are_rejected() {
    assert!(matches!(
        decode(&header(0x2a)),
        Err(CodecError::UnknownKind { tag: 0x2a })
    ));

    let mut bytes = header(0x05);
    push_str(&mut bytes, b"a");
    bytes.push(0x09);
    assert!(matches!(
        decode(&bytes),
        Err(CodecError::UnknownValueTag { tag: 0x09 })
    ));
}

#[test]
fn truncated_input_is_rejected() {
    let bytes = encode(&sample_tree()).expect("encode");

    for cut in [0, 3, 5, bytes.len() - 1] {
        let err = decode(&bytes[..cut]).expect_err("truncated");
        assert!(matches!(err, CodecError::Truncated), "cut {cut}: {err}");
        assert!(err.is_format_error());
    }
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = encode(&Operator::TRUE).expect("encode");
    bytes.extend_from_slice(&[0xff, 0xff]);

    assert!(matches!(
        decode(&bytes),
        Err(CodecError::TrailingBytes { count: 2 })
    ));
}

#[test]
fn invalid_payload_bytes_are_rejected() {
    let mut bytes = header(0x05);
    push_str(&mut bytes, &[0xff, 0xfe]);
    bytes.push(0x00);
    assert!(matches!(decode(&bytes), Err(CodecError::InvalidUtf8)));

    let mut bytes = header(0x09);
    push_str(&mut bytes, b"n");
    push_str(&mut bytes, b"*");
    bytes.push(0x02);
    assert!(matches!(
        decode(&bytes),
        Err(CodecError::InvalidBool { byte: 0x02 })
    ));
}

#[test]
fn decoded_nodes_go_through_validation() {
    let mut empty_and = header(0x02);
    empty_and.extend_from_slice(&0_u32.to_be_bytes());
    assert!(matches!(
        decode(&empty_and),
        Err(CodecError::Invalid(OperatorError::EmptyOperands { .. }))
    ));

    let mut null_bound = header(0x06);
    push_str(&mut null_bound, b"a");
    null_bound.push(0x00);
    assert!(matches!(
        decode(&null_bound),
        Err(CodecError::Invalid(OperatorError::NullLiteral { .. }))
    ));

    let mut bad_pattern = header(0x09);
    push_str(&mut bad_pattern, b"n");
    push_str(&mut bad_pattern, b"[ab");
    bad_pattern.push(0x01);
    assert!(matches!(
        decode(&bad_pattern),
        Err(CodecError::Invalid(OperatorError::Pattern(
            PatternError::UnterminatedSet { .. }
        )))
    ));
}

#[test]
fn limits_bound_untrusted_input() {
    let limits = DecodeLimits {
        max_depth: 4,
        max_operands: 2,
        max_text_bytes: 3,
    };

    let shallow = encode(&nested_not(4)).expect("encode");
    assert!(decode_with_limits(&shallow, limits).is_ok());
    let deep = encode(&nested_not(5)).expect("encode");
    assert!(matches!(
        decode_with_limits(&deep, limits),
        Err(CodecError::DepthExceeded { max: 4 })
    ));

    let wide = encode(&Operator::and([eq("a", 1), eq("b", 2), eq("c", 3)]).expect("non-empty"))
        .expect("encode");
    assert!(matches!(
        decode_with_limits(&wide, limits),
        Err(CodecError::LimitExceeded { found: 3, max: 2, .. })
    ));

    let long = encode(&eq("attr", 1)).expect("encode");
    assert!(matches!(
        decode_with_limits(&long, limits),
        Err(CodecError::LimitExceeded { found: 4, max: 3, .. })
    ));
}

#[test]
fn encoding_refuses_trees_decoding_would_reject() {
    let max_depth = DecodeLimits::default().max_depth;
    assert!(encode(&nested_not(max_depth)).is_ok());
    assert!(matches!(
        encode(&nested_not(max_depth + 1)),
        Err(CodecError::DepthExceeded { max }) if max == max_depth
    ));

    let mut buf = Vec::new();
    assert!(write_operator(&mut buf, &nested_not(max_depth + 1)).is_err());
    assert!(buf.is_empty());

    let limits = DecodeLimits {
        max_depth: 4,
        max_operands: 2,
        max_text_bytes: 3,
    };
    let wide = Operator::in_("a", [1, 2, 3]).expect("valid");
    assert!(matches!(
        encode_with_limits(&wide, limits),
        Err(CodecError::LimitExceeded { found: 3, max: 2, .. })
    ));
    assert!(matches!(
        encode_with_limits(&eq("a", "long"), limits),
        Err(CodecError::LimitExceeded { found: 4, max: 3, .. })
    ));
}

#[test]
fn raised_limits_carry_deep_trees_both_ways() {
    let limits = DecodeLimits {
        max_depth: 200,
        ..DecodeLimits::default()
    };
    let deep = nested_not(150);

    let bytes = encode_with_limits(&deep, limits).expect("encode");
    assert_eq!(decode_with_limits(&bytes, limits).expect("decode"), deep);
    assert!(matches!(
        decode(&bytes),
        Err(CodecError::DepthExceeded { .. })
    ));
}

#[test]
fn huge_count_prefix_fails_without_allocating() {
    let mut bytes = header(0x03);
    bytes.extend_from_slice(&u32::MAX.to_be_bytes());

    assert!(matches!(
        decode(&bytes),
        Err(CodecError::LimitExceeded { .. })
    ));
}

// ---- properties --------------------------------------------------------

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9..1.0e9_f64).prop_map(Value::Float64),
        "[a-z]{0,4}".prop_map(Value::Text),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::TRUE),
        Just(Operator::FALSE),
        ("[a-z]{1,3}", arb_value())
            .prop_map(|(attr, value)| Operator::equal_to(attr, value).expect("valid")),
        ("[a-z]{1,3}", arb_value())
            .prop_map(|(attr, value)| Operator::less_than(attr, value).expect("valid")),
        ("[a-z]{1,3}", prop::collection::vec(arb_value(), 1..4))
            .prop_map(|(attr, values)| Operator::in_(attr, values).expect("valid")),
        ("[a-z]{1,3}", "[a-z*?]{0,4}", any::<bool>()).prop_map(|(attr, text, case_sensitive)| {
            let pattern =
                WildcardPattern::new(text, WildcardFormat { case_sensitive }).expect("valid");
            Operator::like(attr, pattern).expect("valid")
        }),
    ]
}

fn arb_operator() -> impl Strategy<Value = Operator> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4)
                .prop_map(|ops| Operator::and(ops).expect("non-empty")),
            prop::collection::vec(inner.clone(), 1..4)
                .prop_map(|ops| Operator::or(ops).expect("non-empty")),
            inner.prop_map(Operator::not),
        ]
    })
}

proptest! {
    #[test]
    fn decode_inverts_encode(op in arb_operator()) {
        let bytes = encode(&op).expect("encode");
        prop_assert_eq!(decode(&bytes).expect("decode"), op);
    }
}
