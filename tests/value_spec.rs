use arsc_entry::arsc::format::typed_value::TypedValue;
use arsc_entry::{ArscError, AttributeDataFormat, AttributeType, BlockReader, ValueType};
use pretty_assertions::assert_eq;

/// (label, encoded bytes, expected type, expected data, expected encoded size)
type ValueFixture = (&'static str, &'static [u8], ValueType, i32, usize);

const VALUE_FIXTURES: &[ValueFixture] = &[
    (
        "dec",
        &[0x08, 0x00, 0x00, 0x10, 0x05, 0x00, 0x00, 0x00],
        ValueType::Dec,
        5,
        8,
    ),
    (
        "boolean true",
        &[0x08, 0x00, 0x00, 0x12, 0xff, 0xff, 0xff, 0xff],
        ValueType::Boolean,
        -1,
        8,
    ),
    (
        "reference",
        &[0x08, 0x00, 0x00, 0x01, 0x01, 0x00, 0x01, 0x7f],
        ValueType::Reference,
        0x7f01_0001,
        8,
    ),
    (
        "color with trailing bytes",
        &[0x0c, 0x00, 0x00, 0x1c, 0x00, 0x00, 0xff, 0xff, 0xaa, 0xbb, 0xcc, 0xdd],
        ValueType::ColorArgb8,
        0xffff_0000_u32 as i32,
        12,
    ),
];

fn encode(value: &TypedValue) -> Vec<u8> {
    let mut out = Vec::new();
    value.write_to(&mut out).expect("write value");
    out
}

#[test]
fn typed_values_round_trip() {
    for (label, bytes, value_type, data, size) in VALUE_FIXTURES {
        let mut reader = BlockReader::new(bytes);
        let value = TypedValue::read(&mut reader).unwrap_or_else(|e| panic!("read {}: {}", label, e));
        assert_eq!(value.value_type(), *value_type, "type mismatch for {}", label);
        assert_eq!(value.data(), *data, "data mismatch for {}", label);
        assert_eq!(value.size(), *size, "size mismatch for {}", label);
        assert_eq!(reader.position(), *size, "reader position for {}", label);
        assert_eq!(encode(&value), bytes.to_vec(), "re-encoded bytes for {}", label);
    }
}

#[test]
fn short_declared_size_is_widened() {
    let bytes = [0x04, 0x00, 0x00, 0x10, 0x2a, 0x00, 0x00, 0x00];
    let mut reader = BlockReader::new(&bytes);
    let value = TypedValue::read(&mut reader).expect("read value");
    assert_eq!(value.declared_size(), 8);
    assert_eq!(value.data(), 42);
    assert_eq!(encode(&value), vec![0x08, 0x00, 0x00, 0x10, 0x2a, 0x00, 0x00, 0x00]);
}

#[test]
fn unknown_type_byte_is_rejected() {
    let bytes = [0x08, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00];
    let err = TypedValue::read(&mut BlockReader::new(&bytes)).expect_err("type 0x09 is unassigned");
    assert!(matches!(err, ArscError::InvalidFormat(_)), "unexpected error: {}", err);
}

#[test]
fn truncated_value_is_rejected() {
    let bytes = [0x08, 0x00, 0x00, 0x10, 0x05];
    let err = TypedValue::read(&mut BlockReader::new(&bytes)).expect_err("value runs past input");
    assert!(matches!(err, ArscError::Truncated { .. }), "unexpected error: {}", err);
}

#[test]
fn value_types_resolve_by_name_and_byte() {
    for value_type in ValueType::ALL {
        assert_eq!(ValueType::from_name(value_type.name()), Some(value_type));
        assert_eq!(ValueType::try_from(value_type.byte()).ok(), Some(value_type));
    }
    assert_eq!(ValueType::from_name("dec"), Some(ValueType::Dec));
    assert_eq!(ValueType::Hex.type_name(), "integer");
    assert_eq!(ValueType::ColorRgb4.type_name(), "color");
    assert!(ValueType::DynamicAttribute.is_reference());
    assert!(!ValueType::String.is_reference());
}

#[test]
fn attribute_formats_decode_and_join() {
    const CASES: &[(u32, Option<&str>)] = &[
        (0x0000_0006, Some("string|integer")),
        (0x0000_0011, Some("reference|color")),
        (0x0000_ffff, Some("any")),
        (0x0001_0004, Some("integer")),
        (0x0000_0000, None),
    ];
    for (mask, expected) in CASES {
        let joined = AttributeDataFormat::decode_value_types(*mask)
            .and_then(|formats| AttributeDataFormat::join_names(&formats));
        assert_eq!(joined.as_deref(), *expected, "formats of {:#x}", mask);
    }

    let parsed = AttributeDataFormat::parse_value_types("reference|color").expect("known formats");
    assert_eq!(AttributeDataFormat::sum(&parsed), 0x11);
    assert_eq!(AttributeDataFormat::type_of_bag(0x0001_0004), Some(AttributeDataFormat::Enum));
    assert_eq!(AttributeDataFormat::type_of_bag(0x0002_0000), Some(AttributeDataFormat::Flag));
    assert_eq!(AttributeDataFormat::type_of_bag(0x0000_0004), None);
    assert!(AttributeDataFormat::any_contains(&parsed, ValueType::ColorRgb8));
    assert!(!AttributeDataFormat::any_contains(&parsed, ValueType::Float));
}

#[test]
fn attribute_types_cover_plural_quantities() {
    assert_eq!(AttributeType::value_of(0x0100_0000), Some(AttributeType::Formats));
    assert_eq!(AttributeType::value_of(0x0100_0006), Some(AttributeType::One));
    assert_eq!(AttributeType::value_of(0x0100_000a), None);
    assert!(AttributeType::Many.is_plural());
    assert!(AttributeType::Other.is_plural());
    assert!(!AttributeType::Max.is_plural());
    assert_eq!(AttributeType::from_name("FEW"), Some(AttributeType::Few));
}
