use arsc_entry::arsc::config::flags::{Density, Orientation, UiModeNight, UiModeType};
use arsc_entry::arsc::config::json::ConfigJson;
use arsc_entry::arsc::config::{is_valid_size, nearest_size};
use arsc_entry::{ArscError, BlockReader, ResConfig};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

const SIZE_CASES: &[(u32, u32, bool)] = &[
    (4, 16, false),
    (16, 16, true),
    (17, 28, false),
    (28, 28, true),
    (33, 36, false),
    (40, 48, false),
    (52, 52, true),
    (57, 64, false),
    (64, 64, true),
    (65, 68, false),
    (68, 68, true),
    (70, 72, false),
    (72, 72, true),
];

fn config_bytes(size: u32, fill: &[(usize, u8)]) -> Vec<u8> {
    let mut bytes = vec![0u8; size as usize];
    bytes[..4].copy_from_slice(&size.to_le_bytes());
    for &(offset, value) in fill {
        bytes[offset] = value;
    }
    bytes
}

#[test]
fn size_ladder() {
    for &(size, nearest, valid) in SIZE_CASES {
        assert_eq!(nearest_size(size), nearest, "nearest size of {}", size);
        assert_eq!(is_valid_size(size), valid, "validity of {}", size);
    }
    assert!(matches!(ResConfig::with_size(40), Err(ArscError::InvalidConfigSize(40))));
    assert_eq!(ResConfig::with_size(28).expect("ladder size").config_size(), 28);
}

#[test]
fn configs_round_trip_through_bytes() {
    let cases = [
        config_bytes(28, &[(8, b'e'), (9, b'n'), (24, 21)]),
        config_bytes(64, &[(4, 0x36), (5, 0x01), (16, 0x02)]),
        config_bytes(40, &[(12, 0x02)]),
    ];
    for bytes in cases {
        let mut reader = BlockReader::new(&bytes);
        let config = ResConfig::read(&mut reader).expect("read config");
        assert_eq!(config.config_size() as usize, bytes.len());
        assert_eq!(reader.position(), bytes.len());
        assert_eq!(config.to_bytes().expect("encode"), bytes);
    }

    let err = ResConfig::read(&mut BlockReader::new(&[0x02, 0x00, 0x00, 0x00]))
        .expect_err("size below its own field");
    assert!(matches!(err, ArscError::InvalidConfigSize(2)), "unexpected error: {}", err);

    let truncated = config_bytes(28, &[]);
    let err = ResConfig::read(&mut BlockReader::new(&truncated[..20])).expect_err("short input");
    assert!(matches!(err, ArscError::Truncated { .. }), "unexpected error: {}", err);
}

#[test]
fn decoded_fields() {
    let bytes = config_bytes(28, &[(4, 0x36), (5, 0x01), (8, b'e'), (9, b'n'), (10, b'U'), (11, b'S'), (12, 0x02), (14, 0x40), (15, 0x01), (24, 21)]);
    let config = ResConfig::read(&mut BlockReader::new(&bytes)).expect("read config");
    assert_eq!(config.mcc(), 310);
    assert_eq!(config.language().as_deref(), Some("en"));
    assert_eq!(config.region().as_deref(), Some("US"));
    assert_eq!(config.orientation(), Some(Orientation::Land));
    assert_eq!(config.density(), Some(Density::XHDPI));
    assert_eq!(config.sdk_version(), 21);
    assert_eq!(config.locale(), "en-US");
    assert_eq!(config.qualifiers(), "mcc310-en-rUS-land-xhdpi-v21");
    assert_eq!(config.to_string(), "[mcc310-en-rUS-land-xhdpi-v21]");
    assert_eq!(ResConfig::new().to_string(), "[DEFAULT]");
}

#[test]
fn shrinking_over_data_is_rejected() {
    let mut config = ResConfig::new();
    config.set_sdk_version(21);

    let err = config.set_config_size(16).expect_err("sdk lives past 16 bytes");
    assert!(matches!(err, ArscError::TrimRejected { size: 16 }), "unexpected error: {}", err);
    assert_eq!(config.config_size(), 64);
    assert_eq!(config.sdk_version(), 21);
    assert!(!config.trim_to_size(16));
    assert!(matches!(config.set_config_size(30), Err(ArscError::InvalidConfigSize(30))));

    config.set_config_size(28).expect("tail is zero");
    assert_eq!(config.config_size(), 28);
    config.set_config_size(36).expect("growing is always allowed");
    assert_eq!(config.config_size(), 36);
    assert_eq!(config.sdk_version(), 21);
}

#[test]
fn minimum_size_trim_is_idempotent() {
    let cases: &[(&str, u32)] = &[
        ("", 16),
        ("port", 16),
        ("v21", 28),
        ("sw600dp", 32),
        ("w820dp", 36),
        ("b+sr+Latn", 48),
        ("round", 52),
        ("unknown_bytes0a", 56),
    ];
    for (qualifiers, expected) in cases {
        let mut config = ResConfig::parse(qualifiers);
        config.trim_to_minimum_size();
        assert_eq!(config.config_size(), *expected, "minimum size of {:?}", qualifiers);
        let before = config.to_bytes().expect("encode");
        config.trim_to_minimum_size();
        assert_eq!(config.to_bytes().expect("encode"), before, "second trim of {:?}", qualifiers);
        assert_eq!(config, ResConfig::parse(qualifiers), "trim changed {:?}", qualifiers);
    }
}

#[test]
fn writes_past_the_end_grow_the_config() {
    let mut config = ResConfig::with_size(16).expect("ladder size");
    config.set_sdk_version(0);
    assert_eq!(config.config_size(), 16);
    config.set_screen_width_dp(600);
    assert_eq!(config.config_size(), 36);
    assert_eq!(config.screen_width_dp(), 600);
    assert_eq!(config.unknown_bytes(), &[] as &[u8]);
}

#[test]
fn equality_ignores_trailing_zeros() {
    let small = ResConfig::read(&mut BlockReader::new(&config_bytes(16, &[(12, 0x01)]))).expect("read");
    let large = ResConfig::read(&mut BlockReader::new(&config_bytes(64, &[(12, 0x01)]))).expect("read");
    assert_eq!(small, large);
    assert_eq!(small.cmp(&large), std::cmp::Ordering::Equal);

    let mut set = HashSet::new();
    set.insert(small);
    assert!(set.contains(&large));
    assert!(ResConfig::with_size(16).expect("size").is_default());
}

#[test]
fn ordering_follows_field_priority() {
    let sorted = [
        "",
        "night",
        "v21",
        "ldpi",
        "xhdpi",
        "en",
        "fr",
        "en-rUS",
        "mcc310",
        "mnc1",
    ];
    let configs: Vec<ResConfig> = sorted.iter().map(|q| ResConfig::parse(q)).collect();
    for pair in configs.windows(2) {
        assert!(pair[0] < pair[1], "expected {} < {}", pair[0], pair[1]);
    }

    let mut shuffled: Vec<ResConfig> = configs.iter().rev().cloned().collect();
    shuffled.sort();
    assert_eq!(shuffled, configs);
}

#[test]
fn specificity() {
    const CASES: &[(&str, &str, bool)] = &[
        ("en-rUS-v21", "en", true),
        ("en-rUS-v21", "", true),
        ("en", "en-rUS", false),
        ("fr", "en", false),
        ("land-xhdpi", "land", true),
        ("land", "port", false),
        ("", "", true),
    ];
    for (ours, theirs, expected) in CASES {
        let ours_config = ResConfig::parse(ours);
        let theirs_config = ResConfig::parse(theirs);
        assert_eq!(
            ours_config.is_equal_or_more_specific_than(&theirs_config),
            *expected,
            "{:?} over {:?}",
            ours,
            theirs
        );
    }
}

#[test]
fn shared_bytes_keep_both_flags() {
    let mut config = ResConfig::new();
    config.set_ui_mode_type(Some(UiModeType::Car));
    config.set_ui_mode_night(Some(UiModeNight::Night));
    assert_eq!(config.ui_mode(), 0x23);
    config.set_ui_mode_type(None);
    assert_eq!(config.ui_mode(), 0x20);
    assert_eq!(config.ui_mode_night(), Some(UiModeNight::Night));
    assert_eq!(config.ui_mode_type(), None);
}

#[test]
fn unknown_bytes_as_hex() {
    let mut config = ResConfig::new();
    assert!(!config.set_unknown_bytes("abc"));
    assert!(!config.set_unknown_bytes("zz"));
    assert!(config.set_unknown_bytes("0a0b"));
    assert_eq!(config.unknown_bytes_hex(None).as_deref(), Some("0a0b"));
    assert_eq!(&config.unknown_bytes()[..3], &[0x0a, 0x0b, 0x00][..]);
    assert_eq!(config.qualifiers(), "unknown_bytes0a0b");

    let mut long = ResConfig::new();
    assert!(long.set_unknown_bytes("0102030405060708090a"));
    assert_eq!(long.qualifiers(), "unknown_bytes0102030405060708");
    assert_eq!(long.unknown_bytes_hex(None).as_deref(), Some("0102030405060708090a"));
}

#[test]
fn json_round_trip() {
    assert_eq!(ResConfig::new().to_json_string().expect("json"), "{}");

    for qualifiers in ["mcc310-mnc4-en-rUS-land-xhdpi-v21", "b+sr+Latn-night-sw600dp", "unknown_bytes0a0b"] {
        let config = ResConfig::parse(qualifiers);
        let text = config.to_json_string().expect("json");
        let parsed = ResConfig::from_json_str(&text).expect("parse json");
        assert_eq!(parsed, config, "json round trip of {}: {}", qualifiers, text);
        assert_eq!(parsed.qualifiers(), config.qualifiers());
    }

    let json: ConfigJson = serde_json::from_str(r#"{"density":"420dpi","sdkVersion":26,"orientation":"port"}"#)
        .expect("parse json");
    let mut config = ResConfig::new();
    config.from_json(&json).expect("apply json");
    assert_eq!(config.qualifiers(), "port-420dpi-v26");
}

#[test]
fn bad_json_leaves_config_unchanged() {
    let mut config = ResConfig::parse("en-v21");
    let before = config.clone();
    for text in [r#"{"orientation":"sideways"}"#, r#"{"density":"huge"}"#, r#"{"language":"en","config_size":40}"#] {
        let json: ConfigJson = serde_json::from_str(text).expect("parse json");
        assert!(config.from_json(&json).is_err(), "{} should be rejected", text);
        assert_eq!(config, before, "{} changed the config", text);
    }

    config.from_json(&ConfigJson::default()).expect("empty json");
    assert!(config.is_default());
}
