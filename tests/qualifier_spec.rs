use arsc_entry::arsc::config::flags::{
    ColorModeHdr, Density, Keyboard, KeysHidden, NavHidden, Orientation, QualifierFlag,
    ScreenLayoutDir, ScreenLayoutSize, UiModeType,
};
use arsc_entry::ResConfig;
use pretty_assertions::assert_eq;

/// Qualifier strings already in builder order; parsing then building must
/// reproduce them exactly.
const CANONICAL: &[&str] = &[
    "en-rUS-v21",
    "b+es+419",
    "b+sr+Latn",
    "b+de+rDE+Latn+1901#",
    "mcc310-mnc260-fr-rCA",
    "ldrtl-sw600dp-w720dp-h1024dp",
    "large-long-round-widecg-highdr",
    "land-car-night-xxhdpi",
    "feminine-normal-notnight-420dpi",
    "finger-keyssoft-qwerty-navhidden-dpad",
    "1920x1080-v33",
    "anydpi-v26",
    "unknown_bytes0a0b",
];

/// (input, expected rebuilt form)
const REORDERED: &[(&str, &str)] = &[
    ("v21-rUS-en", "en-rUS-v21"),
    ("xhdpi-land", "land-xhdpi"),
    ("-en-", "en"),
    ("NIGHT-Port", "port-night"),
    ("sw320dp-mcc001", "mcc1-sw320dp"),
    ("b+en+rGB", "en-rGB"),
    ("u+nu+arab-en", "en"),
];

#[test]
fn canonical_qualifiers_rebuild_unchanged() {
    for qualifiers in CANONICAL {
        let mut config = ResConfig::new();
        let parse = config.parse_qualifiers(qualifiers);
        assert!(parse.is_ok(), "{} rejected {:?}", qualifiers, parse.rejected);
        assert_eq!(config.qualifiers(), *qualifiers);
        assert!(config.is_equal_qualifiers(qualifiers), "{} not equal to itself", qualifiers);
    }
}

#[test]
fn qualifiers_are_order_insensitive() {
    for (input, expected) in REORDERED {
        let config = ResConfig::parse(input);
        assert_eq!(config.qualifiers(), *expected, "rebuilt form of {}", input);
    }
}

#[test]
fn locale_fields() {
    let config = ResConfig::parse("en-rUS-v21");
    assert_eq!(config.language().as_deref(), Some("en"));
    assert_eq!(config.region().as_deref(), Some("US"));
    assert_eq!(config.sdk_version(), 21);

    let config = ResConfig::parse("b+es+419");
    assert_eq!(config.language().as_deref(), Some("es"));
    assert_eq!(config.region().as_deref(), Some("419"));
    assert_eq!(config.locale(), "es-419");

    let config = ResConfig::parse("b+fil+PH");
    assert_eq!(config.language().as_deref(), Some("fil"));
    assert_eq!(config.qualifiers(), "fil-rPH");

    let config = ResConfig::parse("b+de+DE+Latn+1901");
    assert_eq!(config.locale_script().as_deref(), Some("Latn"));
    assert_eq!(config.locale_variant().as_deref(), Some("1901#"));
    assert_eq!(config.locale(), "de-DE-Latn");
}

#[test]
fn parse_locale_strings() {
    let mut config = ResConfig::new();
    assert!(config.parse_locale("es-419").is_ok());
    assert_eq!(config.qualifiers(), "b+es+419");

    let mut config = ResConfig::new();
    assert!(config.parse_locale("zh-TW-Hant").is_ok());
    assert_eq!(config.locale(), "zh-TW-Hant");

    let parse = config.parse_locale("");
    assert!(parse.is_ok());
    assert!(config.is_default());

    let parse = ResConfig::new().parse_locale("en-US-Latn-extra");
    assert_eq!(parse.rejected, vec!["extra".to_string()]);
}

#[test]
fn unrecognized_tokens_are_reported() {
    let mut config = ResConfig::new();
    let parse = config.parse_qualifiers("en-bogus-v21-xx1");
    assert_eq!(parse.rejected, vec!["bogus".to_string(), "xx1".to_string()]);
    assert_eq!(config.qualifiers(), "en-v21");

    let parse = ResConfig::new().parse_qualifiers("v70000");
    assert_eq!(parse.rejected, vec!["v70000".to_string()]);
}

#[test]
fn flags_parse_into_their_fields() {
    let config = ResConfig::parse("ldltr-small-port-desk-nodpi-nokeys-navexposed-keysexposed-lowdr");
    assert_eq!(config.screen_layout_dir(), Some(ScreenLayoutDir::Ltr));
    assert_eq!(config.screen_layout_size(), Some(ScreenLayoutSize::Small));
    assert_eq!(config.orientation(), Some(Orientation::Port));
    assert_eq!(config.ui_mode_type(), Some(UiModeType::Desk));
    assert_eq!(config.density(), Some(Density::NODPI));
    assert_eq!(config.keyboard(), Some(Keyboard::NoKeys));
    assert_eq!(config.nav_hidden(), Some(NavHidden::NavExposed));
    assert_eq!(config.keys_hidden(), Some(KeysHidden::KeysExposed));
    assert_eq!(config.input_flags(), 0x05);
    assert_eq!(config.color_mode_hdr(), Some(ColorModeHdr::LowDr));
}

#[test]
fn normal_goes_to_screen_size_first() {
    let config = ResConfig::parse("normal");
    assert_eq!(config.screen_layout_size(), Some(ScreenLayoutSize::Normal));
    assert_eq!(config.ui_mode_type(), None);

    let config = ResConfig::parse("normal-normal");
    assert_eq!(config.screen_layout_size(), Some(ScreenLayoutSize::Normal));
    assert_eq!(config.ui_mode_type(), Some(UiModeType::Normal));
    assert_eq!(config.qualifiers(), "normal-normal");

    let mut ui_only = ResConfig::new();
    ui_only.set_ui_mode_type(Some(UiModeType::Normal));
    assert_eq!(ui_only.qualifiers(), "normal");
    assert_ne!(ResConfig::parse(&ui_only.qualifiers()), ui_only);
}

#[test]
fn flag_names_round_trip() {
    for flag in UiModeType::VALUES {
        assert_eq!(UiModeType::from_name(flag.name()), Some(*flag));
        assert_eq!(UiModeType::from_value(flag.flag()), Some(*flag));
    }
    assert_eq!(Orientation::from_name("-LAND"), Some(Orientation::Land));
    assert_eq!(Orientation::from_name(""), None);
    assert_eq!(Density::from_name("420dpi"), Some(Density(420)));
    assert_eq!(Density::from_name("0dpi"), None);
    assert_eq!(Density::from_name("dpi"), None);
    assert_eq!(Density::XXXHDPI.to_string(), "xxxhdpi");
    assert_eq!(Density(560).to_string(), "560dpi");
}

#[test]
fn parsing_keeps_a_small_config_small() {
    let mut config = ResConfig::with_size(16).expect("ladder size");
    config.parse_qualifiers("land");
    assert_eq!(config.config_size(), 16);

    let mut config = ResConfig::with_size(16).expect("ladder size");
    config.parse_qualifiers("v21");
    assert_eq!(config.config_size(), 64);
    assert_eq!(config.sdk_version(), 21);
}
