use arsc_entry::arsc::codec::locale::{pack_language, pack_region, unpack_language, unpack_region};
use pretty_assertions::assert_eq;

/// (code, packed bytes)
const LANGUAGES: &[(&str, [u8; 2])] = &[
    ("en", [b'e', b'n']),
    ("zh", [b'z', b'h']),
    ("fil", [0xad, 0x05]),
];

const REGIONS: &[(&str, [u8; 2])] = &[
    ("US", [b'U', b'S']),
    ("419", [0xa4, 0x24]),
];

#[test]
fn languages_pack_and_unpack() {
    for (code, packed) in LANGUAGES {
        assert_eq!(pack_language(code), *packed, "packed form of {}", code);
        assert_eq!(unpack_language(*packed).as_deref(), Some(*code), "unpacked form of {:02x?}", packed);
    }
}

#[test]
fn regions_pack_and_unpack() {
    for (code, packed) in REGIONS {
        assert_eq!(pack_region(code), *packed, "packed form of {}", code);
        assert_eq!(unpack_region(*packed).as_deref(), Some(*code), "unpacked form of {:02x?}", packed);
    }
}

#[test]
fn short_and_empty_codes() {
    assert_eq!(pack_language(""), [0, 0]);
    assert_eq!(pack_language("e"), [0, 0]);
    assert_eq!(pack_language("en-"), [b'e', b'n']);
    assert_eq!(unpack_language([0, 0]), None);
    assert_eq!(unpack_region([b'U', 0]), None);
}
