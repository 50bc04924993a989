//! Two-byte packing of language and region codes.
//!
//! Two-letter codes are stored as raw ASCII. Three-letter codes are packed
//! into 5-bit offsets from a base character, with the top bit of the first
//! byte marking the packed form:
//!
//! ```text
//! byte0: 1 ttttt ss    (t = third, s = high bits of second)
//! byte1: sss fffff     (s = low bits of second, f = first)
//! ```

const LANGUAGE_BASE: u8 = b'a';
const REGION_BASE: u8 = b'0';

pub fn pack_language(code: &str) -> [u8; 2] {
    pack(code.as_bytes(), LANGUAGE_BASE)
}

pub fn pack_region(code: &str) -> [u8; 2] {
    pack(code.as_bytes(), REGION_BASE)
}

/// Returns `None` when both bytes are zero.
pub fn unpack_language(bytes: [u8; 2]) -> Option<String> {
    unpack(bytes, LANGUAGE_BASE)
}

pub fn unpack_region(bytes: [u8; 2]) -> Option<String> {
    unpack(bytes, REGION_BASE)
}

fn pack(input: &[u8], base: u8) -> [u8; 2] {
    if input.len() < 2 {
        return [0, 0];
    }
    if input.len() == 2 || input[2] == 0 || input[2] == b'-' {
        return [input[0], input[1]];
    }
    let first = input[0].wrapping_sub(base) & 0x7f;
    let second = input[1].wrapping_sub(base) & 0x7f;
    let third = input[2].wrapping_sub(base) & 0x7f;
    [
        0x80 | (third << 2) | (second >> 3),
        (second << 5) | first,
    ]
}

fn unpack(bytes: [u8; 2], base: u8) -> Option<String> {
    let [in0, in1] = bytes;
    if in0 & 0x80 != 0 {
        let first = in1 & 0x1f;
        let second = ((in1 & 0xe0) >> 5) + ((in0 & 0x03) << 3);
        let third = (in0 & 0x7c) >> 2;
        let chars = [first + base, second + base, third + base];
        return Some(chars.iter().map(|&b| b as char).collect());
    }
    if in0 != 0 && in1 != 0 {
        return Some([in0 as char, in1 as char].iter().collect());
    }
    None
}
