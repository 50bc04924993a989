//! Low-level byte utilities

/// Slice up to and including the last non-zero byte.
///
/// Used wherever trailing zero padding must not affect equality, hashing
/// or hex rendering.
pub fn trim_trailing_zeros(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

/// Parse a decimal number that must fit a `u16`.
///
/// Used by the qualifier parser for `mcc310`, `v21`, `sw600dp` and the like.
pub fn parse_u16(digits: &str) -> Option<u16> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
