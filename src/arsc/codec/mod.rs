//! Codec layer for raw byte access and packed text fields.
//!
//! # Submodules
//!
//! - [`cursor`][]: Forward-seekable little-endian reader over table bytes
//! - [`locale`][]: 5-bit packing of three-letter language and region codes

pub mod cursor;
pub mod locale;
