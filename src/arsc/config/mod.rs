//! Resource configuration (`ResTable_config`): the qualifier set one table
//! type chunk applies to.
//!
//! # Layout
//! ```text
//! offset  field                       ladder rung reached
//! ------  --------------------------  -------------------
//!  0      u32 size (this header incl.)
//!  4      u16 mcc, u16 mnc
//!  8      [u8;2] language, [u8;2] region
//! 12      u8 orientation, u8 touchscreen, u16 density       16
//! 16      u8 keyboard, u8 navigation, u8 inputFlags, u8 gender
//! 20      u16 screenWidth, u16 screenHeight
//! 24      u16 sdkVersion, u16 minorVersion                  28
//! 28      u8 screenLayout, u8 uiMode, u16 smallestWidthDp   32
//! 32      u16 screenWidthDp, u16 screenHeightDp             36
//! 36      [u8;4] localeScript, [u8;8] localeVariant         48
//! 48      u8 screenLayout2, u8 colorMode, u16 reserved      52
//! 52      unknown tail                                      56, 64, ...
//! ```
//!
//! Offsets below are relative to the end of the size field. Reads past the
//! current length yield zero; writes of a non-zero value past it grow the
//! buffer to the next rung first.

pub mod flags;
pub mod json;
pub mod qualifiers;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Write;
use byteorder::{LittleEndian, WriteBytesExt};
use log::{trace, warn};

use crate::arsc::codec::cursor::BlockReader;
use crate::arsc::codec::locale::{pack_language, pack_region, unpack_language, unpack_region};
use crate::arsc::types::error::{ArscError, Result};
use crate::arsc::utils::trim_trailing_zeros;
use flags::{
    update_field, ColorModeHdr, ColorModeWide, Density, Gender, KeysHidden, Keyboard, NavHidden,
    Navigation, Orientation, QualifierFlag, ScreenLayoutDir, ScreenLayoutLong, ScreenLayoutRound,
    ScreenLayoutSize, Touchscreen, UiModeNight, UiModeType,
};
pub use qualifiers::QualifierParse;

pub const SIZE_16: u32 = 16;
pub const SIZE_28: u32 = 28;
pub const SIZE_32: u32 = 32;
pub const SIZE_36: u32 = 36;
pub const SIZE_48: u32 = 48;
pub const SIZE_52: u32 = 52;
pub const SIZE_56: u32 = 56;
pub const SIZE_64: u32 = 64;

const LADDER: [u32; 8] = [SIZE_16, SIZE_28, SIZE_32, SIZE_36, SIZE_48, SIZE_52, SIZE_56, SIZE_64];

const OFFSET_MCC: usize = 0;
const OFFSET_MNC: usize = 2;
const OFFSET_LANGUAGE: usize = 4;
const OFFSET_REGION: usize = 6;
const OFFSET_ORIENTATION: usize = 8;
const OFFSET_TOUCHSCREEN: usize = 9;
const OFFSET_DENSITY: usize = 10;
const OFFSET_KEYBOARD: usize = 12;
const OFFSET_NAVIGATION: usize = 13;
const OFFSET_INPUT_FLAGS: usize = 14;
const OFFSET_GENDER: usize = 15;
const OFFSET_SCREEN_WIDTH: usize = 16;
const OFFSET_SCREEN_HEIGHT: usize = 18;
const OFFSET_SDK_VERSION: usize = 20;
const OFFSET_MINOR_VERSION: usize = 22;
const OFFSET_SCREEN_LAYOUT: usize = 24;
const OFFSET_UI_MODE: usize = 25;
const OFFSET_SMALLEST_WIDTH_DP: usize = 26;
const OFFSET_SCREEN_WIDTH_DP: usize = 28;
const OFFSET_SCREEN_HEIGHT_DP: usize = 30;
const OFFSET_LOCALE_SCRIPT: usize = 32;
const OFFSET_LOCALE_VARIANT: usize = 36;
const OFFSET_SCREEN_LAYOUT2: usize = 44;
const OFFSET_COLOR_MODE: usize = 45;
const OFFSET_RESERVED: usize = 46;
const OFFSET_UNKNOWN: usize = 48;

const LEN_LOCALE_SCRIPT: usize = 4;
const LEN_LOCALE_VARIANT: usize = 8;

/// Padding character of short script and variant codes in qualifier form.
const LOCALE_PAD: char = '#';

/// Smallest valid size that holds `size` bytes.
pub fn nearest_size(size: u32) -> u32 {
    if let Some(&rung) = LADDER.iter().find(|&&rung| size <= rung) {
        return rung;
    }
    size.div_ceil(4) * 4
}

/// True for the ladder rungs and for multiples of 4 above 64.
pub fn is_valid_size(size: u32) -> bool {
    LADDER.contains(&size) || (size > SIZE_64 && size % 4 == 0)
}

#[derive(Debug, Clone)]
pub struct ResConfig {
    config_size: u32,
    /// Everything after the size field; always `config_size - 4` bytes.
    values: Vec<u8>,
}

impl Default for ResConfig {
    /// A default (all-zero) configuration of 64 bytes.
    fn default() -> Self {
        Self::blank(SIZE_64)
    }
}

impl ResConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A default configuration of `size` bytes.
    ///
    /// # Errors
    /// Returns [`ArscError::InvalidConfigSize`] for a size off the ladder.
    pub fn with_size(size: u32) -> Result<Self> {
        if !is_valid_size(size) {
            return Err(ArscError::InvalidConfigSize(size));
        }
        Ok(Self::blank(size))
    }

    fn blank(size: u32) -> Self {
        Self {
            config_size: size,
            values: vec![0; size as usize - 4],
        }
    }

    /// Parses a qualifier string, ignoring unrecognized tokens.
    pub fn parse(qualifiers: &str) -> Self {
        let mut config = Self::default();
        config.parse_qualifiers(qualifiers);
        config
    }

    /// Decodes a configuration at the reader position.
    ///
    /// A declared size off the ladder is kept as read so the bytes survive
    /// a round trip.
    ///
    /// # Errors
    /// - [`ArscError::InvalidConfigSize`] if the size cannot hold its own field
    /// - [`ArscError::Truncated`] if the input ends early
    pub fn read(reader: &mut BlockReader) -> Result<Self> {
        let start = reader.position();
        let config_size = reader.read_i32()? as u32;
        if config_size < 4 {
            return Err(ArscError::InvalidConfigSize(config_size));
        }
        if !is_valid_size(config_size) {
            warn!(
                "Config at {} declares size {}, off the ladder; kept as read",
                start, config_size
            );
        }
        let values = reader
            .read_bytes(config_size as usize - 4, "resource config")?
            .to_vec();
        trace!("Read config at {}: size={}", start, config_size);
        Ok(Self { config_size, values })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.config_size)?;
        writer.write_all(&self.values)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.config_size as usize);
        self.write_to(&mut out)?;
        Ok(out)
    }

    pub fn config_size(&self) -> u32 {
        self.config_size
    }

    /// Value bytes after the size field.
    pub fn value_bytes(&self) -> &[u8] {
        &self.values
    }

    /// Resizes to `size`.
    ///
    /// # Errors
    /// - [`ArscError::InvalidConfigSize`] for a size off the ladder
    /// - [`ArscError::TrimRejected`] when a dropped byte is non-zero; the
    ///   config is left unchanged
    pub fn set_config_size(&mut self, size: u32) -> Result<()> {
        if !is_valid_size(size) {
            return Err(ArscError::InvalidConfigSize(size));
        }
        let len = size as usize - 4;
        if len < self.values.len() && self.values[len..].iter().any(|&b| b != 0) {
            return Err(ArscError::TrimRejected { size });
        }
        self.resize(size);
        Ok(())
    }

    /// Like [`ResConfig::set_config_size`], reporting failure as `false`.
    pub fn trim_to_size(&mut self, size: u32) -> bool {
        size == self.config_size || self.set_config_size(size).is_ok()
    }

    /// Shrinks to the smallest rung whose dropped tail is all zero.
    pub fn trim_to_minimum_size(&mut self) {
        let used = trim_trailing_zeros(&self.values).len() as u32;
        let size = nearest_size(used + 4);
        if size != self.config_size {
            self.resize(size);
        }
    }

    fn resize(&mut self, size: u32) {
        self.config_size = size;
        self.values.resize(size as usize - 4, 0);
    }

    /// Grows to at least `size`, never shrinking.
    pub(crate) fn ensure_size(&mut self, size: u32) {
        if self.config_size < size {
            self.resize(nearest_size(size));
        }
    }

    /// Zeroes every value, keeping the size.
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|b| *b = 0);
    }

    pub fn copy_from(&mut self, other: &ResConfig) {
        self.config_size = other.config_size;
        self.values = other.values.clone();
    }

    pub fn is_default(&self) -> bool {
        self.values.iter().all(|&b| b == 0)
    }

    /// True when every non-zero byte of `other` is matched at the same
    /// offset here. A default `other` matches everything.
    pub fn is_equal_or_more_specific_than(&self, other: &ResConfig) -> bool {
        if other.is_default() {
            return true;
        }
        let ours = trim_trailing_zeros(&self.values);
        let theirs = trim_trailing_zeros(&other.values);
        if theirs.len() > ours.len() {
            return false;
        }
        theirs
            .iter()
            .zip(ours)
            .all(|(&their, &our)| their == 0 || their == our)
    }

    fn get_bytes<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(src) = self.values.get(offset..offset + N) {
            out.copy_from_slice(src);
        }
        out
    }

    /// Writes `bytes` at `offset`, growing first unless they are all zero.
    fn put_bytes(&mut self, offset: usize, bytes: &[u8]) {
        let end = offset + bytes.len();
        if end > self.values.len() {
            if bytes.iter().all(|&b| b == 0) {
                return;
            }
            self.resize(nearest_size(end as u32 + 4));
        }
        self.values[offset..end].copy_from_slice(bytes);
    }

    fn get_u8(&self, offset: usize) -> u8 {
        self.values.get(offset).copied().unwrap_or(0)
    }

    fn set_u8(&mut self, offset: usize, value: u8) {
        self.put_bytes(offset, &[value]);
    }

    fn get_u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.get_bytes(offset))
    }

    fn set_u16(&mut self, offset: usize, value: u16) {
        self.put_bytes(offset, &value.to_le_bytes());
    }

    fn get_flag<F: QualifierFlag>(&self, offset: usize) -> Option<F> {
        F::from_value(self.get_u8(offset) as u32)
    }

    fn set_flag<F: QualifierFlag>(&mut self, offset: usize, flag: Option<F>) {
        let field = update_field(F::MASK, flag.map(F::flag), self.get_u8(offset) as u32);
        self.set_u8(offset, field as u8);
    }

    pub fn mcc(&self) -> u16 {
        self.get_u16(OFFSET_MCC)
    }

    pub fn set_mcc(&mut self, value: u16) {
        self.set_u16(OFFSET_MCC, value);
    }

    pub fn mnc(&self) -> u16 {
        self.get_u16(OFFSET_MNC)
    }

    pub fn set_mnc(&mut self, value: u16) {
        self.set_u16(OFFSET_MNC, value);
    }

    pub fn language_bytes(&self) -> [u8; 2] {
        self.get_bytes(OFFSET_LANGUAGE)
    }

    pub fn region_bytes(&self) -> [u8; 2] {
        self.get_bytes(OFFSET_REGION)
    }

    /// Two- or three-letter language code.
    pub fn language(&self) -> Option<String> {
        unpack_language(self.language_bytes())
    }

    pub fn set_language(&mut self, language: Option<&str>) {
        let packed = language.map_or([0, 0], pack_language);
        self.put_bytes(OFFSET_LANGUAGE, &packed);
    }

    /// Two-letter or three-digit region code, without the `r` prefix.
    pub fn region(&self) -> Option<String> {
        unpack_region(self.region_bytes())
    }

    /// Accepts `"US"`, `"rUS"` or `"419"`.
    pub fn set_region(&mut self, region: Option<&str>) {
        let packed = region.map_or([0, 0], |region| {
            let region = match region.strip_prefix('r') {
                Some(rest) if region.len() == 3 => rest,
                _ => region,
            };
            pack_region(region)
        });
        self.put_bytes(OFFSET_REGION, &packed);
    }

    fn locale_script_raw(&self) -> Option<String> {
        bytes_to_text(&self.get_bytes::<LEN_LOCALE_SCRIPT>(OFFSET_LOCALE_SCRIPT))
    }

    /// Script code, padded with `#` to three characters.
    pub fn locale_script(&self) -> Option<String> {
        self.locale_script_raw().map(|script| pad_end(script, 3))
    }

    pub fn set_locale_script(&mut self, script: Option<&str>) {
        let bytes = text_to_bytes::<LEN_LOCALE_SCRIPT>(script.map(trim_pad));
        self.put_bytes(OFFSET_LOCALE_SCRIPT, &bytes);
    }

    fn locale_variant_raw(&self) -> Option<String> {
        bytes_to_text(&self.get_bytes::<LEN_LOCALE_VARIANT>(OFFSET_LOCALE_VARIANT))
    }

    /// Variant code, upper-cased and padded with `#` to five characters.
    pub fn locale_variant(&self) -> Option<String> {
        self.locale_variant_raw()
            .map(|variant| pad_end(variant, 5).to_ascii_uppercase())
    }

    /// Stores the variant lower-cased.
    pub fn set_locale_variant(&mut self, variant: Option<&str>) {
        let lower = variant.map(str::to_ascii_lowercase);
        self.set_locale_variant_raw(lower.as_deref());
    }

    fn set_locale_variant_raw(&mut self, variant: Option<&str>) {
        let bytes = text_to_bytes::<LEN_LOCALE_VARIANT>(variant.map(trim_pad));
        self.put_bytes(OFFSET_LOCALE_VARIANT, &bytes);
    }

    /// `language-region-script`, skipping absent parts.
    pub fn locale(&self) -> String {
        [self.language(), self.region(), self.locale_script_raw()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn orientation_value(&self) -> u8 {
        self.get_u8(OFFSET_ORIENTATION)
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.get_flag(OFFSET_ORIENTATION)
    }

    pub fn set_orientation(&mut self, orientation: Option<Orientation>) {
        self.set_flag(OFFSET_ORIENTATION, orientation);
    }

    pub fn touchscreen_value(&self) -> u8 {
        self.get_u8(OFFSET_TOUCHSCREEN)
    }

    pub fn touchscreen(&self) -> Option<Touchscreen> {
        self.get_flag(OFFSET_TOUCHSCREEN)
    }

    pub fn set_touchscreen(&mut self, touchscreen: Option<Touchscreen>) {
        self.set_flag(OFFSET_TOUCHSCREEN, touchscreen);
    }

    pub fn density_value(&self) -> u16 {
        self.get_u16(OFFSET_DENSITY)
    }

    pub fn density(&self) -> Option<Density> {
        Density::from_value(self.density_value() as u32)
    }

    pub fn set_density(&mut self, density: Option<Density>) {
        self.set_u16(OFFSET_DENSITY, density.map_or(0, Density::dpi));
    }

    pub fn keyboard_value(&self) -> u8 {
        self.get_u8(OFFSET_KEYBOARD)
    }

    pub fn keyboard(&self) -> Option<Keyboard> {
        self.get_flag(OFFSET_KEYBOARD)
    }

    pub fn set_keyboard(&mut self, keyboard: Option<Keyboard>) {
        self.set_flag(OFFSET_KEYBOARD, keyboard);
    }

    pub fn navigation_value(&self) -> u8 {
        self.get_u8(OFFSET_NAVIGATION)
    }

    pub fn navigation(&self) -> Option<Navigation> {
        self.get_flag(OFFSET_NAVIGATION)
    }

    pub fn set_navigation(&mut self, navigation: Option<Navigation>) {
        self.set_flag(OFFSET_NAVIGATION, navigation);
    }

    pub fn input_flags(&self) -> u8 {
        self.get_u8(OFFSET_INPUT_FLAGS)
    }

    pub fn set_input_flags(&mut self, value: u8) {
        self.set_u8(OFFSET_INPUT_FLAGS, value);
    }

    pub fn keys_hidden(&self) -> Option<KeysHidden> {
        self.get_flag(OFFSET_INPUT_FLAGS)
    }

    pub fn set_keys_hidden(&mut self, keys_hidden: Option<KeysHidden>) {
        self.set_flag(OFFSET_INPUT_FLAGS, keys_hidden);
    }

    pub fn nav_hidden(&self) -> Option<NavHidden> {
        self.get_flag(OFFSET_INPUT_FLAGS)
    }

    pub fn set_nav_hidden(&mut self, nav_hidden: Option<NavHidden>) {
        self.set_flag(OFFSET_INPUT_FLAGS, nav_hidden);
    }

    pub fn gender_value(&self) -> u8 {
        self.get_u8(OFFSET_GENDER)
    }

    pub fn gender(&self) -> Option<Gender> {
        self.get_flag(OFFSET_GENDER)
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.set_flag(OFFSET_GENDER, gender);
    }

    pub fn screen_width(&self) -> u16 {
        self.get_u16(OFFSET_SCREEN_WIDTH)
    }

    pub fn set_screen_width(&mut self, value: u16) {
        self.set_u16(OFFSET_SCREEN_WIDTH, value);
    }

    pub fn screen_height(&self) -> u16 {
        self.get_u16(OFFSET_SCREEN_HEIGHT)
    }

    pub fn set_screen_height(&mut self, value: u16) {
        self.set_u16(OFFSET_SCREEN_HEIGHT, value);
    }

    pub fn set_screen_size(&mut self, width: u16, height: u16) {
        self.set_screen_width(width);
        self.set_screen_height(height);
    }

    pub fn sdk_version(&self) -> u16 {
        self.get_u16(OFFSET_SDK_VERSION)
    }

    pub fn set_sdk_version(&mut self, value: u16) {
        self.set_u16(OFFSET_SDK_VERSION, value);
    }

    pub fn minor_version(&self) -> u16 {
        self.get_u16(OFFSET_MINOR_VERSION)
    }

    pub fn set_minor_version(&mut self, value: u16) {
        self.set_u16(OFFSET_MINOR_VERSION, value);
    }

    pub fn screen_layout(&self) -> u8 {
        self.get_u8(OFFSET_SCREEN_LAYOUT)
    }

    pub fn set_screen_layout(&mut self, value: u8) {
        self.set_u8(OFFSET_SCREEN_LAYOUT, value);
    }

    pub fn screen_layout_size(&self) -> Option<ScreenLayoutSize> {
        self.get_flag(OFFSET_SCREEN_LAYOUT)
    }

    pub fn set_screen_layout_size(&mut self, size: Option<ScreenLayoutSize>) {
        self.set_flag(OFFSET_SCREEN_LAYOUT, size);
    }

    pub fn screen_layout_long(&self) -> Option<ScreenLayoutLong> {
        self.get_flag(OFFSET_SCREEN_LAYOUT)
    }

    pub fn set_screen_layout_long(&mut self, long: Option<ScreenLayoutLong>) {
        self.set_flag(OFFSET_SCREEN_LAYOUT, long);
    }

    pub fn screen_layout_dir(&self) -> Option<ScreenLayoutDir> {
        self.get_flag(OFFSET_SCREEN_LAYOUT)
    }

    pub fn set_screen_layout_dir(&mut self, dir: Option<ScreenLayoutDir>) {
        self.set_flag(OFFSET_SCREEN_LAYOUT, dir);
    }

    pub fn ui_mode(&self) -> u8 {
        self.get_u8(OFFSET_UI_MODE)
    }

    pub fn set_ui_mode(&mut self, value: u8) {
        self.set_u8(OFFSET_UI_MODE, value);
    }

    pub fn ui_mode_type(&self) -> Option<UiModeType> {
        self.get_flag(OFFSET_UI_MODE)
    }

    pub fn set_ui_mode_type(&mut self, mode: Option<UiModeType>) {
        self.set_flag(OFFSET_UI_MODE, mode);
    }

    pub fn ui_mode_night(&self) -> Option<UiModeNight> {
        self.get_flag(OFFSET_UI_MODE)
    }

    pub fn set_ui_mode_night(&mut self, night: Option<UiModeNight>) {
        self.set_flag(OFFSET_UI_MODE, night);
    }

    pub fn smallest_screen_width_dp(&self) -> u16 {
        self.get_u16(OFFSET_SMALLEST_WIDTH_DP)
    }

    pub fn set_smallest_screen_width_dp(&mut self, value: u16) {
        self.set_u16(OFFSET_SMALLEST_WIDTH_DP, value);
    }

    pub fn screen_width_dp(&self) -> u16 {
        self.get_u16(OFFSET_SCREEN_WIDTH_DP)
    }

    pub fn set_screen_width_dp(&mut self, value: u16) {
        self.set_u16(OFFSET_SCREEN_WIDTH_DP, value);
    }

    pub fn screen_height_dp(&self) -> u16 {
        self.get_u16(OFFSET_SCREEN_HEIGHT_DP)
    }

    pub fn set_screen_height_dp(&mut self, value: u16) {
        self.set_u16(OFFSET_SCREEN_HEIGHT_DP, value);
    }

    pub fn screen_layout2(&self) -> u8 {
        self.get_u8(OFFSET_SCREEN_LAYOUT2)
    }

    pub fn set_screen_layout2(&mut self, value: u8) {
        self.set_u8(OFFSET_SCREEN_LAYOUT2, value);
    }

    pub fn screen_layout_round(&self) -> Option<ScreenLayoutRound> {
        self.get_flag(OFFSET_SCREEN_LAYOUT2)
    }

    pub fn set_screen_layout_round(&mut self, round: Option<ScreenLayoutRound>) {
        self.set_flag(OFFSET_SCREEN_LAYOUT2, round);
    }

    pub fn color_mode(&self) -> u8 {
        self.get_u8(OFFSET_COLOR_MODE)
    }

    pub fn set_color_mode(&mut self, value: u8) {
        self.set_u8(OFFSET_COLOR_MODE, value);
    }

    pub fn color_mode_wide(&self) -> Option<ColorModeWide> {
        self.get_flag(OFFSET_COLOR_MODE)
    }

    pub fn set_color_mode_wide(&mut self, wide: Option<ColorModeWide>) {
        self.set_flag(OFFSET_COLOR_MODE, wide);
    }

    pub fn color_mode_hdr(&self) -> Option<ColorModeHdr> {
        self.get_flag(OFFSET_COLOR_MODE)
    }

    pub fn set_color_mode_hdr(&mut self, hdr: Option<ColorModeHdr>) {
        self.set_flag(OFFSET_COLOR_MODE, hdr);
    }

    pub fn reserved_padding(&self) -> u16 {
        self.get_u16(OFFSET_RESERVED)
    }

    /// Bytes past the known layout, as stored.
    pub fn unknown_bytes(&self) -> &[u8] {
        self.values.get(OFFSET_UNKNOWN..).unwrap_or(&[])
    }

    /// Replaces the unknown tail, growing when `bytes` is longer.
    pub fn set_unknown_bytes_raw(&mut self, bytes: &[u8]) {
        let len = self.unknown_bytes().len().max(bytes.len());
        let mut tail = vec![0u8; len];
        tail[..bytes.len()].copy_from_slice(bytes);
        self.put_bytes(OFFSET_UNKNOWN, &tail);
    }

    /// Lowercase hex of the unknown tail without its trailing zeros, at most
    /// `limit` bytes. `None` when the tail is all zero.
    pub fn unknown_bytes_hex(&self, limit: Option<usize>) -> Option<String> {
        let bytes = trim_trailing_zeros(self.unknown_bytes());
        if bytes.is_empty() {
            return None;
        }
        let end = limit.map_or(bytes.len(), |limit| limit.min(bytes.len()));
        Some(hex::encode(&bytes[..end]))
    }

    /// Sets the unknown tail from hex. Empty, odd-length or non-hex input is
    /// ignored and `false` returned.
    pub fn set_unknown_bytes(&mut self, hex_bytes: &str) -> bool {
        if hex_bytes.is_empty() || hex_bytes.len() % 2 != 0 {
            return false;
        }
        match hex::decode(hex_bytes) {
            Ok(bytes) => {
                self.set_unknown_bytes_raw(&bytes);
                true
            }
            Err(_) => false,
        }
    }

    /// Qualifier string such as `"en-rUS-v21"`; empty for the default config.
    pub fn qualifiers(&self) -> String {
        qualifiers::build(self)
    }

    /// Applies a qualifier string on top of the current values.
    pub fn parse_qualifiers(&mut self, text: &str) -> QualifierParse {
        qualifiers::parse(self, text)
    }

    /// Applies a `language-region-script` string such as `"es-419"`.
    pub fn parse_locale(&mut self, text: &str) -> QualifierParse {
        qualifiers::parse_locale(self, text)
    }

    pub fn is_equal_qualifiers(&self, text: &str) -> bool {
        *self == ResConfig::parse(text)
    }

    fn compare_locale(&self, other: &ResConfig) -> Ordering {
        self.get_u16(OFFSET_REGION)
            .cmp(&other.get_u16(OFFSET_REGION))
            .then_with(|| self.get_u16(OFFSET_LANGUAGE).cmp(&other.get_u16(OFFSET_LANGUAGE)))
            .then_with(|| {
                let ours = i32::from_le_bytes(self.get_bytes(OFFSET_LOCALE_SCRIPT));
                let theirs = i32::from_le_bytes(other.get_bytes(OFFSET_LOCALE_SCRIPT));
                ours.cmp(&theirs)
            })
            .then_with(|| {
                let ours = i64::from_le_bytes(self.get_bytes(OFFSET_LOCALE_VARIANT));
                let theirs = i64::from_le_bytes(other.get_bytes(OFFSET_LOCALE_VARIANT));
                ours.cmp(&theirs)
            })
    }
}

impl PartialEq for ResConfig {
    /// Trailing zero bytes do not count, so the same qualifiers compare equal
    /// at any size.
    fn eq(&self, other: &Self) -> bool {
        trim_trailing_zeros(&self.values) == trim_trailing_zeros(&other.values)
    }
}

impl Eq for ResConfig {}

impl Hash for ResConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        trim_trailing_zeros(&self.values).hash(state);
    }
}

impl Ord for ResConfig {
    fn cmp(&self, other: &Self) -> Ordering {
        self.mnc()
            .cmp(&other.mnc())
            .then_with(|| self.mcc().cmp(&other.mcc()))
            .then_with(|| self.compare_locale(other))
            .then_with(|| self.gender_value().cmp(&other.gender_value()))
            .then_with(|| self.density_value().cmp(&other.density_value()))
            .then_with(|| self.touchscreen_value().cmp(&other.touchscreen_value()))
            .then_with(|| self.orientation_value().cmp(&other.orientation_value()))
            .then_with(|| self.navigation_value().cmp(&other.navigation_value()))
            .then_with(|| self.keyboard_value().cmp(&other.keyboard_value()))
            .then_with(|| self.input_flags().cmp(&other.input_flags()))
            .then_with(|| self.screen_width().cmp(&other.screen_width()))
            .then_with(|| self.screen_height().cmp(&other.screen_height()))
            .then_with(|| self.sdk_version().cmp(&other.sdk_version()))
            .then_with(|| self.screen_layout().cmp(&other.screen_layout()))
            .then_with(|| self.screen_layout2().cmp(&other.screen_layout2()))
            .then_with(|| self.color_mode().cmp(&other.color_mode()))
            .then_with(|| self.ui_mode().cmp(&other.ui_mode()))
            .then_with(|| {
                self.smallest_screen_width_dp()
                    .cmp(&other.smallest_screen_width_dp())
            })
            .then_with(|| self.screen_height_dp().cmp(&other.screen_height_dp()))
            .then_with(|| self.screen_width_dp().cmp(&other.screen_width_dp()))
            // Fields outside the ordering still separate unequal configs.
            .then_with(|| trim_trailing_zeros(&self.values).cmp(trim_trailing_zeros(&other.values)))
    }
}

impl PartialOrd for ResConfig {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qualifiers = self.qualifiers();
        if qualifiers.is_empty() {
            f.write_str("[DEFAULT]")
        } else {
            write!(f, "[{}]", qualifiers)
        }
    }
}

fn bytes_to_text(bytes: &[u8]) -> Option<String> {
    let used = trim_trailing_zeros(bytes);
    if used.is_empty() {
        return None;
    }
    Some(used.iter().map(|&b| b as char).collect())
}

fn text_to_bytes<const N: usize>(text: Option<&str>) -> [u8; N] {
    let mut out = [0u8; N];
    if let Some(text) = text {
        for (slot, byte) in out.iter_mut().zip(text.bytes()) {
            *slot = byte;
        }
    }
    out
}

fn trim_pad(text: &str) -> &str {
    text.trim_end_matches(LOCALE_PAD)
}

fn pad_end(mut text: String, min: usize) -> String {
    while text.len() < min {
        text.push(LOCALE_PAD);
    }
    text
}
