//! Closed enumerations shared by the value and entry layers.
//!
//! This module defines:
//! - [`ValueType`]: the one-byte type tag of every typed value
//! - [`AttributeType`]: the well-known name ids used inside `attr` and `plurals` maps
//! - [`AttributeDataFormat`]: the format bitmask carried by an attribute's FORMATS pair

use super::error::{ArscError, Result};

/// Type tag of a typed value (`Res_value::dataType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null = 0x00,
    Reference = 0x01,
    Attribute = 0x02,
    String = 0x03,
    Float = 0x04,
    Dimension = 0x05,
    Fraction = 0x06,
    DynamicReference = 0x07,
    DynamicAttribute = 0x08,
    Dec = 0x10,
    Hex = 0x11,
    Boolean = 0x12,
    ColorArgb8 = 0x1c,
    ColorRgb8 = 0x1d,
    ColorArgb4 = 0x1e,
    ColorRgb4 = 0x1f,
}

impl ValueType {
    pub const ALL: [ValueType; 16] = [
        ValueType::Null,
        ValueType::Reference,
        ValueType::Attribute,
        ValueType::String,
        ValueType::Float,
        ValueType::Dimension,
        ValueType::Fraction,
        ValueType::DynamicReference,
        ValueType::DynamicAttribute,
        ValueType::Dec,
        ValueType::Hex,
        ValueType::Boolean,
        ValueType::ColorArgb8,
        ValueType::ColorRgb8,
        ValueType::ColorArgb4,
        ValueType::ColorRgb4,
    ];

    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Upper-case constant name, used by the JSON mirror.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Null => "NULL",
            ValueType::Reference => "REFERENCE",
            ValueType::Attribute => "ATTRIBUTE",
            ValueType::String => "STRING",
            ValueType::Float => "FLOAT",
            ValueType::Dimension => "DIMENSION",
            ValueType::Fraction => "FRACTION",
            ValueType::DynamicReference => "DYNAMIC_REFERENCE",
            ValueType::DynamicAttribute => "DYNAMIC_ATTRIBUTE",
            ValueType::Dec => "DEC",
            ValueType::Hex => "HEX",
            ValueType::Boolean => "BOOLEAN",
            ValueType::ColorArgb8 => "COLOR_ARGB8",
            ValueType::ColorRgb8 => "COLOR_RGB8",
            ValueType::ColorArgb4 => "COLOR_ARGB4",
            ValueType::ColorRgb4 => "COLOR_RGB4",
        }
    }

    /// Case-insensitive lookup by constant name.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        Self::ALL.iter().copied().find(|t| t.name() == upper)
    }

    /// Resource type name a value of this type belongs to (`"integer"`, `"color"`, ...).
    /// Empty for NULL.
    pub fn type_name(self) -> &'static str {
        match self {
            ValueType::Null => "",
            ValueType::String => "string",
            ValueType::Float => "float",
            ValueType::Dimension => "dimension",
            ValueType::Fraction => "fraction",
            ValueType::Dec | ValueType::Hex => "integer",
            ValueType::Boolean => "bool",
            _ if self.is_color() => "color",
            _ => "reference",
        }
    }

    pub fn is_color(self) -> bool {
        matches!(
            self,
            ValueType::ColorArgb8 | ValueType::ColorRgb8 | ValueType::ColorArgb4 | ValueType::ColorRgb4
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(self, ValueType::Dec | ValueType::Hex)
    }

    /// True for the four reference forms whose data is a resource id.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            ValueType::Reference
                | ValueType::Attribute
                | ValueType::DynamicReference
                | ValueType::DynamicAttribute
        )
    }
}

impl TryFrom<u8> for ValueType {
    type Error = ArscError;
    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.byte() == value)
            .ok_or_else(|| ArscError::InvalidFormat(format!("Unknown value type: {:#04x}", value)))
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Well-known map names of `attr` and `plurals` entries.
///
/// All ids live in package 0x01 with type 0x00, so they never collide
/// with a real resource id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeType {
    Formats = 0x0100_0000,
    Min = 0x0100_0001,
    Max = 0x0100_0002,
    L10n = 0x0100_0003,
    Other = 0x0100_0004,
    Zero = 0x0100_0005,
    One = 0x0100_0006,
    Two = 0x0100_0007,
    Few = 0x0100_0008,
    Many = 0x0100_0009,
}

impl AttributeType {
    pub const ALL: [AttributeType; 10] = [
        AttributeType::Formats,
        AttributeType::Min,
        AttributeType::Max,
        AttributeType::L10n,
        AttributeType::Other,
        AttributeType::Zero,
        AttributeType::One,
        AttributeType::Two,
        AttributeType::Few,
        AttributeType::Many,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn value_of(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.id() == id)
    }

    /// Plural quantity categories occupy sub-ids 4 to 9.
    pub fn is_plural(self) -> bool {
        (4..=9).contains(&(self.id() & 0xffff))
    }

    pub fn name(self) -> &'static str {
        match self {
            AttributeType::Formats => "formats",
            AttributeType::Min => "min",
            AttributeType::Max => "max",
            AttributeType::L10n => "l10n",
            AttributeType::Other => "other",
            AttributeType::Zero => "zero",
            AttributeType::One => "one",
            AttributeType::Two => "two",
            AttributeType::Few => "few",
            AttributeType::Many => "many",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|t| t.name() == lower)
    }
}

impl TryFrom<u32> for AttributeType {
    type Error = ArscError;
    fn try_from(value: u32) -> Result<Self> {
        Self::value_of(value).ok_or_else(|| {
            ArscError::InvalidFormat(format!("Unknown attribute type: {:#010x}", value))
        })
    }
}

/// One bit of the format mask stored in an attribute's FORMATS pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeDataFormat {
    Reference,
    String,
    Integer,
    Bool,
    Color,
    Float,
    Dimension,
    Fraction,
    Any,
    Enum,
    Flag,
}

const VALUE_FORMATS: [AttributeDataFormat; 9] = [
    AttributeDataFormat::Reference,
    AttributeDataFormat::String,
    AttributeDataFormat::Integer,
    AttributeDataFormat::Bool,
    AttributeDataFormat::Color,
    AttributeDataFormat::Float,
    AttributeDataFormat::Dimension,
    AttributeDataFormat::Fraction,
    AttributeDataFormat::Any,
];

const BAG_FORMATS: [AttributeDataFormat; 2] = [AttributeDataFormat::Enum, AttributeDataFormat::Flag];

impl AttributeDataFormat {
    pub fn mask(self) -> u32 {
        match self {
            AttributeDataFormat::Reference => 1 << 0,
            AttributeDataFormat::String => 1 << 1,
            AttributeDataFormat::Integer => 1 << 2,
            AttributeDataFormat::Bool => 1 << 3,
            AttributeDataFormat::Color => 1 << 4,
            AttributeDataFormat::Float => 1 << 5,
            AttributeDataFormat::Dimension => 1 << 6,
            AttributeDataFormat::Fraction => 1 << 7,
            AttributeDataFormat::Any => 0x0000_ffff,
            AttributeDataFormat::Enum => 1 << 16,
            AttributeDataFormat::Flag => 1 << 17,
        }
    }

    /// Typed-value types an attribute of this format accepts.
    pub fn value_types(self) -> &'static [ValueType] {
        match self {
            AttributeDataFormat::Reference => &[
                ValueType::Reference,
                ValueType::Attribute,
                ValueType::DynamicReference,
                ValueType::DynamicAttribute,
                ValueType::Null,
            ],
            AttributeDataFormat::String => &[ValueType::String],
            AttributeDataFormat::Integer | AttributeDataFormat::Enum => {
                &[ValueType::Dec, ValueType::Hex]
            }
            AttributeDataFormat::Flag => &[ValueType::Hex, ValueType::Dec],
            AttributeDataFormat::Bool => &[ValueType::Boolean],
            AttributeDataFormat::Color => &[
                ValueType::ColorArgb8,
                ValueType::ColorRgb8,
                ValueType::ColorRgb4,
                ValueType::ColorArgb4,
            ],
            AttributeDataFormat::Float => &[ValueType::Float],
            AttributeDataFormat::Dimension => &[ValueType::Dimension],
            AttributeDataFormat::Fraction => &[ValueType::Fraction],
            AttributeDataFormat::Any => &ValueType::ALL,
        }
    }

    pub fn contains(self, value_type: ValueType) -> bool {
        self.value_types().contains(&value_type)
    }

    /// True when every bit of this format's mask is set in `value`.
    pub fn matches(self, value: u32) -> bool {
        let mask = self.mask();
        value & mask == mask
    }

    pub fn name(self) -> &'static str {
        match self {
            AttributeDataFormat::Reference => "reference",
            AttributeDataFormat::String => "string",
            AttributeDataFormat::Integer => "integer",
            AttributeDataFormat::Bool => "bool",
            AttributeDataFormat::Color => "color",
            AttributeDataFormat::Float => "float",
            AttributeDataFormat::Dimension => "dimension",
            AttributeDataFormat::Fraction => "fraction",
            AttributeDataFormat::Any => "any",
            AttributeDataFormat::Enum => "enum",
            AttributeDataFormat::Flag => "flag",
        }
    }

    /// Extracts the value formats present in `data`.
    ///
    /// A mask matching one format exactly (including ANY) yields that format
    /// alone. Returns `None` when no format bit is set.
    pub fn decode_value_types(data: u32) -> Option<Vec<AttributeDataFormat>> {
        let mut results = Vec::new();
        for format in VALUE_FORMATS {
            let mask = format.mask();
            if mask == data {
                return Some(vec![format]);
            }
            if format == AttributeDataFormat::Any {
                continue;
            }
            if data & mask == mask {
                results.push(format);
            }
        }
        if results.is_empty() {
            None
        } else {
            Some(results)
        }
    }

    /// Joins format names with `|`, the way `attr` declarations spell them.
    ///
    /// ENUM and FLAG are skipped; ANY short-circuits to `"any"`.
    pub fn join_names(formats: &[AttributeDataFormat]) -> Option<String> {
        if formats.is_empty() {
            return None;
        }
        let mut builder = String::new();
        let mut appended = 0u32;
        for &format in formats {
            if matches!(format, AttributeDataFormat::Enum | AttributeDataFormat::Flag) {
                continue;
            }
            if format == AttributeDataFormat::Any {
                return Some(AttributeDataFormat::Any.name().to_string());
            }
            let mask = format.mask();
            if appended & mask == mask {
                continue;
            }
            if !builder.is_empty() {
                builder.push('|');
            }
            builder.push_str(format.name());
            appended |= mask;
        }
        Some(builder)
    }

    /// Bitwise-OR reduction of the masks.
    pub fn sum(formats: &[AttributeDataFormat]) -> u32 {
        formats.iter().fold(0, |acc, f| acc | f.mask())
    }

    /// Parses a `string|integer` style declaration. Unknown names are skipped.
    pub fn parse_value_types(text: &str) -> Option<Vec<AttributeDataFormat>> {
        let results: Vec<_> = text
            .trim()
            .split('|')
            .filter_map(Self::from_value_type_name)
            .collect();
        if results.is_empty() {
            None
        } else {
            Some(results)
        }
    }

    pub fn value_of(mask: u32) -> Option<Self> {
        VALUE_FORMATS.iter().copied().find(|f| f.mask() == mask)
    }

    /// ENUM or FLAG, whichever bag bit is set in `data`.
    pub fn type_of_bag(data: u32) -> Option<Self> {
        BAG_FORMATS.iter().copied().find(|f| f.matches(data))
    }

    pub fn from_value_type_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        VALUE_FORMATS.iter().copied().find(|f| f.name() == lower)
    }

    pub fn from_bag_type_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        BAG_FORMATS.iter().copied().find(|f| f.name() == lower)
    }

    /// True when any of `formats` accepts `value_type`.
    pub fn any_contains(formats: &[AttributeDataFormat], value_type: ValueType) -> bool {
        formats.iter().any(|f| f.contains(value_type))
    }
}

impl std::fmt::Display for AttributeDataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
