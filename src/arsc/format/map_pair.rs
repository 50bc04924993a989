//! Name/value pair of a compound entry (`ResTable_map`).
//!
//! The name is a resource id (style items, attribute enum/flag symbols),
//! an array index packed as `0x01000000 | index`, or an [`AttributeType`] id.

use std::cmp::Ordering;
use std::io::Write;
use byteorder::{LittleEndian, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::arsc::codec::cursor::BlockReader;
use crate::arsc::merge::{is_resource_id, remap_resource_id, MergeOptions, ResourceResolver, SourceTable};
use crate::arsc::pool::StringPool;
use crate::arsc::types::error::Result;
use crate::arsc::types::models::{AttributeDataFormat, AttributeType, ValueType};
use super::typed_value::{TypedValue, TypedValueJson};

pub const ARRAY_INDEX_BASE: u32 = 0x0100_0000;

/// JSON mirror of a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPairJson {
    pub name: u32,
    #[serde(flatten)]
    pub value: TypedValueJson,
}

#[derive(Debug, Default)]
pub struct MapPair {
    name: u32,
    value: TypedValue,
}

impl MapPair {
    pub fn new(name: u32, value: TypedValue) -> Self {
        Self { name, value }
    }

    /// An array item at `index`.
    pub fn array_item(index: u16, value: TypedValue) -> Self {
        Self::new(ARRAY_INDEX_BASE | index as u32, value)
    }

    pub fn read(reader: &mut BlockReader) -> Result<Self> {
        let name = reader.read_i32()? as u32;
        let value = TypedValue::read(reader)?;
        Ok(Self { name, value })
    }

    pub fn name(&self) -> u32 {
        self.name
    }

    pub fn set_name(&mut self, name: u32) {
        self.name = name;
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut TypedValue {
        &mut self.value
    }

    pub fn size(&self) -> usize {
        4 + self.value.size()
    }

    /// Index of an array item, `None` when the name is not an array index.
    pub fn array_index(&self) -> Option<u16> {
        match self.name & 0xffff_0000 {
            0x0100_0000 | 0x0200_0000 => Some((self.name & 0xffff) as u16),
            _ => None,
        }
    }

    pub fn set_array_index(&mut self, index: u16) {
        self.name = ARRAY_INDEX_BASE | index as u32;
    }

    pub fn attribute_type(&self) -> Option<AttributeType> {
        AttributeType::value_of(self.name)
    }

    /// Format names of a FORMATS pair, e.g. `"string|integer"`.
    ///
    /// `None` for any other pair. An empty string when no format bit is set.
    pub fn decode_data_as_attr_formats(&self) -> Option<String> {
        if self.attribute_type() != Some(AttributeType::Formats) {
            return None;
        }
        let data = self.value.data() as u32 & 0xff;
        if data == 0 {
            return Some(String::new());
        }
        AttributeDataFormat::decode_value_types(data)
            .and_then(|formats| AttributeDataFormat::join_names(&formats))
    }

    /// Display name: attribute role, resolved resource name, or the
    /// resolver's unknown-name form.
    pub fn decode_name(&self, resolver: &dyn ResourceResolver) -> Option<String> {
        if let Some(attribute) = self.attribute_type() {
            return Some(attribute.name().to_string());
        }
        if self.name == 0 {
            return None;
        }
        if is_resource_id(self.name) {
            if let Some(found) = resolver.resolve(self.name) {
                if let Some(name) = found.name {
                    return Some(format!("{}/{}", found.type_name, name));
                }
            }
        }
        Some(resolver.decode_unknown_name(self.name))
    }

    pub fn link(&mut self, strings: &mut dyn StringPool) {
        self.value.link(strings);
    }

    pub fn unlink(&mut self, strings: &mut dyn StringPool) {
        self.value.unlink(strings);
    }

    pub fn merge(&mut self, other: &MapPair, source: &dyn StringPool, target: &mut dyn StringPool) {
        self.value.merge(&other.value, source, target);
        self.name = other.name;
    }

    /// Merges the value and remaps a resource-id name into the destination table.
    pub fn merge_with_name(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &MapPair,
        source: &SourceTable,
        target: &mut dyn StringPool,
    ) {
        self.value.merge_with_name(options, &other.value, source, target);
        self.name = remap_resource_id(options, source.resolver, other.name);
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.name)?;
        self.value.write_to(writer)
    }

    pub fn to_json(&self, strings: &dyn StringPool) -> MapPairJson {
        MapPairJson {
            name: self.name,
            value: self.value.to_json(strings),
        }
    }

    pub fn from_json(json: &MapPairJson, strings: &mut dyn StringPool) -> Result<Self> {
        let mut value = TypedValue::new(ValueType::Null, 0);
        value.from_json(&json.value, strings)?;
        Ok(Self::new(json.name, value))
    }

    /// Orders by name id as a signed value, with 0 sorting last.
    pub fn compare_names(&self, other: &MapPair) -> Ordering {
        match (self.name, other.name) {
            (0, 0) => Ordering::Equal,
            (0, _) => Ordering::Greater,
            (_, 0) => Ordering::Less,
            (a, b) => (a as i32).cmp(&(b as i32)),
        }
    }
}
