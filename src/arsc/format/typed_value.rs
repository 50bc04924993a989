//! Self-sized typed value (`Res_value`).
//!
//! # Layout
//! ```text
//! [u16 size][u8 res0][u8 type][i32 data][size - 8 trailing bytes]
//! ```
//!
//! Trailing bytes beyond the known layout are kept verbatim and never decoded.
//! A value whose type is STRING holds a back-reference into the table string pool.

use std::io::Write;
use byteorder::{LittleEndian, WriteBytesExt};
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::arsc::codec::cursor::BlockReader;
use crate::arsc::merge::{remap_resource_id, MergeOptions, SourceTable};
use crate::arsc::pool::{BackReference, PoolString, StringPool};
use crate::arsc::types::error::{ArscError, Result};
use crate::arsc::types::models::ValueType;

pub const VALUE_SIZE: usize = 8;

/// JSON mirror of a typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValueJson {
    pub value_type: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug)]
pub struct TypedValue {
    size: u16,
    res0: u8,
    value_type: ValueType,
    data: i32,
    trailing: Vec<u8>,
    /// Folded into a compact header; occupies no bytes of its own.
    detached: bool,
    string_ref: BackReference,
}

impl Default for TypedValue {
    fn default() -> Self {
        Self::new(ValueType::Null, 0)
    }
}

impl TypedValue {
    /// An unlinked value. STRING data is linked once the value is attached
    /// with [`TypedValue::link`].
    pub fn new(value_type: ValueType, data: i32) -> Self {
        Self {
            size: VALUE_SIZE as u16,
            res0: 0,
            value_type,
            data,
            trailing: Vec::new(),
            detached: false,
            string_ref: BackReference::default(),
        }
    }

    /// Decodes a value at the reader position.
    ///
    /// A declared size below 8 is widened to 8 when the input allows and
    /// rewritten as 8.
    ///
    /// # Errors
    /// - [`ArscError::Truncated`] if the input ends inside the value
    /// - [`ArscError::InvalidFormat`] for an unknown type byte
    pub fn read(reader: &mut BlockReader) -> Result<Self> {
        let start = reader.position();
        let declared = reader.peek_u16(0)?;
        let mut size = declared as usize;
        if size < VALUE_SIZE && reader.available() >= VALUE_SIZE {
            size = VALUE_SIZE;
        }
        if size < VALUE_SIZE {
            return Err(ArscError::Truncated {
                context: "typed value",
                expected: VALUE_SIZE as u64,
                found: reader.available() as u64,
            });
        }
        reader.read_u16()?;
        let res0 = reader.read_u8()?;
        let value_type = ValueType::try_from(reader.read_u8()?)?;
        let data = reader.read_i32()?;
        let trailing = reader.read_bytes(size - VALUE_SIZE, "typed value trailing bytes")?.to_vec();
        trace!(
            "Read typed value at {}: declared={}, type={}, data={:#010x}",
            start,
            declared,
            value_type,
            data
        );
        Ok(Self {
            size: size as u16,
            res0,
            value_type,
            data,
            trailing,
            detached: false,
            string_ref: BackReference::default(),
        })
    }

    /// A value folded into a compact header.
    pub(crate) fn from_compact(type_byte: u8, data: i32) -> Result<Self> {
        let mut value = Self::new(ValueType::try_from(type_byte)?, data);
        value.detached = true;
        Ok(value)
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn data(&self) -> i32 {
        self.data
    }

    /// Byte length this value occupies, 0 when folded into a compact header.
    pub fn size(&self) -> usize {
        if self.detached {
            return 0;
        }
        self.block_size()
    }

    pub(crate) fn block_size(&self) -> usize {
        VALUE_SIZE + self.trailing.len()
    }

    /// The `size` field as stored.
    pub fn declared_size(&self) -> u16 {
        self.size
    }

    pub fn res0(&self) -> u8 {
        self.res0
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub(crate) fn set_detached(&mut self, detached: bool) {
        self.detached = detached;
        if detached {
            self.trailing.clear();
        }
        self.size = VALUE_SIZE as u16;
    }

    /// NULL type with zero data: the value of a freshly created entry.
    pub fn is_undefined(&self) -> bool {
        self.value_type == ValueType::Null && self.data == 0
    }

    /// Updates type and data together, moving the string back-reference.
    pub fn set(&mut self, value_type: ValueType, data: i32, strings: &mut dyn StringPool) {
        if value_type == self.value_type && data == self.data {
            return;
        }
        self.string_ref.unlink(strings);
        self.value_type = value_type;
        self.data = data;
        self.link(strings);
    }

    pub fn set_value_type(&mut self, value_type: ValueType, strings: &mut dyn StringPool) {
        self.set(value_type, self.data, strings);
    }

    pub fn set_data(&mut self, data: i32, strings: &mut dyn StringPool) {
        self.set(self.value_type, data, strings);
    }

    /// Registers STRING data with the table pool; other types hold no link.
    pub fn link(&mut self, strings: &mut dyn StringPool) {
        let index = if self.value_type == ValueType::String && self.data >= 0 {
            Some(self.data as u32)
        } else {
            None
        };
        self.string_ref.relink(strings, index);
    }

    pub fn unlink(&mut self, strings: &mut dyn StringPool) {
        self.string_ref.unlink(strings);
    }

    pub fn is_linked(&self) -> bool {
        self.string_ref.is_linked()
    }

    /// Pool entry of a STRING value.
    pub fn string_value<'p>(&self, strings: &'p dyn StringPool) -> Option<&'p PoolString> {
        if self.value_type != ValueType::String || self.data < 0 {
            return None;
        }
        strings.get(self.data as u32)
    }

    /// Interns `value` and stores it as STRING.
    pub fn set_string(&mut self, value: &PoolString, strings: &mut dyn StringPool) {
        let index = strings.get_or_create(value);
        self.set(ValueType::String, index as i32, strings);
    }

    pub fn set_boolean(&mut self, value: bool, strings: &mut dyn StringPool) {
        self.set(ValueType::Boolean, if value { -1 } else { 0 }, strings);
    }

    /// Copies a value from another table, re-interning STRING text in the
    /// destination pool.
    pub fn merge(&mut self, other: &TypedValue, source: &dyn StringPool, target: &mut dyn StringPool) {
        self.merge_layout(other);
        if other.value_type == ValueType::String {
            self.merge_string(other, source, target);
        } else {
            self.set(other.value_type, other.data, target);
        }
    }

    /// Like [`TypedValue::merge`] but remaps reference ids into the destination table.
    pub fn merge_with_name(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &TypedValue,
        source: &SourceTable,
        target: &mut dyn StringPool,
    ) {
        self.merge_layout(other);
        let value_type = other.value_type;
        if value_type == ValueType::String {
            if let Some(text) = self.merge_string(other, source.pools.strings, target) {
                options.on_string_merged(&text);
            }
        } else if value_type.is_reference() {
            let id = remap_resource_id(options, source.resolver, other.data as u32);
            self.set(value_type, id as i32, target);
        } else {
            self.set(value_type, other.data, target);
        }
    }

    fn merge_layout(&mut self, other: &TypedValue) {
        if other.size != 0 && !self.detached && !other.detached {
            self.size = other.size;
            self.trailing = other.trailing.clone();
        }
        self.res0 = other.res0;
    }

    fn merge_string(
        &mut self,
        other: &TypedValue,
        source: &dyn StringPool,
        target: &mut dyn StringPool,
    ) -> Option<String> {
        match other.string_value(source) {
            Some(text) => {
                self.set_string(text, target);
                Some(text.text.clone())
            }
            None => {
                warn!("Merge: string index {} missing from source pool, copied raw", other.data);
                self.set(ValueType::String, other.data, target);
                None
            }
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.detached {
            return Ok(());
        }
        self.write_block_to(writer)
    }

    /// Writes the value block even when the value is folded into a header.
    pub(crate) fn write_block_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<LittleEndian>(self.size)?;
        writer.write_u8(self.res0)?;
        writer.write_u8(self.value_type.byte())?;
        writer.write_i32::<LittleEndian>(self.data)?;
        writer.write_all(&self.trailing)?;
        Ok(())
    }

    pub fn to_json(&self, strings: &dyn StringPool) -> TypedValueJson {
        let data = match self.value_type {
            ValueType::Boolean => Value::Bool(self.data != 0),
            ValueType::String => match self.string_value(strings) {
                Some(text) => Value::String(text.text.clone()),
                None => Value::Null,
            },
            _ => Value::from(self.data),
        };
        TypedValueJson {
            value_type: self.value_type.name().to_string(),
            data,
        }
    }

    /// # Errors
    /// Returns [`ArscError::InvalidFormat`] for an unknown type name or
    /// data that does not fit the type.
    pub fn from_json(&mut self, json: &TypedValueJson, strings: &mut dyn StringPool) -> Result<()> {
        let value_type = ValueType::from_name(&json.value_type).ok_or_else(|| {
            ArscError::InvalidFormat(format!("Unknown value type: {}", json.value_type))
        })?;
        match (value_type, &json.data) {
            (ValueType::String, Value::String(text)) => {
                self.set_string(&PoolString::plain(text.as_str()), strings);
            }
            (ValueType::Boolean, Value::Bool(flag)) => self.set_boolean(*flag, strings),
            (_, Value::Number(number)) => {
                let data = number.as_i64().ok_or_else(|| {
                    ArscError::InvalidFormat(format!("Value data out of range: {}", number))
                })?;
                self.set(value_type, data as i32, strings);
            }
            (_, Value::Null) => self.set(value_type, 0, strings),
            (_, other) => {
                return Err(ArscError::InvalidFormat(format!(
                    "Data {} does not fit value type {}",
                    other, value_type
                )))
            }
        }
        Ok(())
    }
}
