//! Entry header shared by scalar and compound entries.
//!
//! # Layout
//! ```text
//! normal:  [u16 size][u8 flags][u8 res][i32 key]                 (8 bytes)
//! map:     [u16 size][u8 flags][u8 res][i32 key][i32 parent][i32 count]  (16 bytes)
//! compact: [u16 key ][u8 flags][u8 type][i32 data]               (8 bytes)
//! ```
//!
//! A declared size above the layout keeps its extra bytes verbatim.

use std::io::Write;
use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::arsc::codec::cursor::BlockReader;
use crate::arsc::pool::{BackReference, PoolString, SourcePools, StringPool};
use crate::arsc::types::error::{ArscError, Result};

pub const SCALAR_HEADER_SIZE: usize = 8;
pub const MAP_HEADER_SIZE: usize = 16;

const OFFSET_SIZE: usize = 0;
const OFFSET_FLAGS: usize = 2;
const OFFSET_TYPE: usize = 3;
const OFFSET_KEY: usize = 4;
const OFFSET_PARENT: usize = 8;
const OFFSET_COUNT: usize = 12;

pub const FLAG_COMPLEX: u8 = 0x01;
pub const FLAG_PUBLIC: u8 = 0x02;
pub const FLAG_WEAK: u8 = 0x04;
pub const FLAG_COMPACT: u8 = 0x08;

/// JSON mirror of a header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueHeaderJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_weak: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_complex: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug)]
pub struct ValueHeader {
    bytes: Vec<u8>,
    read_size: u16,
    name_ref: BackReference,
}

impl ValueHeader {
    /// A scalar header with no name (key -1).
    pub fn new_scalar() -> Self {
        Self::with_size(SCALAR_HEADER_SIZE)
    }

    /// A compound header: complex flag set, no parent, no values.
    pub fn new_map() -> Self {
        let mut header = Self::with_size(MAP_HEADER_SIZE);
        header.set_complex(true);
        header
    }

    fn with_size(size: usize) -> Self {
        let mut header = Self {
            bytes: vec![0; size],
            read_size: 0,
            name_ref: BackReference::default(),
        };
        header.write_size();
        header.put_i32(OFFSET_KEY, -1);
        header
    }

    /// Decodes a header whose layout occupies at least `min_size` bytes.
    ///
    /// A non-compact header is re-read with its declared size so trailing
    /// bytes survive a round trip.
    ///
    /// # Errors
    /// Returns [`ArscError::Truncated`] when the declared size runs past the input.
    pub fn read(reader: &mut BlockReader, min_size: usize) -> Result<Self> {
        let start = reader.position();
        let mut bytes = vec![0u8; min_size];
        reader.read_fully(&mut bytes, "value header")?;
        let flags = bytes[OFFSET_FLAGS];
        let mut read_size = 0;
        if flags & FLAG_COMPACT == 0 {
            reader.seek(start)?;
            read_size = reader.peek_u16(0)?;
            let size = (read_size as usize).max(min_size);
            bytes.resize(size, 0);
            reader.read_fully(&mut bytes, "value header")?;
        }
        trace!(
            "Read value header at {}: size={}, declared={}, flags={:#04x}",
            start,
            bytes.len(),
            read_size,
            flags
        );
        Ok(Self {
            bytes,
            read_size,
            name_ref: BackReference::default(),
        })
    }

    /// Actual byte length.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size declared by the stream this header was read from, 0 when built in memory.
    pub fn read_size(&self) -> u16 {
        self.read_size
    }

    fn write_size(&mut self) {
        let size = self.bytes.len() as u16;
        self.bytes[OFFSET_SIZE..OFFSET_SIZE + 2].copy_from_slice(&size.to_le_bytes());
    }

    fn flag(&self, mask: u8) -> bool {
        self.bytes[OFFSET_FLAGS] & mask != 0
    }

    fn put_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.bytes[OFFSET_FLAGS] |= mask;
        } else {
            self.bytes[OFFSET_FLAGS] &= !mask;
        }
    }

    pub fn is_complex(&self) -> bool {
        self.flag(FLAG_COMPLEX)
    }

    pub fn set_complex(&mut self, complex: bool) {
        self.put_flag(FLAG_COMPLEX, complex);
    }

    pub fn is_public(&self) -> bool {
        self.flag(FLAG_PUBLIC)
    }

    pub fn set_public(&mut self, public: bool) {
        self.put_flag(FLAG_PUBLIC, public);
    }

    pub fn is_weak(&self) -> bool {
        self.flag(FLAG_WEAK)
    }

    pub fn set_weak(&mut self, weak: bool) {
        self.put_flag(FLAG_WEAK, weak);
    }

    pub fn is_compact(&self) -> bool {
        self.flag(FLAG_COMPACT)
    }

    /// Switches between the normal and compact layouts, keeping the key.
    ///
    /// Only scalar entries may go compact, through
    /// [`ScalarEntry::set_compact`](super::table_entry::ScalarEntry::set_compact).
    pub(crate) fn set_compact(&mut self, compact: bool) -> Result<()> {
        if compact == self.is_compact() {
            return Ok(());
        }
        let key = self.key();
        if compact {
            if self.is_complex() {
                return Err(ArscError::InvalidFormat(
                    "Compound entry header cannot be compact".to_string(),
                ));
            }
            if !(0..=0xffff).contains(&key) {
                return Err(ArscError::InvalidFormat(format!(
                    "Key {} does not fit a compact header",
                    key
                )));
            }
            self.bytes.truncate(SCALAR_HEADER_SIZE);
            self.put_flag(FLAG_COMPACT, true);
            self.bytes[0..2].copy_from_slice(&(key as u16).to_le_bytes());
        } else {
            self.expand_compact();
        }
        Ok(())
    }

    fn expand_compact(&mut self) {
        let key = self.key();
        self.put_flag(FLAG_COMPACT, false);
        self.bytes[OFFSET_TYPE] = 0;
        self.write_size();
        self.put_i32(OFFSET_KEY, key);
    }

    /// Spec-string index of the entry name, -1 when unnamed.
    pub fn key(&self) -> i32 {
        if self.is_compact() {
            return u16::from_le_bytes([self.bytes[0], self.bytes[1]]) as i32;
        }
        self.get_i32(OFFSET_KEY)
    }

    /// Points the header at another spec string, moving its back-reference.
    pub fn set_key(&mut self, key: i32, spec: &mut dyn StringPool) {
        if key == self.key() && (key < 0 || self.name_ref.is_linked()) {
            return;
        }
        self.name_ref.unlink(spec);
        self.write_key(key);
        self.link_name(spec);
    }

    /// A compact header falls back to the normal layout for keys outside u16.
    fn write_key(&mut self, key: i32) {
        if self.is_compact() {
            if (0..=0xffff).contains(&key) {
                self.bytes[0..2].copy_from_slice(&(key as u16).to_le_bytes());
                return;
            }
            debug!("Key {} does not fit a compact header, expanding", key);
            self.expand_compact();
        }
        self.put_i32(OFFSET_KEY, key);
    }

    /// Registers the current key with the spec pool.
    pub fn link_name(&mut self, spec: &mut dyn StringPool) {
        let key = self.key();
        let index = if key >= 0 { Some(key as u32) } else { None };
        self.name_ref.relink(spec, index);
    }

    /// Drops the back-reference; called when the owning entry goes away.
    pub fn unlink_name(&mut self, spec: &mut dyn StringPool) {
        self.name_ref.unlink(spec);
    }

    pub fn is_name_linked(&self) -> bool {
        self.name_ref.is_linked()
    }

    /// Takes over a relation already registered for `key`.
    pub(crate) fn adopt_name(&mut self, key: i32, reference: BackReference, spec: &mut dyn StringPool) {
        self.name_ref.unlink(spec);
        self.write_key(key);
        self.name_ref = reference;
    }

    pub fn name<'p>(&self, spec: &'p dyn StringPool) -> Option<&'p str> {
        let key = self.key();
        if key < 0 {
            return None;
        }
        spec.get(key as u32).map(|s| s.text.as_str())
    }

    /// Interns `name` in the spec pool and points the key at it.
    /// `None` clears the name.
    pub fn set_name(&mut self, name: Option<&str>, spec: &mut dyn StringPool) {
        let key = match name {
            Some(name) => spec.get_or_create(&PoolString::plain(name)) as i32,
            None => -1,
        };
        self.set_key(key, spec);
    }

    /// Extra bytes of a wide scalar header are not map fields.
    fn has_map_fields(&self) -> bool {
        self.is_complex() && self.bytes.len() >= OFFSET_COUNT + 4
    }

    /// Style parent of a compound header; 0 for scalar headers.
    pub fn parent_id(&self) -> u32 {
        if !self.has_map_fields() {
            return 0;
        }
        self.get_i32(OFFSET_PARENT) as u32
    }

    pub fn set_parent_id(&mut self, id: u32) {
        if self.has_map_fields() {
            self.put_i32(OFFSET_PARENT, id as i32);
        }
    }

    pub fn values_count(&self) -> i32 {
        if !self.has_map_fields() {
            return 0;
        }
        self.get_i32(OFFSET_COUNT)
    }

    pub(crate) fn set_values_count(&mut self, count: i32) {
        if self.has_map_fields() {
            self.put_i32(OFFSET_COUNT, count);
        }
    }

    /// Value type byte folded into a compact header.
    pub(crate) fn compact_type(&self) -> u8 {
        self.bytes[OFFSET_TYPE]
    }

    pub(crate) fn compact_data(&self) -> i32 {
        self.get_i32(OFFSET_KEY)
    }

    /// Copies flags and the entry name from another table's header.
    ///
    /// The name is re-interned by text, so the two spec pools need not agree on indexes.
    pub fn merge(&mut self, other: &ValueHeader, source: SourcePools, spec: &mut dyn StringPool) {
        self.set_complex(other.is_complex());
        self.set_weak(other.is_weak());
        self.set_public(other.is_public());
        self.set_name(other.name(source.spec), spec);
    }

    /// Copies the map fields (parent id and value count) of a compound header.
    pub(crate) fn merge_map_fields(&mut self, other: &ValueHeader) {
        self.set_parent_id(other.parent_id());
        self.set_values_count(other.values_count());
    }

    /// Raw bytes as written. For compact headers the type and data bytes are
    /// patched in by the owning scalar entry.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.bytes)?;
        Ok(())
    }

    pub(crate) fn write_compact_to<W: Write>(&self, writer: &mut W, value_type: u8, data: i32) -> Result<()> {
        writer.write_all(&self.bytes[..OFFSET_TYPE])?;
        writer.write_u8(value_type)?;
        writer.write_i32::<LittleEndian>(data)?;
        Ok(())
    }

    pub fn to_json(&self, spec: &dyn StringPool) -> ValueHeaderJson {
        let parent = self.parent_id();
        ValueHeaderJson {
            entry_name: self.name(spec).map(str::to_string),
            is_weak: self.is_weak(),
            is_public: self.is_public(),
            is_complex: self.is_complex(),
            parent_id: if parent != 0 { Some(parent) } else { None },
        }
    }

    pub fn from_json(&mut self, json: &ValueHeaderJson, spec: &mut dyn StringPool) {
        self.set_weak(json.is_weak);
        self.set_public(json.is_public);
        self.set_name(json.entry_name.as_deref(), spec);
        if self.is_complex() {
            self.set_parent_id(json.parent_id.unwrap_or(0));
        }
    }

    fn get_i32(&self, offset: usize) -> i32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.bytes[offset..offset + 4]);
        i32::from_le_bytes(raw)
    }

    fn put_i32(&mut self, offset: usize, value: i32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}
