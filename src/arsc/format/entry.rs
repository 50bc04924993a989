//! A resource slot: an optional table entry plus its position in the table.
//!
//! A null slot (no table entry) can still hold a name. The name is kept as a
//! pending spec reference and handed to the header of the first table entry
//! that is attached.

use std::io::Write;
use log::debug;

use crate::arsc::codec::cursor::BlockReader;
use crate::arsc::merge::{MergeOptions, SourceTable};
use crate::arsc::pool::{BackReference, PoolString, SourcePools, StringPool, TablePools};
use crate::arsc::types::error::{ArscError, Result};
use crate::arsc::types::models::ValueType;
use super::table_entry::{is_array_type, ScalarEntry, TableEntry, TableEntryJson};
use super::typed_value::TypedValue;

#[derive(Debug)]
pub struct Entry {
    package_id: u8,
    type_id: u8,
    entry_id: u16,
    type_name: Option<String>,
    table_entry: Option<TableEntry>,
    pending_key: i32,
    pending_name: BackReference,
}

impl Entry {
    /// A null entry at `package_id`/`type_id`/`entry_id`.
    pub fn new(package_id: u8, type_id: u8, entry_id: u16) -> Self {
        Self {
            package_id,
            type_id,
            entry_id,
            type_name: None,
            table_entry: None,
            pending_key: -1,
            pending_name: BackReference::default(),
        }
    }

    /// Names the type slot this entry lives in, e.g. `"string"` or `"array"`.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn resource_id(&self) -> u32 {
        (self.package_id as u32) << 24 | (self.type_id as u32) << 16 | self.entry_id as u32
    }

    pub fn entry_id(&self) -> u16 {
        self.entry_id
    }

    /// Decodes a table entry at the reader position and attaches it.
    ///
    /// # Errors
    /// Any decode error of [`TableEntry::read`].
    pub fn read(&mut self, reader: &mut BlockReader, pools: &mut TablePools) -> Result<()> {
        let mut table_entry = TableEntry::read(reader)?;
        table_entry.link(pools);
        self.set_table_entry(Some(table_entry), pools);
        Ok(())
    }

    pub fn is_null(&self) -> bool {
        self.table_entry.is_none()
    }

    pub fn is_complex(&self) -> bool {
        self.table_entry.as_ref().is_some_and(TableEntry::is_complex)
    }

    pub fn is_scalar(&self) -> bool {
        self.table_entry.as_ref().is_some_and(|entry| !entry.is_complex())
    }

    pub fn table_entry(&self) -> Option<&TableEntry> {
        self.table_entry.as_ref()
    }

    pub fn table_entry_mut(&mut self) -> Option<&mut TableEntry> {
        self.table_entry.as_mut()
    }

    /// Replaces the table entry, unlinking the old one.
    ///
    /// A pending name moves into the new header unless that header is
    /// already named.
    pub fn set_table_entry(&mut self, table_entry: Option<TableEntry>, pools: &mut TablePools) {
        if let Some(mut old) = self.table_entry.take() {
            old.on_removed(pools);
        }
        if let Some(mut table_entry) = table_entry {
            self.transfer_pending(&mut table_entry, pools.spec);
            self.table_entry = Some(table_entry);
        }
    }

    fn transfer_pending(&mut self, table_entry: &mut TableEntry, spec: &mut dyn StringPool) {
        if self.pending_key < 0 {
            return;
        }
        let key = self.pending_key;
        let mut reference = self.pending_name.take();
        self.pending_key = -1;
        if table_entry.header().key() < 0 {
            table_entry.header_mut().adopt_name(key, reference, spec);
        } else {
            reference.unlink(spec);
        }
    }

    /// The table entry of the requested kind, created when missing.
    ///
    /// An entry of the other kind is replaced; its name is kept.
    pub fn ensure_table_entry(&mut self, complex: bool, pools: &mut TablePools) -> &mut TableEntry {
        let matches = self
            .table_entry
            .as_ref()
            .is_some_and(|entry| entry.is_complex() == complex);
        if !matches {
            if let Some(mut old) = self.table_entry.take() {
                self.hold_name_of(&mut old, pools);
                old.on_removed(pools);
            }
            self.set_table_entry(Some(TableEntry::new(complex)), pools);
        }
        self.table_entry.get_or_insert_with(|| TableEntry::new(complex))
    }

    fn hold_name_of(&mut self, old: &mut TableEntry, pools: &mut TablePools) {
        let key = old.header().key();
        if key < 0 {
            return;
        }
        self.pending_key = key;
        self.pending_name.relink(pools.spec, Some(key as u32));
    }

    /// Spec-pool index of the name, pending or attached; -1 when unnamed.
    pub fn spec_reference(&self) -> i32 {
        if self.pending_key >= 0 {
            return self.pending_key;
        }
        self.table_entry
            .as_ref()
            .map_or(-1, |entry| entry.header().key())
    }

    pub fn name<'p>(&self, spec: &'p dyn StringPool) -> Option<&'p str> {
        let key = self.spec_reference();
        if key < 0 {
            return None;
        }
        spec.get(key as u32).map(|s| s.text.as_str())
    }

    /// Sets or clears the entry name. A null entry holds the name until a
    /// table entry is attached.
    pub fn set_name(&mut self, name: Option<&str>, spec: &mut dyn StringPool) {
        let key = name.map(|name| spec.get_or_create(&PoolString::plain(name)) as i32);
        match self.table_entry.as_mut() {
            Some(entry) => {
                self.pending_name.unlink(spec);
                self.pending_key = -1;
                entry.header_mut().set_key(key.unwrap_or(-1), spec);
                if let TableEntry::Scalar(scalar) = entry {
                    scalar.sync_layout();
                }
            }
            None => {
                self.pending_key = key.unwrap_or(-1);
                let index = key.map(|key| key as u32);
                self.pending_name.relink(spec, index);
            }
        }
    }

    /// Type of a scalar entry's value.
    pub fn value_type(&self) -> Option<ValueType> {
        self.table_entry
            .as_ref()
            .and_then(TableEntry::as_scalar)
            .map(|scalar| scalar.value().value_type())
    }

    fn scalar_value(&mut self, pools: &mut TablePools) -> Option<&mut TypedValue> {
        self.ensure_table_entry(false, pools)
            .as_scalar_mut()
            .map(ScalarEntry::value_mut)
    }

    /// Stores raw type and data, turning the entry scalar.
    pub fn set_value_as_raw(&mut self, value_type: ValueType, data: i32, pools: &mut TablePools) {
        if let Some(value) = self.scalar_value(pools) {
            value.set(value_type, data, pools.strings);
        }
    }

    pub fn set_value_as_boolean(&mut self, value: bool, pools: &mut TablePools) {
        if let Some(typed) = self.scalar_value(pools) {
            typed.set_boolean(value, pools.strings);
        }
    }

    pub fn set_value_as_reference(&mut self, id: u32, pools: &mut TablePools) {
        self.set_value_as_raw(ValueType::Reference, id as i32, pools);
    }

    pub fn set_value_as_string(&mut self, value: &PoolString, pools: &mut TablePools) {
        if let Some(typed) = self.scalar_value(pools) {
            typed.set_string(value, pools.strings);
        }
    }

    /// XML element this entry decodes to: the type name, or a typed array
    /// tag when every item of an array shares STRING or DEC.
    pub fn xml_tag(&self) -> Option<String> {
        let type_name = self.type_name.as_deref()?.trim_start_matches('^');
        let tag = type_name.strip_suffix("-private").unwrap_or(type_name);
        if !is_array_type(tag) {
            return Some(tag.to_string());
        }
        let same = self
            .table_entry
            .as_ref()
            .and_then(TableEntry::as_compound)
            .and_then(|compound| compound.is_all_same_value_type());
        let tag = match same {
            Some(ValueType::String) => "string-array",
            Some(ValueType::Dec) => "integer-array",
            _ => tag,
        };
        Some(tag.to_string())
    }

    /// True when `other` is non-null and this entry is null or accepts it.
    pub fn can_merge(&self, other: &Entry) -> bool {
        let Some(theirs) = other.table_entry.as_ref() else {
            return false;
        };
        match self.table_entry.as_ref() {
            Some(ours) => ours.can_merge(theirs),
            None => true,
        }
    }

    fn check_merge(&self, other: &Entry) -> Result<()> {
        if self.can_merge(other) {
            return Ok(());
        }
        Err(ArscError::MergeRejected(format!(
            "entry {:#010x} already holds a value",
            self.resource_id()
        )))
    }

    /// Merges another table's entry into this one.
    ///
    /// Returns `Ok(false)` when `other` is null.
    ///
    /// # Errors
    /// Returns [`ArscError::MergeRejected`] when [`Entry::can_merge`] fails.
    pub fn merge(&mut self, other: &Entry, source: SourcePools, target: &mut TablePools) -> Result<bool> {
        let Some(theirs) = other.table_entry.as_ref() else {
            debug!("Merge: entry {:#010x} has nothing to merge", other.resource_id());
            return Ok(false);
        };
        self.check_merge(other)?;
        self.ensure_table_entry(theirs.is_complex(), target)
            .merge_from(theirs, source, target)?;
        Ok(true)
    }

    /// Like [`Entry::merge`], remapping ids through `options`.
    pub fn merge_with_name(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &Entry,
        source: &SourceTable,
        target: &mut TablePools,
    ) -> Result<bool> {
        let Some(theirs) = other.table_entry.as_ref() else {
            debug!("Merge: entry {:#010x} has nothing to merge", other.resource_id());
            return Ok(false);
        };
        self.check_merge(other)?;
        self.ensure_table_entry(theirs.is_complex(), target)
            .merge_with_name_from(options, theirs, source, target)?;
        Ok(true)
    }

    /// Registers the pending name and the table entry with the pools.
    pub fn link(&mut self, pools: &mut TablePools) {
        if self.pending_key >= 0 {
            self.pending_name.relink(pools.spec, Some(self.pending_key as u32));
        }
        if let Some(entry) = self.table_entry.as_mut() {
            entry.link(pools);
        }
    }

    /// Releases every reference the entry holds.
    pub fn on_removed(&mut self, pools: &mut TablePools) {
        self.pending_name.unlink(pools.spec);
        if let Some(entry) = self.table_entry.as_mut() {
            entry.on_removed(pools);
        }
    }

    pub fn size(&self) -> usize {
        self.table_entry.as_ref().map_or(0, TableEntry::size)
    }

    /// Writes the table entry; a null entry writes nothing.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self.table_entry.as_ref() {
            Some(entry) => entry.write_to(writer),
            None => Ok(()),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// JSON form; `None` for a null entry.
    pub fn to_json(&self, spec: &dyn StringPool, strings: &dyn StringPool) -> Option<TableEntryJson> {
        self.table_entry
            .as_ref()
            .map(|entry| entry.to_json(spec, strings))
    }

    /// Rebuilds the table entry from JSON; `None` makes the entry null.
    pub fn from_json(&mut self, json: Option<&TableEntryJson>, pools: &mut TablePools) -> Result<()> {
        let table_entry = match json {
            Some(json) => Some(TableEntry::from_json(json, pools)?),
            None => None,
        };
        self.set_table_entry(table_entry, pools);
        Ok(())
    }
}
