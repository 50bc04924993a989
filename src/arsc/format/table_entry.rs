//! Table entries: one header plus a scalar value or a sequence of pairs.
//!
//! Decoding peeks the complex bit of the header before allocating the
//! variant, see [`TableEntry::read`].

use std::collections::HashSet;
use std::io::Write;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::arsc::codec::cursor::BlockReader;
use crate::arsc::merge::{remap_resource_id, MergeOptions, SourceTable};
use crate::arsc::pool::{SourcePools, StringPool, TablePools};
use crate::arsc::types::error::{ArscError, Result};
use crate::arsc::types::models::{AttributeDataFormat, AttributeType, ValueType};
use super::map_pair::{MapPair, MapPairJson};
use super::typed_value::{TypedValue, TypedValueJson};
use super::value_header::{
    ValueHeader, ValueHeaderJson, FLAG_COMPLEX, MAP_HEADER_SIZE, SCALAR_HEADER_SIZE,
};

const PAIR_MIN_SIZE: usize = 12;

/// JSON mirror of a table entry: header fields plus either a value or `values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableEntryJson {
    #[serde(flatten)]
    pub header: ValueHeaderJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TypedValueJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<MapPairJson>>,
}

/// True when the owning type slot holds arrays.
pub fn is_array_type(type_name: &str) -> bool {
    type_name.trim_start_matches('^').contains("array")
}

/// True when the owning type slot holds styles.
pub fn is_style_type(type_name: &str) -> bool {
    type_name.trim_start_matches('^').starts_with("style")
}

#[derive(Debug)]
pub enum TableEntry {
    Scalar(ScalarEntry),
    Compound(CompoundEntry),
}

impl TableEntry {
    /// Decodes the variant selected by the header's complex bit.
    ///
    /// # Errors
    /// Returns [`ArscError::Truncated`] if the flags cannot be peeked or the
    /// entry runs past the input.
    pub fn read(reader: &mut BlockReader) -> Result<Self> {
        let flags = reader.peek_u16(2)?;
        if flags as u8 & FLAG_COMPLEX != 0 {
            Ok(TableEntry::Compound(CompoundEntry::read(reader)?))
        } else {
            Ok(TableEntry::Scalar(ScalarEntry::read(reader)?))
        }
    }

    pub fn new(complex: bool) -> Self {
        if complex {
            TableEntry::Compound(CompoundEntry::new())
        } else {
            TableEntry::Scalar(ScalarEntry::new())
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, TableEntry::Compound(_))
    }

    pub fn header(&self) -> &ValueHeader {
        match self {
            TableEntry::Scalar(entry) => entry.header(),
            TableEntry::Compound(entry) => entry.header(),
        }
    }

    pub fn header_mut(&mut self) -> &mut ValueHeader {
        match self {
            TableEntry::Scalar(entry) => entry.header_mut(),
            TableEntry::Compound(entry) => entry.header_mut(),
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarEntry> {
        match self {
            TableEntry::Scalar(entry) => Some(entry),
            TableEntry::Compound(_) => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut ScalarEntry> {
        match self {
            TableEntry::Scalar(entry) => Some(entry),
            TableEntry::Compound(_) => None,
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundEntry> {
        match self {
            TableEntry::Compound(entry) => Some(entry),
            TableEntry::Scalar(_) => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut CompoundEntry> {
        match self {
            TableEntry::Compound(entry) => Some(entry),
            TableEntry::Scalar(_) => None,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            TableEntry::Scalar(entry) => entry.size(),
            TableEntry::Compound(entry) => entry.size(),
        }
    }

    /// Registers the name and every STRING value with the table's pools.
    pub fn link(&mut self, pools: &mut TablePools) {
        match self {
            TableEntry::Scalar(entry) => entry.link(pools),
            TableEntry::Compound(entry) => entry.link(pools),
        }
    }

    /// Releases every back-reference before the entry is discarded.
    pub fn on_removed(&mut self, pools: &mut TablePools) {
        match self {
            TableEntry::Scalar(entry) => entry.on_removed(pools),
            TableEntry::Compound(entry) => entry.on_removed(pools),
        }
    }

    /// Whether `other` may be merged into this entry. Variants never mix.
    pub fn can_merge(&self, other: &TableEntry) -> bool {
        match (self, other) {
            (TableEntry::Scalar(ours), TableEntry::Scalar(theirs)) => ours.can_merge(theirs),
            (TableEntry::Compound(ours), TableEntry::Compound(theirs)) => ours.can_merge(theirs),
            _ => false,
        }
    }

    /// # Errors
    /// Returns [`ArscError::MergeRejected`] when [`TableEntry::can_merge`] fails.
    pub fn merge(&mut self, other: &TableEntry, source: SourcePools, target: &mut TablePools) -> Result<()> {
        match (self, other) {
            (TableEntry::Scalar(ours), TableEntry::Scalar(theirs)) => ours.merge(theirs, source, target),
            (TableEntry::Compound(ours), TableEntry::Compound(theirs)) => ours.merge(theirs, source, target),
            _ => Err(ArscError::MergeRejected(
                "scalar and compound entries cannot be merged".to_string(),
            )),
        }
    }

    pub fn merge_with_name(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &TableEntry,
        source: &SourceTable,
        target: &mut TablePools,
    ) -> Result<()> {
        match (self, other) {
            (TableEntry::Scalar(ours), TableEntry::Scalar(theirs)) => {
                ours.merge_with_name(options, theirs, source, target)
            }
            (TableEntry::Compound(ours), TableEntry::Compound(theirs)) => {
                ours.merge_with_name(options, theirs, source, target)
            }
            _ => Err(ArscError::MergeRejected(
                "scalar and compound entries cannot be merged".to_string(),
            )),
        }
    }

    /// Merge without the emptiness precondition; the variants must match.
    pub(crate) fn merge_from(&mut self, other: &TableEntry, source: SourcePools, target: &mut TablePools) -> Result<()> {
        match (self, other) {
            (TableEntry::Scalar(ours), TableEntry::Scalar(theirs)) => {
                ours.merge_from(theirs, source, target);
                Ok(())
            }
            (TableEntry::Compound(ours), TableEntry::Compound(theirs)) => {
                ours.merge_from(theirs, source, target);
                Ok(())
            }
            _ => Err(ArscError::MergeRejected(
                "scalar and compound entries cannot be merged".to_string(),
            )),
        }
    }

    pub(crate) fn merge_with_name_from(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &TableEntry,
        source: &SourceTable,
        target: &mut TablePools,
    ) -> Result<()> {
        match (self, other) {
            (TableEntry::Scalar(ours), TableEntry::Scalar(theirs)) => {
                ours.merge_with_name_from(options, theirs, source, target);
                Ok(())
            }
            (TableEntry::Compound(ours), TableEntry::Compound(theirs)) => {
                ours.merge_with_name_from(options, theirs, source, target);
                Ok(())
            }
            _ => Err(ArscError::MergeRejected(
                "scalar and compound entries cannot be merged".to_string(),
            )),
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            TableEntry::Scalar(entry) => entry.write_to(writer),
            TableEntry::Compound(entry) => entry.write_to(writer),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size());
        self.write_to(&mut out)?;
        Ok(out)
    }

    pub fn to_json(&self, spec: &dyn StringPool, strings: &dyn StringPool) -> TableEntryJson {
        match self {
            TableEntry::Scalar(entry) => entry.to_json(spec, strings),
            TableEntry::Compound(entry) => entry.to_json(spec, strings),
        }
    }

    /// Builds the variant named by `is_complex` and fills it from `json`.
    pub fn from_json(json: &TableEntryJson, pools: &mut TablePools) -> Result<Self> {
        let mut entry = TableEntry::new(json.header.is_complex);
        match &mut entry {
            TableEntry::Scalar(scalar) => scalar.from_json(json, pools)?,
            TableEntry::Compound(compound) => compound.from_json(json, pools)?,
        }
        Ok(entry)
    }
}

/// Header plus exactly one typed value.
#[derive(Debug)]
pub struct ScalarEntry {
    header: ValueHeader,
    value: TypedValue,
}

impl Default for ScalarEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarEntry {
    pub fn new() -> Self {
        Self {
            header: ValueHeader::new_scalar(),
            value: TypedValue::default(),
        }
    }

    /// Decodes a scalar entry. A compact header carries the value itself.
    pub fn read(reader: &mut BlockReader) -> Result<Self> {
        let header = ValueHeader::read(reader, SCALAR_HEADER_SIZE)?;
        let value = if header.is_compact() {
            TypedValue::from_compact(header.compact_type(), header.compact_data())?
        } else {
            TypedValue::read(reader)?
        };
        trace!("Read scalar entry: key={}, type={}", header.key(), value.value_type());
        Ok(Self { header, value })
    }

    pub fn header(&self) -> &ValueHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut ValueHeader {
        &mut self.header
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut TypedValue {
        &mut self.value
    }

    pub fn size(&self) -> usize {
        if self.header.is_compact() {
            return self.header.size();
        }
        self.header.size() + self.value.block_size()
    }

    pub fn is_compact(&self) -> bool {
        self.header.is_compact()
    }

    /// Re-attaches the value block after a key change expanded the header.
    pub(crate) fn sync_layout(&mut self) {
        if !self.header.is_compact() && self.value.is_detached() {
            self.value.set_detached(false);
        }
    }

    /// Switches between compact and normal encoding. Type and data are kept;
    /// the value block shrinks to 0 bytes or grows back to 8.
    ///
    /// # Errors
    /// Returns [`ArscError::InvalidFormat`] when the key does not fit 16 bits.
    pub fn set_compact(&mut self, compact: bool) -> Result<()> {
        self.header.set_compact(compact)?;
        self.value.set_detached(compact);
        Ok(())
    }

    pub fn link(&mut self, pools: &mut TablePools) {
        self.header.link_name(pools.spec);
        self.value.link(pools.strings);
    }

    pub fn on_removed(&mut self, pools: &mut TablePools) {
        self.header.unlink_name(pools.spec);
        self.value.unlink(pools.strings);
    }

    /// An undefined value accepts a defined one; anything else is refused.
    pub fn can_merge(&self, other: &ScalarEntry) -> bool {
        self.value.is_undefined() && !other.value.is_undefined()
    }

    fn check_merge(&self, other: &ScalarEntry) -> Result<()> {
        if self.can_merge(other) {
            return Ok(());
        }
        debug!(
            "Merge refused: ours={}/{:#x}, incoming={}/{:#x}",
            self.value.value_type(),
            self.value.data(),
            other.value.value_type(),
            other.value.data()
        );
        Err(ArscError::MergeRejected(format!(
            "scalar entry already holds {} and cannot take {}",
            self.value.value_type(),
            other.value.value_type()
        )))
    }

    pub fn merge(&mut self, other: &ScalarEntry, source: SourcePools, target: &mut TablePools) -> Result<()> {
        self.check_merge(other)?;
        self.merge_from(other, source, target);
        Ok(())
    }

    pub(crate) fn merge_from(&mut self, other: &ScalarEntry, source: SourcePools, target: &mut TablePools) {
        self.header.merge(&other.header, source, target.spec);
        self.sync_layout();
        self.value.merge(&other.value, source.strings, target.strings);
    }

    pub fn merge_with_name(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &ScalarEntry,
        source: &SourceTable,
        target: &mut TablePools,
    ) -> Result<()> {
        self.check_merge(other)?;
        self.merge_with_name_from(options, other, source, target);
        Ok(())
    }

    pub(crate) fn merge_with_name_from(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &ScalarEntry,
        source: &SourceTable,
        target: &mut TablePools,
    ) {
        self.header.merge(&other.header, source.pools, target.spec);
        self.sync_layout();
        self.value.merge_with_name(options, &other.value, source, target.strings);
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.header.is_compact() {
            return self.header.write_compact_to(
                writer,
                self.value.value_type().byte(),
                self.value.data(),
            );
        }
        self.header.write_to(writer)?;
        self.value.write_block_to(writer)
    }

    pub fn to_json(&self, spec: &dyn StringPool, strings: &dyn StringPool) -> TableEntryJson {
        TableEntryJson {
            header: self.header.to_json(spec),
            value: Some(self.value.to_json(strings)),
            values: None,
        }
    }

    pub fn from_json(&mut self, json: &TableEntryJson, pools: &mut TablePools) -> Result<()> {
        self.header.from_json(&json.header, pools.spec);
        self.sync_layout();
        if let Some(value) = &json.value {
            self.value.from_json(value, pools.strings)?;
        }
        Ok(())
    }
}

/// Header plus an ordered sequence of name/value pairs.
#[derive(Debug)]
pub struct CompoundEntry {
    header: ValueHeader,
    pairs: Vec<MapPair>,
}

impl Default for CompoundEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl CompoundEntry {
    pub fn new() -> Self {
        Self {
            header: ValueHeader::new_map(),
            pairs: Vec::new(),
        }
    }

    /// Decodes a compound entry with as many pairs as the header declares.
    ///
    /// # Errors
    /// - [`ArscError::InvalidFormat`] for a negative value count
    /// - [`ArscError::Truncated`] when the pairs cannot fit the input
    pub fn read(reader: &mut BlockReader) -> Result<Self> {
        let header = ValueHeader::read(reader, MAP_HEADER_SIZE)?;
        let count = header.values_count();
        if count < 0 {
            return Err(ArscError::InvalidFormat(format!(
                "Negative value count in compound entry: {}",
                count
            )));
        }
        let count = count as usize;
        let needed = count.saturating_mul(PAIR_MIN_SIZE);
        if needed > reader.available() {
            return Err(ArscError::Truncated {
                context: "compound entry pairs",
                expected: needed as u64,
                found: reader.available() as u64,
            });
        }
        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            pairs.push(MapPair::read(reader)?);
        }
        trace!(
            "Read compound entry: key={}, parent={:#010x}, pairs={}",
            header.key(),
            header.parent_id(),
            pairs.len()
        );
        Ok(Self { header, pairs })
    }

    pub fn header(&self) -> &ValueHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut ValueHeader {
        &mut self.header
    }

    pub fn pairs(&self) -> &[MapPair] {
        &self.pairs
    }

    /// Mutable access to pair values. Use [`CompoundEntry::add_pair`] and
    /// [`CompoundEntry::remove_pair`] to change the sequence itself.
    pub fn pairs_mut(&mut self) -> &mut [MapPair] {
        &mut self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn size(&self) -> usize {
        self.header.size() + self.pairs.iter().map(MapPair::size).sum::<usize>()
    }

    pub fn parent_id(&self) -> u32 {
        self.header.parent_id()
    }

    pub fn set_parent_id(&mut self, id: u32) {
        self.header.set_parent_id(id);
    }

    /// Resynchronizes the header's value count with the pair sequence.
    pub fn refresh(&mut self) {
        self.header.set_values_count(self.pairs.len() as i32);
    }

    pub fn add_pair(&mut self, mut pair: MapPair, strings: &mut dyn StringPool) {
        pair.link(strings);
        self.pairs.push(pair);
        self.refresh();
    }

    pub fn remove_pair(&mut self, index: usize, strings: &mut dyn StringPool) -> Option<MapPair> {
        if index >= self.pairs.len() {
            return None;
        }
        let mut pair = self.pairs.remove(index);
        pair.unlink(strings);
        self.refresh();
        Some(pair)
    }

    pub fn clear_pairs(&mut self, strings: &mut dyn StringPool) {
        for pair in &mut self.pairs {
            pair.unlink(strings);
        }
        self.pairs.clear();
        self.refresh();
    }

    /// Sorts pairs by name id, 0 last.
    pub fn sort_pairs(&mut self) {
        self.pairs.sort_by(|a, b| a.compare_names(b));
    }

    pub fn find(&self, attribute_type: AttributeType) -> Option<&MapPair> {
        self.pairs
            .iter()
            .find(|pair| pair.attribute_type() == Some(attribute_type))
    }

    /// Exactly one FORMATS pair and no plural categories.
    pub fn is_attr(&self) -> bool {
        let mut has_formats = false;
        for pair in &self.pairs {
            match pair.attribute_type() {
                Some(t) if t.is_plural() => return false,
                Some(AttributeType::Formats) => {
                    if has_formats {
                        return false;
                    }
                    has_formats = true;
                }
                _ => {}
            }
        }
        has_formats
    }

    /// Every pair is a distinct plural category, at least one present.
    pub fn is_plural(&self) -> bool {
        let mut seen = HashSet::new();
        for pair in &self.pairs {
            match pair.attribute_type() {
                Some(t) if t.is_plural() => {
                    if !seen.insert(t) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        !seen.is_empty()
    }

    /// Every name is an array index within the sequence bounds. An empty
    /// entry counts as an array only in an array-typed slot.
    pub fn is_array(&self, type_name: Option<&str>) -> bool {
        let size = self.pairs.len();
        let all_indexed = self
            .pairs
            .iter()
            .all(|pair| matches!(pair.array_index(), Some(i) if (i as usize) <= size));
        if !all_indexed {
            return false;
        }
        if size != 0 {
            return true;
        }
        type_name.map(is_array_type).unwrap_or(false)
    }

    pub fn is_style(&self, type_name: Option<&str>) -> bool {
        if self.parent_id() != 0 {
            return true;
        }
        type_name.map(is_style_type).unwrap_or(false)
    }

    /// The single non-reference value type shared by all pairs, if any.
    pub fn is_all_same_value_type(&self) -> Option<ValueType> {
        let mut shared = None;
        for pair in &self.pairs {
            let value_type = pair.value().value_type();
            if value_type == ValueType::Reference {
                continue;
            }
            match shared {
                None => shared = Some(value_type),
                Some(t) if t != value_type => return None,
                _ => {}
            }
        }
        shared
    }

    /// Value formats accepted by an `attr` entry.
    pub fn attribute_formats(&self) -> Option<Vec<AttributeDataFormat>> {
        let pair = self.find(AttributeType::Formats)?;
        AttributeDataFormat::decode_value_types(pair.value().data() as u32 & 0xffff)
    }

    /// `"string|integer"` style rendering of an `attr` entry's formats.
    pub fn decode_attr_formats(&self) -> Option<String> {
        if !self.is_attr() {
            return None;
        }
        self.find(AttributeType::Formats)?.decode_data_as_attr_formats()
    }

    /// ENUM or FLAG when the attribute declares symbolic values.
    pub fn bag_type(&self) -> Option<AttributeDataFormat> {
        let pair = self.find(AttributeType::Formats)?;
        AttributeDataFormat::type_of_bag(pair.value().data() as u32)
    }

    pub fn is_enum(&self) -> bool {
        self.bag_type() == Some(AttributeDataFormat::Enum)
    }

    pub fn is_flag(&self) -> bool {
        self.bag_type() == Some(AttributeDataFormat::Flag)
    }

    pub fn plural(&self, quantity: AttributeType) -> Option<&TypedValue> {
        if !quantity.is_plural() {
            return None;
        }
        self.find(quantity).map(MapPair::value)
    }

    /// Array item values in index order.
    pub fn array_items(&self) -> Vec<&TypedValue> {
        let mut items: Vec<(u16, &TypedValue)> = self
            .pairs
            .iter()
            .filter_map(|pair| pair.array_index().map(|i| (i, pair.value())))
            .collect();
        items.sort_by_key(|(index, _)| *index);
        items.into_iter().map(|(_, value)| value).collect()
    }

    pub fn link(&mut self, pools: &mut TablePools) {
        self.header.link_name(pools.spec);
        for pair in &mut self.pairs {
            pair.link(pools.strings);
        }
    }

    pub fn on_removed(&mut self, pools: &mut TablePools) {
        self.header.unlink_name(pools.spec);
        for pair in &mut self.pairs {
            pair.unlink(pools.strings);
        }
    }

    /// An empty entry accepts a non-empty one; anything else is refused.
    pub fn can_merge(&self, other: &CompoundEntry) -> bool {
        !other.pairs.is_empty() && self.pairs.is_empty()
    }

    fn check_merge(&self, other: &CompoundEntry) -> Result<()> {
        if self.can_merge(other) {
            return Ok(());
        }
        debug!(
            "Merge refused: ours has {} pairs, incoming has {}",
            self.pairs.len(),
            other.pairs.len()
        );
        Err(ArscError::MergeRejected(format!(
            "compound entry with {} pairs cannot take {} pairs",
            self.pairs.len(),
            other.pairs.len()
        )))
    }

    pub fn merge(&mut self, other: &CompoundEntry, source: SourcePools, target: &mut TablePools) -> Result<()> {
        self.check_merge(other)?;
        self.merge_from(other, source, target);
        Ok(())
    }

    pub(crate) fn merge_from(&mut self, other: &CompoundEntry, source: SourcePools, target: &mut TablePools) {
        self.header.merge(&other.header, source, target.spec);
        self.header.merge_map_fields(&other.header);
        self.clear_pairs(target.strings);
        for theirs in &other.pairs {
            let mut pair = MapPair::default();
            pair.merge(theirs, source.strings, target.strings);
            self.pairs.push(pair);
        }
        self.refresh();
    }

    pub fn merge_with_name(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &CompoundEntry,
        source: &SourceTable,
        target: &mut TablePools,
    ) -> Result<()> {
        self.check_merge(other)?;
        self.merge_with_name_from(options, other, source, target);
        Ok(())
    }

    pub(crate) fn merge_with_name_from(
        &mut self,
        options: &mut dyn MergeOptions,
        other: &CompoundEntry,
        source: &SourceTable,
        target: &mut TablePools,
    ) {
        self.header.merge(&other.header, source.pools, target.spec);
        let parent = other.parent_id();
        let parent = if parent != 0 {
            remap_resource_id(options, source.resolver, parent)
        } else {
            0
        };
        self.set_parent_id(parent);
        self.clear_pairs(target.strings);
        for theirs in &other.pairs {
            let mut pair = MapPair::default();
            pair.merge_with_name(options, theirs, source, target.strings);
            self.pairs.push(pair);
        }
        self.refresh();
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.header.write_to(writer)?;
        for pair in &self.pairs {
            pair.write_to(writer)?;
        }
        Ok(())
    }

    pub fn to_json(&self, spec: &dyn StringPool, strings: &dyn StringPool) -> TableEntryJson {
        TableEntryJson {
            header: self.header.to_json(spec),
            value: None,
            values: Some(self.pairs.iter().map(|pair| pair.to_json(strings)).collect()),
        }
    }

    pub fn from_json(&mut self, json: &TableEntryJson, pools: &mut TablePools) -> Result<()> {
        self.header.from_json(&json.header, pools.spec);
        self.clear_pairs(pools.strings);
        for item in json.values.iter().flatten() {
            let pair = MapPair::from_json(item, pools.strings)?;
            self.pairs.push(pair);
        }
        self.refresh();
        Ok(())
    }
}
