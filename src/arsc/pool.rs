//! String pools consumed by entries and the back-references that index them.
//!
//! Pool storage and reference counting live outside this crate; records only
//! talk to a pool through [`StringPool`]. Every field that holds a pool index
//! owns a [`BackReference`], a non-owning handle the pool hands out on
//! `add_reference` and takes back on `remove_reference`. Holders must unlink
//! before they change the index or are dropped from the table, otherwise the
//! pool's counts go stale.

use std::collections::HashMap;

/// Style span over a run of characters, `first..=last`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub tag: String,
    pub first: u32,
    pub last: u32,
}

/// A pool entry: text plus optional style spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PoolString {
    pub text: String,
    pub spans: Vec<Span>,
}

impl PoolString {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    pub fn styled(text: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }

    pub fn is_styled(&self) -> bool {
        !self.spans.is_empty()
    }
}

/// Opaque relation handle issued by a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkHandle(pub u64);

/// The string-pool collaborator.
pub trait StringPool {
    fn get(&self, index: u32) -> Option<&PoolString>;

    /// Index of an equal entry, appending one when none exists.
    fn get_or_create(&mut self, value: &PoolString) -> u32;

    /// Records a holder of `index`. `None` when the index does not exist.
    fn add_reference(&mut self, index: u32) -> Option<LinkHandle>;

    fn remove_reference(&mut self, handle: LinkHandle);

    fn reference_count(&self, index: u32) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A field's live relation into a pool.
///
/// Not `Clone`: a handle has exactly one holder.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BackReference {
    link: Option<(u32, LinkHandle)>,
}

impl BackReference {
    pub fn index(&self) -> Option<u32> {
        self.link.map(|(index, _)| index)
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    /// Drops the current relation, if any, and links `index` instead.
    pub fn relink(&mut self, pool: &mut dyn StringPool, index: Option<u32>) {
        self.unlink(pool);
        if let Some(index) = index {
            self.link = pool.add_reference(index).map(|handle| (index, handle));
        }
    }

    pub fn unlink(&mut self, pool: &mut dyn StringPool) {
        if let Some((_, handle)) = self.link.take() {
            pool.remove_reference(handle);
        }
    }

    /// Moves the relation out without touching the pool.
    pub(crate) fn take(&mut self) -> BackReference {
        BackReference {
            link: self.link.take(),
        }
    }
}

/// Mutable view of the two pools of the table a record belongs to.
pub struct TablePools<'a> {
    /// Entry names.
    pub spec: &'a mut dyn StringPool,
    /// STRING values.
    pub strings: &'a mut dyn StringPool,
}

/// Read-only view of another table's pools, used as a merge source.
#[derive(Clone, Copy)]
pub struct SourcePools<'a> {
    pub spec: &'a dyn StringPool,
    pub strings: &'a dyn StringPool,
}

/// Vector-backed pool with exact dedup and a relation table.
#[derive(Debug, Default)]
pub struct MemoryStringPool {
    strings: Vec<PoolString>,
    lookup: HashMap<PoolString, u32>,
    relations: HashMap<LinkHandle, u32>,
    next_handle: u64,
}

impl MemoryStringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `get_or_create` with unstyled text.
    pub fn intern(&mut self, text: &str) -> u32 {
        self.get_or_create(&PoolString::plain(text))
    }

    /// Number of live relations across all indexes.
    pub fn total_references(&self) -> usize {
        self.relations.len()
    }
}

impl StringPool for MemoryStringPool {
    fn get(&self, index: u32) -> Option<&PoolString> {
        self.strings.get(index as usize)
    }

    fn get_or_create(&mut self, value: &PoolString) -> u32 {
        if let Some(&index) = self.lookup.get(value) {
            return index;
        }
        let index = self.strings.len() as u32;
        self.strings.push(value.clone());
        self.lookup.insert(value.clone(), index);
        index
    }

    fn add_reference(&mut self, index: u32) -> Option<LinkHandle> {
        if index as usize >= self.strings.len() {
            return None;
        }
        let handle = LinkHandle(self.next_handle);
        self.next_handle += 1;
        self.relations.insert(handle, index);
        Some(handle)
    }

    fn remove_reference(&mut self, handle: LinkHandle) {
        self.relations.remove(&handle);
    }

    fn reference_count(&self, index: u32) -> usize {
        self.relations.values().filter(|&&i| i == index).count()
    }

    fn len(&self) -> usize {
        self.strings.len()
    }
}
