//! Collaborators for cross-table merge and the shared id-remapping step.
//!
//! `merge` copies a record between tables assumed to share resource ids.
//! `merge_with_name` re-resolves every id-valued field (reference data,
//! attribute names, style parents) through the source table's
//! [`ResourceResolver`] and asks the caller's [`MergeOptions`] for the
//! destination id. Ids declared outside the source table are copied as
//! resolved, since they denote something neither table owns.

use log::debug;
use crate::arsc::pool::SourcePools;

/// A resolved resource as seen from the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: u32,
    pub type_name: String,
    /// `None` when the id exists but carries no declared name.
    pub name: Option<String>,
    /// True when the id belongs to the source table itself.
    pub in_context: bool,
}

impl ResourceRef {
    pub fn is_declared(&self) -> bool {
        self.name.is_some()
    }
}

/// Resolves resource ids of one table.
pub trait ResourceResolver {
    fn resolve(&self, id: u32) -> Option<ResourceRef>;

    /// Display form for a name id that resolves to nothing.
    fn decode_unknown_name(&self, id: u32) -> String {
        format!("@0x{:08x}", id)
    }
}

/// Resolver for tables with no resolvable ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResolver;

impl ResourceResolver for NoResolver {
    fn resolve(&self, _id: u32) -> Option<ResourceRef> {
        None
    }
}

/// Caller policy for cross-table merges.
pub trait MergeOptions {
    /// Destination id for a declared source resource, merging it in as needed.
    fn merge_declared(&mut self, source: &ResourceRef) -> Option<u32>;

    /// Destination id for an id the source table defines without a name.
    fn resolve_undeclared(&mut self, source: &ResourceRef) -> Option<u32>;

    /// Called with the text of every STRING value merged across tables.
    fn on_string_merged(&mut self, _text: &str) {}
}

/// The side of a merge being read from.
#[derive(Clone, Copy)]
pub struct SourceTable<'a> {
    pub pools: SourcePools<'a>,
    pub resolver: &'a dyn ResourceResolver,
}

/// True when `id` has both a package and a type byte.
pub fn is_resource_id(id: u32) -> bool {
    id != 0 && id & 0x00ff_0000 != 0 && id & 0xff00_0000 != 0
}

/// Maps a source-table id to its destination-table id.
///
/// Unresolvable ids are kept as they are. Ids the source table owns go
/// through `options`, and become 0 when the policy has no answer.
pub(crate) fn remap_resource_id(
    options: &mut dyn MergeOptions,
    resolver: &dyn ResourceResolver,
    id: u32,
) -> u32 {
    if !is_resource_id(id) {
        return id;
    }
    let Some(found) = resolver.resolve(id) else {
        debug!("Merge: id {:#010x} not resolvable, copied raw", id);
        return id;
    };
    if !found.in_context {
        return found.id;
    }
    let mapped = if found.is_declared() {
        options.merge_declared(&found)
    } else {
        options.resolve_undeclared(&found)
    };
    match mapped {
        Some(mapped) => {
            debug!("Merge: id {:#010x} -> {:#010x}", id, mapped);
            mapped
        }
        None => {
            debug!("Merge: id {:#010x} has no destination, cleared", id);
            0
        }
    }
}
