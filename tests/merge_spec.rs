use arsc_entry::arsc::format::map_pair::MapPair;
use arsc_entry::arsc::format::table_entry::{CompoundEntry, ScalarEntry};
use arsc_entry::arsc::format::typed_value::TypedValue;
use arsc_entry::arsc::merge::{MergeOptions, NoResolver, ResourceRef, ResourceResolver, SourceTable};
use arsc_entry::arsc::pool::{PoolString, SourcePools, StringPool, TablePools};
use arsc_entry::{ArscError, BlockReader, Entry, MemoryStringPool, TableEntry, ValueType};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

/// Source-table ids and what they resolve to: (id, name, in source table).
const SOURCE_IDS: &[(u32, Option<&str>, bool)] = &[
    (0x7f01_0001, Some("colorAccent"), true),
    (0x7f04_0002, None, true),
    (0x0101_0098, Some("textColor"), false),
];

struct MapResolver {
    ids: HashMap<u32, ResourceRef>,
}

impl MapResolver {
    fn new() -> Self {
        let ids = SOURCE_IDS
            .iter()
            .map(|&(id, name, in_context)| {
                let found = ResourceRef {
                    id,
                    type_name: "attr".to_string(),
                    name: name.map(str::to_string),
                    in_context,
                };
                (id, found)
            })
            .collect();
        Self { ids }
    }
}

impl ResourceResolver for MapResolver {
    fn resolve(&self, id: u32) -> Option<ResourceRef> {
        self.ids.get(&id).cloned()
    }
}

/// Moves every declared source id to package 0x7f, type 0x02.
#[derive(Default)]
struct RecordingOptions {
    declared: Vec<String>,
    undeclared: Vec<u32>,
    strings: Vec<String>,
}

impl MergeOptions for RecordingOptions {
    fn merge_declared(&mut self, source: &ResourceRef) -> Option<u32> {
        self.declared.push(source.name.clone().unwrap_or_default());
        Some(0x7f02_0000 | (source.id & 0xffff))
    }

    fn resolve_undeclared(&mut self, source: &ResourceRef) -> Option<u32> {
        self.undeclared.push(source.id);
        None
    }

    fn on_string_merged(&mut self, text: &str) {
        self.strings.push(text.to_string());
    }
}

fn scalar(value_type: ValueType, data: i32, strings: &mut dyn StringPool) -> ScalarEntry {
    let mut entry = ScalarEntry::new();
    entry.value_mut().set(value_type, data, strings);
    entry
}

fn compound(pairs: &[(u32, ValueType, i32)], strings: &mut dyn StringPool) -> CompoundEntry {
    let mut entry = CompoundEntry::new();
    for &(name, value_type, data) in pairs {
        entry.add_pair(MapPair::new(name, TypedValue::new(value_type, data)), strings);
    }
    entry
}

#[test]
fn scalar_merge_fills_undefined_values() {
    let source_spec = MemoryStringPool::new();
    let mut source_strings = MemoryStringPool::new();
    let theirs = scalar(ValueType::Dec, 5, &mut source_strings);
    let source = SourcePools {
        spec: &source_spec,
        strings: &source_strings,
    };

    let mut spec = MemoryStringPool::new();
    let mut strings = MemoryStringPool::new();
    let mut target = TablePools {
        spec: &mut spec,
        strings: &mut strings,
    };

    let mut ours = ScalarEntry::new();
    assert!(ours.can_merge(&theirs));
    ours.merge(&theirs, source, &mut target).expect("merge into undefined value");
    assert_eq!(ours.value().value_type(), ValueType::Dec);
    assert_eq!(ours.value().data(), 5);

    let later = scalar(ValueType::Dec, 7, &mut source_strings);
    let source = SourcePools {
        spec: &source_spec,
        strings: &source_strings,
    };
    assert!(!ours.can_merge(&later));
    let err = ours.merge(&later, source, &mut target).expect_err("value already defined");
    assert!(matches!(err, ArscError::MergeRejected(_)), "unexpected error: {}", err);
    assert_eq!(ours.value().data(), 5);

    let undefined = ScalarEntry::new();
    assert!(!ScalarEntry::new().can_merge(&undefined));
}

#[test]
fn unnamed_source_expands_a_compact_target() {
    let source_spec = MemoryStringPool::new();
    let mut source_strings = MemoryStringPool::new();
    let theirs = scalar(ValueType::Dec, 5, &mut source_strings);
    let source = SourcePools {
        spec: &source_spec,
        strings: &source_strings,
    };

    let mut spec = MemoryStringPool::new();
    spec.intern("first");
    spec.intern("second");
    let mut strings = MemoryStringPool::new();
    let mut target = TablePools {
        spec: &mut spec,
        strings: &mut strings,
    };

    let compact_null = [0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
    let mut ours = ScalarEntry::read(&mut BlockReader::new(&compact_null)).expect("read compact entry");
    ours.link(&mut target);
    assert!(ours.is_compact());
    assert_eq!(target.spec.reference_count(1), 1);

    ours.merge(&theirs, source, &mut target).expect("merge into compact entry");
    assert_eq!(ours.header().key(), -1);
    assert!(!ours.is_compact());
    assert_eq!(target.spec.reference_count(1), 0);

    let mut out = Vec::new();
    ours.write_to(&mut out).expect("write merged entry");
    assert_eq!(
        out,
        vec![
            0x08, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, //
            0x08, 0x00, 0x00, 0x10, 0x05, 0x00, 0x00, 0x00,
        ]
    );
}

#[test]
fn strings_and_names_are_reinterned() {
    let mut source_spec = MemoryStringPool::new();
    source_spec.intern("unused");
    let mut source_strings = MemoryStringPool::new();
    source_strings.intern("padding");
    let mut theirs = ScalarEntry::new();
    theirs
        .value_mut()
        .set_string(&PoolString::plain("hello"), &mut source_strings);
    theirs.header_mut().set_name(Some("greeting"), &mut source_spec);
    theirs.header_mut().set_public(true);
    assert_eq!(theirs.value().data(), 1);

    let mut spec = MemoryStringPool::new();
    let mut strings = MemoryStringPool::new();
    let mut target = TablePools {
        spec: &mut spec,
        strings: &mut strings,
    };
    let source = SourcePools {
        spec: &source_spec,
        strings: &source_strings,
    };

    let mut ours = ScalarEntry::new();
    ours.merge(&theirs, source, &mut target).expect("merge");
    assert_eq!(ours.value().value_type(), ValueType::String);
    assert_eq!(ours.value().data(), 0);
    assert_eq!(
        ours.value().string_value(&*target.strings).map(|s| s.text.as_str()),
        Some("hello")
    );
    assert_eq!(target.strings.reference_count(0), 1);
    assert_eq!(ours.header().name(&*target.spec), Some("greeting"));
    assert_eq!(target.spec.reference_count(0), 1);
    assert!(ours.header().is_public());
}

#[test]
fn compound_merge_needs_an_empty_target() {
    let mut source_strings = MemoryStringPool::new();
    let source_spec = MemoryStringPool::new();
    let theirs = compound(
        &[
            (0x0101_0098, ValueType::Dec, 1),
            (0x7f01_0001, ValueType::Boolean, -1),
        ],
        &mut source_strings,
    );
    let empty = CompoundEntry::new();

    let mut spec = MemoryStringPool::new();
    let mut strings = MemoryStringPool::new();
    let mut target = TablePools {
        spec: &mut spec,
        strings: &mut strings,
    };
    let source = SourcePools {
        spec: &source_spec,
        strings: &source_strings,
    };

    let mut ours = CompoundEntry::new();
    assert!(!ours.can_merge(&empty));
    ours.merge(&theirs, source, &mut target).expect("merge into empty compound");
    assert_eq!(ours.len(), 2);
    assert_eq!(ours.header().values_count(), 2);
    assert_eq!(ours.pairs()[1].name(), 0x7f01_0001);

    let err = ours.merge(&theirs, source, &mut target).expect_err("already populated");
    assert!(matches!(err, ArscError::MergeRejected(_)), "unexpected error: {}", err);

    let mut mixed = TableEntry::new(false);
    let err = mixed
        .merge(&TableEntry::Compound(theirs), source, &mut target)
        .expect_err("kinds differ");
    assert!(matches!(err, ArscError::MergeRejected(_)), "unexpected error: {}", err);
}

#[test]
fn merge_with_name_remaps_ids() {
    let resolver = MapResolver::new();
    let source_spec = MemoryStringPool::new();
    let mut source_strings = MemoryStringPool::new();
    let text = source_strings.intern("Accent");

    let mut theirs = compound(
        &[
            (0x7f01_0001, ValueType::Reference, 0x7f01_0001),
            (0x0101_0098, ValueType::Attribute, 0x0101_0098),
            (0x7f04_0002, ValueType::Reference, 0x7f04_0002),
            (0x7f09_0009, ValueType::Reference, 0x7f09_0009),
            (0x0100_0000, ValueType::String, text as i32),
        ],
        &mut source_strings,
    );
    theirs.set_parent_id(0x7f01_0001);
    let source = SourceTable {
        pools: SourcePools {
            spec: &source_spec,
            strings: &source_strings,
        },
        resolver: &resolver,
    };

    let mut spec = MemoryStringPool::new();
    let mut strings = MemoryStringPool::new();
    let mut target = TablePools {
        spec: &mut spec,
        strings: &mut strings,
    };
    let mut options = RecordingOptions::default();
    let mut ours = CompoundEntry::new();
    ours.merge_with_name(&mut options, &theirs, &source, &mut target)
        .expect("merge with name");

    let merged: Vec<(u32, i32)> = ours
        .pairs()
        .iter()
        .map(|pair| (pair.name(), pair.value().data()))
        .collect();
    assert_eq!(
        merged,
        vec![
            (0x7f02_0001, 0x7f02_0001),
            (0x0101_0098, 0x0101_0098),
            (0, 0),
            (0x7f09_0009, 0x7f09_0009),
            (0x0100_0000, 0),
        ]
    );
    assert_eq!(ours.parent_id(), 0x7f02_0001);
    assert_eq!(options.undeclared, vec![0x7f04_0002, 0x7f04_0002]);
    assert_eq!(options.strings, vec!["Accent".to_string()]);
    assert!(options.declared.iter().all(|name| name == "colorAccent"));
}

#[test]
fn entry_merge_handles_null_sides() {
    let mut source_spec = MemoryStringPool::new();
    let mut source_strings = MemoryStringPool::new();
    let mut source_pools = TablePools {
        spec: &mut source_spec,
        strings: &mut source_strings,
    };
    let null_source = Entry::new(0x7f, 0x01, 0x0000);
    let mut theirs = Entry::new(0x7f, 0x01, 0x0001);
    theirs.set_value_as_raw(ValueType::Dec, 9, &mut source_pools);

    let mut spec = MemoryStringPool::new();
    let mut strings = MemoryStringPool::new();
    let mut target = TablePools {
        spec: &mut spec,
        strings: &mut strings,
    };
    let source = SourcePools {
        spec: &source_spec,
        strings: &source_strings,
    };

    let mut ours = Entry::new(0x7f, 0x01, 0x0001);
    assert!(!ours.can_merge(&null_source));
    assert!(!ours.merge(&null_source, source, &mut target).expect("null source"));
    assert!(ours.is_null());

    assert!(ours.can_merge(&theirs));
    assert!(ours.merge(&theirs, source, &mut target).expect("merge into null"));
    assert_eq!(ours.value_type(), Some(ValueType::Dec));

    let err = ours.merge(&theirs, source, &mut target).expect_err("value already defined");
    assert!(matches!(err, ArscError::MergeRejected(_)), "unexpected error: {}", err);

    let table = SourceTable {
        pools: source,
        resolver: &NoResolver,
    };
    let mut options = RecordingOptions::default();
    let mut fresh = Entry::new(0x7f, 0x01, 0x0002);
    let merged = fresh
        .merge_with_name(&mut options, &theirs, &table, &mut target)
        .expect("merge with name into null");
    assert!(merged);
    assert_eq!(fresh.value_type(), Some(ValueType::Dec));
    assert!(options.declared.is_empty());
}
