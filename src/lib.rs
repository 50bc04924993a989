//! # arsc-entry
//!
//! Codec and in-memory model for the entries of a compiled Android resource
//! table (`resources.arsc`): scalar and compound entries, typed values,
//! resource configurations with their qualifier strings, and cross-table merge.
pub mod arsc;

// Re-export the main types for convenience
pub use arsc::{
    ArscError,
    Entry,
    MemoryStringPool,
    ResConfig,
    Result,
    TableEntry,
    codec::cursor::BlockReader,
    types::models::{
        AttributeDataFormat,
        AttributeType,
        ValueType
    },
};
