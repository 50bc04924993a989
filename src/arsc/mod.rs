//! Entry-level codec for compiled Android resource tables.

pub mod codec;
pub mod config;
pub mod format;
pub mod merge;
pub mod pool;
pub mod types;
pub mod utils;

pub use config::{ResConfig, QualifierParse};
pub use format::entry::Entry;
pub use format::table_entry::{CompoundEntry, ScalarEntry, TableEntry};
pub use merge::{MergeOptions, ResourceRef, ResourceResolver, SourceTable};
pub use pool::{MemoryStringPool, PoolString, SourcePools, StringPool, TablePools};
pub use types::error::{ArscError, Result};
