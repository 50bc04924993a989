//! Record layer for the entries of a resource table type chunk.
//!
//! # Module Organization
//!
//! - [`value_header`]: Entry header in its normal, map and compact layouts
//! - [`typed_value`]: Self-sized `Res_value`
//! - [`map_pair`]: Name/value pair of a compound entry
//! - [`table_entry`]: Scalar or compound entry with merge and classification
//! - [`entry`]: Resource slot owning an optional table entry
//!
//! # Architecture
//!
//! ```text
//! Scalar entry:                 Compound entry:
//! ┌──────────────────┐          ┌──────────────────┐
//! │ ValueHeader (8)  │          │ ValueHeader (16) │ ← key, parent, count
//! ├──────────────────┤          ├──────────────────┤
//! │ TypedValue (8+)  │          │ MapPair × count  │ ← u32 name + TypedValue
//! └──────────────────┘          └──────────────────┘
//!
//! Compact scalar:
//! ┌──────────────────────────────────────┐
//! │ u16 key │ flags │ type │ i32 data    │  (no value block)
//! └──────────────────────────────────────┘
//! ```

pub mod entry;
pub mod map_pair;
pub mod table_entry;
pub mod typed_value;
pub mod value_header;
