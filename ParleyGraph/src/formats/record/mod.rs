//! Flat record format module
//!
//! The on-disk contract written by the dialogue editor: one JSON object per
//! dialogue, with scalar counts (`playerDiags`, `npcDiags`, `actionNodes`),
//! the `startPoint` ID, and per-node indexed field families (`pd_*`, `nd_*`,
//! `ac_*`). Reference fields use `-1` as the null sentinel.

mod reader;
mod writer;
mod document;

pub use document::{RecordDocument, RecordValue};
pub use reader::{read_record, parse_record};
pub use writer::{write_record, serialize_record};
