#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Wire payloads and normalization logic for Cairn data portals.
//!
//! Everything in this crate is synchronous and free of I/O: the parsers take
//! already-fetched payloads and produce canonical values. The HTTP side lives
//! in [`cairn-client`](../cairn_client/index.html).

mod completions;
mod storage;
mod timestamp;

use thiserror::Error;

pub use completions::{
    parse_legacy_identifiers, parse_legacy_objects, Completion, CompletionRecord, RawCompletions,
    ResultSet, ResultSetEnvelope, SelectResults,
};
pub use storage::{Resource, StorageMetadata, RESOURCE_TYPE};
pub use timestamp::normalize_timestamp;

/// Errors that may occur while parsing a completion payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A ResultSet record carried neither a `Name` nor a `Format` field.
    #[error("completion record {index} has neither a Name nor a Format field")]
    EmptyRecord {
        /// Position of the offending record in the `Result` sequence.
        index: usize,
    },

    /// A legacy completion line was not in `display|identifier` form.
    #[error("completion line {0:?} is not in display|identifier form")]
    MalformedLine(String),
}
