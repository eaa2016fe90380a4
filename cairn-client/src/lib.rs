#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! An async HTTP client for Cairn data portal APIs.
//!
//! [`Client`] wraps a configured [`reqwest::Client`] and exposes one operation
//! per portal endpoint: HTML snippets, localization bundles, autocomplete
//! sources, and object-storage metadata. Payload normalization lives in
//! [`cairn_types`]; this crate fetches and wires the two together.

mod client;
mod errors;
pub mod paths;

pub use client::Client;
pub use errors::{FetchError, SetupError};
