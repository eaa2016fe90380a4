//! Error types reported by the client.

use cairn_types::ParseError;
use thiserror::Error;

/// Errors that may occur while constructing a [`Client`](crate::Client).
#[derive(Debug, Error)]
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
pub enum SetupError {
    #[error("The client cannot be built from the current configuration")]
    InvalidConfiguration(#[source] anyhow::Error),

    #[error("There was a network error while setting up the client")]
    Network(#[source] anyhow::Error),
}

/// Errors that may occur while performing a fetch operation.
#[derive(Debug, Error)]
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
pub enum FetchError {
    /// Raised synchronously, before any request is issued.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Connection failures and non-2xx statuses. Never retried.
    #[error("There was a network error while talking to the portal")]
    Network(#[source] anyhow::Error),

    /// A response body that does not decode as the expected shape.
    #[error("The response body was not in the expected format")]
    Format(#[source] anyhow::Error),

    /// A completion payload that decodes, but violates the completion format.
    #[error("The completion payload could not be parsed")]
    Parse(#[from] ParseError),
}
