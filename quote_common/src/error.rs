//! Error types shared between client and server.
//!
//! The `QuoteError` enum covers every way a quote can fail to travel from the
//! upstream provider to the client's output file: transport and deadline
//! failures, undecodable JSON, database failures and non-200 responses.
//! Callers never branch on the variant to pick an HTTP status; the variants
//! exist so logs say what actually went wrong.
use std::io;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Network failure while reaching the upstream provider or the quote server.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A deadline expired before the operation finished.
    #[error("Deadline exceeded: {0}")]
    Timeout(String),

    /// Malformed JSON or a document without the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Failure while opening the database, creating the table or inserting a row.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The quote server answered with something other than `200 OK`.
    #[error("Server returned error: {body} (status code: {status})")]
    Response {
        /// HTTP status code received.
        status: u16,
        /// Response body, kept verbatim for the log line.
        body: String,
    },

    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Decode(err.to_string())
    }
}

/// Timeouts raised by `reqwest` are reported as deadline failures, everything
/// else as a transport failure.
impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuoteError::Timeout(err.to_string())
        } else if err.is_decode() {
            QuoteError::Decode(err.to_string())
        } else {
            QuoteError::Transport(err.to_string())
        }
    }
}
