//!
//! Common types and utilities shared by the quote server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `quote` — the `Quote` value and its JSON encodings (upstream document and response body).
//! - `deadline` — explicit, parent-capped time budgets passed down the call chain.
//! - `net` — networking constants and defaults shared by both binaries.
#![warn(missing_docs)]
pub mod deadline;
pub mod error;
pub mod net;
pub mod quote;
pub mod result;

pub use deadline::Deadline;
pub use error::QuoteError;
pub use quote::Quote;
pub use result::Result;
