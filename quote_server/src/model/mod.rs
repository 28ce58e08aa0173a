//! Domain models and persistence for the quote server.
//!
//! - `quote_store` — SQLite-backed record of every quote served, with the
//!   `StoredQuote` row type.

pub mod quote_store;
