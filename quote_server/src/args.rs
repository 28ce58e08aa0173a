//! Command-line arguments for the quote server.
//!
//! Every flag defaults to the fixed production values, so running the binary
//! without arguments serves `/cotacao` on port 8080 backed by `cotacao.db`.
use clap::Parser;
use quote_common::net::{
    self, DB_PATH, FETCH_TIMEOUT_MS, PERSIST_TIMEOUT_MS, SERVER_PORT, UPSTREAM_URL,
};
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address the HTTP listener binds to.
    #[clap(long, default_value_t = net::addr("0.0.0.0", SERVER_PORT))]
    pub bind: String,

    /// Upstream endpoint returning the USD-BRL document.
    #[clap(long, default_value = UPSTREAM_URL)]
    pub upstream_url: String,

    /// SQLite file where every served quote is recorded. Created if absent.
    #[clap(long, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Budget for the upstream call, in milliseconds from request arrival.
    #[clap(long, default_value_t = FETCH_TIMEOUT_MS)]
    pub fetch_timeout_ms: u64,

    /// Budget for opening the database and inserting the quote, in milliseconds.
    #[clap(long, default_value_t = PERSIST_TIMEOUT_MS)]
    pub persist_timeout_ms: u64,
}

impl Args {
    pub fn fetch_budget(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn persist_budget(&self) -> Duration {
        Duration::from_millis(self.persist_timeout_ms)
    }
}
