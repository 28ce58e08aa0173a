//! Command-line arguments for the quote client.
//!
//! This module defines the CLI interface using `clap`. Defaults reproduce the
//! fixed behaviour: ask the local server, write `cotacao.txt`, give up after 300 ms.
use clap::Parser;
use quote_common::net::{self, CLIENT_TIMEOUT_MS, OUTPUT_PATH, SERVER_PORT};
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Quote endpoint of the server.
    #[clap(long, default_value_t = net::quote_url("localhost", SERVER_PORT))]
    pub url: String,

    /// File receiving the formatted quote. Overwritten on success only.
    #[clap(long, default_value = OUTPUT_PATH)]
    pub output: PathBuf,

    /// Overall budget for the run, in milliseconds from process start.
    #[clap(long, default_value_t = CLIENT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}
