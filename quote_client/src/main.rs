//! Quote Client — asks the quote server for the current USD-BRL bid once and
//! writes it to a file as `Dólar: <bid>`.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --url http://localhost:8080/cotacao --output ./cotacao.txt
//! ```
//!
//! The whole run (request, body, decode) must fit in the timeout, measured from
//! process start. There are no retries: any failure is logged and the process
//! exits with status 1. The output file is only created after a quote has been
//! received and decoded, so a failed run leaves any previous file untouched.
#![warn(missing_docs)]
mod args;
mod request;
mod writer;

use crate::args::Args;
use crate::request::fetch_quote;
use crate::writer::write_quote;
use clap::Parser;
use log::{error, info};
use quote_common::{Deadline, Result};
use reqwest::Client;
use std::time::Duration;

/// Fetch, decode and write one quote. Returns the text written to the file.
async fn run(args: &Args, deadline: Deadline) -> Result<String> {
    let client = Client::builder().build()?;
    info!("Requesting quote from {}", args.url);
    let quote = fetch_quote(&client, &args.url, deadline).await?;
    write_quote(&args.output, &quote)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logger();
    let args = Args::parse();
    let deadline = Deadline::after(Duration::from_millis(args.timeout_ms));

    match run(&args, deadline).await {
        Ok(text) => info!("Saved to file: {}", text),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
