//! USD-BRL quote HTTP server.
//!
//! This binary serves `GET /cotacao`. Each request runs a short, strictly ordered
//! pipeline built from three pieces:
//!
//! - `UpstreamFetcher` — fetches the provider's JSON document and extracts
//!   `USDBRL.bid`, bounded by the fetch budget (200 ms by default).
//! - `QuoteStore` — opens (or creates) the SQLite file and appends the quote to
//!   table `cotacao`, bounded by the persist budget (10 ms by default).
//! - `cotacao_handler` — ties both together and answers with the bid as a JSON
//!   string, or `408` and a plain-text message when any step fails.
//!
//! Concurrency:
//! - Requests are served concurrently by axum on the tokio runtime and share no
//!   mutable state; the database file is the only shared resource.
//! - SQLite work runs on tokio's blocking pool and enforces its own deadline.
//!
//! Configuration comes from command-line flags (see `args`) whose defaults are
//! the fixed production values, and from `RUST_LOG` for log filtering.
#![warn(missing_docs)]
use crate::args::Args;
use crate::fetcher::UpstreamFetcher;
use crate::handler::{AppState, router};
use crate::model::quote_store::QuoteStore;
use clap::Parser;
use log::{info, warn};
use quote_common::QuoteError;
use quote_common::Result;

mod args;
mod fetcher;
mod handler;
pub mod model;

#[tokio::main]
async fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let store = QuoteStore::new(&args.db_path);
    log_history(&store);

    let fetcher = UpstreamFetcher::new(&args.upstream_url)?;
    let state = AppState::new(fetcher, store, args.fetch_budget(), args.persist_budget());

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("Server running on {}", listener.local_addr()?);
    info!(
        "Upstream: {} (fetch budget {} ms, persist budget {} ms)",
        args.upstream_url, args.fetch_timeout_ms, args.persist_timeout_ms
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Log what an existing database already holds. A fresh start logs nothing.
fn log_history(store: &QuoteStore) {
    if !store.path().is_file() {
        return;
    }
    match (store.count(), store.latest()) {
        (Ok(count), Ok(Some(latest))) => info!(
            "{} quotes stored in {}; latest #{} = {} at {}",
            count,
            store.path().display(),
            latest.id,
            latest.value,
            latest.date
        ),
        (Ok(_), Ok(None)) => info!("No quotes stored in {} yet", store.path().display()),
        (Err(e), _) | (_, Err(e)) => warn!(
            "Could not read history from {}: {}",
            store.path().display(),
            e
        ),
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
