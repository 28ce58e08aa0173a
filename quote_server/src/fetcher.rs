//! Upstream exchange-rate fetcher.
//!
//! One GET per call, bounded by the caller's deadline. No retries: a slow or
//! broken provider fails the request that triggered the fetch.
use log::debug;
use quote_common::{Deadline, Quote, Result};
use reqwest::Client;

/// HTTP client bound to the upstream provider's URL.
pub struct UpstreamFetcher {
    client: Client,
    url: String,
}

impl UpstreamFetcher {
    /// Build a fetcher for `url`.
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Fetch the document and extract `USDBRL.bid`.
    ///
    /// The whole exchange, body included, must finish before `deadline`. An
    /// already expired deadline fails without sending anything. The upstream
    /// status code is not inspected; an error page fails at decode time.
    pub async fn fetch(&self, deadline: Deadline) -> Result<Quote> {
        let mut request = self.client.get(&self.url);
        if let Some(timeout) = deadline.remaining()? {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        debug!("Upstream {} answered {}", self.url, response.status());
        let body = response.bytes().await?;

        Quote::from_upstream_json(&body)
    }
}
