//! Requesting the quote from the server.
use log::debug;
use quote_common::{Deadline, Quote, QuoteError, Result};
use reqwest::{Client, StatusCode};

/// GET `url` and decode the body as a JSON string.
///
/// Anything but `200 OK` becomes `QuoteError::Response` carrying the body the
/// server sent, so the caller can log the server's own explanation.
pub async fn fetch_quote(client: &Client, url: &str, deadline: Deadline) -> Result<Quote> {
    let mut request = client.get(url);
    if let Some(timeout) = deadline.remaining()? {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let status = response.status();
    debug!("{} answered {}", url, status);

    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return Err(QuoteError::Response {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await?;
    Quote::from_json_body(&body)
}
