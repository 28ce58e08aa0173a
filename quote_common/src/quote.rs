//! Quote data model and JSON encoding helpers.
//!
//! A `Quote` is the USD-BRL bid as reported by the upstream provider. The value
//! is an opaque string: nothing checks that it looks like a number or that it
//! is non-empty. It is stored and forwarded exactly as received.
//!
//! Two JSON shapes are involved:
//! - the upstream document, `{"USDBRL": {"bid": "5.4321", ...}, ...}`;
//! - the server's response body, a single JSON string such as `"5.4321"`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::result::Result;

/// Label written in front of the bid in the client's output file.
pub const DISPLAY_LABEL: &str = "Dólar";

/// USD-BRL bid price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quote {
    bid: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamDocument {
    #[serde(rename = "USDBRL")]
    usd_brl: UpstreamRate,
}

#[derive(Debug, Deserialize)]
struct UpstreamRate {
    bid: String,
}

impl Quote {
    /// Wrap an already extracted bid.
    pub fn new(bid: impl Into<String>) -> Self {
        Self { bid: bid.into() }
    }

    /// The bid exactly as received.
    pub fn bid(&self) -> &str {
        &self.bid
    }

    /// Extract `USDBRL.bid` from the upstream provider's document.
    ///
    /// Fails with `QuoteError::Decode` when the body is not JSON, when either key
    /// is missing, or when `bid` is not a string. An empty `bid` is accepted.
    pub fn from_upstream_json(body: &[u8]) -> Result<Quote> {
        let document: UpstreamDocument = serde_json::from_slice(body)?;
        Ok(Quote {
            bid: document.usd_brl.bid,
        })
    }

    /// Decode the server's response body, a single JSON string.
    pub fn from_json_body(body: &[u8]) -> Result<Quote> {
        let bid: String = serde_json::from_slice(body)?;
        Ok(Quote { bid })
    }

    /// Encode the quote as the server's response body (a JSON string).
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }

    /// Same encoding as [`Self::to_json_bytes`], as text. Never empty: an empty
    /// bid encodes to `""`.
    pub fn to_json_string(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json)
    }

    /// Text written to the client's output file, e.g. `Dólar: 5.4321`.
    pub fn display_line(&self) -> String {
        format!("{}: {}", DISPLAY_LABEL, self.bid)
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bid)
    }
}
