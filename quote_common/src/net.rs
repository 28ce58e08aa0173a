//! Shared networking constants and defaults used by client and server.

/// TCP port the quote server listens on.
pub const SERVER_PORT: u16 = 8080;
/// Route serving the latest exchange rate.
pub const QUOTE_PATH: &str = "/cotacao";
/// Upstream provider returning the USD-BRL document.
pub const UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";

/// Budget for the upstream fetch, measured from request arrival.
pub const FETCH_TIMEOUT_MS: u64 = 200;
/// Budget for opening the database and inserting one row.
pub const PERSIST_TIMEOUT_MS: u64 = 10;
/// Overall budget of a client run.
pub const CLIENT_TIMEOUT_MS: u64 = 300;

/// SQLite file written by the server.
pub const DB_PATH: &str = "cotacao.db";
/// File written by the client.
pub const OUTPUT_PATH: &str = "cotacao.txt";

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Full URL of the quote route on a server reachable at `host:port`.
pub fn quote_url(host: &str, port: u16) -> String {
    format!("http://{}{}", addr(host, port), QUOTE_PATH)
}
