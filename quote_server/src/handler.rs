//! `GET /cotacao`: fetch the bid upstream, record it, return it.
//!
//! The three steps run strictly in order and the first failure ends the
//! request. Every failure, whatever its cause, is answered with
//! `408 Request Timeout` and a plain-text message; callers cannot tell a slow
//! provider from a broken database, and that status is part of the contract.
use crate::fetcher::UpstreamFetcher;
use crate::model::quote_store::{QuoteStore, StoredQuote};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{debug, error, info};
use quote_common::net::QUOTE_PATH;
use quote_common::{Deadline, Quote, QuoteError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<UpstreamFetcher>,
    store: QuoteStore,
    fetch_budget: Duration,
    persist_budget: Duration,
}

impl AppState {
    pub fn new(
        fetcher: UpstreamFetcher,
        store: QuoteStore,
        fetch_budget: Duration,
        persist_budget: Duration,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            store,
            fetch_budget,
            persist_budget,
        }
    }
}

/// Route table of the quote server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(QUOTE_PATH, get(cotacao_handler))
        .with_state(state)
}

/// Handler for `GET /cotacao`.
pub async fn cotacao_handler(State(state): State<AppState>) -> Response {
    // Inbound requests carry no deadline of their own; each step gets a budget
    // measured from the moment it starts.
    let request = Deadline::unbounded();

    let quote = match state.fetcher.fetch(request.child(state.fetch_budget)).await {
        Ok(quote) => quote,
        Err(e) => return failure(format!("Failed to get exchange rate: {}", e)),
    };
    debug!("Fetched exchange rate: {}", quote);

    match persist(&state.store, &quote, request.child(state.persist_budget)).await {
        Ok(row) => debug!("Stored quote #{} at {}", row.id, row.date),
        Err(e) => return failure(format!("Failed to save to DB: {}", e)),
    }

    match quote.to_json_bytes() {
        Ok(body) => {
            info!("Exchange rate sent: {}", quote);
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(e) => failure(format!("Failed to encode exchange rate: {}", e)),
    }
}

/// Run the blocking insert off the async workers.
async fn persist(store: &QuoteStore, quote: &Quote, deadline: Deadline) -> Result<StoredQuote> {
    let store = store.clone();
    let quote = quote.clone();
    tokio::task::spawn_blocking(move || store.insert(&quote, deadline))
        .await
        .map_err(|e| QuoteError::Persistence(format!("database worker failed: {}", e)))?
}

fn failure(message: String) -> Response {
    error!("{}", message);
    (StatusCode::REQUEST_TIMEOUT, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use tempfile::{TempDir, tempdir};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "USDBRL": {
            "code": "USD",
            "codein": "BRL",
            "bid": "5.4321",
            "ask": "5.4331"
        }
    }"#;

    async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/last/USD-BRL"))
            .respond_with(response)
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn build_app(upstream: &MockServer, store: QuoteStore, fetch_budget: Duration) -> Router {
        let fetcher =
            UpstreamFetcher::new(&format!("{}/json/last/USD-BRL", upstream.uri())).unwrap();
        router(AppState::new(
            fetcher,
            store,
            fetch_budget,
            Duration::from_secs(5),
        ))
    }

    fn temp_store() -> (TempDir, QuoteStore) {
        let dir = tempdir().unwrap();
        let store = QuoteStore::new(dir.path().join("cotacao.db"));
        (dir, store)
    }

    async fn get_cotacao(app: Router) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(QUOTE_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test_log::test(tokio::test)]
    async fn test_success_returns_bid_and_stores_one_row() {
        let upstream =
            create_mock_server(ResponseTemplate::new(200).set_body_string(MOCK_JSON)).await;
        let (_dir, store) = temp_store();
        let app = build_app(&upstream, store.clone(), Duration::from_secs(5));

        let (status, body) = get_cotacao(app).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#""5.4321""#);
        assert_eq!(Quote::from_json_body(body.as_bytes()).unwrap().bid(), "5.4321");
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.latest().unwrap().unwrap().value, body);
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_bid_is_served_and_stored() {
        let upstream = create_mock_server(
            ResponseTemplate::new(200).set_body_string(r#"{"USDBRL": {"bid": ""}}"#),
        )
        .await;
        let (_dir, store) = temp_store();
        let app = build_app(&upstream, store.clone(), Duration::from_secs(5));

        let (status, body) = get_cotacao(app).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#""""#);
        assert_eq!(Quote::from_json_body(body.as_bytes()).unwrap().bid(), "");
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.latest().unwrap().unwrap().value, body);
    }

    #[test_log::test(tokio::test)]
    async fn test_each_success_adds_exactly_one_row() {
        let upstream =
            create_mock_server(ResponseTemplate::new(200).set_body_string(MOCK_JSON)).await;
        let (_dir, store) = temp_store();
        let app = build_app(&upstream, store.clone(), Duration::from_secs(5));

        for expected in 1..=4 {
            let (status, _) = get_cotacao(app.clone()).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(store.count().unwrap(), expected);
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_slow_upstream_is_408_without_row() {
        let upstream = create_mock_server(
            ResponseTemplate::new(200)
                .set_body_string(MOCK_JSON)
                .set_delay(Duration::from_millis(500)),
        )
        .await;
        let (dir, store) = temp_store();
        let app = build_app(&upstream, store, Duration::from_millis(50));

        let (status, body) = get_cotacao(app).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(body.starts_with("Failed to get exchange rate:"), "{body}");
        // Persistence was never attempted, so the file was never created.
        assert!(!dir.path().join("cotacao.db").exists());
    }

    #[test_log::test(tokio::test)]
    async fn test_malformed_upstream_is_408() {
        let upstream = create_mock_server(
            ResponseTemplate::new(200).set_body_string(r#"{"USDBRL": {"ask": "5.4331"}}"#),
        )
        .await;
        let (dir, store) = temp_store();
        let app = build_app(&upstream, store, Duration::from_secs(5));

        let (status, body) = get_cotacao(app).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(body.starts_with("Failed to get exchange rate:"), "{body}");
        assert!(!dir.path().join("cotacao.db").exists());
    }

    #[test_log::test(tokio::test)]
    async fn test_persist_failure_is_408_and_hides_quote() {
        let upstream =
            create_mock_server(ResponseTemplate::new(200).set_body_string(MOCK_JSON)).await;
        let dir = tempdir().unwrap();
        // The directory itself is not a usable database file.
        let app = build_app(&upstream, QuoteStore::new(dir.path()), Duration::from_secs(5));

        let (status, body) = get_cotacao(app).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(body.starts_with("Failed to save to DB:"), "{body}");
        assert!(!body.contains("5.4321"));
    }

    #[test_log::test(tokio::test)]
    async fn test_persist_timeout_is_408_without_row() {
        let upstream =
            create_mock_server(ResponseTemplate::new(200).set_body_string(MOCK_JSON)).await;
        let (_dir, store) = temp_store();
        let fetcher =
            UpstreamFetcher::new(&format!("{}/json/last/USD-BRL", upstream.uri())).unwrap();
        let app = router(AppState::new(
            fetcher,
            store.clone(),
            Duration::from_secs(5),
            Duration::ZERO,
        ));

        let (status, body) = get_cotacao(app).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(body.starts_with("Failed to save to DB:"), "{body}");
        assert!(!body.contains("5.4321"));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_other_methods_are_rejected() {
        let upstream =
            create_mock_server(ResponseTemplate::new(200).set_body_string(MOCK_JSON)).await;
        let (_dir, store) = temp_store();
        let app = build_app(&upstream, store, Duration::from_secs(5));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(QUOTE_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
