//! # Ruralis API
//!
//! HTTP layer over the agrochemical inventory.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Request Path                                    │
//! │                                                                         │
//! │  HTTP ──► TraceLayer ──► routes/* ──► AgroService ──► ruralis-db        │
//! │                              │             │                            │
//! │                              │             └──► RateProvider (exchange) │
//! │                              ▼                                          │
//! │                        dto.rs / error.rs  (wire shapes, error bodies)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Layered configuration (defaults, TOML, env)
//! - [`exchange`] - ARS → USD rate providers
//! - [`service`] - Domain orchestration
//! - [`routes`] - axum handlers
//! - [`dto`] - Request/response bodies
//! - [`error`] - `ApiError` and its HTTP rendering

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod dto;
pub mod error;
pub mod exchange;
pub mod routes;
pub mod service;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use exchange::{FixedRate, HttpRateProvider, RateProvider};
pub use service::AgroService;
pub use state::AppState;

/// Builds the complete application: routes, state and HTTP tracing.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{app, AppState, FixedRate};
    use ruralis_core::ExchangeRate;
    use ruralis_db::{Database, DbConfig};

    /// App over a fresh in-memory database and a fixed 0.001 rate.
    pub async fn test_app_with_state() -> (Router, AppState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let rates = FixedRate(ExchangeRate::new(0.001).unwrap());
        let state = AppState::new(db, Arc::new(rates));
        (app(state.clone()), state)
    }

    pub async fn test_app() -> Router {
        test_app_with_state().await.0
    }

    /// Sends one request and returns the status and JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }
}
