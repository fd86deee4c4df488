//! Machine-readable API description.

use axum::http::header;
use axum::response::IntoResponse;

/// OpenAPI 3 document, checked in next to the crate manifest.
pub const OPENAPI_DOCUMENT: &str = include_str!("../../openapi/openapi.json");

/// `GET /openapi.json`
pub async fn openapi() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], OPENAPI_DOCUMENT)
}
