//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler → Result<Json<T>, ApiError>                                   │
//! │                                                                         │
//! │  ValidationError ─┐                                                    │
//! │  CoreError ───────┼──► ApiError { code, message, detail } ──► Response │
//! │  DbError ─────────┤                                                    │
//! │  JsonRejection ───┘                                                    │
//! │                                                                         │
//! │  HTTP/1.1 404 Not Found                                                │
//! │  {"error": "Agroquímico no encontrado", "code": "NOT_FOUND"}           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `error` field is always present, so clients that only look at the
//! body keep working. Database internals are logged, never returned.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ruralis_core::{CoreError, ValidationError};
use ruralis_db::DbError;

pub const USER_NOT_FOUND: &str = "Usuario no encontrado";
pub const AGROCHEMICAL_NOT_FOUND: &str = "Agroquímico no encontrado";
pub const INSUFFICIENT_STOCK: &str = "Stock insuficiente";

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "error": "Stock insuficiente",
///   "code": "INSUFFICIENT_STOCK",
///   "detail": "Insufficient stock for Glifosato: available 5, requested 20"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message
    #[serde(rename = "error")]
    pub message: String,

    /// Optional extra context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Unique field already taken (409)
    Duplicate,

    /// Application would overdraw stock (422)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Duplicate => StatusCode::CONFLICT,
            ErrorCode::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            detail: None,
        }
    }

    /// Attaches extra context.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Creates a not found error with a ready-made message.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Not found message for a DbError entity name.
    fn entity_not_found(entity: &str) -> Self {
        match entity {
            "User" => ApiError::not_found(USER_NOT_FOUND),
            "Agrochemical" => ApiError::not_found(AGROCHEMICAL_NOT_FOUND),
            other => ApiError::not_found(format!("{other} no encontrado")),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::entity_not_found(&entity).with_detail(id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{field} '{value}' ya está registrado"),
            ),
            DbError::CheckViolation { message } => {
                tracing::error!("Constraint violation: {}", message);
                ApiError::validation("Valor fuera de rango")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AgrochemicalNotFound(id) => {
                ApiError::not_found(AGROCHEMICAL_NOT_FOUND).with_detail(id)
            }
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, INSUFFICIENT_STOCK)
                    .with_detail(e.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation("Cuerpo JSON inválido").with_detail(rejection.body_text())
    }
}

/// Result type for handlers and the service layer.
pub type ApiResult<T> = Result<T, ApiError>;
