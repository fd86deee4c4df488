//! # HTTP Routes
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │  POST   /users/                        users::create_user               │
//! │  GET    /users/                        users::list_users                │
//! │  DELETE /users/{id}/                   users::delete_user               │
//! │  POST   /agroquimicos/                 agrochemicals::create            │
//! │  GET    /agroquimicos/                 agrochemicals::list              │
//! │  DELETE /agroquimicos/{id}/            agrochemicals::delete            │
//! │  POST   /agroquimicos/{id}/aplicar/    agrochemicals::apply             │
//! │  GET    /agroquimicos/gastos/          reports::list_expenses           │
//! │  GET    /reportes/costo-total/         reports::total_cost              │
//! │  GET    /health                        health::health                   │
//! │  GET    /openapi.json                  openapi::openapi                 │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every path is served with and without the trailing slash.

use axum::http::Uri;
use axum::routing::{delete, get, post, MethodRouter};
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

pub mod agrochemicals;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod users;

/// Registers `path` and its trailing-slash twin.
fn route_both(router: Router<AppState>, path: &str, method: MethodRouter<AppState>) -> Router<AppState> {
    let trimmed = path.trim_end_matches('/');
    router
        .route(trimmed, method.clone())
        .route(&format!("{trimmed}/"), method)
}

/// Builds the API router (without middleware).
pub fn router() -> Router<AppState> {
    let mut router = Router::new();

    router = route_both(router, "/users/", post(users::create_user).get(users::list_users));
    router = route_both(router, "/users/{id}/", delete(users::delete_user));

    router = route_both(
        router,
        "/agroquimicos/",
        post(agrochemicals::create).get(agrochemicals::list),
    );
    router = route_both(router, "/agroquimicos/gastos/", get(reports::list_expenses));
    router = route_both(router, "/agroquimicos/{id}/", delete(agrochemicals::delete));
    router = route_both(router, "/agroquimicos/{id}/aplicar/", post(agrochemicals::apply));

    router = route_both(router, "/reportes/costo-total/", get(reports::total_cost));

    router
        .route("/health", get(health::health))
        .route("/openapi.json", get(openapi::openapi))
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found("Ruta no encontrada").with_detail(uri.path().to_string())
}
