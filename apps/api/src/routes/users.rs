//! User handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{CreateUserRequest, MessageResponse, UserCreatedResponse, UsersResponse, USER_CREATED, USER_DELETED};
use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /users/`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserCreatedResponse>)> {
    let Json(request) = payload?;
    let user = state.service.create_user(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: USER_CREATED.to_string(),
            user,
        }),
    ))
}

/// `GET /users/`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = state.service.list_users().await?;
    Ok(Json(UsersResponse { users }))
}

/// `DELETE /users/{id}/`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.service.delete_user(&id).await?;
    Ok(Json(MessageResponse::new(USER_DELETED)))
}
