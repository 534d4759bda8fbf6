use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser, dto::join_request::JoinRequestResponse, error::AppError,
    services::join_request_service, state::SharedState,
};

/// The caller's own join requests.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/join-requests", get(list_mine))
        .route("/api/join-requests/{id}", delete(cancel_mine))
}

#[utoipa::path(
    get,
    path = "/api/join-requests",
    tag = "join-requests",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Requests made by the caller", body = [JoinRequestResponse]))
)]
pub async fn list_mine(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<Vec<JoinRequestResponse>>, AppError> {
    Ok(Json(join_request_service::list_mine(&state, &user).await?))
}

/// Withdraw a pending request.
#[utoipa::path(
    delete,
    path = "/api/join-requests/{id}",
    tag = "join-requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Join request identifier")),
    responses(
        (status = 204, description = "Request withdrawn"),
        (status = 409, description = "Request is no longer pending")
    )
)]
pub async fn cancel_mine(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    join_request_service::cancel_mine(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
