use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dto::{
        message::{MessageResponse, SendMessageRequest},
        validation::ValidatedJson,
    },
    error::AppError,
    services::message_service,
    state::SharedState,
};

/// Direct messages between users.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/messages", post(send_message))
        .route("/api/messages/inbox", get(inbox))
        .route("/api/messages/sent", get(sent))
        .route("/api/messages/{id}/read", patch(mark_read))
}

#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    security(("bearer_auth" = [])),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Recipient is the sender"),
        (status = 404, description = "Unknown recipient")
    )
)]
pub async fn send_message(
    State(state): State<SharedState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let message = message_service::send(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    get,
    path = "/api/messages/inbox",
    tag = "messages",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Received messages, newest first", body = [MessageResponse]))
)]
pub async fn inbox(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    Ok(Json(message_service::inbox(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/messages/sent",
    tag = "messages",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Sent messages, newest first", body = [MessageResponse]))
)]
pub async fn sent(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    Ok(Json(message_service::sent(&state, &user).await?))
}

#[utoipa::path(
    patch,
    path = "/api/messages/{id}/read",
    tag = "messages",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Message marked as read", body = MessageResponse),
        (status = 404, description = "Not a message addressed to the caller")
    )
)]
pub async fn mark_read(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(message_service::mark_read(&state, &user, id).await?))
}
