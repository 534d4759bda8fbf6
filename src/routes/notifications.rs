use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dto::notification::{
        MarkAllReadResponse, NotificationListQuery, NotificationResponse, UnreadCountResponse,
    },
    error::AppError,
    services::notification_service,
    state::SharedState,
};

/// The caller's notification inbox.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/unread-count", get(unread_count))
        .route("/api/notifications/read-all", patch(mark_all_read))
        .route("/api/notifications/{id}/read", patch(mark_read))
        .route("/api/notifications/{id}", delete(delete_notification))
}

/// Newest first, capped by the configured listing limit.
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(NotificationListQuery),
    responses((status = 200, description = "Notifications, newest first", body = [NotificationResponse]))
)]
pub async fn list_notifications(
    State(state): State<SharedState>,
    user: AuthUser,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    Ok(Json(
        notification_service::list_mine(&state, &user, query.unread_only).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Number of unread notifications", body = UnreadCountResponse))
)]
pub async fn unread_count(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    Ok(Json(notification_service::unread_count(&state, &user).await?))
}

#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notification identifier")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 404, description = "Not one of the caller's notifications")
    )
)]
pub async fn mark_read(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    notification_service::mark_read(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/notifications/read-all",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Number of notifications updated", body = MarkAllReadResponse))
)]
pub async fn mark_all_read(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    Ok(Json(notification_service::mark_all_read(&state, &user).await?))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notification identifier")),
    responses((status = 204, description = "Notification deleted"))
)]
pub async fn delete_notification(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    notification_service::delete(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
