use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dto::{
        team::{AddMemberRequest, TeamListQuery, TeamNameRequest, TeamResponse},
        validation::ValidatedJson,
    },
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Team rosters and membership management.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/teams", get(list_teams))
        .route(
            "/api/teams/{id}",
            get(get_team).patch(rename_team).delete(delete_team),
        )
        .route("/api/teams/{id}/join", post(request_join))
        .route("/api/teams/{id}/members", post(add_member))
        .route("/api/teams/{id}/members/{user_id}", delete(remove_member))
}

#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "teams",
    params(TeamListQuery),
    responses((status = 200, description = "Teams with their members", body = [TeamResponse]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
    Query(query): Query<TeamListQuery>,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    Ok(Json(team_service::list(&state, query.tournament_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Team with its members", body = TeamResponse),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, AppError> {
    Ok(Json(team_service::get(&state, id).await?))
}

/// Ask the captain for a spot on the team.
#[utoipa::path(
    post,
    path = "/api/teams/{id}/join",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Pending membership recorded", body = TeamResponse),
        (status = 409, description = "Already on a team of this tournament")
    )
)]
pub async fn request_join(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, AppError> {
    Ok(Json(team_service::request_join(&state, &user, id).await?))
}

/// Captain-only: add a participant or promote a pending one.
#[utoipa::path(
    post,
    path = "/api/teams/{id}/members",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team identifier")),
    request_body = AddMemberRequest,
    responses(
        (status = 200, description = "Updated roster", body = TeamResponse),
        (status = 403, description = "Caller is not the captain"),
        (status = 409, description = "Team full or user already placed")
    )
)]
pub async fn add_member(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddMemberRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    Ok(Json(
        team_service::add_member(&state, &user, id, payload.user_id).await?,
    ))
}

/// Remove a member, or leave the team when `user_id` is the caller.
#[utoipa::path(
    delete,
    path = "/api/teams/{id}/members/{user_id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Team identifier"),
        ("user_id" = Uuid, Path, description = "Member to remove")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 403, description = "Caller is not the captain"),
        (status = 409, description = "The captain cannot leave")
    )
)]
pub async fn remove_member(
    State(state): State<SharedState>,
    user: AuthUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    team_service::remove_member(&state, &user, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team identifier")),
    request_body = TeamNameRequest,
    responses((status = 200, description = "Renamed team", body = TeamResponse))
)]
pub async fn rename_team(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<TeamNameRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    Ok(Json(
        team_service::rename(&state, &user, id, payload.name).await?,
    ))
}

/// Disband a team. Captain, tournament creator or admin.
#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team identifier")),
    responses((status = 204, description = "Team deleted"))
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    team_service::delete(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
