use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dto::{
        join_request::{JoinRequestDecision, JoinRequestResponse},
        team::{TeamNameRequest, TeamResponse},
        tournament::{
            CreateTournamentRequest, ParticipantResponse, StatusHistoryEntry,
            TournamentListQuery, TournamentResponse, TournamentStatusRequest,
            UpdateTournamentRequest,
        },
        validation::ValidatedJson,
    },
    error::AppError,
    services::{join_request_service, team_service, tournament_service},
    state::SharedState,
};

/// Tournament CRUD, status history and the tournament-scoped join requests.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/tournaments",
            get(list_tournaments).post(create_tournament),
        )
        .route(
            "/api/tournaments/{id}",
            get(get_tournament)
                .patch(update_tournament)
                .delete(delete_tournament),
        )
        .route(
            "/api/tournaments/{id}/status",
            put(set_tournament_status).patch(set_tournament_status),
        )
        .route("/api/tournaments/{id}/history", get(status_history))
        .route("/api/tournaments/{id}/participants", get(participants))
        .route("/api/tournaments/{id}/join", post(request_join))
        .route("/api/tournaments/{id}/requests", get(list_requests))
        .route(
            "/api/tournaments/{id}/requests/{request_id}",
            patch(decide_request),
        )
        .route("/api/tournaments/{id}/teams", post(create_team))
}

/// List tournaments, optionally narrowed by game and current status.
#[utoipa::path(
    get,
    path = "/api/tournaments",
    tag = "tournaments",
    params(TournamentListQuery),
    responses((status = 200, description = "Tournaments, newest first", body = [TournamentResponse]))
)]
pub async fn list_tournaments(
    State(state): State<SharedState>,
    Query(query): Query<TournamentListQuery>,
) -> Result<Json<Vec<TournamentResponse>>, AppError> {
    Ok(Json(tournament_service::list(&state, query).await?))
}

/// Create a tournament owned by the caller.
#[utoipa::path(
    post,
    path = "/api/tournaments",
    tag = "tournaments",
    security(("bearer_auth" = [])),
    request_body = CreateTournamentRequest,
    responses(
        (status = 201, description = "Tournament created", body = TournamentResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown game or tournament type")
    )
)]
pub async fn create_tournament(
    State(state): State<SharedState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<TournamentResponse>), AppError> {
    let created = tournament_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}",
    tag = "tournaments",
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    responses(
        (status = 200, description = "Tournament", body = TournamentResponse),
        (status = 404, description = "Unknown tournament")
    )
)]
pub async fn get_tournament(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TournamentResponse>, AppError> {
    Ok(Json(tournament_service::get(&state, id).await?))
}

/// Partially update a tournament. Creator or admin only.
#[utoipa::path(
    patch,
    path = "/api/tournaments/{id}",
    tag = "tournaments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    request_body = UpdateTournamentRequest,
    responses(
        (status = 200, description = "Updated tournament", body = TournamentResponse),
        (status = 403, description = "Not the creator"),
        (status = 409, description = "Capacity below the current participant count")
    )
)]
pub async fn update_tournament(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTournamentRequest>,
) -> Result<Json<TournamentResponse>, AppError> {
    Ok(Json(
        tournament_service::update(&state, &user, id, payload).await?,
    ))
}

/// Delete a tournament with everything it owns.
#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}",
    tag = "tournaments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    responses(
        (status = 204, description = "Tournament deleted"),
        (status = 403, description = "Not the creator")
    )
)]
pub async fn delete_tournament(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tournament_service::delete(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a status change and notify the participants.
#[utoipa::path(
    put,
    path = "/api/tournaments/{id}/status",
    tag = "tournaments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    request_body = TournamentStatusRequest,
    responses((status = 200, description = "Tournament with its new status", body = TournamentResponse))
)]
pub async fn set_tournament_status(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<TournamentStatusRequest>,
) -> Result<Json<TournamentResponse>, AppError> {
    Ok(Json(
        tournament_service::set_status(&state, &user, id, payload.status).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/history",
    tag = "tournaments",
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    responses((status = 200, description = "Status history, oldest first", body = [StatusHistoryEntry]))
)]
pub async fn status_history(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StatusHistoryEntry>>, AppError> {
    Ok(Json(tournament_service::status_history(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/participants",
    tag = "tournaments",
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    responses((status = 200, description = "Accepted participants", body = [ParticipantResponse]))
)]
pub async fn participants(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ParticipantResponse>>, AppError> {
    Ok(Json(tournament_service::participants(&state, id).await?))
}

/// Ask to take part in a tournament.
#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/join",
    tag = "join-requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    responses(
        (status = 201, description = "Request pending", body = JoinRequestResponse),
        (status = 409, description = "Already requested or registration closed")
    )
)]
pub async fn request_join(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<JoinRequestResponse>), AppError> {
    let request = join_request_service::request_join(&state, &user, id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Join requests of a tournament, for its creator or an admin.
#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/requests",
    tag = "join-requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    responses((status = 200, description = "Join requests", body = [JoinRequestResponse]))
)]
pub async fn list_requests(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<JoinRequestResponse>>, AppError> {
    Ok(Json(
        join_request_service::list_for_tournament(&state, &user, id).await?,
    ))
}

/// Accept or reject a join request of this tournament.
#[utoipa::path(
    patch,
    path = "/api/tournaments/{id}/requests/{request_id}",
    tag = "join-requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Tournament identifier"),
        ("request_id" = Uuid, Path, description = "Join request identifier")
    ),
    request_body = JoinRequestDecision,
    responses(
        (status = 200, description = "Updated request", body = JoinRequestResponse),
        (status = 400, description = "Target status is not accepted or rejected"),
        (status = 403, description = "Not the creator"),
        (status = 409, description = "Invalid transition or tournament full")
    )
)]
pub async fn decide_request(
    State(state): State<SharedState>,
    user: AuthUser,
    Path((id, request_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<JoinRequestDecision>,
) -> Result<Json<JoinRequestResponse>, AppError> {
    Ok(Json(
        join_request_service::set_status_in(&state, &user, id, request_id, payload.status).await?,
    ))
}

/// Found a team inside the tournament; the caller becomes captain.
#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/teams",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    request_body = TeamNameRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 403, description = "Caller is not a participant"),
        (status = 409, description = "Name taken or caller already on a team")
    )
)]
pub async fn create_team(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<TeamNameRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), AppError> {
    let team = team_service::create(&state, &user, id, payload.name).await?;
    Ok((StatusCode::CREATED, Json(team)))
}
