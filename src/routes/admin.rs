use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, require_admin},
    dto::{
        admin::StatsResponse,
        contact::{ContactResponse, ContactStatusRequest},
        game::{GameInput, GameResponse, TournamentTypeInput, TournamentTypeResponse},
        join_request::{JoinRequestDecision, JoinRequestListQuery, JoinRequestResponse},
        message::MessageResponse,
        notification::{BroadcastRequest, BroadcastResponse},
        team::TeamResponse,
        tournament::{TournamentListQuery, TournamentResponse},
        user::{AdminUpdateUserRequest, UserResponse},
        validation::ValidatedJson,
    },
    error::AppError,
    services::{
        admin_service, contact_service, game_service, join_request_service, message_service,
        notification_service, team_service, tournament_service, tournament_type_service,
        user_service,
    },
    state::SharedState,
};

/// Back-office endpoints. Every route requires an admin session.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/api/admin/stats", get(stats))
        .route("/api/admin/users", get(list_users))
        .route(
            "/api/admin/users/{id}",
            patch(update_user).delete(delete_user),
        )
        .route("/api/admin/games", post(create_game))
        .route("/api/admin/games/{id}", put(replace_game).delete(delete_game))
        .route("/api/admin/tournament-types", post(create_tournament_type))
        .route(
            "/api/admin/tournament-types/{id}",
            delete(delete_tournament_type),
        )
        .route("/api/admin/tournaments", get(list_tournaments))
        .route("/api/admin/tournaments/{id}", delete(delete_tournament))
        .route("/api/admin/requests", get(list_requests))
        .route(
            "/api/admin/requests/{id}",
            patch(decide_request).delete(delete_request),
        )
        .route("/api/admin/teams", get(list_teams))
        .route("/api/admin/teams/{id}", delete(delete_team))
        .route("/api/admin/contacts", get(list_contacts))
        .route(
            "/api/admin/contacts/{id}",
            patch(set_contact_status).delete(delete_contact),
        )
        .route("/api/admin/messages", get(list_messages))
        .route("/api/admin/messages/{id}", delete(delete_message))
        .route("/api/admin/notifications", post(broadcast))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

/// Row counts for the dashboard.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = StatsResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn stats(State(state): State<SharedState>) -> Result<Json<StatsResponse>, AppError> {
    Ok(Json(admin_service::stats(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Every account", body = [UserResponse]))
)]
pub async fn list_users(
    State(state): State<SharedState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    Ok(Json(user_service::list(&state).await?))
}

/// Rename an account or change its role.
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 409, description = "Admins cannot demote themselves")
    )
)]
pub async fn update_user(
    State(state): State<SharedState>,
    admin: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdminUpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(user_service::update(&state, &admin, id, payload).await?))
}

/// Delete an account and its requests, memberships, notifications and messages.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 409, description = "User still owns tournaments or captains teams")
    )
)]
pub async fn delete_user(
    State(state): State<SharedState>,
    admin: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user_service::delete(&state, &admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/games",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = GameInput,
    responses(
        (status = 201, description = "Game created", body = GameResponse),
        (status = 409, description = "Name already used")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<GameInput>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    let game = game_service::create(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

#[utoipa::path(
    put,
    path = "/api/admin/games/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = GameInput,
    responses((status = 200, description = "Game replaced", body = GameResponse))
)]
pub async fn replace_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<GameInput>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::replace(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/games/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 409, description = "Game still referenced by tournaments")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/tournament-types",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = TournamentTypeInput,
    responses((status = 201, description = "Tournament type created", body = TournamentTypeResponse))
)]
pub async fn create_tournament_type(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<TournamentTypeInput>,
) -> Result<(StatusCode, Json<TournamentTypeResponse>), AppError> {
    let kind = tournament_type_service::create(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(kind)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/tournament-types/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tournament type identifier")),
    responses((status = 204, description = "Tournament type deleted"))
)]
pub async fn delete_tournament_type(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tournament_type_service::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/tournaments",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Every tournament", body = [TournamentResponse]))
)]
pub async fn list_tournaments(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TournamentResponse>>, AppError> {
    Ok(Json(
        tournament_service::list(&state, TournamentListQuery::default()).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/tournaments/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tournament identifier")),
    responses((status = 204, description = "Tournament and everything it owns deleted"))
)]
pub async fn delete_tournament(
    State(state): State<SharedState>,
    admin: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tournament_service::delete(&state, &admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/requests",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(JoinRequestListQuery),
    responses((status = 200, description = "Join requests", body = [JoinRequestResponse]))
)]
pub async fn list_requests(
    State(state): State<SharedState>,
    Query(query): Query<JoinRequestListQuery>,
) -> Result<Json<Vec<JoinRequestResponse>>, AppError> {
    Ok(Json(join_request_service::list_all(&state, query.status).await?))
}

/// Accept or reject any join request.
#[utoipa::path(
    patch,
    path = "/api/admin/requests/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Join request identifier")),
    request_body = JoinRequestDecision,
    responses(
        (status = 200, description = "Updated request", body = JoinRequestResponse),
        (status = 409, description = "Invalid transition or tournament full")
    )
)]
pub async fn decide_request(
    State(state): State<SharedState>,
    admin: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<JoinRequestDecision>,
) -> Result<Json<JoinRequestResponse>, AppError> {
    Ok(Json(
        join_request_service::set_status(&state, &admin, id, payload.status).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/requests/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Join request identifier")),
    responses((status = 204, description = "Request deleted, participant removed if it was accepted"))
)]
pub async fn delete_request(
    State(state): State<SharedState>,
    admin: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    join_request_service::delete_request(&state, &admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/teams",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Every team", body = [TeamResponse]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    Ok(Json(team_service::list(&state, None).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/teams/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team identifier")),
    responses((status = 204, description = "Team deleted"))
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    admin: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    team_service::delete(&state, &admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/contacts",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Contact submissions, newest first", body = [ContactResponse]))
)]
pub async fn list_contacts(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    Ok(Json(contact_service::list(&state).await?))
}

#[utoipa::path(
    patch,
    path = "/api/admin/contacts/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Contact identifier")),
    request_body = ContactStatusRequest,
    responses((status = 204, description = "Status updated"))
)]
pub async fn set_contact_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ContactStatusRequest>,
) -> Result<StatusCode, AppError> {
    contact_service::set_status(&state, id, payload.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/admin/contacts/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Contact identifier")),
    responses((status = 204, description = "Contact deleted"))
)]
pub async fn delete_contact(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    contact_service::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/messages",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Every direct message, newest first", body = [MessageResponse]))
)]
pub async fn list_messages(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    Ok(Json(message_service::list_all(&state).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/messages/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Message identifier")),
    responses((status = 204, description = "Message deleted"))
)]
pub async fn delete_message(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    message_service::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Push a `system` notification to every account or to the listed ones.
#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = BroadcastRequest,
    responses((status = 200, description = "Number of notifications stored", body = BroadcastResponse))
)]
pub async fn broadcast(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, AppError> {
    Ok(Json(notification_service::broadcast(&state, payload).await?))
}
