use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::game::{GameResponse, TournamentTypeResponse},
    error::AppError,
    services::{game_service, tournament_type_service},
    state::SharedState,
};

/// Public read access to games and tournament formats.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/games", get(list_games))
        .route("/api/games/{id}", get(get_game))
        .route("/api/tournament-types", get(list_tournament_types))
}

#[utoipa::path(
    get,
    path = "/api/games",
    tag = "catalogue",
    responses((status = 200, description = "Games sorted by name", body = [GameResponse]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(game_service::list(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/games/{id}",
    tag = "catalogue",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game", body = GameResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::get(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/tournament-types",
    tag = "catalogue",
    responses((status = 200, description = "Tournament formats", body = [TournamentTypeResponse]))
)]
pub async fn list_tournament_types(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TournamentTypeResponse>>, AppError> {
    Ok(Json(tournament_type_service::list(&state).await?))
}
