use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    auth::AuthUser,
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        user::{UpdateMeRequest, UserResponse},
        validation::ValidatedJson,
    },
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Account registration and session endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me).patch(update_me))
}

/// Create an account and return a session token for it.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let session = auth_service::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(auth_service::login(&state, payload).await?))
}

/// Revoke the session carried by the bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses((status = 204, description = "Session revoked"))
)]
pub async fn logout(State(state): State<SharedState>, user: AuthUser) -> StatusCode {
    auth_service::logout(&state, &user);
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Current profile", body = UserResponse))
)]
pub async fn me(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(auth_service::me(&state, &user).await?))
}

/// Change the caller's username or password.
#[utoipa::path(
    patch,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = UpdateMeRequest,
    responses((status = 200, description = "Updated profile", body = UserResponse))
)]
pub async fn update_me(
    State(state): State<SharedState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(auth_service::update_me(&state, &user, payload).await?))
}
