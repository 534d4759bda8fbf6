use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::{
        contact::{ContactRequest, ContactResponse},
        validation::ValidatedJson,
    },
    error::AppError,
    services::contact_service,
    state::SharedState,
};

/// Public contact form.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/contacts", post(submit_contact))
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    tag = "contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message received", body = ContactResponse),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn submit_contact(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    let contact = contact_service::submit(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}
