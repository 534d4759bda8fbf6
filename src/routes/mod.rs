use axum::Router;

use crate::state::SharedState;

pub mod admin;
pub mod auth;
pub mod catalogue;
pub mod contacts;
pub mod docs;
pub mod health;
pub mod join_requests;
pub mod messages;
pub mod notifications;
pub mod teams;
pub mod tournaments;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(auth::router())
        .merge(catalogue::router())
        .merge(tournaments::router())
        .merge(join_requests::router())
        .merge(teams::router())
        .merge(notifications::router())
        .merge(contacts::router())
        .merge(messages::router())
        .merge(admin::router(state.clone()));

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
