use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Arena Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::auth::update_me,
        crate::routes::catalogue::list_games,
        crate::routes::catalogue::get_game,
        crate::routes::catalogue::list_tournament_types,
        crate::routes::tournaments::list_tournaments,
        crate::routes::tournaments::create_tournament,
        crate::routes::tournaments::get_tournament,
        crate::routes::tournaments::update_tournament,
        crate::routes::tournaments::delete_tournament,
        crate::routes::tournaments::set_tournament_status,
        crate::routes::tournaments::status_history,
        crate::routes::tournaments::participants,
        crate::routes::tournaments::request_join,
        crate::routes::tournaments::list_requests,
        crate::routes::tournaments::decide_request,
        crate::routes::tournaments::create_team,
        crate::routes::join_requests::list_mine,
        crate::routes::join_requests::cancel_mine,
        crate::routes::teams::list_teams,
        crate::routes::teams::get_team,
        crate::routes::teams::request_join,
        crate::routes::teams::add_member,
        crate::routes::teams::remove_member,
        crate::routes::teams::rename_team,
        crate::routes::teams::delete_team,
        crate::routes::notifications::list_notifications,
        crate::routes::notifications::unread_count,
        crate::routes::notifications::mark_read,
        crate::routes::notifications::mark_all_read,
        crate::routes::notifications::delete_notification,
        crate::routes::contacts::submit_contact,
        crate::routes::messages::send_message,
        crate::routes::messages::inbox,
        crate::routes::messages::sent,
        crate::routes::messages::mark_read,
        crate::routes::admin::stats,
        crate::routes::admin::list_users,
        crate::routes::admin::update_user,
        crate::routes::admin::delete_user,
        crate::routes::admin::create_game,
        crate::routes::admin::replace_game,
        crate::routes::admin::delete_game,
        crate::routes::admin::create_tournament_type,
        crate::routes::admin::delete_tournament_type,
        crate::routes::admin::list_tournaments,
        crate::routes::admin::delete_tournament,
        crate::routes::admin::list_requests,
        crate::routes::admin::decide_request,
        crate::routes::admin::delete_request,
        crate::routes::admin::list_teams,
        crate::routes::admin::delete_team,
        crate::routes::admin::list_contacts,
        crate::routes::admin::set_contact_status,
        crate::routes::admin::delete_contact,
        crate::routes::admin::list_messages,
        crate::routes::admin::delete_message,
        crate::routes::admin::broadcast,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::RegisterRequest,
            crate::dto::auth::LoginRequest,
            crate::dto::auth::AuthResponse,
            crate::dto::user::UserResponse,
            crate::dto::user::UserSummary,
            crate::dto::user::UpdateMeRequest,
            crate::dto::user::AdminUpdateUserRequest,
            crate::dto::game::GameResponse,
            crate::dto::game::GameInput,
            crate::dto::game::TournamentTypeResponse,
            crate::dto::game::TournamentTypeInput,
            crate::dto::tournament::CreateTournamentRequest,
            crate::dto::tournament::UpdateTournamentRequest,
            crate::dto::tournament::TournamentStatusRequest,
            crate::dto::tournament::TournamentResponse,
            crate::dto::tournament::StatusHistoryEntry,
            crate::dto::tournament::ParticipantResponse,
            crate::dto::join_request::JoinRequestResponse,
            crate::dto::join_request::JoinRequestDecision,
            crate::dto::team::TeamNameRequest,
            crate::dto::team::AddMemberRequest,
            crate::dto::team::TeamMemberResponse,
            crate::dto::team::TeamResponse,
            crate::dto::notification::NotificationResponse,
            crate::dto::notification::UnreadCountResponse,
            crate::dto::notification::MarkAllReadResponse,
            crate::dto::notification::BroadcastRequest,
            crate::dto::notification::BroadcastResponse,
            crate::dto::contact::ContactRequest,
            crate::dto::contact::ContactResponse,
            crate::dto::contact::ContactStatusRequest,
            crate::dto::message::SendMessageRequest,
            crate::dto::message::MessageResponse,
            crate::dto::admin::StatsResponse,
            crate::dao::models::Role,
            crate::dao::models::TournamentStatus,
            crate::dao::models::JoinRequestStatus,
            crate::dao::models::TeamRole,
            crate::dao::models::NotificationKind,
            crate::dao::models::ContactStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and the caller's profile"),
        (name = "catalogue", description = "Games and tournament formats"),
        (name = "tournaments", description = "Tournament lifecycle"),
        (name = "join-requests", description = "Requests to take part in a tournament"),
        (name = "teams", description = "Team formation inside tournaments"),
        (name = "notifications", description = "Per-user notification inbox"),
        (name = "contacts", description = "Public contact form"),
        (name = "messages", description = "Direct messages between users"),
        (name = "admin", description = "Back-office operations, admin role required"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_admin_and_public_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/healthcheck"));
        assert!(paths.contains_key("/api/tournaments/{id}/requests/{request_id}"));
        assert!(paths.contains_key("/api/admin/requests/{id}"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
