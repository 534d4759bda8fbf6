use std::{sync::Arc, time::Duration};

use arena_back::{
    auth::TokenKeys,
    config::AppConfig,
    dao::store::MemoryStore,
    routes,
    state::{AppState, SharedState},
};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: SharedState,
}

impl TestApp {
    async fn new() -> Self {
        let state = AppState::with_store(
            AppConfig::default(),
            TokenKeys::from_secret(b"integration-tests", Duration::from_secs(600)),
            Arc::new(MemoryStore::new()),
        )
        .await;
        Self {
            router: routes::router(state.clone()),
            state,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Register an account and return its token and id.
    async fn register(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@arena.test"),
                    "password": "correct-horse",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["token"].as_str().unwrap().to_owned(),
            body["user"]["id"].as_str().unwrap().to_owned(),
        )
    }

    async fn game(&self, admin: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/admin/games",
                Some(admin),
                Some(json!({ "name": "Rocket League" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_owned()
    }

    async fn tournament(&self, creator: &str, game_id: &str, max: u32) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/tournaments",
                Some(creator),
                Some(json!({
                    "name": "Friday Night Cup",
                    "game_id": game_id,
                    "max_participants": max,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["status"], "upcoming");
        body["id"].as_str().unwrap().to_owned()
    }

    async fn join(&self, player: &str, tournament_id: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                &format!("/api/tournaments/{tournament_id}/join"),
                Some(player),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_owned()
    }

    async fn decide(
        &self,
        token: &str,
        tournament_id: &str,
        request_id: &str,
        status: &str,
    ) -> (StatusCode, Value) {
        self.call(
            Method::PATCH,
            &format!("/api/tournaments/{tournament_id}/requests/{request_id}"),
            Some(token),
            Some(json!({ "status": status })),
        )
        .await
    }
}

#[tokio::test]
async fn healthcheck_follows_degraded_mode() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/healthcheck", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    app.state.clear_store().await;
    let (_, body) = app.call(Method::GET, "/healthcheck", None, None).await;
    assert_eq!(body["status"], "degraded");

    let (status, body) = app.call(Method::GET, "/api/games", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn admin_subtree_requires_an_admin_session() {
    let app = TestApp::new().await;
    let (admin, _) = app.register("root").await;
    let (player, _) = app.register("player").await;

    let (status, _) = app.call(Method::GET, "/api/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(Method::GET, "/api/admin/stats", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .call(Method::GET, "/api/admin/stats", Some(&player), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let (status, body) = app
        .call(Method::GET, "/api/admin/stats", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], 2);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = TestApp::new().await;
    let (token, _) = app.register("root").await;

    let (status, body) = app.call(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    let (status, _) = app
        .call(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.call(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "ab", "email": "nope", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("validation failed"));

    let (status, body) = app
        .call(
            Method::POST,
            "/api/contacts",
            None,
            Some(json!({ "name": "Sam" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn join_request_flow_through_the_router() {
    let app = TestApp::new().await;
    let (admin, _) = app.register("root").await;
    let (creator, _) = app.register("creator").await;
    let (player, player_id) = app.register("player").await;
    let (stranger, _) = app.register("stranger").await;
    let game_id = app.game(&admin).await;
    let tournament_id = app.tournament(&creator, &game_id, 8).await;

    let request_id = app.join(&player, &tournament_id).await;
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/tournaments/{tournament_id}/join"),
            Some(&player),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.decide(&stranger, &tournament_id, &request_id, "accepted").await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (status, body) = app.decide(&creator, &tournament_id, &request_id, "pending").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app.decide(&creator, &tournament_id, &request_id, "accepted").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "accepted");

    let (_, body) = app
        .call(
            Method::GET,
            &format!("/api/tournaments/{tournament_id}/participants"),
            None,
            None,
        )
        .await;
    assert_eq!(body[0]["user"]["id"], player_id.as_str());
    assert_eq!(body[0]["user"]["username"], "player");

    let (_, body) = app
        .call(Method::GET, "/api/notifications", Some(&player), None)
        .await;
    assert_eq!(body[0]["type"], "join_request_accepted");

    let (_, body) = app
        .call(
            Method::GET,
            "/api/notifications/unread-count",
            Some(&creator),
            None,
        )
        .await;
    assert_eq!(body["unread"], 1);
}

#[tokio::test]
async fn capacity_is_enforced_on_both_accept_paths() {
    let app = TestApp::new().await;
    let (admin, _) = app.register("root").await;
    let (creator, _) = app.register("creator").await;
    let game_id = app.game(&admin).await;
    let tournament_id = app.tournament(&creator, &game_id, 2).await;

    let mut requests = Vec::new();
    for name in ["alpha", "bravo", "charlie"] {
        let (token, _) = app.register(name).await;
        requests.push(app.join(&token, &tournament_id).await);
    }

    let (status, _) = app.decide(&creator, &tournament_id, &requests[0], "accepted").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("/api/admin/requests/{}", requests[1]),
            Some(&admin),
            Some(json!({ "status": "accepted" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.decide(&creator, &tournament_id, &requests[2], "accepted").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("tournament is full"));

    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("/api/admin/requests/{}", requests[2]),
            Some(&admin),
            Some(json!({ "status": "accepted" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app
        .call(
            Method::GET,
            &format!("/api/tournaments/{tournament_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(body["participant_count"], 2);
}

#[tokio::test]
async fn admin_tournament_delete_leaves_no_orphans() {
    let app = TestApp::new().await;
    let (admin, _) = app.register("root").await;
    let (creator, _) = app.register("creator").await;
    let (player, _) = app.register("player").await;
    let game_id = app.game(&admin).await;
    let tournament_id = app.tournament(&creator, &game_id, 4).await;
    let request_id = app.join(&player, &tournament_id).await;
    app.decide(&creator, &tournament_id, &request_id, "accepted")
        .await;

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/tournaments/{tournament_id}/teams"),
            Some(&player),
            Some(json!({ "name": "Falcons" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/tournaments/{tournament_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .call(
            Method::GET,
            &format!("/api/tournaments/{tournament_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, requests) = app
        .call(Method::GET, "/api/admin/requests", Some(&admin), None)
        .await;
    assert_eq!(requests, json!([]));
    let (_, teams) = app
        .call(Method::GET, "/api/admin/teams", Some(&admin), None)
        .await;
    assert_eq!(teams, json!([]));
    let (_, stats) = app
        .call(Method::GET, "/api/admin/stats", Some(&admin), None)
        .await;
    assert_eq!(stats["tournaments"], 0);
    assert_eq!(stats["pending_join_requests"], 0);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(Method::GET, "/api-doc/openapi.json", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/tournaments"].is_object());
}
