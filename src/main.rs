//! Arena Back binary entrypoint wiring the REST API, authentication and the storage backend.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, http::HeaderValue};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_back::{
    auth::TokenKeys,
    config::AppConfig,
    dao::store::MemoryStore,
    routes,
    state::{AppState, SharedState},
};

const JWT_SECRET_ENV: &str = "ARENA_JWT_SECRET";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let tokens = match env::var(JWT_SECRET_ENV) {
        Ok(secret) if !secret.is_empty() => {
            TokenKeys::from_secret(secret.as_bytes(), config.token_ttl)
        }
        _ => {
            warn!(
                "{JWT_SECRET_ENV} not set; using a random secret, sessions will not survive a restart"
            );
            TokenKeys::ephemeral(config.token_ttl)
        }
    };

    let cors = cors_layer(&config.cors_origins);
    let app_state = AppState::new(config, tokens);
    start_storage(app_state.clone()).await;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state, cors);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Hand MongoDB to the storage supervisor when `MONGO_URI` is set, otherwise
/// install the in-memory store right away.
#[cfg(feature = "mongo-store")]
async fn start_storage(state: SharedState) {
    use arena_back::{
        dao::{
            storage::StorageError,
            store::{
                ArenaStore,
                mongodb::{MongoArenaStore, MongoConfig},
            },
        },
        services::storage_supervisor,
    };

    let Ok(uri) = env::var("MONGO_URI") else {
        use_memory_store(&state).await;
        return;
    };
    let db_name = env::var("MONGO_DB").ok();

    tokio::spawn(storage_supervisor::run(state, move || {
        let uri = uri.clone();
        let db_name = db_name.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, db_name.as_deref()).await?;
            let store = MongoArenaStore::connect(config).await?;
            Ok::<Arc<dyn ArenaStore>, StorageError>(Arc::new(store))
        }
    }));
}

#[cfg(not(feature = "mongo-store"))]
async fn start_storage(state: SharedState) {
    if env::var("MONGO_URI").is_ok() {
        warn!("MONGO_URI is set but the `mongo-store` feature is disabled");
    }
    use_memory_store(&state).await;
}

async fn use_memory_store(state: &SharedState) {
    warn!("no database configured; data lives in memory and is lost on shutdown");
    state.set_store(Arc::new(MemoryStore::new())).await;
}

/// Any origin when none are configured, otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState, cors: CorsLayer) -> Router<()> {
    routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
