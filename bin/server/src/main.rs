use recruit_portal_platform_access::{SessionStore, UserDirectory};
use recruit_portal_server::{
    app,
    auth::{
        AppState, AuthService, GoogleOAuthClient,
        db::{SessionRepository, UserRepository},
        sweeper::{spawn_session_sweeper, sweep_once},
    },
    config::ServerConfig,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    let cookie_key = config
        .session
        .cookie_key()
        .expect("invalid session configuration");
    tracing::info!("Loaded configuration");

    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("failed to run migrations");

    let sessions: Arc<dyn SessionStore> = Arc::new(SessionRepository::new(db_pool.clone()));
    let directory = UserDirectory::new(Arc::new(UserRepository::new(db_pool)));

    // Cleanup stale sessions on startup, then periodically
    let max_age = config.session.max_age();
    sweep_once(sessions.as_ref(), max_age).await;
    spawn_session_sweeper(
        sessions.clone(),
        max_age,
        Duration::from_secs(config.session.cleanup_interval_seconds),
    );

    let provider = GoogleOAuthClient::new(&config.oauth).expect("invalid OAuth configuration");

    let auth = AuthService::new(Arc::new(provider), directory, sessions, config.redirects);
    let app = app::router(AppState::new(auth, cookie_key, config.session));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
