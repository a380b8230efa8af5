use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use brandreach_gating::adapters::auth::{GoTrueConfig, GoTrueGateway};
use brandreach_gating::adapters::http::{gating_routes, GatingAppState};
use brandreach_gating::adapters::navigation::RecordingNavigator;
use brandreach_gating::adapters::postgres::PostgresProfileStore;
use brandreach_gating::application::{ProfileLoader, SessionStore};
use brandreach_gating::config::AppConfig;
use brandreach_gating::ports::{AuthGateway, Navigator, ProfileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;

    let json_logs = config.server.is_production();
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(config.server.log_level.clone())
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(config.server.log_level.clone())
            .init();
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let store: Arc<dyn ProfileStore> = Arc::new(PostgresProfileStore::new(pool));
    let auth: Arc<dyn AuthGateway> =
        Arc::new(GoTrueGateway::new(GoTrueConfig::from(&config.auth)));

    // Server-side navigation sink; handlers turn recorded decisions into
    // redirect responses per request.
    let navigator: Arc<dyn Navigator> = Arc::new(RecordingNavigator::new());
    let sessions = Arc::new(SessionStore::new(Arc::clone(&auth), navigator));
    sessions.start().await;
    let loader = Arc::new(ProfileLoader::new(Arc::clone(&store), Arc::clone(&auth)));

    let app = gating_routes(GatingAppState {
        store,
        auth,
        sessions,
        loader,
        decision_timeout: config.gating.decision_timeout(),
    });

    let addr = config.server.socket_addr()?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
