mod accounts;
mod app;
mod auth;
mod config;
mod errors;
mod notifications;
mod state;

use tracing_subscriber::EnvFilter;

use crate::{auth::password, config::AppConfig, state::AppState};

const DEFAULT_LOG_FILTER: &str = "account_service=debug,axum=info,tower_http=info";

/// `RUST_LOG` selects verbosity, `LOG_FORMAT=json` switches to structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => subscriber.with_target(false).json().init(),
        _ => subscriber.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        email_provider = ?config.email.provider,
        notification_policy = ?config.email.policy,
        "configuration loaded"
    );

    let (app_state, db) = AppState::init(config).await?;
    password::warm_up();

    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("database schema up to date");

    app::serve(app::build_app(app_state)).await
}
