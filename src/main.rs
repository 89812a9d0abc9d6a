//! WebhookDB demo API server binary

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webhookdb_demo::api::{create_router, AppState};
use webhookdb_demo::config::{AppConfig, LogFormat, DEFAULT_PORT};
use webhookdb_demo::search::SearchStore;
use webhookdb_demo::stripe::StripeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    let stripe = StripeClient::new(&config.stripe.api_key, &config.stripe.api_base);

    let store = SearchStore::connect(&config.webhookdb.url, &config.webhookdb.table)
        .context("failed to open a DB connection")?;
    tracing::info!(table = %config.webhookdb.table, "Using WebhookDB replica table");

    let state = AppState::new(stripe, store);
    let router = create_router(state);

    let port = match config.server.port {
        Some(port) => port,
        None => {
            tracing::info!("Run curl against http://localhost:{DEFAULT_PORT}");
            DEFAULT_PORT
        }
    };

    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("webhookdb_demo=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}
