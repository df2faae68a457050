use std::sync::Arc;
use std::net::SocketAddr;
use anyhow::Context;
use chulo_advisor::PricingAdvisor;
use chulo_api::{app, state::{AppState, AuthConfig}};
use chulo_catalog::ProductCatalog;
use chulo_store::{Config, InMemoryCatalogRepo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chulo_api=debug,chulo_advisor=debug,chulo_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Chulo API on port {}", config.server.port);

    if config.auth.enabled && config.auth.jwt_secret.is_empty() {
        anyhow::bail!("auth.jwt_secret must be set when auth.enabled is true");
    }

    let catalog: Arc<dyn ProductCatalog> = match &config.catalog.seed_path {
        Some(path) => Arc::new(InMemoryCatalogRepo::from_seed_file(path)?),
        None => {
            tracing::warn!("No catalog.seed_path configured, starting with an empty catalog");
            Arc::new(InMemoryCatalogRepo::new(Vec::new()))
        }
    };

    let advisor = PricingAdvisor::from_config(&config.advisor).context("Failed to build pricing advisor")?;
    tracing::info!(
        backend = advisor.backend_name(),
        timeout_ms = config.advisor.timeout_ms,
        "Pricing advisor ready"
    );

    let app_state = AppState {
        advisor: Arc::new(advisor),
        catalog,
        auth: AuthConfig {
            enabled: config.auth.enabled,
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
