use std::sync::Arc;

use anyhow::Context;

use campus_api::app::{self, services::AppServices};
use campus_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campus_observability::init();

    let config = ApiConfig::from_env()?;
    if config.uses_dev_secret {
        tracing::warn!("CAMPUS_JWT_SECRET not set; using insecure dev default");
    }

    let directory = Arc::new(config.build_directory()?);
    let services = Arc::new(AppServices::new(config.policy.clone()));
    let router = app::build_app(&config, directory, services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, base_domain = %config.base_domain, "listening");

    axum::serve(listener, router).await?;
    Ok(())
}
