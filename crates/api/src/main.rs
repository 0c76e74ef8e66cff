use std::sync::Arc;

use anyhow::Context;

use stockroom_api::app::{SessionLimits, build_app_with_limits};
use stockroom_infra::{AppConfig, JsonFileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("using inventory document at {:?}", config.data_file);

    let app = build_app_with_limits(
        Arc::new(JsonFileStore::new(config.data_file.clone())),
        SessionLimits::from_config(&config),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
