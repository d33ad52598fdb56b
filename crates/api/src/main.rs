use anyhow::Context;

use splitledger_infra::EngineConfig;

const ENV_BIND: &str = "SPLITLEDGER_BIND";
const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    splitledger_observability::init();

    let config = EngineConfig::from_env().context("invalid engine configuration")?;
    let bind = std::env::var(ENV_BIND).unwrap_or_else(|_| DEFAULT_BIND.to_string());

    let app = splitledger_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
