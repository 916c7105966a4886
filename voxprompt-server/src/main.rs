use anyhow::Context;
use voxprompt_server::{ServerConfig, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env();
    if config.upstream.api_key.is_empty() {
        log::warn!("VOXPROMPT_UPSTREAM_API_KEY is empty; upstream calls will be rejected");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("bind {}", config.bind))?;
    log::info!("voxprompt proxy listening on {}", config.bind);

    axum::serve(listener, router(config.upstream))
        .await
        .context("serve")?;
    Ok(())
}
