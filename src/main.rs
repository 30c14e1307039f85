use std::net::SocketAddr;

use deepl_batch_proxy::server::{build_router, AppState};
use deepl_batch_proxy::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_or_default(Some("config.toml"));

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("deepl_batch_proxy={}", config.logging.level).parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(config)?;
    state.cooldown.spawn_sweeper();

    let addr = format!(
        "{}:{}",
        state.config.server.bind_addr, state.config.server.port
    );
    tracing::info!(addr = %addr, endpoint = state.client.api_url(), "proxy listening");
    tracing::info!(
        per_call_max_chars = state.config.limits.max_call_chars,
        cooldown_per_ip_ms = state.config.cooldown.per_ip_ms,
        cooldown_global_ms = state.config.cooldown.global_ms,
        batch_inter_delay_ms = state.config.limits.inter_batch_delay_ms,
        max_total_chars = state.config.limits.max_total_chars,
        "rate limits"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let router = build_router(state);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
