pub mod cooldown;
pub mod handlers;
pub mod metrics;

pub use cooldown::CooldownGate;
pub use metrics::{IpRecord, MetricsRegistry, MetricsSnapshot};

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;

use crate::translation::DeepLClient;
use crate::utils::{AppConfig, ProxyError, Result};

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: DeepLClient,
    pub cooldown: CooldownGate,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        if config.limits.max_call_chars == 0 {
            return Err(ProxyError::Config(
                "max_call_chars must be at least 1".to_string(),
            ));
        }

        let client = DeepLClient::new(&config.deepl)?;
        let cooldown = CooldownGate::new(
            Duration::from_millis(config.cooldown.per_ip_ms),
            Duration::from_millis(config.cooldown.global_ms),
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            cooldown,
            metrics: Arc::new(MetricsRegistry::new()),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/translate", post(handlers::translate));

    if state.config.metrics.enabled {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router.with_state(state)
}
