use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub deepl: DeepLConfig,
    pub limits: LimitConfig,
    pub cooldown: CooldownConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLConfig {
    pub api_key: String,
    pub api_url: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_call_chars: usize,
    pub max_total_chars: usize,
    pub inter_batch_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    pub per_ip_ms: u64,
    pub global_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8787,
            },
            deepl: DeepLConfig {
                api_key: String::new(),
                api_url: None,
                timeout_seconds: 30,
            },
            limits: LimitConfig {
                max_call_chars: 50_000,
                max_total_chars: 0,
                inter_batch_delay_ms: 0,
            },
            cooldown: CooldownConfig {
                per_ip_ms: 5_000,
                global_ms: 0,
            },
            metrics: MetricsConfig { enabled: false },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> crate::utils::errors::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::utils::errors::ProxyError::Config(e.to_string()))?;
        toml::from_str(&content)
            .map_err(|e| crate::utils::errors::ProxyError::Config(e.to_string()))
    }

    pub fn load_or_default(path: Option<&str>) -> Self {
        let mut config = if let Some(p) = path {
            Self::load_from_file(p).unwrap_or_default()
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config
    }

    // Environment variables use the original deployment's names and win
    // over anything read from the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = env_parse("PORT") {
            self.server.port = port;
        }
        if let Ok(key) = env::var("DEEPL_KEY") {
            self.deepl.api_key = key;
        }
        if let Ok(url) = env::var("DEEPL_API_URL") {
            if !url.trim().is_empty() {
                self.deepl.api_url = Some(url.trim().to_string());
            }
        }
        if let Some(max) = env_parse("RATE_MAX_CHARS") {
            self.limits.max_call_chars = max;
        }
        if let Some(max) = env_parse("RATE_MAX_TOTAL_CHARS") {
            self.limits.max_total_chars = max;
        }
        if let Some(delay) = env_parse("BATCH_INTER_DELAY_MS") {
            self.limits.inter_batch_delay_ms = delay;
        }
        if let Some(cooldown) = env_parse("RATE_COOLDOWN_MS") {
            self.cooldown.per_ip_ms = cooldown;
        }
        if let Some(cooldown) = env_parse("RATE_COOLDOWN_GLOBAL_MS") {
            self.cooldown.global_ms = cooldown;
        }
        if let Ok(enabled) = env::var("ENABLE_METRICS") {
            self.metrics.enabled = matches!(
                enabled.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
