use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation count mismatch: expected {expected}, got {got}")]
    BatchCountMismatch { expected: usize, got: usize },

    #[error("upstream translation call failed: {message}")]
    Upstream {
        status: Option<u16>,
        retry_after: Option<u64>,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ProxyError {
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProxyError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ProxyError::Upstream { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
