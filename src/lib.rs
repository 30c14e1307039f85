pub mod pipeline;
pub mod server;
pub mod translation;
pub mod utils;

pub use pipeline::{
    dispatch_batches, pack_batches, reassemble, split_text, translate_texts, Batch,
    PipelineOptions, PipelineOutcome, TextItem,
};
pub use server::{AppState, CooldownGate, MetricsRegistry};
pub use translation::DeepLClient;
pub use utils::{AppConfig, ProxyError, Result};
