pub mod client;

pub use client::DeepLClient;
