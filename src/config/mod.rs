//! Configuration: provider identity, per-provider settings, env/file
//! composition root, and environment variable names.

pub mod app;
pub mod keys;
mod provider;

pub use app::AppAiConfig;
pub use provider::{
    provider_id, AiConfigPatch, AiProviderConfig, ProviderKind, ProviderSetup, SafetySetting,
};
