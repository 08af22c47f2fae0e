//! Core: the task AI service plus the pure helpers shared by both
//! providers (validators, fallbacks, prompts, reply parsing, cache).

pub mod cache;
pub mod fallback;
pub mod parse;
pub mod prompt;
mod service;
pub mod validate;

pub use service::{ProviderFactory, TaskAiService};
