//! Environment variable names used by the composition root.
//!
//! Centralized constants so variable names stay consistent across the
//! codebase. All environment reads happen in [`crate::config::AppAiConfig`];
//! nothing else in the crate touches the process environment.

/// Active provider selection ("gemini" or "openai").
pub const TASKMIND_AI_PROVIDER: &str = "TASKMIND_AI_PROVIDER";

/// Google Gemini API key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Google API key (alternative for Gemini).
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// OpenAI API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// OpenAI organization id (optional).
pub const OPENAI_ORG_ID: &str = "OPENAI_ORG_ID";

/// Gemini model override.
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";

/// OpenAI model override.
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";

/// Gemini custom base URL.
pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

/// OpenAI custom base URL.
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
