//! Shared types and error taxonomy for the AI layer.

pub mod error;
pub mod types;

pub use error::{AiError, AiResult};
pub use types::{
    Category, DailyFocus, EnergyLevel, FocusSuggestion, NlpTaskAnalysis, Priority, Task,
    TaskBreakdown, TaskStep, DEFAULT_EMOJIS,
};
