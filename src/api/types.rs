//! Shared domain types for the AI assistance layer.
//!
//! Wire names are camelCase to match the JSON the web client and the
//! model replies use (`estimatedDuration`, `topTasks`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Task priority. Closed set; anything else is coerced to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort weight for local ranking (high first).
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// User energy level. `None` means "unspecified", which is distinct from
/// an invalid value (also mapped to `None` by the validator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

impl EnergyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EnergyLevel::High => "high",
            EnergyLevel::Medium => "medium",
            EnergyLevel::Low => "low",
        }
    }
}

/// Task category. Closed set; anything else is coerced to `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Finance,
    Shopping,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Finance => "finance",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }
}

/// A task record as supplied by the storage layer. Read-only here: the AI
/// layer builds prompts from these fields and never writes them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(default)]
    pub energy_level: Option<EnergyLevel>,
    /// Estimated duration in minutes.
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// One actionable step of a task breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStep {
    pub description: String,
    /// Minutes, always >= 1.
    pub estimated_duration: u32,
}

/// Result of breaking a task into steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBreakdown {
    pub priority: Priority,
    /// Total minutes, always >= 1.
    pub estimated_duration: u32,
    pub description: String,
    pub steps: Vec<TaskStep>,
}

/// One suggested focus task with the model's (or fallback's) reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSuggestion {
    pub task_id: i64,
    pub reason: String,
}

/// Daily focus picks: at most 3 suggestions plus a motivational message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFocus {
    pub top_tasks: Vec<FocusSuggestion>,
    pub motivational_message: String,
}

/// Structured fields extracted from a free-text task description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NlpTaskAnalysis {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(default)]
    pub energy_level: Option<EnergyLevel>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub category: Category,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
}

/// Default emoji set used to pad or replace model output.
pub const DEFAULT_EMOJIS: [&str; 5] = ["📝", "✅", "⏰", "🔔", "📌"];
