//! Prompt templates for each AI operation.
//!
//! Both providers send the same prompts; only the wire format differs.

use chrono::NaiveDate;

use crate::api::{EnergyLevel, Task};

/// System prompt for task breakdown.
pub fn breakdown_system_prompt() -> String {
    r#"You are an assistant inside a task manager built for people with ADHD.

Your task: break a task into small, concrete, achievable steps.

Rules:
- Respond with a single JSON object and nothing else. No markdown, no backticks.
- Use this shape:
  {"priority": "high|medium|low", "estimatedDuration": <total minutes>,
   "description": "<one-sentence summary>",
   "steps": [{"description": "<step>", "estimatedDuration": <minutes>}]}
- Produce 3 to 5 steps, each small enough to start without hesitation.
- Durations are positive integer minutes."#
        .to_string()
}

/// User prompt for task breakdown.
pub fn breakdown_user_prompt(title: &str, energy: EnergyLevel) -> String {
    format!(
        "Task: {}\nThe user's current energy level is {}. \
         Size the steps so they feel doable at that energy.",
        title,
        energy.as_str(),
    )
}

/// System prompt for daily focus selection.
pub fn focus_system_prompt() -> String {
    r#"You are an assistant inside a task manager built for people with ADHD.

Your task: pick at most 3 tasks the user should focus on today.

Rules:
- Respond with a single JSON object and nothing else. No markdown, no backticks.
- Use this shape:
  {"topTasks": [{"taskId": <id>, "reason": "<short reason>"}],
   "motivationalMessage": "<one encouraging sentence>"}
- Weigh priority, how well the task matches the user's energy level,
  due-date urgency, and whether the duration is feasible today.
- Only use taskId values from the provided list."#
        .to_string()
}

/// User prompt for daily focus selection over the open tasks.
pub fn focus_user_prompt(tasks: &[Task], energy: EnergyLevel) -> String {
    let mut lines = vec![format!(
        "The user's current energy level is {}. Open tasks:",
        energy.as_str()
    )];
    for task in tasks {
        let due = task
            .due_date
            .map(|d| d.date_naive().to_string())
            .unwrap_or_else(|| "none".to_string());
        let duration = task
            .estimated_duration
            .map(|m| format!("{}min", m))
            .unwrap_or_else(|| "unknown".to_string());
        let task_energy = task
            .energy_level
            .map(EnergyLevel::as_str)
            .unwrap_or("unspecified");
        lines.push(format!(
            "- id {}: \"{}\" (priority {}, energy {}, due {}, duration {})",
            task.id,
            task.title,
            task.priority.as_str(),
            task_energy,
            due,
            duration,
        ));
    }
    lines.join("\n")
}

/// System prompt for emoji prediction.
pub fn emoji_system_prompt() -> String {
    r#"You suggest emoji tags for tasks in a task manager.

Rules:
- Respond with a JSON array of exactly 5 emoji strings and nothing else.
- No markdown, no backticks, no explanations.
- Pick emoji that visually represent the task."#
        .to_string()
}

/// User prompt for emoji prediction.
pub fn emoji_user_prompt(title: &str, description: Option<&str>) -> String {
    match description {
        Some(desc) if !desc.trim().is_empty() => {
            format!("Task: {}\nDetails: {}", title, desc)
        }
        _ => format!("Task: {}", title),
    }
}

/// System prompt for natural-language task parsing.
pub fn nlp_system_prompt(today: NaiveDate) -> String {
    format!(
        r#"You extract structured task fields from free text in a task manager.

Today's date is {}.

Rules:
- Respond with a single JSON object and nothing else. No markdown, no backticks.
- Use this shape:
  {{"title": "<short title>", "description": "<details or null>",
    "priority": "high|medium|low", "energyLevel": "high|medium|low" or null,
    "dueDate": "YYYY-MM-DD" or null, "category": "work|personal|health|finance|shopping|other",
    "estimatedDuration": <minutes> or null}}
- Resolve relative dates ("tomorrow", "next friday") against today's date.
- Leave fields null when the text does not specify them."#,
        today,
    )
}

/// User prompt for natural-language task parsing.
pub fn nlp_user_prompt(input: &str) -> String {
    format!("Text: {}", input)
}
