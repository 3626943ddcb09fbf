use crate::models::stage::{ChecklistItem, PipelineStage};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Todo priority (4 levels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// Todo model
///
/// A user-facing reminder. The customer/stage/item links are optional:
/// free-standing todos carry none of them, checklist-generated todos carry
/// all three.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: Option<i64>,
    pub uuid: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub customer_id: Option<i64>,
    pub stage: Option<PipelineStage>,
    pub item_id: Option<String>,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Todo {
    /// Create a new open todo with medium priority
    pub fn new(text: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            text,
            completed: false,
            priority: Priority::Medium,
            due_date: None,
            customer_id: None,
            stage: None,
            item_id: None,
            created_ts: now,
            modified_ts: now,
        }
    }
}

/// Deterministic text for a todo generated from a checklist item.
///
/// String equality of this value among a customer's open todos for the stage
/// is the sole de-duplication key; there is no foreign-key uniqueness behind
/// it.
pub fn checklist_task_text(stage: PipelineStage, item: &ChecklistItem) -> String {
    format!("{}: {}", stage.display_name(), item.label)
}
