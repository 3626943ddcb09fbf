use crate::models::stage::PipelineStage;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-customer checklist completion state
///
/// Nested map: stage -> item id -> done flag. Stored as a JSON column on the
/// customer row. A missing entry counts as not done, so records created
/// before a catalog item was added behave the same as explicit `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistState(pub HashMap<PipelineStage, HashMap<String, bool>>);

impl ChecklistState {
    /// Fresh state with every catalog item unchecked
    pub fn new() -> Self {
        let mut stages = HashMap::new();
        for stage in PipelineStage::all() {
            let items = stage
                .items()
                .iter()
                .map(|item| (item.id.to_string(), false))
                .collect();
            stages.insert(stage, items);
        }
        ChecklistState(stages)
    }

    pub fn is_checked(&self, stage: PipelineStage, item_id: &str) -> bool {
        self.0
            .get(&stage)
            .and_then(|items| items.get(item_id))
            .copied()
            .unwrap_or(false)
    }

    pub fn set_item(&mut self, stage: PipelineStage, item_id: &str, checked: bool) {
        self.0
            .entry(stage)
            .or_default()
            .insert(item_id.to_string(), checked);
    }

    /// Completion percentage for a stage, rounded to the nearest integer
    pub fn completion_percent(&self, stage: PipelineStage) -> u32 {
        let items = stage.items();
        if items.is_empty() {
            return 0;
        }
        let done = items
            .iter()
            .filter(|item| self.is_checked(stage, item.id))
            .count();
        ((done as f64 / items.len() as f64) * 100.0).round() as u32
    }

    /// Catalog items in this stage whose flag is false or absent
    pub fn uncompleted(&self, stage: PipelineStage) -> Vec<&'static crate::models::ChecklistItem> {
        stage
            .items()
            .iter()
            .filter(|item| !self.is_checked(stage, item.id))
            .collect()
    }
}

/// Optional target date per stage. A stage with no entry has no target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageDates(pub HashMap<PipelineStage, NaiveDate>);

impl StageDates {
    pub fn get(&self, stage: PipelineStage) -> Option<NaiveDate> {
        self.0.get(&stage).copied()
    }

    /// Set or clear the target date for a stage
    pub fn set(&mut self, stage: PipelineStage, date: Option<NaiveDate>) {
        match date {
            Some(d) => {
                self.0.insert(stage, d);
            }
            None => {
                self.0.remove(&stage);
            }
        }
    }
}

/// Customer record
///
/// The descriptive fields here are the handful the workflow engine and its
/// callers actually touch; the production record carries dozens more
/// (vehicle, finance, guarantor details) that never influence the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<i64>,
    pub uuid: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vehicle_model: Option<String>,
    pub sales_consultant: Option<String>,
    pub current_stage: PipelineStage,
    pub checklist: ChecklistState,
    pub stage_dates: StageDates,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Customer {
    /// Create a new customer at the start of the pipeline, all items unchecked
    pub fn new(name: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            name,
            phone: None,
            email: None,
            vehicle_model: None,
            sales_consultant: None,
            current_stage: PipelineStage::TestDrive,
            checklist: ChecklistState::new(),
            stage_dates: StageDates::default(),
            created_ts: now,
            modified_ts: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checklist_all_unchecked() {
        let state = ChecklistState::new();
        for stage in PipelineStage::all() {
            for item in stage.items() {
                assert!(!state.is_checked(stage, item.id));
            }
            assert_eq!(state.completion_percent(stage), 0);
        }
    }

    #[test]
    fn test_completion_percent_rounds_to_nearest() {
        let mut state = ChecklistState::new();
        // registration has 4 items: 1/4 = 25%
        state.set_item(PipelineStage::Registration, "pay_fees", true);
        assert_eq!(state.completion_percent(PipelineStage::Registration), 25);

        // test_drive has 5 items: 1/5 = 20%, 2/5 = 40%
        state.set_item(PipelineStage::TestDrive, "prepare_vehicle", true);
        assert_eq!(state.completion_percent(PipelineStage::TestDrive), 20);
        state.set_item(PipelineStage::TestDrive, "collect_feedback", true);
        assert_eq!(state.completion_percent(PipelineStage::TestDrive), 40);
    }

    #[test]
    fn test_completion_percent_full() {
        let mut state = ChecklistState::new();
        for item in PipelineStage::Nps.items() {
            state.set_item(PipelineStage::Nps, item.id, true);
        }
        assert_eq!(state.completion_percent(PipelineStage::Nps), 100);
    }

    #[test]
    fn test_uncompleted_treats_absent_as_false() {
        // empty state, nothing seeded
        let state = ChecklistState::default();
        let open = state.uncompleted(PipelineStage::Delivery);
        assert_eq!(open.len(), PipelineStage::Delivery.items().len());
    }

    #[test]
    fn test_checklist_json_round_trip() {
        let mut state = ChecklistState::new();
        state.set_item(PipelineStage::CloseDeal, "agree_price", true);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"close_deal\""));
        let back: ChecklistState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_stage_dates_set_and_clear() {
        let mut dates = StageDates::default();
        let d = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
        dates.set(PipelineStage::Delivery, Some(d));
        assert_eq!(dates.get(PipelineStage::Delivery), Some(d));
        dates.set(PipelineStage::Delivery, None);
        assert_eq!(dates.get(PipelineStage::Delivery), None);
    }

    #[test]
    fn test_customer_creation() {
        let customer = Customer::new("Tan Wei Ming".to_string());
        assert_eq!(customer.current_stage, PipelineStage::TestDrive);
        assert!(customer.id.is_none());
        assert!(!customer.uuid.is_empty());
        assert_eq!(customer.checklist.completion_percent(PipelineStage::TestDrive), 0);
    }
}
