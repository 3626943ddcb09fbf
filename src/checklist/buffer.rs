use crate::checklist::generate::{self, TaskGeneration};
use crate::models::{ChecklistState, Customer, PipelineStage, StageDates};
use crate::repo::CustomerRepo;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

/// The workflow portion of a customer record: what the edit buffer holds
/// and what `CustomerRepo::update_workflow` persists in one write.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDraft {
    pub checklist: ChecklistState,
    pub stage_dates: StageDates,
    pub current_stage: PipelineStage,
}

impl WorkflowDraft {
    fn from_customer(customer: &Customer) -> Self {
        Self {
            checklist: customer.checklist.clone(),
            stage_dates: customer.stage_dates.clone(),
            current_stage: customer.current_stage,
        }
    }
}

/// Edit buffer for one customer's checklist, stage dates, and stage pointer.
///
/// Edits accumulate in a draft and hit the database only on `save`. `cancel`
/// rolls the draft back to the last persisted snapshot. A failed save leaves
/// the draft and the dirty flag untouched so the caller can retry.
#[derive(Debug)]
pub struct ChecklistEditor {
    customer_id: i64,
    snapshot: WorkflowDraft,
    draft: WorkflowDraft,
    dirty: bool,
    generating: bool,
    last_error: Option<String>,
}

impl ChecklistEditor {
    /// Open an editor over a customer's persisted workflow state
    pub fn open(conn: &Connection, customer_id: i64) -> Result<Self> {
        let customer = CustomerRepo::get_by_id(conn, customer_id)?
            .ok_or_else(|| anyhow!("Customer {} not found", customer_id))?;
        let snapshot = WorkflowDraft::from_customer(&customer);
        Ok(Self {
            customer_id,
            draft: snapshot.clone(),
            snapshot,
            dirty: false,
            generating: false,
            last_error: None,
        })
    }

    /// Point the editor at a different customer. Pending edits are discarded
    /// and the buffer reloads from that customer's persisted record. Pointing
    /// at the customer already loaded keeps the current draft.
    pub fn set_customer(&mut self, conn: &Connection, customer_id: i64) -> Result<()> {
        if customer_id == self.customer_id {
            return Ok(());
        }
        *self = Self::open(conn, customer_id)?;
        Ok(())
    }

    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }

    pub fn draft(&self) -> &WorkflowDraft {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Human-readable message from the last failed operation, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Toggle a checklist item in the draft
    pub fn toggle_item(&mut self, stage: PipelineStage, item_id: &str, checked: bool) {
        self.draft.checklist.set_item(stage, item_id, checked);
        self.dirty = true;
    }

    /// Move the draft's current-stage pointer
    pub fn set_current_stage(&mut self, stage: PipelineStage) {
        self.draft.current_stage = stage;
        self.dirty = true;
    }

    /// Set or clear a stage's target date in the draft
    pub fn set_stage_date(&mut self, stage: PipelineStage, date: Option<NaiveDate>) {
        self.draft.stage_dates.set(stage, date);
        self.dirty = true;
    }

    /// Persist the draft as one atomic update. Returns false when there was
    /// nothing to save. On failure the draft stays dirty and the error is
    /// recorded and returned.
    pub fn save(&mut self, conn: &Connection) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }

        match CustomerRepo::update_workflow(
            conn,
            self.customer_id,
            &self.draft.checklist,
            &self.draft.stage_dates,
            self.draft.current_stage,
        ) {
            Ok(()) => {
                self.snapshot = self.draft.clone();
                self.dirty = false;
                self.last_error = None;
                Ok(true)
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to save checklist: {}", e));
                Err(e)
            }
        }
    }

    /// Discard pending edits and reset the draft to the persisted snapshot
    pub fn cancel(&mut self) {
        self.draft = self.snapshot.clone();
        self.dirty = false;
    }

    /// Run task generation for a stage against the draft state (unsaved
    /// toggles count). Ignored when a previous run on this editor is still
    /// in flight.
    pub fn generate_stage_tasks(
        &mut self,
        conn: &Connection,
        stage: PipelineStage,
    ) -> Result<TaskGeneration> {
        if self.generating {
            return Ok(TaskGeneration::InFlight);
        }
        self.generating = true;
        let result = generate::generate_stage_tasks(
            conn,
            self.customer_id,
            &self.draft.checklist,
            &self.draft.stage_dates,
            stage,
        );
        self.generating = false;

        if let Err(e) = &result {
            self.last_error = Some(format!("Failed to generate tasks: {}", e));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    fn setup() -> (Connection, i64) {
        let conn = DbConnection::connect_in_memory().unwrap();
        let customer = CustomerRepo::create(&conn, "Buffer Test", None, None, None, None).unwrap();
        let id = customer.id.unwrap();
        (conn, id)
    }

    #[test]
    fn test_open_missing_customer() {
        let conn = DbConnection::connect_in_memory().unwrap();
        assert!(ChecklistEditor::open(&conn, 42).is_err());
    }

    #[test]
    fn test_edits_stay_local_until_save() {
        let (conn, id) = setup();
        let mut editor = ChecklistEditor::open(&conn, id).unwrap();

        editor.toggle_item(PipelineStage::TestDrive, "prepare_vehicle", true);
        assert!(editor.is_dirty());

        let persisted = CustomerRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert!(!persisted.checklist.is_checked(PipelineStage::TestDrive, "prepare_vehicle"));

        assert!(editor.save(&conn).unwrap());
        let persisted = CustomerRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert!(persisted.checklist.is_checked(PipelineStage::TestDrive, "prepare_vehicle"));
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_save_clean_is_noop() {
        let (conn, id) = setup();
        let mut editor = ChecklistEditor::open(&conn, id).unwrap();
        assert!(!editor.save(&conn).unwrap());
    }

    #[test]
    fn test_cancel_restores_snapshot() {
        let (conn, id) = setup();
        let mut editor = ChecklistEditor::open(&conn, id).unwrap();

        editor.set_current_stage(PipelineStage::Delivery);
        editor.toggle_item(PipelineStage::CloseDeal, "agree_price", true);
        editor.cancel();

        assert!(!editor.is_dirty());
        assert_eq!(editor.draft().current_stage, PipelineStage::TestDrive);
        assert!(!editor.draft().checklist.is_checked(PipelineStage::CloseDeal, "agree_price"));
    }

    #[test]
    fn test_set_customer_resets_buffer() {
        let (conn, first) = setup();
        let second = CustomerRepo::create(&conn, "Other Customer", None, None, None, None)
            .unwrap()
            .id
            .unwrap();

        let mut editor = ChecklistEditor::open(&conn, first).unwrap();
        editor.toggle_item(PipelineStage::Nps, "send_survey", true);

        editor.set_customer(&conn, second).unwrap();
        assert_eq!(editor.customer_id(), second);
        assert!(!editor.is_dirty());
        assert!(!editor.draft().checklist.is_checked(PipelineStage::Nps, "send_survey"));

        // same customer: pending edits survive
        editor.toggle_item(PipelineStage::Nps, "send_survey", true);
        editor.set_customer(&conn, second).unwrap();
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_failed_save_keeps_draft_dirty() {
        let (conn, id) = setup();
        let mut editor = ChecklistEditor::open(&conn, id).unwrap();
        editor.toggle_item(PipelineStage::TestDrive, "collect_feedback", true);

        // pull the row out from under the editor
        CustomerRepo::delete(&conn, id).unwrap();

        assert!(editor.save(&conn).is_err());
        assert!(editor.is_dirty());
        assert!(editor.last_error().unwrap().contains("Failed to save checklist"));
        assert!(editor.draft().checklist.is_checked(PipelineStage::TestDrive, "collect_feedback"));
    }
}
