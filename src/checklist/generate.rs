use crate::models::{checklist_task_text, ChecklistState, PipelineStage, Priority, StageDates};
use crate::repo::TodoRepo;
use anyhow::{Context, Result};
use log::info;
use rusqlite::Connection;
use std::collections::HashSet;

/// Outcome of a task-generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskGeneration {
    /// Every item in the stage is already checked off; nothing to do
    StageComplete,
    /// Every uncompleted item already has an open todo with matching text
    AlreadyQueued,
    /// Number of todos created
    Created(usize),
    /// A previous generation on this editor is still in flight; call ignored
    InFlight,
}

/// Bulk-create todos for every uncompleted item in `stage`.
///
/// De-duplication is by string equality of the generated text against the
/// customer's open todos for the stage; nothing else guarantees uniqueness.
/// Creation is sequential and a failure aborts the remainder. Todos already
/// created before the failure are kept, not rolled back.
pub fn generate_stage_tasks(
    conn: &Connection,
    customer_id: i64,
    checklist: &ChecklistState,
    stage_dates: &StageDates,
    stage: PipelineStage,
) -> Result<TaskGeneration> {
    let open_items = checklist.uncompleted(stage);
    if open_items.is_empty() {
        return Ok(TaskGeneration::StageComplete);
    }

    let open_texts: HashSet<String> = TodoRepo::list_open_for_stage(conn, customer_id, stage)?
        .into_iter()
        .map(|todo| todo.text)
        .collect();

    let pending: Vec<_> = open_items
        .into_iter()
        .filter(|item| !open_texts.contains(&checklist_task_text(stage, item)))
        .collect();
    if pending.is_empty() {
        return Ok(TaskGeneration::AlreadyQueued);
    }

    // A stage with a target date gets pushier todos: high priority, due on
    // the target date itself.
    let target_date = stage_dates.get(stage);
    let priority = if target_date.is_some() {
        Priority::High
    } else {
        Priority::Medium
    };

    let mut created = 0usize;
    for item in pending {
        TodoRepo::create_full(
            conn,
            &checklist_task_text(stage, item),
            priority,
            target_date,
            Some(customer_id),
            Some(stage),
            Some(item.id.to_string()),
        )
        .with_context(|| {
            format!(
                "Task generation for {} aborted after {} todos",
                stage.as_str(),
                created
            )
        })?;
        created += 1;
    }

    info!(
        "generated {} todos for customer {} stage {}",
        created,
        customer_id,
        stage.as_str()
    );
    Ok(TaskGeneration::Created(created))
}
