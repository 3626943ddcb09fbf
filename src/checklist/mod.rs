// Checklist workflow: edit buffer over the persisted record plus
// task generation for uncompleted stage items

pub mod buffer;
pub mod generate;

pub use buffer::{ChecklistEditor, WorkflowDraft};
pub use generate::{generate_stage_tasks, TaskGeneration};
