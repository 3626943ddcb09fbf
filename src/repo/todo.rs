use crate::models::{PipelineStage, Priority, Todo};
use crate::utils::format_stage_date;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::debug;
use rusqlite::{Connection, OptionalExtension, Row};

const TODO_COLUMNS: &str = "id, uuid, text, completed, priority, due_date, customer_id,
        stage, item_id, created_ts, modified_ts";

/// Todo repository for database operations
pub struct TodoRepo;

impl TodoRepo {
    /// Create a new todo with full field support
    pub fn create_full(
        conn: &Connection,
        text: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
        customer_id: Option<i64>,
        stage: Option<PipelineStage>,
        item_id: Option<String>,
    ) -> Result<Todo> {
        if text.trim().is_empty() {
            bail!("Todo text cannot be empty");
        }

        let mut todo = Todo::new(text.to_string());
        todo.priority = priority;
        todo.due_date = due_date;
        todo.customer_id = customer_id;
        todo.stage = stage;
        todo.item_id = item_id.clone();

        conn.execute(
            "INSERT INTO todos (uuid, text, completed, priority, due_date, customer_id,
                    stage, item_id, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                todo.uuid,
                todo.text,
                todo.completed,
                todo.priority.as_str(),
                todo.due_date.map(format_stage_date),
                todo.customer_id,
                todo.stage.map(|s| s.as_str()),
                todo.item_id,
                todo.created_ts,
                todo.modified_ts,
            ],
        )
        .with_context(|| format!("Failed to create todo: {}", text))?;

        let id = conn.last_insert_rowid();
        debug!("created todo {} ({})", id, todo.text);

        Ok(Todo {
            id: Some(id),
            ..todo
        })
    }

    /// Create a free-standing todo (no customer/stage links)
    pub fn create(conn: &Connection, text: &str, priority: Priority) -> Result<Todo> {
        Self::create_full(conn, text, priority, None, None, None, None)
    }

    /// Get todo by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Todo>> {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM todos WHERE id = ?1", TODO_COLUMNS))?;
        let todo = stmt.query_row([id], row_to_todo).optional()?;
        Ok(todo)
    }

    /// List all todos, newest first
    pub fn list_all(conn: &Connection) -> Result<Vec<Todo>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM todos ORDER BY created_ts DESC, id DESC",
            TODO_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_todo)?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?);
        }
        Ok(todos)
    }

    /// List all todos linked to a customer
    pub fn list_for_customer(conn: &Connection, customer_id: i64) -> Result<Vec<Todo>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM todos WHERE customer_id = ?1 ORDER BY created_ts DESC, id DESC",
            TODO_COLUMNS
        ))?;
        let rows = stmt.query_map([customer_id], row_to_todo)?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?);
        }
        Ok(todos)
    }

    /// Open (not completed) todos for one customer and stage. This is the set
    /// task generation de-duplicates against.
    pub fn list_open_for_stage(
        conn: &Connection,
        customer_id: i64,
        stage: PipelineStage,
    ) -> Result<Vec<Todo>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM todos
             WHERE customer_id = ?1 AND stage = ?2 AND completed = 0
             ORDER BY id",
            TODO_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![customer_id, stage.as_str()], row_to_todo)?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?);
        }
        Ok(todos)
    }

    /// Set the completed flag
    pub fn set_completed(conn: &Connection, id: i64, completed: bool) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn
            .execute(
                "UPDATE todos SET completed = ?1, modified_ts = ?2 WHERE id = ?3",
                rusqlite::params![completed, now, id],
            )
            .with_context(|| format!("Failed to update todo {}", id))?;
        if updated == 0 {
            bail!("Todo {} not found", id);
        }
        Ok(())
    }

    /// Delete a todo
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let deleted = conn
            .execute("DELETE FROM todos WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete todo {}", id))?;
        if deleted == 0 {
            bail!("Todo {} not found", id);
        }
        Ok(())
    }
}

fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    let due_date: Option<String> = row.get(5)?;
    let stage: Option<String> = row.get(7)?;

    Ok(Todo {
        id: Some(row.get(0)?),
        uuid: row.get(1)?,
        text: row.get(2)?,
        completed: row.get(3)?,
        priority: Priority::from_str(&row.get::<_, String>(4)?).unwrap_or(Priority::Medium),
        due_date: due_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        customer_id: row.get(6)?,
        stage: stage.as_deref().and_then(PipelineStage::from_str),
        item_id: row.get(8)?,
        created_ts: row.get(9)?,
        modified_ts: row.get(10)?,
    })
}
