use crate::models::{ChecklistState, Customer, PipelineStage, StageDates};
use anyhow::{bail, Context, Result};
use log::debug;
use rusqlite::{Connection, OptionalExtension, Row};

const CUSTOMER_COLUMNS: &str = "id, uuid, name, phone, email, vehicle_model, sales_consultant,
        current_stage, checklist_json, stage_dates_json, created_ts, modified_ts";

/// Customer repository for database operations
pub struct CustomerRepo;

impl CustomerRepo {
    /// Create a new customer. The checklist starts with every item unchecked
    /// and the pipeline pointer at the first stage.
    pub fn create(
        conn: &Connection,
        name: &str,
        phone: Option<String>,
        email: Option<String>,
        vehicle_model: Option<String>,
        sales_consultant: Option<String>,
    ) -> Result<Customer> {
        if name.trim().is_empty() {
            bail!("Customer name cannot be empty");
        }

        let mut customer = Customer::new(name.to_string());
        customer.phone = phone;
        customer.email = email;
        customer.vehicle_model = vehicle_model;
        customer.sales_consultant = sales_consultant;

        let checklist_json = serde_json::to_string(&customer.checklist)?;

        conn.execute(
            "INSERT INTO customers (uuid, name, phone, email, vehicle_model, sales_consultant,
                    current_stage, checklist_json, stage_dates_json, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                customer.uuid,
                customer.name,
                customer.phone,
                customer.email,
                customer.vehicle_model,
                customer.sales_consultant,
                customer.current_stage.as_str(),
                checklist_json,
                Option::<String>::None,
                customer.created_ts,
                customer.modified_ts,
            ],
        )
        .with_context(|| format!("Failed to create customer: {}", name))?;

        let id = conn.last_insert_rowid();
        debug!("created customer {} ({})", id, customer.name);

        Ok(Customer {
            id: Some(id),
            ..customer
        })
    }

    /// Get customer by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Customer>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM customers WHERE id = ?1",
            CUSTOMER_COLUMNS
        ))?;

        let customer = stmt.query_row([id], row_to_customer).optional()?;
        Ok(customer)
    }

    /// List all customers, newest first
    pub fn list_all(conn: &Connection) -> Result<Vec<Customer>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM customers ORDER BY created_ts DESC, id DESC",
            CUSTOMER_COLUMNS
        ))?;

        let rows = stmt.query_map([], row_to_customer)?;

        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok(customers)
    }

    /// Persist the workflow portion of a customer record as one atomic update:
    /// checklist state, stage dates, and the current-stage pointer together.
    ///
    /// Last write wins; there is no version check against concurrent editors.
    pub fn update_workflow(
        conn: &Connection,
        id: i64,
        checklist: &ChecklistState,
        stage_dates: &StageDates,
        current_stage: PipelineStage,
    ) -> Result<()> {
        let checklist_json = serde_json::to_string(checklist)?;
        let stage_dates_json = if stage_dates.0.is_empty() {
            None
        } else {
            Some(serde_json::to_string(stage_dates)?)
        };
        let now = chrono::Utc::now().timestamp();

        let updated = conn
            .execute(
                "UPDATE customers
                 SET checklist_json = ?1, stage_dates_json = ?2, current_stage = ?3, modified_ts = ?4
                 WHERE id = ?5",
                rusqlite::params![
                    checklist_json,
                    stage_dates_json,
                    current_stage.as_str(),
                    now,
                    id
                ],
            )
            .with_context(|| format!("Failed to update checklist for customer {}", id))?;

        if updated == 0 {
            bail!("Customer {} not found", id);
        }
        debug!("saved workflow state for customer {}", id);
        Ok(())
    }

    /// Delete a customer. Linked todos go with it (ON DELETE CASCADE).
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let deleted = conn
            .execute("DELETE FROM customers WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete customer {}", id))?;
        if deleted == 0 {
            bail!("Customer {} not found", id);
        }
        Ok(())
    }
}

fn row_to_customer(row: &Row) -> rusqlite::Result<Customer> {
    let checklist_json: String = row.get(8)?;
    let checklist =
        serde_json::from_str::<ChecklistState>(&checklist_json).unwrap_or_default();

    let stage_dates_json: Option<String> = row.get(9)?;
    let stage_dates = stage_dates_json
        .and_then(|json| serde_json::from_str::<StageDates>(&json).ok())
        .unwrap_or_default();

    Ok(Customer {
        id: Some(row.get(0)?),
        uuid: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        vehicle_model: row.get(5)?,
        sales_consultant: row.get(6)?,
        current_stage: PipelineStage::from_str(&row.get::<_, String>(7)?)
            .unwrap_or(PipelineStage::TestDrive),
        checklist,
        stage_dates,
        created_ts: row.get(10)?,
        modified_ts: row.get(11)?,
    })
}
