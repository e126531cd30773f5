use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::equipment::models::{EquipmentRow, NewEquipmentRow};

/// Record storage for equipment rows.
///
/// `insert` must be all-or-nothing and return the generated `id` and
/// `created_at` together with the stored row.
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// All rows, oldest first. Failures are `AppError::QueryFailure`.
    async fn list_ordered(&self) -> Result<Vec<EquipmentRow>>;

    /// Store one row. Failures are `AppError::InsertFailure`.
    async fn insert(&self, row: NewEquipmentRow) -> Result<EquipmentRow>;
}

const EQUIPMENT_COLUMNS: &str = r#"
    id, name, serial_number,
    order_text, order_file,
    acceptance_text, acceptance_file,
    donation_text, donation_file,
    tech_state_text, tech_state_files,
    location, responsible, created_at
"#;

/// PostgreSQL-backed equipment store
pub struct PgEquipmentStore {
    pool: PgPool,
}

impl PgEquipmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentStore for PgEquipmentStore {
    async fn list_ordered(&self) -> Result<Vec<EquipmentRow>> {
        // seq keeps rows sharing a created_at in insertion order
        let query = format!(
            "SELECT {} FROM equipment ORDER BY created_at ASC, seq ASC",
            EQUIPMENT_COLUMNS
        );

        sqlx::query_as::<_, EquipmentRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list equipment: {:?}", e);
                AppError::QueryFailure(e.to_string())
            })
    }

    async fn insert(&self, row: NewEquipmentRow) -> Result<EquipmentRow> {
        let query = format!(
            r#"
            INSERT INTO equipment (
                name, serial_number,
                order_text, order_file,
                acceptance_text, acceptance_file,
                donation_text, donation_file,
                tech_state_text, tech_state_files,
                location, responsible
            ) VALUES (
                $1, $2,
                $3, $4,
                $5, $6,
                $7, $8,
                $9, $10,
                $11, $12
            )
            RETURNING {}
            "#,
            EQUIPMENT_COLUMNS
        );

        let stored = sqlx::query_as::<_, EquipmentRow>(&query)
            .bind(row.name)
            .bind(row.serial_number)
            .bind(row.order_text)
            .bind(row.order_file)
            .bind(row.acceptance_text)
            .bind(row.acceptance_file)
            .bind(row.donation_text)
            .bind(row.donation_file)
            .bind(row.tech_state_text)
            .bind(row.tech_state_files)
            .bind(row.location)
            .bind(row.responsible)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert equipment: {:?}", e);
                AppError::InsertFailure(e.to_string())
            })?;

        tracing::info!(
            "Equipment stored: id={}, serial={}",
            stored.id,
            stored.serial_number
        );

        Ok(stored)
    }
}
