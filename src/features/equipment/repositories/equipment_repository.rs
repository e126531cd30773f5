use std::sync::Arc;

use crate::core::error::Result;
use crate::features::equipment::models::{Equipment, EquipmentDraft, NewEquipmentRow};
use crate::features::equipment::repositories::EquipmentStore;

/// Reads and writes equipment records through an [`EquipmentStore`],
/// translating between storage rows and the record model
#[derive(Clone)]
pub struct EquipmentRepository {
    store: Arc<dyn EquipmentStore>,
}

impl EquipmentRepository {
    pub fn new(store: Arc<dyn EquipmentStore>) -> Self {
        Self { store }
    }

    /// Every record, ordered by creation time (oldest first)
    pub async fn list_all(&self) -> Result<Vec<Equipment>> {
        let rows = self.store.list_ordered().await?;
        Ok(rows.into_iter().map(Equipment::from).collect())
    }

    /// Persist a fully assembled draft and return the stored record
    pub async fn insert(&self, draft: &EquipmentDraft) -> Result<Equipment> {
        let row = self.store.insert(NewEquipmentRow::from(draft)).await?;
        Ok(row.into())
    }
}
