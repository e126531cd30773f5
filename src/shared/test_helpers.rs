//! In-memory stand-ins for the blob and record stores

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::equipment::dtos::UploadedFile;
use crate::features::equipment::models::{EquipmentRow, NewEquipmentRow};
use crate::features::equipment::repositories::{EquipmentRepository, EquipmentStore};
use crate::features::equipment::services::{EquipmentService, UploadService};
use crate::modules::storage::BlobStore;

pub fn uploaded_file(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        data: format!("%PDF {}", name).into_bytes(),
    }
}

pub fn equipment_service(
    blobs: &Arc<InMemoryBlobStore>,
    store: &Arc<InMemoryEquipmentStore>,
) -> EquipmentService {
    EquipmentService::new(
        UploadService::new(blobs.clone()),
        EquipmentRepository::new(store.clone()),
    )
}

/// Blob store keeping objects in memory; can fail puts whose key contains a
/// marker or delay every put
#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: Mutex<Vec<(String, Vec<u8>)>>,
    fail_marker: Option<String>,
    delay: Option<Duration>,
}

impl InMemoryBlobStore {
    pub fn failing_for(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Default::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn put_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, data: &[u8], _content_type: &str) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(marker) = &self.fail_marker {
            if key.contains(marker.as_str()) {
                return Err(AppError::UploadFailure(format!("simulated failure for {}", key)));
            }
        }
        self.objects
            .lock()
            .unwrap()
            .push((key.to_string(), data.to_vec()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://blobs.test/{}", key)
    }
}

/// Record store keeping rows in insertion order
#[derive(Default)]
pub struct InMemoryEquipmentStore {
    rows: Mutex<Vec<EquipmentRow>>,
    insert_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_insert: AtomicBool,
}

impl InMemoryEquipmentStore {
    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EquipmentStore for InMemoryEquipmentStore {
    async fn list_ordered(&self) -> Result<Vec<EquipmentRow>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(AppError::QueryFailure("simulated list failure".to_string()));
        }
        let mut rows = self.rows.lock().unwrap().clone();
        // stable: ties stay in insertion order
        rows.sort_by_key(|r| r.created_at);
        Ok(rows)
    }

    async fn insert(&self, row: NewEquipmentRow) -> Result<EquipmentRow> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::InsertFailure("simulated insert failure".to_string()));
        }

        let stored = EquipmentRow {
            id: Uuid::new_v4(),
            name: row.name,
            serial_number: row.serial_number,
            order_text: row.order_text,
            order_file: row.order_file,
            acceptance_text: row.acceptance_text,
            acceptance_file: row.acceptance_file,
            donation_text: row.donation_text,
            donation_file: row.donation_file,
            tech_state_text: row.tech_state_text,
            tech_state_files: row.tech_state_files,
            location: row.location,
            responsible: row.responsible,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }
}
