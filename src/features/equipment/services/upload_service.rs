use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::equipment::dtos::{CreateEquipmentDto, UploadedFile};
use crate::features::equipment::models::{DocumentSetSlot, DocumentSlot, EquipmentDraft, FileRef};
use crate::modules::storage::BlobStore;
use crate::shared::validation::sanitize_file_name;

/// Storage folder for work order documents
pub const ORDER_FOLDER: &str = "orders";
/// Storage folder for acceptance certificates
pub const ACCEPTANCE_FOLDER: &str = "acceptance";
/// Storage folder for charity transfer certificates
pub const DONATION_FOLDER: &str = "donations";
/// Storage folder for technical-state reports
pub const TECH_STATE_FOLDER: &str = "tech-state";

/// Uploads form documents to the blob store and turns them into [`FileRef`]s
pub struct UploadService {
    blob_store: Arc<dyn BlobStore>,
}

impl UploadService {
    pub fn new(blob_store: Arc<dyn BlobStore>) -> Self {
        Self { blob_store }
    }

    /// Upload one optional document. `None` in, `None` out, without touching storage.
    pub async fn upload_single(
        &self,
        file: Option<&UploadedFile>,
        folder: &str,
    ) -> Result<Option<FileRef>> {
        match file {
            Some(file) => self.upload(file, folder).await.map(Some),
            None => Ok(None),
        }
    }

    /// Upload documents concurrently and wait for all of them.
    ///
    /// The result follows input order. If any upload fails the whole call
    /// fails; successful siblings are not returned.
    pub async fn upload_many(&self, files: &[UploadedFile], folder: &str) -> Result<Vec<FileRef>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let results = join_all(files.iter().map(|file| self.upload(file, folder))).await;

        let mut uploaded = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(file_ref) => uploaded.push(file_ref),
                Err(e) => failures.push(e.to_string()),
            }
        }

        if !failures.is_empty() {
            return Err(AppError::UploadFailure(format!(
                "{} of {} documents in '{}' failed: {}",
                failures.len(),
                files.len(),
                folder,
                failures.join("; ")
            )));
        }

        Ok(uploaded)
    }

    /// Upload every document attached to the form and build the draft record.
    ///
    /// All slots upload concurrently; the draft is only built once every
    /// upload has finished, and any failure aborts it.
    pub async fn assemble_draft(&self, dto: &CreateEquipmentDto) -> Result<EquipmentDraft> {
        let (order_file, acceptance_file, donation_file, tech_state_files) = tokio::join!(
            self.upload_single(dto.order_file.as_ref(), ORDER_FOLDER),
            self.upload_single(dto.acceptance_file.as_ref(), ACCEPTANCE_FOLDER),
            self.upload_single(dto.donation_file.as_ref(), DONATION_FOLDER),
            self.upload_many(&dto.tech_state_files, TECH_STATE_FOLDER),
        );

        Ok(EquipmentDraft {
            name: dto.name.clone(),
            serial_number: dto.serial_number.clone(),
            order: DocumentSlot {
                text: dto.order.clone(),
                file: order_file?,
            },
            acceptance: DocumentSlot {
                text: dto.acceptance.clone(),
                file: acceptance_file?,
            },
            donation: DocumentSlot {
                text: dto.donation.clone(),
                file: donation_file?,
            },
            technical_state: DocumentSetSlot {
                text: dto.tech_state.clone(),
                files: tech_state_files?,
            },
            location: dto.location.clone(),
            responsible: dto.responsible.clone(),
        })
    }

    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<FileRef> {
        let key = storage_key(folder, &file.file_name);

        self.blob_store
            .put(&key, &file.data, &file.content_type)
            .await
            .map_err(|e| {
                warn!("Upload of '{}' to '{}' failed: {}", file.file_name, key, e);
                match e {
                    AppError::UploadFailure(_) => e,
                    other => AppError::UploadFailure(other.to_string()),
                }
            })?;

        debug!("Uploaded '{}' as '{}'", file.file_name, key);

        Ok(FileRef::new(
            self.blob_store.public_url(&key),
            file.file_name.clone(),
        ))
    }
}

/// `{folder}/{uuid_v7}_{sanitized file name}`; the time-ordered UUID keeps keys unique
pub fn storage_key(folder: &str, file_name: &str) -> String {
    format!(
        "{}/{}_{}",
        folder,
        Uuid::now_v7().simple(),
        sanitize_file_name(file_name)
    )
}
