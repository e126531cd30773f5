use tracing::{info, warn};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::equipment::dtos::CreateEquipmentDto;
use crate::features::equipment::models::Equipment;
use crate::features::equipment::repositories::EquipmentRepository;
use crate::features::equipment::services::UploadService;

/// Service for equipment operations
pub struct EquipmentService {
    uploads: UploadService,
    repository: EquipmentRepository,
}

impl EquipmentService {
    pub fn new(uploads: UploadService, repository: EquipmentRepository) -> Self {
        Self {
            uploads,
            repository,
        }
    }

    /// All stored equipment, oldest first
    pub async fn list_all(&self) -> Result<Vec<Equipment>> {
        self.repository.list_all().await
    }

    /// Register a new item: validate, upload its documents, then insert it.
    ///
    /// Nothing is inserted unless every attached document was stored.
    pub async fn save(&self, dto: &CreateEquipmentDto) -> Result<Equipment> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let draft = self.uploads.assemble_draft(dto).await?;
        let equipment = self.repository.insert(&draft).await.map_err(|e| {
            let stored = draft.order.file.iter().count()
                + draft.acceptance.file.iter().count()
                + draft.donation.file.iter().count()
                + draft.technical_state.files.len();
            if stored > 0 {
                warn!("Insert failed, {} uploaded documents left unreferenced", stored);
            }
            e
        })?;

        info!(
            "Equipment registered: id={}, name={}, tech_state_documents={}",
            equipment.id,
            equipment.name,
            equipment.technical_state.files.len()
        );

        Ok(equipment)
    }
}
