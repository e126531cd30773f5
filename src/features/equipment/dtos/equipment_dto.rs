use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::equipment::models::{
    DocumentSetSlot, DocumentSlot, Equipment, EquipmentField, FileRef,
};
use crate::features::equipment::session::SessionState;

/// A document received with the form, not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Input for registering a new equipment item (parsed from multipart form data)
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateEquipmentDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "serial_number is required"))]
    pub serial_number: String,
    pub order: String,
    pub order_file: Option<UploadedFile>,
    pub acceptance: String,
    pub acceptance_file: Option<UploadedFile>,
    pub donation: String,
    pub donation_file: Option<UploadedFile>,
    pub tech_state: String,
    pub tech_state_files: Vec<UploadedFile>,
    pub location: String,
    pub responsible: String,
}

impl CreateEquipmentDto {
    /// Assign a text form field. Returns false for unknown field names.
    pub fn set_text(&mut self, field: &str, value: String) -> bool {
        let value = value.trim().to_string();
        let target = match field {
            "name" => &mut self.name,
            // the browser form posts "serial"
            "serial_number" | "serial" => &mut self.serial_number,
            "order" => &mut self.order,
            "acceptance" => &mut self.acceptance,
            "donation" => &mut self.donation,
            "tech_state" => &mut self.tech_state,
            "location" => &mut self.location,
            "responsible" => &mut self.responsible,
            _ => return false,
        };
        *target = value;
        true
    }

    /// Attach a document to its form slot. Returns false for unknown field names.
    pub fn attach_file(&mut self, field: &str, file: UploadedFile) -> bool {
        match field {
            "order_file" => self.order_file = Some(file),
            "acceptance_file" => self.acceptance_file = Some(file),
            "donation_file" => self.donation_file = Some(file),
            "tech_state_files" => self.tech_state_files.push(file),
            _ => return false,
        }
        true
    }
}

/// Multipart form for creating equipment, for OpenAPI documentation only.
/// The handler reads the form through the `EquipmentForm` extractor.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateEquipmentFormDto {
    #[schema(example = "Bukovel-AD")]
    pub name: String,
    #[schema(example = "SN-42")]
    pub serial_number: String,
    /// Work order reference
    pub order: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub order_file: Option<String>,
    /// Acceptance certificate reference
    pub acceptance: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub acceptance_file: Option<String>,
    /// Charity transfer certificate reference
    pub donation: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub donation_file: Option<String>,
    /// Technical-state report reference
    pub tech_state: Option<String>,
    /// Repeat the part once per technical-state document
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub tech_state_files: Option<Vec<String>>,
    pub location: Option<String>,
    /// Materially responsible person
    pub responsible: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileRefDto {
    pub url: String,
    pub name: String,
}

impl From<&FileRef> for FileRefDto {
    fn from(f: &FileRef) -> Self {
        Self {
            url: f.url().to_string(),
            name: f.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentDto {
    pub text: String,
    pub file: Option<FileRefDto>,
}

impl From<&DocumentSlot> for DocumentDto {
    fn from(slot: &DocumentSlot) -> Self {
        Self {
            text: slot.text.clone(),
            file: slot.file.as_ref().map(FileRefDto::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentSetDto {
    pub text: String,
    pub files: Vec<FileRefDto>,
}

impl From<&DocumentSetSlot> for DocumentSetDto {
    fn from(slot: &DocumentSetSlot) -> Self {
        Self {
            text: slot.text.clone(),
            files: slot.files.iter().map(FileRefDto::from).collect(),
        }
    }
}

/// Response DTO for an equipment item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentResponseDto {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub order: DocumentDto,
    pub acceptance: DocumentDto,
    pub donation: DocumentDto,
    pub technical_state: DocumentSetDto,
    pub location: String,
    pub responsible: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Equipment> for EquipmentResponseDto {
    fn from(e: &Equipment) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            serial_number: e.serial_number.clone(),
            order: (&e.order).into(),
            acceptance: (&e.acceptance).into(),
            donation: (&e.donation).into(),
            technical_state: (&e.technical_state).into(),
            location: e.location.clone(),
            responsible: e.responsible.clone(),
            created_at: e.created_at,
        }
    }
}

/// Shown in place of empty text and missing documents
pub const EMPTY_CELL: &str = "-";

/// Table header: position column followed by the record fields in view order
pub const COLUMN_TITLES: [&str; 13] = [
    "№",
    "Назва",
    "Заводський номер",
    "Наряд",
    "Документ наряду",
    "Акт приймання",
    "Документ акту приймання",
    "Благодійка",
    "Акт приймання благодійки",
    "Акт технічного стану",
    "Акти технічного стану документ",
    "Актуальне місцезнаходження",
    "Матеріально відповідальна особа",
];

/// Rendered table cell: display text plus document links (empty for text cells)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TableCellDto {
    pub text: String,
    pub links: Vec<FileRefDto>,
}

impl From<EquipmentField<'_>> for TableCellDto {
    fn from(field: EquipmentField<'_>) -> Self {
        match field {
            EquipmentField::Text(text) if !text.is_empty() => Self {
                text: text.to_string(),
                links: Vec::new(),
            },
            EquipmentField::Document(Some(file)) => Self {
                text: file.name().to_string(),
                links: vec![file.into()],
            },
            EquipmentField::Documents(files) if !files.is_empty() => Self {
                text: files
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>()
                    .join(", "),
                links: files.iter().map(FileRefDto::from).collect(),
            },
            _ => Self {
                text: EMPTY_CELL.to_string(),
                links: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentTableRowDto {
    /// 1-based position in the full (unfiltered) collection
    pub number: usize,
    pub id: Uuid,
    pub cells: Vec<TableCellDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentTableDto {
    pub columns: Vec<String>,
    pub rows: Vec<EquipmentTableRowDto>,
}

impl EquipmentTableDto {
    pub fn new(rows: Vec<EquipmentTableRowDto>) -> Self {
        Self {
            columns: COLUMN_TITLES.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

impl EquipmentTableRowDto {
    pub fn new(number: usize, equipment: &Equipment) -> Self {
        Self {
            number,
            id: equipment.id,
            cells: equipment
                .fields()
                .into_iter()
                .map(TableCellDto::from)
                .collect(),
        }
    }
}

/// Session status response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionStatusDto {
    pub state: SessionState,
    pub total: usize,
    /// Error from the last load or save, if it failed
    pub last_error: Option<String>,
}

/// Allowed MIME types for equipment documents
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Maximum size of a single document in bytes (20MB)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}
