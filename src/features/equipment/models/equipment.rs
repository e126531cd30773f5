use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Pointer to a stored document: public URL plus the name it was uploaded with.
///
/// Only the upload flow creates new values; everything else reads them back
/// from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    url: String,
    name: String,
}

impl FileRef {
    pub(crate) fn new(url: String, name: String) -> Self {
        Self { url, name }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Text reference plus at most one attached document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSlot {
    pub text: String,
    pub file: Option<FileRef>,
}

/// Text reference plus any number of attached documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSetSlot {
    pub text: String,
    pub files: Vec<FileRef>,
}

/// A persisted equipment item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    /// Work order
    pub order: DocumentSlot,
    /// Acceptance certificate
    pub acceptance: DocumentSlot,
    /// Charity transfer certificate
    pub donation: DocumentSlot,
    /// Technical-state reports
    pub technical_state: DocumentSetSlot,
    pub location: String,
    /// Materially responsible person
    pub responsible: String,
    pub created_at: DateTime<Utc>,
}

/// Equipment item whose documents are uploaded but which is not stored yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentDraft {
    pub name: String,
    pub serial_number: String,
    pub order: DocumentSlot,
    pub acceptance: DocumentSlot,
    pub donation: DocumentSlot,
    pub technical_state: DocumentSetSlot,
    pub location: String,
    pub responsible: String,
}

/// Number of fields in the table view of a record
pub const FIELD_COUNT: usize = 12;

/// One cell of the fixed table view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentField<'a> {
    Text(&'a str),
    Document(Option<&'a FileRef>),
    Documents(&'a [FileRef]),
}

impl Equipment {
    /// Fields in view order: name, serial, order, order document, acceptance,
    /// acceptance document, donation, donation document, technical state,
    /// technical-state documents, location, responsible.
    ///
    /// Renderers index into this array, so the order must not change.
    pub fn fields(&self) -> [EquipmentField<'_>; FIELD_COUNT] {
        [
            EquipmentField::Text(&self.name),
            EquipmentField::Text(&self.serial_number),
            EquipmentField::Text(&self.order.text),
            EquipmentField::Document(self.order.file.as_ref()),
            EquipmentField::Text(&self.acceptance.text),
            EquipmentField::Document(self.acceptance.file.as_ref()),
            EquipmentField::Text(&self.donation.text),
            EquipmentField::Document(self.donation.file.as_ref()),
            EquipmentField::Text(&self.technical_state.text),
            EquipmentField::Documents(&self.technical_state.files),
            EquipmentField::Text(&self.location),
            EquipmentField::Text(&self.responsible),
        ]
    }
}

/// Database row for the `equipment` table
#[derive(Debug, Clone, FromRow)]
pub struct EquipmentRow {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub order_text: String,
    pub order_file: Option<Json<FileRef>>,
    pub acceptance_text: String,
    pub acceptance_file: Option<Json<FileRef>>,
    pub donation_text: String,
    pub donation_file: Option<Json<FileRef>>,
    pub tech_state_text: String,
    pub tech_state_files: Json<Vec<FileRef>>,
    pub location: String,
    pub responsible: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `equipment` table; id and created_at come from the database
#[derive(Debug, Clone)]
pub struct NewEquipmentRow {
    pub name: String,
    pub serial_number: String,
    pub order_text: String,
    pub order_file: Option<Json<FileRef>>,
    pub acceptance_text: String,
    pub acceptance_file: Option<Json<FileRef>>,
    pub donation_text: String,
    pub donation_file: Option<Json<FileRef>>,
    pub tech_state_text: String,
    pub tech_state_files: Json<Vec<FileRef>>,
    pub location: String,
    pub responsible: String,
}

impl From<EquipmentRow> for Equipment {
    fn from(row: EquipmentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            serial_number: row.serial_number,
            order: DocumentSlot {
                text: row.order_text,
                file: row.order_file.map(|f| f.0),
            },
            acceptance: DocumentSlot {
                text: row.acceptance_text,
                file: row.acceptance_file.map(|f| f.0),
            },
            donation: DocumentSlot {
                text: row.donation_text,
                file: row.donation_file.map(|f| f.0),
            },
            technical_state: DocumentSetSlot {
                text: row.tech_state_text,
                files: row.tech_state_files.0,
            },
            location: row.location,
            responsible: row.responsible,
            created_at: row.created_at,
        }
    }
}

impl From<&EquipmentDraft> for NewEquipmentRow {
    fn from(draft: &EquipmentDraft) -> Self {
        Self {
            name: draft.name.clone(),
            serial_number: draft.serial_number.clone(),
            order_text: draft.order.text.clone(),
            order_file: draft.order.file.clone().map(Json),
            acceptance_text: draft.acceptance.text.clone(),
            acceptance_file: draft.acceptance.file.clone().map(Json),
            donation_text: draft.donation.text.clone(),
            donation_file: draft.donation.file.clone().map(Json),
            tech_state_text: draft.technical_state.text.clone(),
            tech_state_files: Json(draft.technical_state.files.clone()),
            location: draft.location.clone(),
            responsible: draft.responsible.clone(),
        }
    }
}
