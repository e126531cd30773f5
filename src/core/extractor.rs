use axum::{
    body::Body,
    extract::{multipart::Field, FromRequest, Multipart, Request},
};
use tracing::debug;

use crate::core::error::AppError;
use crate::features::equipment::dtos::{
    is_mime_type_allowed, CreateEquipmentDto, UploadedFile, ALLOWED_MIME_TYPES, MAX_FILE_SIZE,
};

/// Multipart extractor for the equipment form.
///
/// Text parts fill the matching fields, file parts are checked for size and
/// type and attached to their slot. File inputs left empty by the browser
/// (no file name, no bytes) are treated as "no document".
pub struct EquipmentForm(pub CreateEquipmentDto);

impl<S> FromRequest<S> for EquipmentForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Expected multipart form data: {}", e)))?;

        let mut dto = CreateEquipmentDto::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            if field.file_name().is_some() {
                if let Some(file) = read_file(field, &field_name).await? {
                    if !dto.attach_file(&field_name, file) {
                        debug!("Ignoring unknown file field: {}", field_name);
                    }
                }
            } else {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
                })?;
                if !dto.set_text(&field_name, text) {
                    debug!("Ignoring unknown field: {}", field_name);
                }
            }
        }

        Ok(Self(dto))
    }
}

async fn read_file(field: Field<'_>, field_name: &str) -> Result<Option<UploadedFile>, AppError> {
    let file_name = field.file_name().unwrap_or("").to_string();
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let data = field.bytes().await.map_err(|e| {
        debug!("Failed to read file bytes: {}", e);
        AppError::BadRequest(format!("Failed to read file '{}': {}", field_name, e))
    })?;

    if file_name.is_empty() && data.is_empty() {
        return Ok(None);
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::BadRequest(format!(
            "File '{}' is too large. Maximum size is {} MB",
            file_name,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if !is_mime_type_allowed(&content_type) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            content_type,
            ALLOWED_MIME_TYPES.join(", ")
        )));
    }

    let file_name = if file_name.is_empty() {
        "unnamed".to_string()
    } else {
        file_name
    };

    Ok(Some(UploadedFile {
        file_name,
        content_type,
        data: data.to_vec(),
    }))
}
