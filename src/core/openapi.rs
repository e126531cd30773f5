use utoipa::{Modify, OpenApi};

use crate::features::equipment::{dtos as equipment_dtos, handlers as equipment_handlers};
use crate::features::equipment::session::SessionState;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Equipment
        equipment_handlers::equipment_handler::list_equipment,
        equipment_handlers::equipment_handler::get_equipment_table,
        equipment_handlers::equipment_handler::get_session_status,
        equipment_handlers::equipment_handler::create_equipment,
        equipment_handlers::equipment_handler::reload_equipment,
        equipment_handlers::equipment_handler::open_form,
        equipment_handlers::equipment_handler::cancel_form,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Equipment
            SessionState,
            equipment_dtos::CreateEquipmentFormDto,
            equipment_dtos::FileRefDto,
            equipment_dtos::DocumentDto,
            equipment_dtos::DocumentSetDto,
            equipment_dtos::EquipmentResponseDto,
            equipment_dtos::TableCellDto,
            equipment_dtos::EquipmentTableRowDto,
            equipment_dtos::EquipmentTableDto,
            equipment_dtos::SessionStatusDto,
            ApiResponse<Vec<equipment_dtos::EquipmentResponseDto>>,
            ApiResponse<equipment_dtos::EquipmentResponseDto>,
            ApiResponse<equipment_dtos::EquipmentTableDto>,
            ApiResponse<equipment_dtos::SessionStatusDto>,
        )
    ),
    tags(
        (name = "equipment", description = "Equipment registry with attached documents"),
    ),
    info(
        title = "REB Registry API",
        version = "0.1.0",
        description = "API documentation for the REB equipment registry",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_equipment_paths() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Registry".to_string(),
            version: "1.2.3".to_string(),
            description: "docs".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Registry");
        assert!(doc.paths.paths.contains_key("/api/equipment"));
        assert!(doc.paths.paths.contains_key("/api/equipment/table"));
        assert!(doc.paths.paths.contains_key("/api/equipment/reload"));
    }
}
