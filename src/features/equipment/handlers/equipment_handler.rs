use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::core::error::{AppError, Result};
use crate::core::extractor::EquipmentForm;
use crate::features::equipment::dtos::{
    CreateEquipmentFormDto, EquipmentResponseDto, EquipmentTableDto, EquipmentTableRowDto,
    SessionStatusDto,
};
use crate::features::equipment::search::{filter_by_name, NameFilter};
use crate::features::equipment::session::{EquipmentState, RegistrySession};
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing equipment
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring of the equipment name, case-insensitive
    #[serde(default)]
    pub q: String,
}

/// List equipment
///
/// Served from the in-memory collection, oldest first, optionally filtered by name.
#[utoipa::path(
    get,
    path = "/api/equipment",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive substring of the name")
    ),
    responses(
        (status = 200, description = "Equipment list", body = ApiResponse<Vec<EquipmentResponseDto>>),
    ),
    tag = "equipment"
)]
pub async fn list_equipment(
    State(state): State<Arc<EquipmentState>>,
    Query(query): Query<SearchQuery>,
) -> Json<ApiResponse<Vec<EquipmentResponseDto>>> {
    let session = state.session.lock().await;

    let items: Vec<EquipmentResponseDto> = filter_by_name(session.records(), &query.q)
        .into_iter()
        .map(EquipmentResponseDto::from)
        .collect();
    let total = items.len() as i64;

    Json(ApiResponse::success(Some(items), None, Some(Meta { total })))
}

/// Equipment table
///
/// The registry as a table: fixed columns, one row per item, `-` for empty cells.
/// Row numbers are positions in the unfiltered collection.
#[utoipa::path(
    get,
    path = "/api/equipment/table",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive substring of the name")
    ),
    responses(
        (status = 200, description = "Equipment table", body = ApiResponse<EquipmentTableDto>),
    ),
    tag = "equipment"
)]
pub async fn get_equipment_table(
    State(state): State<Arc<EquipmentState>>,
    Query(query): Query<SearchQuery>,
) -> Json<ApiResponse<EquipmentTableDto>> {
    let session = state.session.lock().await;
    let filter = NameFilter::new(&query.q);

    let rows: Vec<EquipmentTableRowDto> = session
        .records()
        .iter()
        .enumerate()
        .filter(|(_, equipment)| filter.matches(equipment))
        .map(|(index, equipment)| EquipmentTableRowDto::new(index + 1, equipment))
        .collect();
    let total = rows.len() as i64;

    Json(ApiResponse::success(
        Some(EquipmentTableDto::new(rows)),
        None,
        Some(Meta { total }),
    ))
}

/// Session status
#[utoipa::path(
    get,
    path = "/api/equipment/status",
    responses(
        (status = 200, description = "Session status", body = ApiResponse<SessionStatusDto>),
    ),
    tag = "equipment"
)]
pub async fn get_session_status(
    State(state): State<Arc<EquipmentState>>,
) -> Json<ApiResponse<SessionStatusDto>> {
    let session = state.session.lock().await;

    Json(ApiResponse::success(Some(status_of(&session)), None, None))
}

fn status_of(session: &RegistrySession) -> SessionStatusDto {
    SessionStatusDto {
        state: session.state(),
        total: session.records().len(),
        last_error: session.last_error().map(|e| e.to_string()),
    }
}

/// Open the registration form
#[utoipa::path(
    post,
    path = "/api/equipment/form",
    responses(
        (status = 200, description = "Form opened", body = ApiResponse<SessionStatusDto>),
        (status = 409, description = "Records not loaded or a save in progress")
    ),
    tag = "equipment"
)]
pub async fn open_form(
    State(state): State<Arc<EquipmentState>>,
) -> Result<Json<ApiResponse<SessionStatusDto>>> {
    let mut session = state.session.lock().await;
    session.open_form()?;

    Ok(Json(ApiResponse::success(
        Some(status_of(&session)),
        None,
        None,
    )))
}

/// Close the registration form without saving
#[utoipa::path(
    delete,
    path = "/api/equipment/form",
    responses(
        (status = 200, description = "Form closed", body = ApiResponse<SessionStatusDto>),
    ),
    tag = "equipment"
)]
pub async fn cancel_form(
    State(state): State<Arc<EquipmentState>>,
) -> Json<ApiResponse<SessionStatusDto>> {
    let mut session = state.session.lock().await;
    session.cancel_form();

    Json(ApiResponse::success(Some(status_of(&session)), None, None))
}

/// Register equipment
///
/// Uploads the attached documents, stores the record and adds it to the list.
/// If any document fails to upload nothing is stored.
#[utoipa::path(
    post,
    path = "/api/equipment",
    request_body(
        content = CreateEquipmentFormDto,
        content_type = "multipart/form-data",
        description = "Equipment fields with optional documents",
    ),
    responses(
        (status = 201, description = "Equipment registered", body = ApiResponse<EquipmentResponseDto>),
        (status = 400, description = "Invalid form or document"),
        (status = 409, description = "Records not loaded or another save in progress"),
        (status = 502, description = "Document storage or database failure")
    ),
    tag = "equipment"
)]
pub async fn create_equipment(
    State(state): State<Arc<EquipmentState>>,
    EquipmentForm(dto): EquipmentForm,
) -> Result<(StatusCode, Json<ApiResponse<EquipmentResponseDto>>)> {
    // Detached so a dropped connection cannot stop a save halfway
    let equipment = tokio::spawn(async move { state.save(&dto).await })
    .await
    .map_err(|e| AppError::Internal(format!("Save task failed: {}", e)))??;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(EquipmentResponseDto::from(&equipment)),
            Some("Equipment registered".to_string()),
            None,
        )),
    ))
}

/// Reload equipment
///
/// Re-reads every record from the database into memory.
#[utoipa::path(
    post,
    path = "/api/equipment/reload",
    responses(
        (status = 200, description = "Records reloaded", body = ApiResponse<SessionStatusDto>),
        (status = 409, description = "A save or load is in progress"),
        (status = 502, description = "Database failure")
    ),
    tag = "equipment"
)]
pub async fn reload_equipment(
    State(state): State<Arc<EquipmentState>>,
) -> Result<Json<ApiResponse<SessionStatusDto>>> {
    let status = tokio::spawn(async move {
        state.load().await?;
        let session = state.session.lock().await;
        Ok::<_, AppError>(status_of(&session))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Reload task failed: {}", e)))??;

    Ok(Json(ApiResponse::success(Some(status), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::equipment::dtos::EMPTY_CELL;
    use crate::features::equipment::session::SessionState;
    use crate::features::equipment::routes::routes;
    use crate::shared::test_helpers::{
        equipment_service, InMemoryBlobStore, InMemoryEquipmentStore,
    };
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use std::time::Duration;

    async fn server_with(
        blobs: Arc<InMemoryBlobStore>,
        store: Arc<InMemoryEquipmentStore>,
    ) -> TestServer {
        let state = Arc::new(EquipmentState::new(equipment_service(&blobs, &store)));
        state.load_initial().await;
        TestServer::new(routes(state, 10 * 1024 * 1024)).unwrap()
    }

    fn pdf(name: &str) -> Part {
        Part::bytes(format!("%PDF {}", name).into_bytes())
            .file_name(name)
            .mime_type("application/pdf")
    }

    #[tokio::test]
    async fn test_create_and_search_equipment() {
        let blobs = Arc::new(InMemoryBlobStore::default());
        let store = Arc::new(InMemoryEquipmentStore::default());
        let server = server_with(blobs.clone(), store).await;

        let form = MultipartForm::new()
            .add_text("name", "Ranets")
            .add_text("serial", "SN-42")
            .add_text("tech_state", "Report 1")
            .add_part("tech_state_files", pdf("A.pdf"))
            .add_part("tech_state_files", pdf("B.pdf"));

        let response = server.post("/api/equipment").multipart(form).await;
        response.assert_status(StatusCode::CREATED);
        let created = response.json::<ApiResponse<EquipmentResponseDto>>();
        let created = created.data.unwrap();
        assert_eq!(created.serial_number, "SN-42");
        assert!(created.order.file.is_none());
        let names: Vec<String> = created
            .technical_state
            .files
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(names, vec!["A.pdf", "B.pdf"]);
        assert_eq!(blobs.put_count(), 2);

        let found = server
            .get("/api/equipment")
            .add_query_param("q", "ranets")
            .await
            .json::<ApiResponse<Vec<EquipmentResponseDto>>>();
        assert_eq!(found.data.unwrap().len(), 1);

        let none = server
            .get("/api/equipment")
            .add_query_param("q", "zzz")
            .await
            .json::<ApiResponse<Vec<EquipmentResponseDto>>>();
        assert!(none.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_returns_bad_gateway_and_stores_nothing() {
        let blobs = Arc::new(InMemoryBlobStore::failing_for("acceptance"));
        let store = Arc::new(InMemoryEquipmentStore::default());
        let server = server_with(blobs, store.clone()).await;

        let form = MultipartForm::new()
            .add_text("name", "Ranets")
            .add_text("serial_number", "SN-42")
            .add_part("acceptance_file", pdf("act.pdf"));

        let response = server.post("/api/equipment").multipart(form).await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(store.insert_calls(), 0);
        let status = server
            .get("/api/equipment/status")
            .await
            .json::<ApiResponse<SessionStatusDto>>()
            .data
            .unwrap();
        assert_eq!(status.total, 0);
        assert!(status.last_error.is_some());
    }

    #[tokio::test]
    async fn test_missing_name_is_rejected() {
        let store = Arc::new(InMemoryEquipmentStore::default());
        let server = server_with(Arc::new(InMemoryBlobStore::default()), store.clone()).await;

        let form = MultipartForm::new().add_text("serial_number", "SN-1");
        let response = server.post("/api/equipment").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_disallowed_file_type_is_rejected() {
        let blobs = Arc::new(InMemoryBlobStore::default());
        let server = server_with(blobs.clone(), Arc::new(InMemoryEquipmentStore::default())).await;

        let form = MultipartForm::new()
            .add_text("name", "Ranets")
            .add_text("serial_number", "SN-1")
            .add_part(
                "order_file",
                Part::bytes(b"MZ".to_vec())
                    .file_name("setup.exe")
                    .mime_type("application/x-msdownload"),
            );
        let response = server.post("/api/equipment").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(blobs.put_count(), 0);
    }

    #[tokio::test]
    async fn test_table_renders_placeholders_and_positions() {
        let server = server_with(
            Arc::new(InMemoryBlobStore::default()),
            Arc::new(InMemoryEquipmentStore::default()),
        )
        .await;

        for (name, serial) in [("Bukovel", "SN-1"), ("Ranets", "SN-2")] {
            let form = MultipartForm::new()
                .add_text("name", name)
                .add_text("serial_number", serial);
            server
                .post("/api/equipment")
                .multipart(form)
                .await
                .assert_status(StatusCode::CREATED);
        }

        let table = server
            .get("/api/equipment/table")
            .add_query_param("q", "RAN")
            .await
            .json::<ApiResponse<EquipmentTableDto>>()
            .data
            .unwrap();

        assert_eq!(table.columns.len(), 13);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].number, 2);
        assert_eq!(table.rows[0].cells[0].text, "Ranets");
        assert_eq!(table.rows[0].cells[3].text, EMPTY_CELL);
    }

    #[tokio::test]
    async fn test_form_stays_open_after_failed_save() {
        let blobs = Arc::new(InMemoryBlobStore::failing_for("orders"));
        let server = server_with(blobs, Arc::new(InMemoryEquipmentStore::default())).await;

        let opened = server
            .post("/api/equipment/form")
            .await
            .json::<ApiResponse<SessionStatusDto>>()
            .data
            .unwrap();
        assert_eq!(opened.state, SessionState::FormOpen);

        let form = MultipartForm::new()
            .add_text("name", "Ranets")
            .add_text("serial_number", "SN-42")
            .add_part("order_file", pdf("order.pdf"));
        server
            .post("/api/equipment")
            .multipart(form)
            .await
            .assert_status(StatusCode::BAD_GATEWAY);

        let status = server
            .get("/api/equipment/status")
            .await
            .json::<ApiResponse<SessionStatusDto>>()
            .data
            .unwrap();
        assert_eq!(status.state, SessionState::FormOpen);

        let closed = server
            .delete("/api/equipment/form")
            .await
            .json::<ApiResponse<SessionStatusDto>>()
            .data
            .unwrap();
        assert_eq!(closed.state, SessionState::Ready);
    }

    #[tokio::test]
    async fn test_reads_and_second_save_do_not_wait_for_uploads() {
        let blobs = Arc::new(InMemoryBlobStore::with_delay(Duration::from_millis(300)));
        let store = Arc::new(InMemoryEquipmentStore::default());
        let server = server_with(blobs, store.clone()).await;

        let slow = MultipartForm::new()
            .add_text("name", "Ranets")
            .add_text("serial_number", "SN-42")
            .add_part("order_file", pdf("order.pdf"));
        let quick = MultipartForm::new()
            .add_text("name", "Bukovel")
            .add_text("serial_number", "SN-7");

        let (first, (status, second)) = tokio::join!(
            server.post("/api/equipment").multipart(slow),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let status = server
                    .get("/api/equipment/status")
                    .await
                    .json::<ApiResponse<SessionStatusDto>>()
                    .data
                    .unwrap();
                let second = server.post("/api/equipment").multipart(quick).await;
                (status, second)
            }
        );

        assert_eq!(status.state, SessionState::Saving);
        second.assert_status(StatusCode::CONFLICT);
        first.assert_status(StatusCode::CREATED);
        assert_eq!(store.insert_calls(), 1);
    }

    #[tokio::test]
    async fn test_reload_after_failed_initial_load() {
        let store = Arc::new(InMemoryEquipmentStore::default());
        store.fail_list(true);
        let server = server_with(Arc::new(InMemoryBlobStore::default()), store.clone()).await;

        let status = server
            .get("/api/equipment/status")
            .await
            .json::<ApiResponse<SessionStatusDto>>()
            .data
            .unwrap();
        assert_eq!(status.state, SessionState::Ready);
        assert!(status.last_error.is_some());

        server
            .post("/api/equipment/reload")
            .await
            .assert_status(StatusCode::BAD_GATEWAY);

        store.fail_list(false);
        let reloaded = server
            .post("/api/equipment/reload")
            .await
            .json::<ApiResponse<SessionStatusDto>>()
            .data
            .unwrap();
        assert!(reloaded.last_error.is_none());
    }
}
