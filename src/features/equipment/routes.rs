use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::equipment::handlers;
use crate::features::equipment::session::EquipmentState;

/// Create routes for the equipment feature
///
/// `max_body_size` bounds the whole multipart form, all documents included
pub fn routes(state: Arc<EquipmentState>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/equipment",
            get(handlers::list_equipment)
                .post(handlers::create_equipment)
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .route("/api/equipment/table", get(handlers::get_equipment_table))
        .route("/api/equipment/status", get(handlers::get_session_status))
        .route("/api/equipment/reload", post(handlers::reload_equipment))
        .route(
            "/api/equipment/form",
            post(handlers::open_form).delete(handlers::cancel_form),
        )
        .with_state(state)
}
