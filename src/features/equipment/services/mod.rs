mod equipment_service;
mod upload_service;

pub use equipment_service::EquipmentService;
pub use upload_service::{
    storage_key, UploadService, ACCEPTANCE_FOLDER, DONATION_FOLDER, ORDER_FOLDER,
    TECH_STATE_FOLDER,
};
