mod equipment_repository;
mod equipment_store;

pub use equipment_repository::EquipmentRepository;
pub use equipment_store::{EquipmentStore, PgEquipmentStore};
