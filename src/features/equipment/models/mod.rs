mod equipment;

pub use equipment::{
    DocumentSetSlot, DocumentSlot, Equipment, EquipmentDraft, EquipmentField, EquipmentRow,
    FileRef, NewEquipmentRow, FIELD_COUNT,
};
