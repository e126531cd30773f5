mod equipment_dto;

pub use equipment_dto::{
    is_mime_type_allowed, CreateEquipmentDto, CreateEquipmentFormDto, DocumentDto,
    DocumentSetDto, EquipmentResponseDto, EquipmentTableDto, EquipmentTableRowDto, FileRefDto,
    SessionStatusDto, TableCellDto, UploadedFile, ALLOWED_MIME_TYPES, COLUMN_TITLES, EMPTY_CELL,
    MAX_FILE_SIZE,
};
