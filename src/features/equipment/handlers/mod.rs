pub mod equipment_handler;

pub use equipment_handler::{
    __path_cancel_form, __path_create_equipment, __path_get_equipment_table,
    __path_get_session_status, __path_list_equipment, __path_open_form, __path_reload_equipment,
    cancel_form, create_equipment, get_equipment_table, get_session_status, list_equipment,
    open_form, reload_equipment,
};
