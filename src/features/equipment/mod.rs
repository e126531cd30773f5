//! Equipment registry.
//!
//! | Method | Path                     | Description                         |
//! |--------|--------------------------|-------------------------------------|
//! | GET    | `/api/equipment`         | List records, `?q=` filters by name |
//! | POST   | `/api/equipment`         | Register a record (multipart form)  |
//! | GET    | `/api/equipment/table`   | Records rendered as table rows      |
//! | GET    | `/api/equipment/status`  | Session state and last error        |
//! | POST   | `/api/equipment/reload`  | Re-read records from the database   |
//! | POST   | `/api/equipment/form`    | Open the registration form          |
//! | DELETE | `/api/equipment/form`    | Close the form without saving       |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod search;
pub mod services;
pub mod session;

pub use routes::routes;
pub use services::EquipmentService;
pub use session::EquipmentState;
