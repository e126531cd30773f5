//! In-memory registry session.
//!
//! Holds the loaded equipment collection and the state machine around it:
//!
//! ```text
//! Idle -> Loading -> Ready
//! Ready -> FormOpen -> Ready            (open / cancel)
//! Ready | FormOpen -> Loading -> same   (reload)
//! Ready | FormOpen -> Saving -> Ready   (saved, record appended)
//! Saving -> previous state              (failed, collection unchanged)
//! ```
//!
//! Storage calls run between a `begin_*` and a `finish_*` step with the
//! session lock released, so reads never wait on uploads or queries.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::equipment::dtos::CreateEquipmentDto;
use crate::features::equipment::models::Equipment;
use crate::features::equipment::services::EquipmentService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading,
    Ready,
    FormOpen,
    Saving,
}

#[derive(Debug)]
pub struct RegistrySession {
    state: SessionState,
    records: Vec<Equipment>,
    last_error: Option<String>,
}

impl Default for RegistrySession {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrySession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            records: Vec::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn records(&self) -> &[Equipment] {
        &self.records
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enter `Loading`. Returns the state to resume once the load finishes.
    pub fn begin_load(&mut self) -> Result<SessionState> {
        let resume_state = match self.state {
            SessionState::Idle => SessionState::Ready,
            SessionState::Ready | SessionState::FormOpen => self.state,
            SessionState::Loading | SessionState::Saving => {
                return Err(AppError::Conflict(
                    "Equipment records are busy, try again".to_string(),
                ))
            }
        };

        self.state = SessionState::Loading;
        Ok(resume_state)
    }

    /// Apply a load result.
    ///
    /// On failure the current collection is kept as is (empty on first load)
    /// and the error is recorded and returned.
    pub fn finish_load(
        &mut self,
        resume_state: SessionState,
        result: Result<Vec<Equipment>>,
    ) -> Result<()> {
        self.state = resume_state;

        match result {
            Ok(records) => {
                info!("Loaded {} equipment records", records.len());
                self.records = records;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load equipment records: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn open_form(&mut self) -> Result<()> {
        match self.state {
            SessionState::Ready => {
                self.state = SessionState::FormOpen;
                Ok(())
            }
            SessionState::FormOpen => Ok(()),
            other => Err(AppError::Conflict(format!(
                "Cannot open the form while {:?}",
                other
            ))),
        }
    }

    pub fn cancel_form(&mut self) {
        if self.state == SessionState::FormOpen {
            self.state = SessionState::Ready;
        }
    }

    /// Enter `Saving`. Returns the state to fall back to if the save fails.
    pub fn begin_save(&mut self) -> Result<SessionState> {
        let resume_state = match self.state {
            SessionState::Ready | SessionState::FormOpen => self.state,
            SessionState::Saving => {
                return Err(AppError::Conflict(
                    "Another save is already in progress".to_string(),
                ))
            }
            SessionState::Idle | SessionState::Loading => {
                return Err(AppError::Conflict(
                    "Equipment records are not loaded yet".to_string(),
                ))
            }
        };

        self.state = SessionState::Saving;
        Ok(resume_state)
    }

    /// Apply a save result: append and go to `Ready`, or restore `resume_state`
    pub fn finish_save(
        &mut self,
        resume_state: SessionState,
        result: Result<Equipment>,
    ) -> Result<Equipment> {
        match result {
            Ok(equipment) => {
                self.records.push(equipment.clone());
                self.last_error = None;
                self.state = SessionState::Ready;
                Ok(equipment)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.state = resume_state;
                Err(e)
            }
        }
    }
}

/// Shared state for equipment routes: the single session and the service it drives.
///
/// The session is the only mutator of the collection. The lock is held only
/// for state transitions, never across storage calls.
pub struct EquipmentState {
    pub session: Mutex<RegistrySession>,
    pub service: EquipmentService,
}

impl EquipmentState {
    pub fn new(service: EquipmentService) -> Self {
        Self {
            session: Mutex::new(RegistrySession::new()),
            service,
        }
    }

    /// Load (or reload) the collection from storage
    pub async fn load(&self) -> Result<()> {
        let resume_state = self.session.lock().await.begin_load()?;
        let result = self.service.list_all().await;
        self.session.lock().await.finish_load(resume_state, result)
    }

    /// Save a new item and append it to the collection.
    ///
    /// `dto` is only borrowed, so the caller still holds the input when the
    /// save fails.
    pub async fn save(&self, dto: &CreateEquipmentDto) -> Result<Equipment> {
        let resume_state = self.session.lock().await.begin_save()?;
        let result = self.service.save(dto).await;
        self.session.lock().await.finish_save(resume_state, result)
    }

    /// First load at startup; a failure leaves the collection empty and is
    /// reported through the session status instead of stopping the server
    pub async fn load_initial(&self) {
        if let Err(e) = self.load().await {
            warn!("Starting with an empty equipment collection: {}", e);
        }
    }
}
