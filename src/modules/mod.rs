//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for the object store that holds equipment documents.

pub mod storage;
