//! Storage module for equipment documents
//!
//! Defines the [`BlobStore`] capability used by the upload flow and the
//! MinIO/S3-compatible adapter that implements it.

mod blob_store;
mod minio_client;

pub use blob_store::BlobStore;
pub use minio_client::MinIOClient;
