//! Error types for the editor

use crate::sync::SyncError;
use quire_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid document: {0}")]
    Model(#[from] ModelError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Session has no persistence sink")]
    NoPersistence,
}
