//! # Service Errors
//!
//! Error taxonomy surfaced by the directory service.

use thiserror::Error;

use crate::model::{Field, FieldError};
use crate::storage::{StorageError, UniqueKey};

/// Result type for directory operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Directory service errors
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// One or more field rules failed; all of them are listed
    #[error("Validation Error")]
    Validation(Vec<FieldError>),

    /// A uniqueness key is already taken
    #[error("{message}")]
    Conflict { field: Field, message: String },

    #[error("User not found")]
    NotFound,

    /// Reset was requested while the durable store is active
    #[error("Reset function not available (durable store is being used)")]
    ResetUnavailable,

    /// Unexpected backend failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Operation a uniqueness conflict was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictContext {
    Create,
    Update,
}

impl ServiceError {
    /// Conflict error for a uniqueness key, worded for the operation
    pub fn conflict(key: UniqueKey, context: ConflictContext) -> Self {
        let message = match (key, context) {
            (UniqueKey::Email, ConflictContext::Create) => "Email is already in use",
            (UniqueKey::Email, ConflictContext::Update) => {
                "Email is already in use by another user"
            }
            (UniqueKey::Phone | UniqueKey::CountryPhone, ConflictContext::Create) => {
                "Phone number is already in use"
            }
            (UniqueKey::Phone, ConflictContext::Update) => {
                "Phone number is already in use by another user"
            }
            (UniqueKey::CountryPhone, ConflictContext::Update) => {
                "This phone number with this country code is already in use by another user"
            }
        };

        ServiceError::Conflict {
            field: key.field(),
            message: message.to_string(),
        }
    }

    /// Map a storage failure raised by a write
    pub fn from_storage(err: StorageError, context: ConflictContext) -> Self {
        match err {
            StorageError::Conflict(key) => Self::conflict(key, context),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
