//! # Storage Errors

use thiserror::Error;

use crate::model::Field;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Uniqueness constraints enforced by every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Email,
    Phone,
    /// `(countryCode, phone)` pair
    CountryPhone,
}

impl UniqueKey {
    /// The field a violation of this key is reported against
    pub fn field(&self) -> Field {
        match self {
            UniqueKey::Email => Field::Email,
            UniqueKey::Phone | UniqueKey::CountryPhone => Field::Phone,
        }
    }

    /// Map a durable-store constraint name to the key it enforces
    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "users_email_key" => Some(UniqueKey::Email),
            "users_phone_key" => Some(UniqueKey::Phone),
            "users_country_code_phone_key" => Some(UniqueKey::CountryPhone),
            _ => None,
        }
    }
}

/// Storage-layer errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A uniqueness constraint rejected the write
    #[error("unique constraint violated: {0:?}")]
    Conflict(UniqueKey),

    /// The operation is not offered by this backend
    #[error("operation not supported by this backend: {0}")]
    Unsupported(&'static str),

    /// Connection or query failure inside the backend
    #[error("backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StorageError::Backend(msg.into())
    }
}
