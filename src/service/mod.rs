//! # Directory Service
//!
//! The narrow interface consumed by the HTTP layer.

mod directory;
mod errors;
mod response;

pub use directory::DirectoryService;
pub use errors::{ConflictContext, ServiceError, ServiceResult};
pub use response::{DeleteResponse, PageEnvelope, ResetResponse, SingleResponse};
