//! Record storage for the user directory
//!
//! Two interchangeable backends implement [`StorageBackend`]:
//!
//! - [`PostgresStore`] persists records in PostgreSQL
//! - [`VolatileStore`] keeps records in process memory
//!
//! Exactly one is active per process, chosen by [`select_backend`].
//! Every query produces the same records in the same order on either.

mod backend;
mod errors;
mod postgres;
mod select;
mod volatile;

pub use backend::{BackendKind, StorageBackend};
pub use errors::{StorageError, StorageResult, UniqueKey};
pub use postgres::{PostgresStore, MAX_CONNECTIONS};
pub use select::select_backend;
pub use volatile::VolatileStore;
