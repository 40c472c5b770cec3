//! # Storage Backend Trait
//!
//! The capability interface every record store implements. The directory
//! service holds a `dyn StorageBackend` and never inspects which concrete
//! store is behind it.

use async_trait::async_trait;

use crate::model::{UserFields, UserRecord};
use crate::query::{PageSpec, PredicateSpec, SortSpec};

use super::errors::{StorageError, StorageResult};

/// Which kind of store is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Persistent PostgreSQL store
    Durable,
    /// In-process store living for the lifetime of the process
    Volatile,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Durable => "durable",
            BackendKind::Volatile => "volatile",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage interface for user records.
///
/// All reads return owned copies. `find_matching` applies the predicate,
/// then the sort, then skips and limits, in that order.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Persist a new record, assigning its id and timestamps
    async fn insert(&self, fields: UserFields) -> StorageResult<UserRecord>;

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>>;

    /// One page of matching records in sort order
    async fn find_matching(
        &self,
        predicate: &PredicateSpec,
        sort: &SortSpec,
        page: &PageSpec,
    ) -> StorageResult<Vec<UserRecord>>;

    /// Number of records matching the predicate, ignoring sort and page
    async fn count_matching(&self, predicate: &PredicateSpec) -> StorageResult<u64>;

    /// Overwrite all caller-owned fields and refresh `updated_at`
    async fn update_by_id(&self, id: &str, fields: UserFields)
        -> StorageResult<Option<UserRecord>>;

    /// Remove a record entirely, returning what was removed
    async fn delete_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>>;

    /// Clear every record and restart id assignment
    async fn reset(&self) -> StorageResult<()> {
        Err(StorageError::Unsupported("reset"))
    }
}
