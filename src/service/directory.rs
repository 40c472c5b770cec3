//! # Directory Service
//!
//! Orchestrates validation, uniqueness checks and delegation to the active
//! storage backend. The service holds a `dyn StorageBackend` and never
//! branches on which store it is talking to.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::model::{UserFields, UserInput, UserRecord, ValidationMode};
use crate::query::{translate, Clause, ListParams, PageSpec, PredicateSpec, SortSpec, TextField};
use crate::storage::{BackendKind, StorageBackend, StorageError, UniqueKey};

use super::errors::{ConflictContext, ServiceError, ServiceResult};
use super::response::PageEnvelope;

/// User directory operations over an injected backend
#[derive(Clone)]
pub struct DirectoryService {
    backend: Arc<dyn StorageBackend>,
}

impl DirectoryService {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Run a list query.
    ///
    /// Never fails: a backend error produces an empty envelope with
    /// `success: false` and the error text.
    pub async fn list(&self, params: &ListParams) -> PageEnvelope {
        let query = translate(params);
        let current_page = query.page.page;

        debug!(
            clauses = query.predicate.clauses.len(),
            sort = query.sort.field.as_str(),
            skip = query.page.skip(),
            limit = query.page.limit,
            "list query"
        );

        let result = async {
            let data = self
                .backend
                .find_matching(&query.predicate, &query.sort, &query.page)
                .await?;
            let total = self.backend.count_matching(&query.predicate).await?;
            Ok::<_, StorageError>((data, total))
        }
        .await;

        match result {
            Ok((data, total)) => {
                PageEnvelope::new(data, total, query.page.total_pages(total), current_page)
            }
            Err(e) => {
                error!(error = %e, "user list query failed");
                PageEnvelope::failed(current_page, e.to_string())
            }
        }
    }

    pub async fn get(&self, id: &str) -> ServiceResult<UserRecord> {
        self.backend
            .get_by_id(id)
            .await
            .map_err(internal)?
            .ok_or(ServiceError::NotFound)
    }

    /// Validate and store a new user.
    ///
    /// Email uniqueness is checked before phone uniqueness.
    pub async fn create(&self, input: UserInput) -> ServiceResult<UserRecord> {
        let fields = UserFields::from_input(input, ValidationMode::Create)
            .map_err(ServiceError::Validation)?;

        if self.exists(TextField::Email, &fields.email).await? {
            return Err(ServiceError::conflict(UniqueKey::Email, ConflictContext::Create));
        }
        if self.exists(TextField::Phone, &fields.phone).await? {
            return Err(ServiceError::conflict(UniqueKey::Phone, ConflictContext::Create));
        }

        let record = self
            .backend
            .insert(fields)
            .await
            .map_err(|e| ServiceError::from_storage(e, ConflictContext::Create))?;

        info!(id = %record.id, "user created");
        Ok(record)
    }

    /// Validate and overwrite every field of an existing user.
    ///
    /// Uniqueness is re-checked only for keys whose value changed.
    pub async fn update(&self, id: &str, input: UserInput) -> ServiceResult<UserRecord> {
        let existing = self.get(id).await?;

        let fields = UserFields::from_input(input, ValidationMode::Update)
            .map_err(ServiceError::Validation)?;

        if fields.email != existing.email && self.exists(TextField::Email, &fields.email).await? {
            return Err(ServiceError::conflict(UniqueKey::Email, ConflictContext::Update));
        }

        let phone_changed =
            fields.phone != existing.phone || fields.country_code != existing.country_code;
        if phone_changed && self.phone_taken_by_other(&fields.phone, id).await? {
            return Err(ServiceError::conflict(UniqueKey::Phone, ConflictContext::Update));
        }

        let record = self
            .backend
            .update_by_id(id, fields)
            .await
            .map_err(|e| ServiceError::from_storage(e, ConflictContext::Update))?
            .ok_or(ServiceError::NotFound)?;

        info!(id = %record.id, "user updated");
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let removed = self
            .backend
            .delete_by_id(id)
            .await
            .map_err(internal)?
            .ok_or(ServiceError::NotFound)?;

        info!(id = %removed.id, "user deleted");
        Ok(())
    }

    /// Clear the volatile store
    pub async fn reset(&self) -> ServiceResult<()> {
        match self.backend.reset().await {
            Ok(()) => Ok(()),
            Err(StorageError::Unsupported(_)) => Err(ServiceError::ResetUnavailable),
            Err(e) => Err(internal(e)),
        }
    }

    async fn exists(&self, field: TextField, value: &str) -> ServiceResult<bool> {
        let predicate = PredicateSpec::new().and(Clause::exact(field, value));
        let count = self
            .backend
            .count_matching(&predicate)
            .await
            .map_err(internal)?;
        Ok(count > 0)
    }

    async fn phone_taken_by_other(&self, phone: &str, id: &str) -> ServiceResult<bool> {
        let predicate = PredicateSpec::new().and(Clause::exact(TextField::Phone, phone));
        let holders = self
            .backend
            .find_matching(&predicate, &SortSpec::default(), &PageSpec::new(1, 2))
            .await
            .map_err(internal)?;
        Ok(holders.iter().any(|r| r.id != id))
    }
}

fn internal(err: StorageError) -> ServiceError {
    ServiceError::Internal(err.to_string())
}
