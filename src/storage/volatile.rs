//! # Volatile Store
//!
//! In-process record store used when the durable store is unreachable at
//! startup. Reimplements the full query semantics over an ordered `Vec`.
//!
//! The record sequence and the id counter sit behind one lock, so writers
//! and full-sequence readers never observe each other half-way.

use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::model::{now, UserFields, UserRecord};
use crate::query::{PageSpec, PredicateSpec, SortSpec};

use super::backend::{BackendKind, StorageBackend};
use super::errors::{StorageError, StorageResult, UniqueKey};

const FIRST_ID: u64 = 1;

#[derive(Debug)]
struct Inner {
    /// Records in insertion order
    records: Vec<UserRecord>,
    next_id: u64,
}

impl Inner {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            next_id: FIRST_ID,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// First uniqueness key `fields` would violate, ignoring record `except`
    fn conflict(&self, fields: &UserFields, except: Option<&str>) -> Option<UniqueKey> {
        let others = || {
            self.records
                .iter()
                .filter(move |r| Some(r.id.as_str()) != except)
        };

        if others().any(|r| r.email == fields.email) {
            return Some(UniqueKey::Email);
        }
        if others().any(|r| r.phone == fields.phone) {
            return Some(UniqueKey::Phone);
        }
        if others().any(|r| r.country_code == fields.country_code && r.phone == fields.phone) {
            return Some(UniqueKey::CountryPhone);
        }
        None
    }
}

/// In-memory user store
#[derive(Debug)]
pub struct VolatileStore {
    inner: RwLock<Inner>,
}

impl Default for VolatileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VolatileStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::empty()),
        }
    }

    fn read(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| StorageError::backend("volatile store lock poisoned"))
    }

    fn write(&self) -> StorageResult<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| StorageError::backend("volatile store lock poisoned"))
    }

    /// Number of stored records
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl StorageBackend for VolatileStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Volatile
    }

    async fn insert(&self, fields: UserFields) -> StorageResult<UserRecord> {
        let mut inner = self.write()?;

        if let Some(key) = inner.conflict(&fields, None) {
            return Err(StorageError::Conflict(key));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let record = UserRecord::from_fields(id.to_string(), fields, now());
        inner.records.push(record.clone());
        debug!(id = %record.id, "volatile insert");

        Ok(record)
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        let inner = self.read()?;
        Ok(inner.records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_matching(
        &self,
        predicate: &PredicateSpec,
        sort: &SortSpec,
        page: &PageSpec,
    ) -> StorageResult<Vec<UserRecord>> {
        let mut matched: Vec<UserRecord> = {
            let inner = self.read()?;
            inner
                .records
                .iter()
                .filter(|r| predicate.matches(r))
                .cloned()
                .collect()
        };

        sort.sort(&mut matched);

        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn count_matching(&self, predicate: &PredicateSpec) -> StorageResult<u64> {
        let inner = self.read()?;
        let count = inner.records.iter().filter(|r| predicate.matches(r)).count();
        Ok(count as u64)
    }

    async fn update_by_id(
        &self,
        id: &str,
        fields: UserFields,
    ) -> StorageResult<Option<UserRecord>> {
        let mut inner = self.write()?;

        let Some(index) = inner.position(id) else {
            return Ok(None);
        };

        if let Some(key) = inner.conflict(&fields, Some(id)) {
            return Err(StorageError::Conflict(key));
        }

        let record = &mut inner.records[index];
        record.apply(fields, now());

        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        let mut inner = self.write()?;

        Ok(inner.position(id).map(|index| inner.records.remove(index)))
    }

    async fn reset(&self) -> StorageResult<()> {
        let mut inner = self.write()?;
        *inner = Inner::empty();
        info!("volatile store has been reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Clause, SortField, TextField};
    use std::sync::Arc;
    use std::time::Duration;

    fn fields(n: u32, name: &str, hobbies: &[&str]) -> UserFields {
        UserFields {
            name: name.to_string(),
            email: format!("user{n}@example.com"),
            country_code: "+1".to_string(),
            phone: format!("555000{n:04}"),
            place: "Lisbon".to_string(),
            gender: "other".to_string(),
            hobbies: hobbies.iter().map(|h| h.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = VolatileStore::new();

        let a = store.insert(fields(1, "a", &["x"])).await.unwrap();
        let b = store.insert(fields(2, "b", &["x"])).await.unwrap();

        assert_eq!(a.id, "1");
        assert_eq!(b.id, "2");
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = VolatileStore::new();

        let a = store.insert(fields(1, "a", &["x"])).await.unwrap();
        store.delete_by_id(&a.id).await.unwrap();
        let b = store.insert(fields(2, "b", &["x"])).await.unwrap();

        assert_eq!(b.id, "2");
    }

    #[tokio::test]
    async fn test_returned_records_are_copies() {
        let store = VolatileStore::new();
        let mut inserted = store.insert(fields(1, "original", &["x"])).await.unwrap();

        inserted.name = "mutated".to_string();
        let mut fetched = store.get_by_id("1").await.unwrap().unwrap();
        fetched.hobbies.clear();

        let again = store.get_by_id("1").await.unwrap().unwrap();
        assert_eq!(again.name, "original");
        assert_eq!(again.hobbies, vec!["x"]);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = VolatileStore::new();
        store.insert(fields(1, "a", &["x"])).await.unwrap();

        let mut same_email = fields(2, "b", &["x"]);
        same_email.email = "user1@example.com".to_string();
        assert!(matches!(
            store.insert(same_email).await,
            Err(StorageError::Conflict(UniqueKey::Email))
        ));

        let mut same_phone = fields(3, "c", &["x"]);
        same_phone.phone = "5550000001".to_string();
        same_phone.country_code = "+44".to_string();
        assert!(matches!(
            store.insert(same_phone).await,
            Err(StorageError::Conflict(UniqueKey::Phone))
        ));

        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_filters_sorts_then_pages() {
        let store = VolatileStore::new();
        for (n, name) in ["dave", "alice", "carol", "bob", "eve"].iter().enumerate() {
            store.insert(fields(n as u32, name, &["x"])).await.unwrap();
        }

        let page = store
            .find_matching(
                &PredicateSpec::new(),
                &SortSpec::asc(SortField::Name),
                &PageSpec::new(2, 2),
            )
            .await
            .unwrap();

        let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["carol", "dave"]);
    }

    #[tokio::test]
    async fn test_count_ignores_page() {
        let store = VolatileStore::new();
        for n in 0..7 {
            let hobbies: &[&str] = if n % 2 == 0 { &["coding"] } else { &["golf"] };
            store.insert(fields(n, "u", hobbies)).await.unwrap();
        }

        let predicate = PredicateSpec::new().and(Clause::Membership {
            values: vec!["coding".to_string()],
        });

        assert_eq!(store.count_matching(&predicate).await.unwrap(), 4);
        assert_eq!(store.count_matching(&PredicateSpec::new()).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let store = VolatileStore::new();
        store.insert(fields(1, "a", &["x"])).await.unwrap();

        let page = store
            .find_matching(
                &PredicateSpec::new(),
                &SortSpec::default(),
                &PageSpec::new(u64::MAX, 50),
            )
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_update_overwrites_and_keeps_identity() {
        let store = VolatileStore::new();
        let original = store.insert(fields(1, "a", &["x"])).await.unwrap();

        let mut changed = original.fields();
        changed.gender = "female".to_string();
        changed.hobbies = vec!["y".to_string(), "z".to_string()];

        tokio::time::sleep(Duration::from_millis(2)).await;
        let updated = store.update_by_id("1", changed).await.unwrap().unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at > original.updated_at);
        assert_eq!(updated.gender, "female");
        assert_eq!(updated.hobbies, vec!["y", "z"]);
    }

    #[tokio::test]
    async fn test_update_with_own_values_is_not_a_conflict() {
        let store = VolatileStore::new();
        let original = store.insert(fields(1, "a", &["x"])).await.unwrap();

        let updated = store.update_by_id("1", original.fields()).await.unwrap();
        assert!(updated.is_some());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = VolatileStore::new();

        assert!(store
            .update_by_id("404", fields(1, "a", &["x"]))
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_by_id("404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_and_restarts_ids() {
        let store = VolatileStore::new();
        store.insert(fields(1, "a", &["x"])).await.unwrap();
        store.insert(fields(2, "b", &["x"])).await.unwrap();

        store.reset().await.unwrap();
        assert!(store.is_empty().unwrap());

        let fresh = store.insert(fields(3, "c", &["x"])).await.unwrap();
        assert_eq!(fresh.id, "1");
    }

    #[tokio::test]
    async fn test_substring_filter() {
        let store = VolatileStore::new();
        store.insert(fields(1, "Alice", &["x"])).await.unwrap();
        store.insert(fields(2, "Malik", &["x"])).await.unwrap();
        store.insert(fields(3, "Bob", &["x"])).await.unwrap();

        let predicate = PredicateSpec::new().and(Clause::substring(TextField::Name, "LI"));
        let found = store
            .find_matching(&predicate, &SortSpec::default(), &PageSpec::default())
            .await
            .unwrap();

        let ids: Vec<_> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts() {
        let store = Arc::new(VolatileStore::new());

        let mut handles = Vec::new();
        for n in 0..50u32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert(fields(n, "u", &["x"])).await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().parse::<u64>().unwrap());
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=50).collect::<Vec<u64>>());
        assert_eq!(store.count_matching(&PredicateSpec::new()).await.unwrap(), 50);
    }
}
