//! In-memory store backed by `DashMap`.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::{
    match_store::{MatchStore, ShareStore},
    models::{MatchRecordEntity, SharedResultEntity, migrate_record},
    storage::{StorageError, StorageResult},
};

/// Failures of the in-memory backend.
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    /// The store was switched offline with [`MemoryStore::set_offline`].
    #[error("in-memory store is offline")]
    Offline,
}

impl From<MemoryStoreError> for StorageError {
    fn from(err: MemoryStoreError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}

/// Process-local store for matches and share tokens.
///
/// Match records are kept serialized, as a document backend would keep them,
/// and every read goes through [`migrate_record`]. Cloning shares the underlying maps. It can be switched offline to exercise
/// the failure paths of its callers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    matches: DashMap<Uuid, serde_json::Value>,
    shared: DashMap<String, SharedResultEntity>,
    offline: AtomicBool,
}

impl MemoryInner {
    fn ensure_online(&self) -> Result<(), MemoryStoreError> {
        if self.offline.load(Ordering::Acquire) {
            return Err(MemoryStoreError::Offline);
        }
        Ok(())
    }
}

impl MemoryStore {
    /// Empty, online store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (`true`) or succeed again (`false`).
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::Release);
    }

    fn save_match(&self, record: MatchRecordEntity) -> StorageResult<()> {
        self.inner.ensure_online()?;
        let payload = serde_json::to_value(&record)?;
        self.inner.matches.insert(record.id, payload);
        Ok(())
    }

    fn list_matches_for_user(&self, user_id: &str) -> StorageResult<Vec<MatchRecordEntity>> {
        self.inner.ensure_online()?;
        let mut records = Vec::new();
        for entry in self.inner.matches.iter() {
            let record = migrate_record(entry.value().clone())?;
            if record.user_id == user_id {
                records.push(record);
            }
        }
        records.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        Ok(records)
    }

    fn find_match(&self, id: Uuid) -> StorageResult<Option<MatchRecordEntity>> {
        self.inner.ensure_online()?;
        self.inner
            .matches
            .get(&id)
            .map(|entry| migrate_record(entry.value().clone()))
            .transpose()
    }

    fn delete_match(&self, id: Uuid) -> StorageResult<bool> {
        self.inner.ensure_online()?;
        Ok(self.inner.matches.remove(&id).is_some())
    }

    fn insert_shared(&self, shared: SharedResultEntity) -> StorageResult<()> {
        self.inner.ensure_online()?;
        match self.inner.shared.entry(shared.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict { id: shared.id }),
            Entry::Vacant(slot) => {
                slot.insert(shared);
                Ok(())
            }
        }
    }

    fn find_shared(&self, id: &str) -> StorageResult<Option<SharedResultEntity>> {
        self.inner.ensure_online()?;
        Ok(self.inner.shared.get(id).map(|entry| entry.value().clone()))
    }
}

impl MatchStore for MemoryStore {
    fn save_match(&self, record: MatchRecordEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_match(record) })
    }

    fn list_matches_for_user(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_matches_for_user(&user_id) })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_match(id) })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_match(id) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ensure_online().map_err(Into::into) })
    }
}

impl ShareStore for MemoryStore {
    fn insert_shared(&self, shared: SharedResultEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_shared(shared) })
    }

    fn find_shared(
        &self,
        id: String,
    ) -> BoxFuture<'static, StorageResult<Option<SharedResultEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_shared(&id) })
    }
}
