//! Store traits for finished matches and published share tokens.

pub mod memory;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{MatchRecordEntity, SharedResultEntity},
    storage::StorageResult,
};

pub use self::memory::MemoryStore;

/// Persistence of finished matches per user.
pub trait MatchStore: Send + Sync {
    fn save_match(&self, record: MatchRecordEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Records of `user_id`, most recently played first.
    fn list_matches_for_user(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchRecordEntity>>>;
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchRecordEntity>>>;
    /// Returns whether a record was removed.
    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Persistence of published share tokens under short identifiers.
pub trait ShareStore: Send + Sync {
    /// Fails with [`StorageError::Conflict`](crate::dao::storage::StorageError::Conflict)
    /// when the identifier is taken.
    fn insert_shared(&self, shared: SharedResultEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_shared(&self, id: String)
    -> BoxFuture<'static, StorageResult<Option<SharedResultEntity>>>;
}
