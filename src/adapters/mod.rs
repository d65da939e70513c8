pub mod memory;
pub mod query;
pub mod record;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use async_trait::async_trait;
pub use memory::MemoryAdapter;
pub use query::*;
pub use record::*;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteAdapter;

use crate::error::Error;

/// -----------------------------
/// Store client contract
/// -----------------------------

#[async_trait]
pub trait Datastore: Send + Sync + 'static {
    /// Inserts the record, replacing any stored record with the same id.
    async fn put_entity(&self, record: EntityRecord) -> Result<(), Error>;

    /// Runs `plan`, returning keys or full records per its projection, in
    /// plan order with offset and limit applied.
    async fn run_query(&self, plan: &QueryPlan) -> Result<RawRows, Error>;

    /// Deletes by identity. Returns the number of rows removed.
    async fn delete_keys(&self, keys: &[Key]) -> Result<u64, Error>;

    async fn delete_entities(&self, records: &[EntityRecord]) -> Result<u64, Error> {
        let keys: Vec<Key> = records.iter().map(EntityRecord::key).collect();
        self.delete_keys(&keys).await
    }
}
