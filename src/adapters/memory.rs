use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    adapters::{Datastore, EntityRecord, Key, Projection, QueryPlan, RawRows},
    error::Error,
    query::{IndexMeta, IndexValue, QuerySort},
};

#[derive(Clone, Default)]
struct MemoryStore {
    // kind -> records in insertion order
    entities: Arc<Mutex<HashMap<String, Vec<EntityRecord>>>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<EntityRecord>>>, Error> {
        self.entities
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

/// Datastore held in process memory. Evaluates plans the way a document store
/// would: filter, stable sort with nulls lowest, then offset and limit.
#[derive(Clone, Default)]
pub struct MemoryAdapter {
    store: MemoryStore,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::default(),
        }
    }

    /// Number of stored records of `kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.store
            .lock()
            .map(|entities| entities.get(kind).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn compare_field(a: &IndexMeta, b: &IndexMeta, sort: &QuerySort) -> Ordering {
        let ordering = match (a.get(sort.field), b.get(sort.field)) {
            (None | Some(IndexValue::Null), None | Some(IndexValue::Null)) => Ordering::Equal,
            (None | Some(IndexValue::Null), _) => Ordering::Less,
            (_, None | Some(IndexValue::Null)) => Ordering::Greater,
            (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
        };
        if sort.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

#[async_trait]
impl Datastore for MemoryAdapter {
    async fn put_entity(&self, record: EntityRecord) -> Result<(), Error> {
        let mut entities = self.store.lock()?;
        let rows = entities.entry(record.kind.clone()).or_default();
        match rows.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => rows.push(record),
        }
        Ok(())
    }

    async fn run_query(&self, plan: &QueryPlan) -> Result<RawRows, Error> {
        let entities = self.store.lock()?;
        let mut matched: Vec<&EntityRecord> = entities
            .get(plan.kind)
            .map(|rows| {
                rows.iter()
                    .filter(|r| plan.filter.as_ref().is_none_or(|f| f.matches(&r.index_meta)))
                    .collect()
            })
            .unwrap_or_default();

        if !plan.sort.is_empty() {
            matched.sort_by(|a, b| {
                plan.sort
                    .iter()
                    .map(|s| Self::compare_field(&a.index_meta, &b.index_meta, s))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        let offset = plan.offset.unwrap_or(0) as usize;
        let limit = plan.limit.map_or(usize::MAX, |l| l as usize);
        let window = matched.into_iter().skip(offset).take(limit);

        Ok(match plan.projection {
            Projection::Keys => RawRows::Keys(window.map(EntityRecord::key).collect()),
            Projection::Entities => RawRows::Entities(window.cloned().collect()),
        })
    }

    async fn delete_keys(&self, keys: &[Key]) -> Result<u64, Error> {
        let mut entities = self.store.lock()?;
        let mut deleted = 0u64;
        for key in keys {
            if let Some(rows) = entities.get_mut(&key.kind) {
                let before = rows.len();
                rows.retain(|r| r.id != key.id);
                deleted += (before - rows.len()) as u64;
            }
        }
        Ok(deleted)
    }
}
