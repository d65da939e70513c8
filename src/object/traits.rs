use serde::{Deserialize, Serialize};

use crate::{object::Meta, query::IndexMeta};

/// Maps a domain property segment, as it appears in a predicate tree, to the
/// field name the backend stores it under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistentProperty {
    pub name: &'static str,
    pub field: &'static str,
}

impl PersistentProperty {
    pub const fn new(name: &'static str, field: &'static str) -> Self {
        Self { name, field }
    }

    /// Property stored under its own name.
    pub const fn same(name: &'static str) -> Self {
        Self { name, field: name }
    }
}

pub trait Entity: Serialize + for<'de> Deserialize<'de> + Sized + Send + Sync + 'static {
    /// Backend kind (table) name
    const KIND: &'static str;

    /// Entity metadata (id, created_at, updated_at)
    fn meta(&self) -> &Meta;

    fn meta_mut(&mut self) -> &mut Meta;

    /// Properties that queries may filter or sort on.
    fn persistent_properties() -> &'static [PersistentProperty];

    /// Backend-native values of the persistent properties, keyed by field name.
    fn index_meta(&self) -> IndexMeta;

    fn field_name(property: &str) -> Option<&'static str> {
        Self::persistent_properties()
            .iter()
            .find(|p| p.name == property)
            .map(|p| p.field)
    }
}

pub trait EntityMeta {
    fn id(&self) -> uuid::Uuid;
    fn created_at(&self) -> chrono::DateTime<chrono::Utc>;
    fn updated_at(&self) -> chrono::DateTime<chrono::Utc>;
}

impl<T> EntityMeta for T
where
    T: Entity,
{
    fn id(&self) -> uuid::Uuid {
        self.meta().id()
    }

    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.meta().created_at()
    }

    fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.meta().updated_at()
    }
}
