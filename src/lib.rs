//! # Ousia Finder
//!
//! Name-derived query methods for the Ousia entity store.
//!
//! A query method is declared once as a [`PartTree`], the structured form of
//! a name such as `findFirst10ByAgeGreaterThanAndNameOrderByAgeDesc`, plus
//! its declared [`ReturnType`]. Registering it against an [`Engine`] checks
//! the tree against the entity's persistent properties and yields a
//! [`PartTreeQuery`] that can be executed any number of times, concurrently,
//! with different positional arguments.
//!
//! ## What a tree can express
//!
//! - **find / count / exists / delete** subjects, with `First`/`Top` limits
//! - AND-combined predicates: equality, `IsNull`, `>`, `>=`, `<`, `<=`
//! - `OrderBy` clauses, extended per call by a page request or sort
//! - results as a single entity, a list, row keys, a count, a flag, a
//!   [`Page`] (with total count) or a [`Slice`] (with has-next)
//!
//! Distinct queries, OR across predicate groups and the remaining part
//! keywords (`Like`, `In`, `Between`, ...) are rejected.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ousia_finder::{Engine, adapters::sqlite::SqliteAdapter};
//!
//! let adapter = SqliteAdapter::new_memory().await?;
//! adapter.init_schema().await?;
//!
//! let engine = Engine::new(Box::new(adapter));
//! engine.save_object(&mut person).await?;
//!
//! let by_name = engine.register::<Person>(
//!     QueryMethod::new("findByName", ReturnType::List),
//!     PartTree::find().part("name", PartKind::SimpleProperty),
//! )?;
//! let found = by_name
//!     .execute(&ExecutionArguments::new().bind("Ann"))
//!     .await?;
//! ```
//!
//! ## Feature flags
//!
//! | Flag     | Default | Description                        |
//! |----------|---------|------------------------------------|
//! | `sqlite` | ✓       | SQLite adapter (in-memory or file)  |
//!

pub mod adapters;
pub mod convert;
pub mod error;
pub mod finder;
pub mod object;
pub mod page;
pub mod query;
pub mod tree;

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use crate::adapters::{Datastore, EntityRecord, Key, MemoryAdapter, QueryPlan};
pub use crate::convert::{Conversions, DefaultConversions};
pub use crate::error::Error;
pub use crate::finder::{
    ExecutionArguments, PartTreeQuery, QueryMethod, QueryResult, ResultShape, ReturnType,
};
pub use crate::object::*;
pub use crate::page::{Page, PageRequest, Slice};
pub use crate::query::{IndexMeta, IndexValue, ToIndexValue};
pub use crate::tree::{Direction, Order, PartKind, PartTree, Sort};

/// Entry point: owns the store client and the write conversions, and hands
/// out registered query methods.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Ousia>,
}

pub struct Ousia {
    store: Box<dyn Datastore>,
    conversions: Box<dyn Conversions>,
}

impl Engine {
    pub fn new(store: Box<dyn Datastore>) -> Self {
        Self::with_conversions(store, Box::new(DefaultConversions))
    }

    pub fn with_conversions(store: Box<dyn Datastore>, conversions: Box<dyn Conversions>) -> Self {
        Self {
            inner: Arc::new(Ousia { store, conversions }),
        }
    }

    /// Inserts or replaces the object, stamping `updated_at`.
    pub async fn save_object<T: Entity>(&self, obj: &mut T) -> Result<(), Error> {
        obj.meta_mut().updated_at = Utc::now();
        self.inner
            .store
            .put_entity(EntityRecord::from_object(&*obj)?)
            .await
    }

    /// Registers a query method returning entities of kind `E`.
    pub fn register<E: Entity>(
        &self,
        method: QueryMethod,
        tree: PartTree,
    ) -> Result<PartTreeQuery<E>, Error> {
        self.register_projection::<E, E>(method, tree)
    }

    /// Registers a query method over kind `E` whose rows are read as `R`.
    pub fn register_projection<E, R>(
        &self,
        method: QueryMethod,
        tree: PartTree,
    ) -> Result<PartTreeQuery<E, R>, Error>
    where
        E: Entity,
        R: DeserializeOwned + Send + 'static,
    {
        debug!(kind = E::KIND, method = %method.name, "registering query method");
        PartTreeQuery::new(self.clone(), method, tree)
    }

    pub(crate) fn store(&self) -> &dyn Datastore {
        self.inner.store.as_ref()
    }

    pub(crate) fn conversions(&self) -> &dyn Conversions {
        self.inner.conversions.as_ref()
    }
}
