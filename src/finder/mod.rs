//! Query methods compiled from predicate trees.
//!
//! A [`PartTreeQuery`] is created once per query method by
//! [`Engine::register`](crate::Engine::register). Registration validates the
//! tree against the entity's persistent properties and fixes the
//! [`ResultShape`]; every call to [`PartTreeQuery::execute`] then binds its
//! positional arguments, builds a fresh [`QueryPlan`](crate::adapters::QueryPlan)
//! and reshapes what the store returns.
//!
//! ```rust,ignore
//! let adults = engine.register::<Person>(
//!     QueryMethod::new("findByAgeGreaterThanAndName", ReturnType::List),
//!     PartTree::find()
//!         .part("age", PartKind::GreaterThan)
//!         .part("name", PartKind::SimpleProperty),
//! )?;
//!
//! let people = adults
//!     .execute(&ExecutionArguments::new().bind(18).bind("Ann"))
//!     .await?
//!     .into_list();
//! ```

pub mod arguments;
pub mod executor;
pub mod filter;
pub mod method;
pub mod paging;
pub mod shape;

use std::{marker::PhantomData, sync::Arc, time::Instant};

use metrics::histogram;
use serde::de::DeserializeOwned;

pub use arguments::*;
pub use executor::{LimitedResult, RawOutcome};
pub use filter::{CompiledFilter, FilterPart};
pub use method::*;
pub use paging::Window;
pub use shape::*;

use crate::{
    Engine, Entity,
    adapters::Key,
    error::Error,
    page::{Page, Slice},
    tree::PartTree,
};

/// What a query method call produced, in its declared container.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<R> {
    Single(Option<R>),
    List(Vec<R>),
    Keys(Vec<Key>),
    Count(u64),
    Exists(bool),
    Page(Page<R>),
    Slice(Slice<R>),
}

impl<R> QueryResult<R> {
    pub fn into_list(self) -> Option<Vec<R>> {
        match self {
            QueryResult::List(items) => Some(items),
            QueryResult::Single(item) => Some(item.into_iter().collect()),
            _ => None,
        }
    }

    pub fn into_single(self) -> Option<R> {
        match self {
            QueryResult::Single(item) => item,
            QueryResult::List(items) => items.into_iter().next(),
            _ => None,
        }
    }

    pub fn into_keys(self) -> Option<Vec<Key>> {
        match self {
            QueryResult::Keys(keys) => Some(keys),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            QueryResult::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            QueryResult::Exists(found) => Some(*found),
            _ => None,
        }
    }

    pub fn into_page(self) -> Option<Page<R>> {
        match self {
            QueryResult::Page(page) => Some(page),
            _ => None,
        }
    }

    pub fn into_slice(self) -> Option<Slice<R>> {
        match self {
            QueryResult::Slice(slice) => Some(slice),
            _ => None,
        }
    }
}

/// A registered query method over entity kind `E`, mapping rows to `R`.
pub struct PartTreeQuery<E, R = E> {
    engine: Engine,
    method: Arc<QueryMethod>,
    tree: Arc<PartTree>,
    filter_parts: Arc<[FilterPart]>,
    shape: ResultShape,
    _marker: PhantomData<fn() -> (E, R)>,
}

impl<E, R> Clone for PartTreeQuery<E, R> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            method: self.method.clone(),
            tree: self.tree.clone(),
            filter_parts: self.filter_parts.clone(),
            shape: self.shape,
            _marker: PhantomData,
        }
    }
}

impl<E, R> PartTreeQuery<E, R>
where
    E: Entity,
    R: DeserializeOwned + Send + 'static,
{
    pub(crate) fn new(engine: Engine, method: QueryMethod, tree: PartTree) -> Result<Self, Error> {
        let filter_parts = filter::validate::<E>(&tree)?;
        let shape = ResultShape::resolve(&tree, &method)?;

        Ok(Self {
            engine,
            method: Arc::new(method),
            tree: Arc::new(tree),
            filter_parts: filter_parts.into(),
            shape,
            _marker: PhantomData,
        })
    }

    pub fn method(&self) -> &QueryMethod {
        &self.method
    }

    pub fn tree(&self) -> &PartTree {
        &self.tree
    }

    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    pub async fn execute(&self, args: &ExecutionArguments) -> Result<QueryResult<R>, Error> {
        let start = Instant::now();

        let result = match self.shape {
            ResultShape::Page => {
                let content = self.run(args, false).await?.into_entities()?;
                let total = self.run(args, true).await?.count();
                QueryResult::Page(Page {
                    content,
                    pageable: args.pageable().cloned(),
                    total,
                })
            }
            ResultShape::Slice => {
                let limited = self.run_slice(args).await?;
                QueryResult::Slice(Slice {
                    content: limited.content,
                    pageable: args.pageable().cloned(),
                    has_next: limited.exceeds_limit,
                })
            }
            _ => self
                .run(args, false)
                .await?
                .into_result(self.method.return_type),
        };

        histogram!("ousia.finder.duration_ms",
            "kind" => E::KIND,
            "method" => self.method.name.clone()
        )
        .record(start.elapsed().as_millis() as f64);

        Ok(result)
    }
}
