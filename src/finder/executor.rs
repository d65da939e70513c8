use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{
    Entity,
    adapters::{EntityRecord, Key, Projection, QueryPlan, RawRows},
    error::Error,
    finder::{
        Collector, ExecutionArguments, PartTreeQuery, QueryResult, QueryShape, ResultShape,
        ReturnType, filter, paging,
    },
};

/// Collected output of one pass, before it is fitted to the declared return
/// type.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome<R> {
    Count(u64),
    Exists(bool),
    Entities(Vec<R>),
    Keys(Vec<Key>),
}

impl<R> RawOutcome<R> {
    pub fn count(&self) -> u64 {
        match self {
            RawOutcome::Count(n) => *n,
            RawOutcome::Exists(found) => *found as u64,
            RawOutcome::Entities(items) => items.len() as u64,
            RawOutcome::Keys(keys) => keys.len() as u64,
        }
    }

    pub fn into_entities(self) -> Result<Vec<R>, Error> {
        match self {
            RawOutcome::Entities(items) => Ok(items),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn into_result(self, return_type: ReturnType) -> QueryResult<R> {
        match (self, return_type) {
            (RawOutcome::Count(n), _) => QueryResult::Count(n),
            (RawOutcome::Exists(found), _) => QueryResult::Exists(found),
            (RawOutcome::Keys(keys), ReturnType::Count) => QueryResult::Count(keys.len() as u64),
            (RawOutcome::Keys(keys), _) => QueryResult::Keys(keys),
            (RawOutcome::Entities(items), ReturnType::Count) => {
                QueryResult::Count(items.len() as u64)
            }
            (RawOutcome::Entities(items), ReturnType::Single) => {
                QueryResult::Single(items.into_iter().next())
            }
            (RawOutcome::Entities(items), _) => QueryResult::List(items),
        }
    }
}

/// Fetched rows, cut back to the requested size, and whether any were cut.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitedResult<R> {
    pub content: Vec<R>,
    pub exceeds_limit: bool,
}

impl<E, R> PartTreeQuery<E, R>
where
    E: Entity,
    R: DeserializeOwned + Send + 'static,
{
    fn build_plan(
        &self,
        args: &ExecutionArguments,
        projection: Projection,
        total: bool,
    ) -> Result<QueryPlan, Error> {
        let compiled = filter::compile(
            &self.method.name,
            &self.filter_parts,
            args.values(),
            self.engine.conversions(),
        )?;
        trace!(
            method = %self.method.name,
            equality_fields = ?compiled.equality_fields,
            "compiled filter"
        );

        let sort = if total {
            Vec::new()
        } else {
            paging::map_sort::<E>(&paging::merge_sort(&self.tree, args))?
        };
        let window = paging::resolve_window(&self.tree, self.shape, args, total);

        Ok(QueryPlan::new(E::KIND, projection)
            .with_filter(compiled.filter)
            .with_sort(sort)
            .with_limit(window.limit)
            .with_offset(window.offset))
    }

    async fn fetch(&self, plan: &QueryPlan) -> Result<RawRows, Error> {
        debug!(
            kind = E::KIND,
            method = %self.method.name,
            projection = ?plan.projection,
            limit = ?plan.limit,
            offset = ?plan.offset,
            "running query plan"
        );
        self.engine.store().run_query(plan).await
    }

    /// One pass through the pipeline. `total` runs the unbounded count pass
    /// of a page request.
    pub(crate) async fn run(
        &self,
        args: &ExecutionArguments,
        total: bool,
    ) -> Result<RawOutcome<R>, Error> {
        let selected = QueryShape::select(
            self.shape,
            self.method.return_type.is_numeric(),
            total,
        );
        let plan = self.build_plan(args, selected.projection, total)?;
        let rows = self.fetch(&plan).await?;

        let outcome = match selected.collector {
            Collector::Count => RawOutcome::Count(rows.len() as u64),
            Collector::Exists => RawOutcome::Exists(!rows.is_empty()),
            Collector::List => match &rows {
                RawRows::Keys(keys) => RawOutcome::Keys(keys.clone()),
                RawRows::Entities(records) => RawOutcome::Entities(
                    records
                        .iter()
                        .map(Self::map_record)
                        .collect::<Result<Vec<_>, _>>()?,
                ),
            },
        };

        if self.shape.is_delete() && !total {
            self.delete_fetched(&rows).await?;
        }

        Ok(outcome)
    }

    async fn delete_fetched(&self, rows: &RawRows) -> Result<(), Error> {
        let store = self.engine.store();
        let deleted = match (self.shape, rows) {
            (ResultShape::DeleteByEntity, RawRows::Entities(records)) => {
                store.delete_entities(records).await?
            }
            _ => store.delete_keys(&rows.keys()).await?,
        };

        debug!(
            kind = E::KIND,
            method = %self.method.name,
            fetched = rows.len(),
            deleted,
            "deleted fetched rows"
        );
        Ok(())
    }

    /// Slice pass: entity retrieval, over-fetched by one, truncated back to
    /// the page size. Only retained rows are mapped.
    pub(crate) async fn run_slice(
        &self,
        args: &ExecutionArguments,
    ) -> Result<LimitedResult<R>, Error> {
        let plan = self.build_plan(args, Projection::Entities, false)?;
        let mut records = match self.fetch(&plan).await? {
            RawRows::Entities(records) => records,
            RawRows::Keys(_) => {
                return Err(Error::Storage(
                    "store returned keys for an entity query".to_string(),
                ));
            }
        };

        let limit = args.pageable().map(|p| p.size as usize);
        let exceeds_limit = limit.is_some_and(|limit| records.len() > limit);
        if let Some(limit) = limit {
            records.truncate(limit);
        }

        let content = records
            .iter()
            .map(Self::map_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LimitedResult {
            content,
            exceeds_limit,
        })
    }

    fn map_record(record: &EntityRecord) -> Result<R, Error> {
        if record.kind != E::KIND {
            return Err(Error::TypeMismatch);
        }
        record.project()
    }
}
