use async_trait::async_trait;
use sqlx::{
    Row, Sqlite,
    query::Query as SqlxQuery,
    sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow},
};
use uuid::Uuid;

use crate::{
    adapters::{Datastore, EntityRecord, Key, Projection, QueryPlan, RawRows},
    error::Error,
    query::{Comparison, Filter, IndexMeta, IndexValue, QueryFilter, QuerySort, timestamp_text},
};

/// SQLite adapter using a unified JSON storage model
///
/// Schema:
/// ```sql
/// CREATE TABLE entities (
///     id BLOB PRIMARY KEY,
///     kind TEXT NOT NULL,
///     data TEXT NOT NULL,
///     index_meta TEXT NOT NULL
/// );
///
/// CREATE INDEX idx_entities_kind ON entities(kind);
/// ```
pub struct SqliteAdapter {
    pub(crate) pool: SqlitePool,
}

impl SqliteAdapter {
    /// Create a new SQLite adapter with a file-based database
    pub async fn new_file(path: &str) -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&format!("sqlite:{}?mode=rwc", path))
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Create a new SQLite adapter with an in-memory database
    pub async fn new_memory() -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the database schema
    pub async fn init_schema(&self) -> Result<(), Error> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| Error::Storage(err.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entities (
                id BLOB PRIMARY KEY,
                kind TEXT NOT NULL,
                data TEXT NOT NULL,
                index_meta TEXT NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_entities_kind ON entities(kind)
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        Ok(())
    }
}

impl SqliteAdapter {
    fn map_row_to_key(row: SqliteRow) -> Result<Key, Error> {
        let id = row
            .try_get::<Uuid, _>("id")
            .map_err(|e| Error::Deserialize(e.to_string()))?;
        let kind = row
            .try_get::<String, _>("kind")
            .map_err(|e| Error::Deserialize(e.to_string()))?;

        Ok(Key { kind, id })
    }

    fn map_row_to_entity_record(row: SqliteRow) -> Result<EntityRecord, Error> {
        let id = row
            .try_get::<Uuid, _>("id")
            .map_err(|e| Error::Deserialize(e.to_string()))?;

        let kind = row
            .try_get::<String, _>("kind")
            .map_err(|e| Error::Deserialize(e.to_string()))?;

        let data_str: String = row
            .try_get("data")
            .map_err(|e| Error::Deserialize(e.to_string()))?;

        let index_meta_str: String = row
            .try_get("index_meta")
            .map_err(|e| Error::Deserialize(e.to_string()))?;

        let data: serde_json::Value =
            serde_json::from_str(&data_str).map_err(|e| Error::Deserialize(e.to_string()))?;

        let index_meta: IndexMeta = serde_json::from_str(&index_meta_str)
            .map_err(|e| Error::Deserialize(e.to_string()))?;

        Ok(EntityRecord {
            id,
            kind,
            data,
            index_meta,
        })
    }

    // ── SQL builder helpers ──────────────────────────────────────────────────

    fn column(field: &str) -> String {
        format!("json_extract(e.index_meta, '$.{}')", field)
    }

    fn build_filter_condition(filter: &QueryFilter) -> String {
        let col = Self::column(filter.field);
        if filter.comparison.is_null_check(&filter.value) {
            return format!("{} IS NULL", col);
        }
        let comparison = match filter.comparison {
            Comparison::Equal => "=",
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::GreaterThanOrEqual => ">=",
            Comparison::LessThanOrEqual => "<=",
            Comparison::IsNull => "IS",
        };
        format!("{} {} ?", col, comparison)
    }

    fn build_conditions(filter: Option<&Filter>) -> String {
        let mut conditions = vec!["e.kind = ?".to_string()];
        if let Some(filter) = filter {
            conditions.extend(filter.clauses().iter().map(Self::build_filter_condition));
        }
        format!("WHERE {}", conditions.join(" AND "))
    }

    fn build_order_clause(sort: &[QuerySort]) -> String {
        let mut terms: Vec<String> = sort
            .iter()
            .map(|s| {
                let dir = if s.ascending { "ASC" } else { "DESC" };
                format!("{} {}", Self::column(s.field), dir)
            })
            .collect();
        // insertion order breaks ties
        terms.push("e.rowid ASC".to_string());
        format!("ORDER BY {}", terms.join(", "))
    }

    fn build_window(limit: Option<u32>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (Some(limit), Some(offset)) => format!("LIMIT {} OFFSET {}", limit, offset),
            (Some(limit), None) => format!("LIMIT {}", limit),
            (None, Some(offset)) => format!("LIMIT -1 OFFSET {}", offset),
            (None, None) => String::new(),
        }
    }

    fn query_bind_filters<'a>(
        mut query: SqlxQuery<'a, Sqlite, SqliteArguments<'a>>,
        filter: Option<&'a Filter>,
    ) -> SqlxQuery<'a, Sqlite, SqliteArguments<'a>> {
        let Some(filter) = filter else {
            return query;
        };
        for clause in filter
            .clauses()
            .iter()
            .filter(|f| !f.comparison.is_null_check(&f.value))
        {
            query = match &clause.value {
                IndexValue::String(s) => query.bind(s.as_str()),
                IndexValue::Int(i) => query.bind(*i),
                IndexValue::Float(f) => query.bind(*f),
                IndexValue::Bool(b) => query.bind(*b),
                IndexValue::Timestamp(t) => query.bind(timestamp_text(t)),
                IndexValue::Null => query.bind(Option::<String>::None),
            };
        }
        query
    }
}

#[async_trait]
impl Datastore for SqliteAdapter {
    async fn put_entity(&self, record: EntityRecord) -> Result<(), Error> {
        let data =
            serde_json::to_string(&record.data).map_err(|e| Error::Serialize(e.to_string()))?;
        let index_meta = serde_json::to_string(&record.index_meta)
            .map_err(|e| Error::Serialize(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO entities (id, kind, data, index_meta)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                data = excluded.data,
                index_meta = excluded.index_meta
            "#,
        )
        .bind(record.id)
        .bind(&record.kind)
        .bind(data)
        .bind(index_meta)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::Storage(err.to_string()))?;

        Ok(())
    }

    async fn run_query(&self, plan: &QueryPlan) -> Result<RawRows, Error> {
        let columns = match plan.projection {
            Projection::Keys => "e.id, e.kind",
            Projection::Entities => "e.id, e.kind, e.data, e.index_meta",
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM entities e
            {}
            {}
            {}
            "#,
            columns,
            Self::build_conditions(plan.filter.as_ref()),
            Self::build_order_clause(&plan.sort),
            Self::build_window(plan.limit, plan.offset)
        );

        let mut query = sqlx::query(&sql).bind(plan.kind);
        query = Self::query_bind_filters(query, plan.filter.as_ref());

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|err| Error::Storage(err.to_string()))?;

        match plan.projection {
            Projection::Keys => rows
                .into_iter()
                .map(Self::map_row_to_key)
                .collect::<Result<Vec<_>, _>>()
                .map(RawRows::Keys),
            Projection::Entities => rows
                .into_iter()
                .map(Self::map_row_to_entity_record)
                .collect::<Result<Vec<_>, _>>()
                .map(RawRows::Entities),
        }
    }

    async fn delete_keys(&self, keys: &[Key]) -> Result<u64, Error> {
        if keys.is_empty() {
            return Ok(0);
        }

        let placeholders = keys.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!("DELETE FROM entities WHERE id IN ({})", placeholders);

        let mut query = sqlx::query(&sql);
        for key in keys {
            query = query.bind(key.id);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|err| Error::Storage(err.to_string()))?;
        Ok(result.rows_affected())
    }
}
