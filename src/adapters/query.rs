use super::{EntityRecord, Key};
use crate::query::{Filter, QuerySort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Row identities only
    Keys,
    Entities,
}

/// -----------------------------
/// Query Plan (storage contract)
/// -----------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub kind: &'static str,
    pub projection: Projection,
    pub filter: Option<Filter>,
    pub sort: Vec<QuerySort>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

impl QueryPlan {
    pub fn new(kind: &'static str, projection: Projection) -> Self {
        Self {
            kind,
            projection,
            filter: None,
            sort: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: Vec<QuerySort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: Option<u64>) -> Self {
        self.offset = offset;
        self
    }
}

/// Rows returned for a plan, shaped by its projection.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRows {
    Keys(Vec<Key>),
    Entities(Vec<EntityRecord>),
}

impl RawRows {
    pub fn len(&self) -> usize {
        match self {
            RawRows::Keys(keys) => keys.len(),
            RawRows::Entities(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<Key> {
        match self {
            RawRows::Keys(keys) => keys.clone(),
            RawRows::Entities(records) => records.iter().map(EntityRecord::key).collect(),
        }
    }
}
