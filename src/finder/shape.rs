use crate::{adapters::Projection, finder::ResultShape};

/// How fetched rows are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collector {
    List,
    Count,
    /// count > 0
    Exists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryShape {
    pub projection: Projection,
    pub collector: Collector,
}

impl QueryShape {
    /// Picks retrieval mode and collector for one pass. `total` marks the
    /// count-only pass of a page request.
    pub fn select(shape: ResultShape, numeric_element: bool, total: bool) -> Self {
        let counting = total || matches!(shape, ResultShape::Count | ResultShape::DeleteByKey);

        if counting {
            return Self {
                projection: Projection::Keys,
                collector: Collector::Count,
            };
        }

        if shape == ResultShape::Exists {
            return Self {
                projection: Projection::Keys,
                collector: Collector::Exists,
            };
        }

        // Numeric finds without a counting keyword identify rows by key.
        let projection = if numeric_element {
            Projection::Keys
        } else {
            Projection::Entities
        };

        Self {
            projection,
            collector: Collector::List,
        }
    }
}
