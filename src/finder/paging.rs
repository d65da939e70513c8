use crate::{
    Entity,
    error::Error,
    finder::{ExecutionArguments, ResultShape},
    query::QuerySort,
    tree::{PartTree, Sort},
};

/// Row window of one store round-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

/// Tree sort first, then the page request's, then a bare sort directive.
pub fn merge_sort(tree: &PartTree, args: &ExecutionArguments) -> Sort {
    let mut sort = tree.sort().clone();
    if let Some(pageable) = args.pageable() {
        sort = sort.and(&pageable.sort);
    }
    if let Some(directive) = args.sort_directive() {
        sort = sort.and(directive);
    }
    sort
}

pub fn resolve_window(
    tree: &PartTree,
    shape: ResultShape,
    args: &ExecutionArguments,
    total: bool,
) -> Window {
    // the count pass of a page sees the full matching set
    if total {
        return Window::default();
    }

    if shape == ResultShape::Exists {
        return Window {
            limit: Some(1),
            offset: None,
        };
    }

    if let Some(max_results) = tree.max_results() {
        return Window {
            limit: Some(max_results),
            offset: None,
        };
    }

    match args.pageable() {
        Some(pageable) => {
            let limit = if shape == ResultShape::Slice {
                pageable.size.saturating_add(1)
            } else {
                pageable.size
            };
            Window {
                limit: Some(limit),
                offset: Some(pageable.offset()),
            }
        }
        None => Window::default(),
    }
}

pub fn map_sort<E: Entity>(sort: &Sort) -> Result<Vec<QuerySort>, Error> {
    sort.orders()
        .iter()
        .map(|order| {
            let field = E::field_name(&order.property).ok_or_else(|| Error::UnknownProperty {
                kind: E::KIND,
                property: order.property.clone(),
            })?;
            Ok(QuerySort {
                field,
                ascending: order.direction.is_ascending(),
            })
        })
        .collect()
}
