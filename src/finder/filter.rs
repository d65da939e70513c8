use std::collections::BTreeSet;

use crate::{
    Entity,
    convert::Conversions,
    error::Error,
    finder::Argument,
    query::{Comparison, Filter, IndexValue, QueryFilter},
    tree::{PartKind, PartTree},
};

/// A predicate part with its property resolved to the backend field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPart {
    pub property: String,
    pub field: &'static str,
    pub kind: PartKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    pub filter: Option<Filter>,
    /// Fields compared with `=`. Recorded for the store's benefit; nothing in
    /// the execution path reads it.
    pub equality_fields: BTreeSet<&'static str>,
}

/// Registration-time checks. Returns the flattened parts every invocation
/// compiles from.
pub fn validate<E: Entity>(tree: &PartTree) -> Result<Vec<FilterPart>, Error> {
    if tree.is_distinct() {
        return Err(Error::Unsupported(
            "Structured queries do not support the Distinct keyword.".to_string(),
        ));
    }

    if tree.or_parts().len() > 1 {
        return Err(Error::Malformed(
            "Only multiple filters combined with AND are supported.".to_string(),
        ));
    }

    tree.parts()
        .map(|part| {
            let field = E::field_name(&part.property).ok_or_else(|| Error::UnknownProperty {
                kind: E::KIND,
                property: part.property.clone(),
            })?;
            Ok(FilterPart {
                property: part.property.clone(),
                field,
                kind: part.kind,
            })
        })
        .collect()
}

/// Binds positional arguments to `parts` in order and builds the filter.
pub fn compile(
    method: &str,
    parts: &[FilterPart],
    values: &[Argument],
    conversions: &dyn Conversions,
) -> Result<CompiledFilter, Error> {
    let mut args = values.iter();
    let mut filters = Vec::with_capacity(parts.len());
    let mut equality_fields = BTreeSet::new();

    for part in parts {
        let Some(comparison) = part.kind.comparison() else {
            return Err(Error::Unsupported(format!(
                "Unsupported predicate keyword: {}",
                part.kind.keyword()
            )));
        };

        let value = if part.kind.arity() == 0 {
            IndexValue::Null
        } else {
            let arg = args
                .next()
                .ok_or_else(|| Error::TooFewParameters(method.to_string()))?;
            conversions.convert_on_write(arg.as_ref())?
        };

        if comparison == Comparison::Equal {
            equality_fields.insert(part.field);
        }

        filters.push(QueryFilter {
            field: part.field,
            comparison,
            value,
        });
    }

    Ok(CompiledFilter {
        filter: Filter::and(filters),
        equality_fields,
    })
}
