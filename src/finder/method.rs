use crate::{error::Error, tree::PartTree};

/// What the query method is declared to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    /// `Option<R>`
    Single,
    /// `Vec<R>`
    List,
    Page,
    Slice,
    /// Numeric scalar (count, affected rows)
    Count,
    /// Numeric elements: row identities, no entity payload
    Keys,
    Boolean,
}

impl ReturnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ReturnType::Count | ReturnType::Keys)
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, ReturnType::Page | ReturnType::Slice)
    }
}

/// Static metadata of a query method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMethod {
    pub name: String,
    pub return_type: ReturnType,
}

impl QueryMethod {
    pub fn new(name: impl Into<String>, return_type: ReturnType) -> Self {
        Self {
            name: name.into(),
            return_type,
        }
    }
}

/// Execution strategy, fixed when the method is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Plain,
    Page,
    Slice,
    Count,
    Exists,
    DeleteByKey,
    DeleteByEntity,
}

impl ResultShape {
    pub fn resolve(tree: &PartTree, method: &QueryMethod) -> Result<Self, Error> {
        let return_type = method.return_type;

        if tree.is_delete() {
            return match return_type {
                ReturnType::Page | ReturnType::Slice | ReturnType::Boolean => {
                    Err(Error::Unsupported(format!(
                        "Delete query method {} must return the deleted entities or their count",
                        method.name
                    )))
                }
                t if t.is_numeric() => Ok(ResultShape::DeleteByKey),
                _ => Ok(ResultShape::DeleteByEntity),
            };
        }

        if (tree.is_count_projection() || tree.is_exists_projection()) && return_type.is_paged() {
            return Err(Error::Unsupported(format!(
                "Count and exists query method {} cannot return a page or slice",
                method.name
            )));
        }

        if tree.is_count_projection() {
            return Ok(ResultShape::Count);
        }
        if tree.is_exists_projection() {
            return Ok(ResultShape::Exists);
        }

        match return_type {
            ReturnType::Page => Ok(ResultShape::Page),
            ReturnType::Slice => Ok(ResultShape::Slice),
            ReturnType::Boolean => Err(Error::Unsupported(format!(
                "Query method {} returns a boolean but is not an exists query",
                method.name
            ))),
            _ => Ok(ResultShape::Plain),
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, ResultShape::DeleteByKey | ResultShape::DeleteByEntity)
    }
}
