//! Predicate trees.
//!
//! A [`PartTree`] is the structured form of a query method's name: what the
//! method does (find, count, exists, delete), which properties it filters on
//! and how, how results are ordered, and how many it keeps. Trees are built
//! once, when the query method is registered, and shared read-only by every
//! invocation.
//!
//! ```rust,ignore
//! // findFirst10ByAgeGreaterThanAndNameOrderByAgeDesc
//! let tree = PartTree::find()
//!     .first(10)
//!     .part("age", PartKind::GreaterThan)
//!     .part("name", PartKind::SimpleProperty)
//!     .order_by_desc("age");
//! ```

pub mod part;
pub mod sort;

pub use part::*;
pub use sort::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Find,
    Count,
    Exists,
    Delete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    pub action: Action,
    pub distinct: bool,
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartTree {
    subject: Subject,
    nodes: Vec<OrPart>,
    sort: Sort,
}

impl PartTree {
    fn with_action(action: Action) -> Self {
        Self {
            subject: Subject {
                action,
                ..Subject::default()
            },
            ..Self::default()
        }
    }

    pub fn find() -> Self {
        Self::with_action(Action::Find)
    }

    pub fn count() -> Self {
        Self::with_action(Action::Count)
    }

    pub fn exists() -> Self {
        Self::with_action(Action::Exists)
    }

    pub fn delete() -> Self {
        Self::with_action(Action::Delete)
    }

    pub fn distinct(mut self) -> Self {
        self.subject.distinct = true;
        self
    }

    /// `findFirstN` / `findTopN`
    pub fn first(mut self, max_results: u32) -> Self {
        self.subject.max_results = Some(max_results);
        self
    }

    /// Adds a part to the current OR branch.
    pub fn part(mut self, property: impl Into<String>, kind: PartKind) -> Self {
        if self.nodes.is_empty() {
            self.nodes.push(OrPart::new());
        }
        if let Some(last) = self.nodes.last_mut() {
            last.push(Part::new(property, kind));
        }
        self
    }

    /// Starts a new OR branch.
    pub fn or(mut self) -> Self {
        if !self.nodes.is_empty() {
            self.nodes.push(OrPart::new());
        }
        self
    }

    pub fn or_part(mut self, node: OrPart) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn order_by_asc(mut self, property: impl Into<String>) -> Self {
        self.sort = self.sort.then(Order::asc(property));
        self
    }

    pub fn order_by_desc(mut self, property: impl Into<String>) -> Self {
        self.sort = self.sort.then(Order::desc(property));
        self
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn is_distinct(&self) -> bool {
        self.subject.distinct
    }

    pub fn is_count_projection(&self) -> bool {
        self.subject.action == Action::Count
    }

    pub fn is_exists_projection(&self) -> bool {
        self.subject.action == Action::Exists
    }

    pub fn is_delete(&self) -> bool {
        self.subject.action == Action::Delete
    }

    pub fn is_limiting(&self) -> bool {
        self.subject.max_results.is_some()
    }

    pub fn max_results(&self) -> Option<u32> {
        self.subject.max_results
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn or_parts(&self) -> &[OrPart] {
        &self.nodes
    }

    /// Every part of every branch, in declaration order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.nodes.iter().flat_map(|node| node.parts().iter())
    }

    pub fn has_predicate(&self) -> bool {
        self.parts().next().is_some()
    }
}
