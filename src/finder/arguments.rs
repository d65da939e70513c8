use crate::{page::PageRequest, query::ToIndexValue, tree::Sort};

pub type Argument = Box<dyn ToIndexValue + Send + Sync>;

/// Arguments of one query method call: positional values, bound in order to
/// the value-consuming parts of the tree, plus optional paging and sort
/// directives.
#[derive(Default)]
pub struct ExecutionArguments {
    values: Vec<Argument>,
    pageable: Option<PageRequest>,
    sort: Option<Sort>,
}

impl ExecutionArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, value: impl ToIndexValue + Send + Sync + 'static) -> Self {
        self.values.push(Box::new(value));
        self
    }

    pub fn page(mut self, pageable: PageRequest) -> Self {
        self.pageable = Some(pageable);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn values(&self) -> &[Argument] {
        &self.values
    }

    pub fn pageable(&self) -> Option<&PageRequest> {
        self.pageable.as_ref()
    }

    pub fn sort_directive(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }
}

impl std::fmt::Debug for ExecutionArguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<_> = self.values.iter().map(|v| v.to_index_value()).collect();
        f.debug_struct("ExecutionArguments")
            .field("values", &values)
            .field("pageable", &self.pageable)
            .field("sort", &self.sort)
            .finish()
    }
}
