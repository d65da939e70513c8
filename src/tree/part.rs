use crate::query::Comparison;

/// Keyword a predicate part was declared with.
///
/// The catalogue is wider than what the store supports: unsupported kinds
/// exist so the filter compiler can reject them by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Between,
    IsNotNull,
    IsNull,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Before,
    After,
    NotLike,
    Like,
    StartingWith,
    EndingWith,
    IsNotEmpty,
    IsEmpty,
    NotContaining,
    Containing,
    NotIn,
    In,
    Near,
    Within,
    Regex,
    Exists,
    True,
    False,
    NegatingSimpleProperty,
    SimpleProperty,
}

impl PartKind {
    /// Number of positional arguments the part binds.
    pub const fn arity(&self) -> usize {
        match self {
            PartKind::Between => 2,
            PartKind::IsNotNull
            | PartKind::IsNull
            | PartKind::IsNotEmpty
            | PartKind::IsEmpty
            | PartKind::Exists
            | PartKind::True
            | PartKind::False => 0,
            _ => 1,
        }
    }

    pub const fn keyword(&self) -> &'static str {
        match self {
            PartKind::Between => "BETWEEN",
            PartKind::IsNotNull => "IS_NOT_NULL",
            PartKind::IsNull => "IS_NULL",
            PartKind::LessThan => "LESS_THAN",
            PartKind::LessThanEqual => "LESS_THAN_EQUAL",
            PartKind::GreaterThan => "GREATER_THAN",
            PartKind::GreaterThanEqual => "GREATER_THAN_EQUAL",
            PartKind::Before => "BEFORE",
            PartKind::After => "AFTER",
            PartKind::NotLike => "NOT_LIKE",
            PartKind::Like => "LIKE",
            PartKind::StartingWith => "STARTING_WITH",
            PartKind::EndingWith => "ENDING_WITH",
            PartKind::IsNotEmpty => "IS_NOT_EMPTY",
            PartKind::IsEmpty => "IS_EMPTY",
            PartKind::NotContaining => "NOT_CONTAINING",
            PartKind::Containing => "CONTAINING",
            PartKind::NotIn => "NOT_IN",
            PartKind::In => "IN",
            PartKind::Near => "NEAR",
            PartKind::Within => "WITHIN",
            PartKind::Regex => "REGEX",
            PartKind::Exists => "EXISTS",
            PartKind::True => "TRUE",
            PartKind::False => "FALSE",
            PartKind::NegatingSimpleProperty => "NEGATING_SIMPLE_PROPERTY",
            PartKind::SimpleProperty => "SIMPLE_PROPERTY",
        }
    }

    /// Backend comparison for the kinds the store can evaluate.
    pub const fn comparison(&self) -> Option<Comparison> {
        match self {
            PartKind::SimpleProperty => Some(Comparison::Equal),
            PartKind::IsNull => Some(Comparison::IsNull),
            PartKind::GreaterThan => Some(Comparison::GreaterThan),
            PartKind::GreaterThanEqual => Some(Comparison::GreaterThanOrEqual),
            PartKind::LessThan => Some(Comparison::LessThan),
            PartKind::LessThanEqual => Some(Comparison::LessThanOrEqual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub property: String,
    pub kind: PartKind,
}

impl Part {
    pub fn new(property: impl Into<String>, kind: PartKind) -> Self {
        Self {
            property: property.into(),
            kind,
        }
    }
}

/// One branch of the tree's disjunction; its parts are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrPart {
    parts: Vec<Part>,
}

impl OrPart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub(crate) fn push(&mut self, part: Part) {
        self.parts.push(part);
    }
}
