use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Backend-native property values of one entity, keyed by backend field name.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IndexMeta(pub BTreeMap<String, IndexValue>);

impl IndexMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&IndexValue> {
        self.0.get(field)
    }

    pub fn with(mut self, field: &str, value: impl ToIndexValue) -> Self {
        self.0.insert(field.to_string(), value.to_index_value());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IndexValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    #[serde(serialize_with = "serialize_timestamp")]
    Timestamp(chrono::DateTime<chrono::Utc>),
    Null,
}

/// Fixed-width RFC 3339 text (nanosecond fraction, `Z`), so stored and bound
/// timestamps order correctly when a store compares them as strings.
pub(crate) fn timestamp_text(t: &chrono::DateTime<chrono::Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn serialize_timestamp<S: Serializer>(
    t: &chrono::DateTime<chrono::Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp_text(t))
}

impl IndexValue {
    pub fn is_null(&self) -> bool {
        matches!(self, IndexValue::Null)
    }

    /// Ordering between two values of compatible types. Integers and floats
    /// compare numerically; anything else across types is incomparable.
    pub fn compare(&self, other: &IndexValue) -> Option<Ordering> {
        match (self, other) {
            (IndexValue::String(a), IndexValue::String(b)) => Some(a.cmp(b)),
            (IndexValue::Int(a), IndexValue::Int(b)) => Some(a.cmp(b)),
            (IndexValue::Float(a), IndexValue::Float(b)) => a.partial_cmp(b),
            (IndexValue::Int(a), IndexValue::Float(b)) => (*a as f64).partial_cmp(b),
            (IndexValue::Float(a), IndexValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (IndexValue::Bool(a), IndexValue::Bool(b)) => Some(a.cmp(b)),
            (IndexValue::Timestamp(a), IndexValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

// Helper trait to convert types to IndexValue
pub trait ToIndexValue {
    fn to_index_value(&self) -> IndexValue;
}

impl ToIndexValue for IndexValue {
    fn to_index_value(&self) -> IndexValue {
        self.clone()
    }
}

impl ToIndexValue for String {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::String(self.clone())
    }
}

impl ToIndexValue for str {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::String(self.to_string())
    }
}

impl<T: ToIndexValue + ?Sized> ToIndexValue for &T {
    fn to_index_value(&self) -> IndexValue {
        (**self).to_index_value()
    }
}

impl ToIndexValue for i64 {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::Int(*self)
    }
}

impl ToIndexValue for i32 {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::Int(*self as i64)
    }
}

impl ToIndexValue for u32 {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::Int(*self as i64)
    }
}

/// Values above `i64::MAX` saturate to `i64::MAX`.
impl ToIndexValue for u64 {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::Int(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl ToIndexValue for f64 {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::Float(*self)
    }
}

impl ToIndexValue for f32 {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::Float(*self as f64)
    }
}

impl ToIndexValue for bool {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::Bool(*self)
    }
}

impl ToIndexValue for chrono::DateTime<chrono::Utc> {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::Timestamp(*self)
    }
}

impl ToIndexValue for Uuid {
    fn to_index_value(&self) -> IndexValue {
        IndexValue::String(self.to_string())
    }
}

impl<T: ToIndexValue> ToIndexValue for Option<T> {
    fn to_index_value(&self) -> IndexValue {
        match self {
            Some(v) => v.to_index_value(),
            None => IndexValue::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    IsNull,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl Comparison {
    /// Evaluates the comparison against a stored value. Missing fields and
    /// nulls only satisfy `IsNull` (or equality with null).
    pub fn matches(&self, actual: Option<&IndexValue>, expected: &IndexValue) -> bool {
        if self.is_null_check(expected) {
            return actual.is_none_or(IndexValue::is_null);
        }
        let ordering = actual.and_then(|a| a.compare(expected));
        match (self, ordering) {
            (Comparison::IsNull, _) => false,
            (_, None) => false,
            (Comparison::Equal, Some(o)) => o == Ordering::Equal,
            (Comparison::GreaterThan, Some(o)) => o == Ordering::Greater,
            (Comparison::LessThan, Some(o)) => o == Ordering::Less,
            (Comparison::GreaterThanOrEqual, Some(o)) => o != Ordering::Less,
            (Comparison::LessThanOrEqual, Some(o)) => o != Ordering::Greater,
        }
    }
}

impl Comparison {
    /// `IsNull`, or equality against a null value.
    pub fn is_null_check(&self, expected: &IndexValue) -> bool {
        match self {
            Comparison::IsNull => true,
            Comparison::Equal => expected.is_null(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryFilter {
    pub field: &'static str,
    pub comparison: Comparison,
    pub value: IndexValue,
}

impl QueryFilter {
    pub fn matches(&self, meta: &IndexMeta) -> bool {
        self.comparison.matches(meta.get(self.field), &self.value)
    }
}

/// Compiled filter: one property filter or an AND of several.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Property(QueryFilter),
    And(Vec<QueryFilter>),
}

impl Filter {
    pub fn and(mut filters: Vec<QueryFilter>) -> Option<Self> {
        match filters.len() {
            0 => None,
            1 => filters.pop().map(Filter::Property),
            _ => Some(Filter::And(filters)),
        }
    }

    pub fn clauses(&self) -> &[QueryFilter] {
        match self {
            Filter::Property(filter) => std::slice::from_ref(filter),
            Filter::And(filters) => filters,
        }
    }

    pub fn matches(&self, meta: &IndexMeta) -> bool {
        self.clauses().iter().all(|f| f.matches(meta))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySort {
    pub field: &'static str,
    pub ascending: bool,
}
