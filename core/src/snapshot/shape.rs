//! snapshot/shape.rs
//! Shape classifier for one node of a snapshot.
//!
//! Classification looks at structure only, never at field names beyond the
//! reserved tag, so the reconciler stays schema-agnostic.

use serde_json::{Map, Value};

use crate::constants::TAG_FIELD;

/// Raw value observed at a scalar leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCount {
    pub value: u64,
    /// The source value was not a usable count and was replaced by 0.
    pub coerced: bool,
}

impl RawCount {
    pub const ZERO: RawCount = RawCount { value: 0, coerced: false };

    fn coerced() -> Self {
        RawCount { value: 0, coerced: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    Scalar(RawCount),
    Map(&'a Map<String, Value>),
    /// Non-empty list whose first element carries the tag field.
    KeyedList(&'a [Value]),
    /// Non-empty list without a tag field, paired by index.
    PositionalList(&'a [Value]),
    /// Contributes nothing in this call.
    EmptyList,
}

impl Shape<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Scalar(_) => "scalar",
            Shape::Map(_) => "map",
            Shape::KeyedList(_) => "keyed-list",
            Shape::PositionalList(_) => "positional-list",
            Shape::EmptyList => "empty-list",
        }
    }
}

pub fn classify(value: &Value) -> Shape<'_> {
    match value {
        Value::Object(map) => Shape::Map(map),
        Value::Array(items) => match items.first() {
            None => Shape::EmptyList,
            Some(first) if is_tagged(first) => Shape::KeyedList(items),
            Some(_) => Shape::PositionalList(items),
        },
        other => Shape::Scalar(raw_count(other)),
    }
}

/// Numeric view of a leaf. Non-integral numbers truncate; negative,
/// non-finite and non-numeric values coerce to 0.
pub fn raw_count(value: &Value) -> RawCount {
    let Value::Number(n) = value else {
        return RawCount::coerced();
    };
    if let Some(v) = n.as_u64() {
        return RawCount { value: v, coerced: false };
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => RawCount { value: f as u64, coerced: false },
        _ => RawCount::coerced(),
    }
}

pub fn is_tagged(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|m| m.contains_key(TAG_FIELD))
}

/// Tag of a keyed element as a path segment.
/// Strings are used verbatim, numbers in decimal; any other tag is no tag.
pub fn tag_of(map: &Map<String, Value>) -> Option<String> {
    match map.get(TAG_FIELD)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
