//! snapshot/path.rs
//! Path builder: stable names for every leaf counter.
//!
//! A leaf is addressed by the group it lives in plus its own name. Groups
//! are built by appending traversal segments to the caller's label:
//! map traversal joins with `/`, list field traversal joins with `_`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{LIST_SEPARATOR, MAP_SEPARATOR};

/// Group a set of sibling leaves belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupPath(String);

impl GroupPath {
    pub fn root(label: impl Into<String>) -> Self {
        GroupPath(label.into())
    }

    /// Descend into a nested mapping (`base/segment`).
    pub fn child(&self, segment: &str) -> Self {
        self.join(MAP_SEPARATOR, segment)
    }

    /// Descend into a list-valued field (`base_name`).
    pub fn field(&self, name: &str) -> Self {
        self.join(LIST_SEPARATOR, name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn join(&self, sep: char, segment: &str) -> Self {
        let mut s = String::with_capacity(self.0.len() + 1 + segment.len());
        s.push_str(&self.0);
        s.push(sep);
        s.push_str(segment);
        GroupPath(s)
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupPath {
    fn from(s: &str) -> Self {
        GroupPath(s.to_string())
    }
}

impl From<String> for GroupPath {
    fn from(s: String) -> Self {
        GroupPath(s)
    }
}

/// Full identity of one leaf counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub group: GroupPath,
    pub leaf: String,
}

impl GroupKey {
    pub fn new(group: impl Into<GroupPath>, leaf: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            leaf: leaf.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.group, self.leaf)
    }
}
