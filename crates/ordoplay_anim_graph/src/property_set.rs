// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered named-value store backing graph inputs, outputs and local variables.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which property set of a graph a property lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Parameters supplied from outside
    Input,
    /// Results computed by the graph
    Output,
    /// Shared named values within a sub-graph
    LocalVariable,
}

impl PropertyKind {
    /// Category (and node name) of the property nodes for this kind
    pub fn token(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Output => "Output",
            Self::LocalVariable => "Local Variable",
        }
    }

    /// Base name of a newly added property
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Input => "New Input",
            Self::Output => "New Output",
            Self::LocalVariable => "New Variable",
        }
    }
}

/// Ordered collection of uniquely named values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertySet {
    values: IndexMap<String, Value>,
}

impl PropertySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, or replace the value of an existing name in place
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove a value, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// Whether a name is present
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Name/value pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stable case-insensitive sort by name
    pub fn sort(&mut self) {
        self.values.sort_by(|a, _, b, _| a.to_lowercase().cmp(&b.to_lowercase()));
    }

    /// `base`, or `base_2`, `base_3`, ... whichever is free first
    pub fn unique_name(&self, base: &str) -> String {
        if !self.has(base) {
            return base.to_string();
        }
        let mut suffix = 1;
        loop {
            suffix += 1;
            let candidate = format!("{base}_{suffix}");
            if !self.has(&candidate) {
                return candidate;
            }
        }
    }
}
