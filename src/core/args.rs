//! Structural argument values for module declarations.
//!
//! Everything after a module's name is recorded without interpreting
//! it. A version string, a `:latest` marker, or a table of git
//! coordinates all land here as plain values; deciding what they mean
//! is the installer's job.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One literal or container value from a `mod` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Quoted string literal: `'1.2.3'`, `'https://github.com/...'`
    Str(String),
    /// Symbol: `:latest`, `:control_branch`
    Symbol(String),
    /// Boolean literal
    Bool(bool),
    /// Ordered sequence of values
    List(Vec<ArgValue>),
    /// Keyword arguments: `:git => '...', :ref => '...'`
    Map(ArgMap),
}

impl ArgValue {
    /// The string content, for string literals.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The map content, for keyword arguments.
    pub fn as_map(&self) -> Option<&ArgMap> {
        match self {
            ArgValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Insertion-ordered key/value pairs.
///
/// Declaration order matters to consumers that echo the manifest back
/// to the user, so this is a small association list rather than a
/// hash map. Re-inserting a key overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgMap {
    entries: Vec<(String, ArgValue)>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair, replacing any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: ArgValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for ArgMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Everything after the name in a `mod` declaration, in source order.
///
/// Absent arguments yield the empty value; a bare version string yields
/// one entry; trailing keyword arguments collapse into a single
/// [`ArgValue::Map`] entry, matching how the manifest language groups
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModuleArgs {
    values: Vec<ArgValue>,
}

impl ModuleArgs {
    /// The empty argument list.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// All values, in source order.
    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&ArgValue> {
        self.values.first()
    }
}

impl From<Vec<ArgValue>> for ModuleArgs {
    fn from(values: Vec<ArgValue>) -> Self {
        ModuleArgs { values }
    }
}
