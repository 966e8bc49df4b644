//! In-memory catalogue of plugin records.
//!
//! The catalogue is a JSON object mapping plugin identifiers to metadata
//! objects. Entries keep their original key order and any keys we don't
//! know about, so an entry that enrichment never touches serializes exactly
//! as it was read.
//!
//! Store order (the order identifiers appear in the file) is significant:
//! resuming a run from an identifier relies on it being stable.

mod persist;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use persist::{CatalogueError, from_json_str, load, save, to_json_string};

/// Known fields of a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Repository,
    Name,
    Author,
    Description,
    DownloadUrl,
}

impl Field {
    /// The JSON key this field is stored under.
    pub fn key(self) -> &'static str {
        match self {
            Field::Repository => "repository",
            Field::Name => "name",
            Field::Author => "author",
            Field::Description => "description",
            Field::DownloadUrl => "downloadURL",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A single plugin record.
///
/// A field counts as present when its key holds anything but `null` (an
/// empty string is still present). Only string values are ever replaced;
/// hand-curated values of other types are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogueEntry(Map<String, Value>);

impl CatalogueEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry with only a repository URL, the usual shape of a freshly added plugin.
    pub fn with_repository(url: impl Into<String>) -> Self {
        let mut entry = Self::new();
        entry.set(Field::Repository, url);
        entry
    }

    /// Builder-style setter.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// String value of a field; `None` when absent or not a string.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(field.key()).and_then(Value::as_str)
    }

    pub fn has(&self, field: Field) -> bool {
        self.0.get(field.key()).is_some_and(|v| !v.is_null())
    }

    pub fn repository(&self) -> Option<&str> {
        self.get(Field::Repository)
    }

    /// Set a field, overwriting any existing value.
    ///
    /// Existing keys keep their position; new keys are appended.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.0
            .insert(field.key().to_string(), Value::String(value.into()));
    }

    /// Set a field only when it is absent. Returns whether the entry changed.
    pub fn fill(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.has(field) {
            return false;
        }
        self.set(field, value);
        true
    }

    /// Overwrite a field that is absent or holds a different string.
    ///
    /// Non-string values are never replaced. Returns whether the entry changed.
    pub fn replace(&mut self, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.0.get(field.key()) {
            Some(Value::String(current)) if *current == value => false,
            Some(Value::String(_) | Value::Null) | None => {
                self.set(field, value);
                true
            }
            Some(_) => false,
        }
    }
}

impl TryFrom<Value> for CatalogueEntry {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

/// Ordered collection of catalogue entries keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    entries: Vec<(String, CatalogueEntry)>,
    index: HashMap<String, usize>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. New identifiers are appended to store order.
    pub fn insert(&mut self, id: impl Into<String>, entry: CatalogueEntry) {
        let id = id.into();
        if let Some(&pos) = self.index.get(&id) {
            self.entries[pos].1 = entry;
            return;
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, entry));
    }

    pub fn get(&self, id: &str) -> Option<&CatalogueEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CatalogueEntry> {
        let pos = *self.index.get(id)?;
        Some(&mut self.entries[pos].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of an identifier in store order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Identifiers in store order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogueEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, CatalogueEntry)> for RecordStore {
    fn from_iter<T: IntoIterator<Item = (S, CatalogueEntry)>>(iter: T) -> Self {
        let mut store = Self::new();
        for (id, entry) in iter {
            store.insert(id, entry);
        }
        store
    }
}

impl Serialize for RecordStore {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(id, entry)| (id, entry)))
    }
}
