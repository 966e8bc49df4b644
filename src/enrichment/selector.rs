//! Which identifiers a run processes, and in what order.

use std::collections::HashSet;

use crate::catalogue::RecordStore;

/// How the caller asked for identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every identifier, in store order
    #[default]
    All,
    /// These identifiers, in the given order
    Subset(Vec<String>),
    /// Every identifier from this one to the end of store order, inclusive
    ResumeFrom(String),
}

/// Bad selection input. No run is attempted when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Unknown plugin identifier: {0}")]
    UnknownIdentifier(String),

    #[error("Cannot resume from unknown plugin identifier: {0}")]
    UnknownResumePoint(String),
}

/// Resolve a selection against the store into an ordered identifier list.
///
/// Duplicates in a subset are dropped after their first occurrence so no
/// record is processed twice in one run.
pub fn resolve(store: &RecordStore, selection: &Selection) -> Result<Vec<String>, SelectionError> {
    match selection {
        Selection::All => Ok(store.ids().map(String::from).collect()),
        Selection::Subset(ids) => {
            if let Some(unknown) = ids.iter().find(|id| !store.contains(id)) {
                return Err(SelectionError::UnknownIdentifier(unknown.clone()));
            }
            let mut seen = HashSet::new();
            Ok(ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .cloned()
                .collect())
        }
        Selection::ResumeFrom(start) => {
            let position = store
                .position(start)
                .ok_or_else(|| SelectionError::UnknownResumePoint(start.clone()))?;
            Ok(store.ids().skip(position).map(String::from).collect())
        }
    }
}
