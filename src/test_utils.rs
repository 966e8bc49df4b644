//! Test utilities and fixtures for catalogue-enricher tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{store_of, ids};
//!
//! let store = store_of(&[("a", CatalogueEntry::with_repository("https://github.com/x/y"))]);
//! let all = ids(&store);
//! ```

use std::path::PathBuf;

use tempfile::TempDir;

use crate::catalogue::{CatalogueEntry, RecordStore};
use crate::enrichment::RepositoryInfo;

/// Builds a store from `(id, entry)` pairs, keeping the given order.
pub fn store_of<S: AsRef<str>>(entries: &[(S, CatalogueEntry)]) -> RecordStore {
    entries
        .iter()
        .map(|(id, entry)| (id.as_ref().to_string(), entry.clone()))
        .collect()
}

/// Every identifier in store order, owned.
pub fn ids(store: &RecordStore) -> Vec<String> {
    store.ids().map(String::from).collect()
}

/// Repository info on the `main` branch.
pub fn repo_info(name: &str, owner: &str, description: Option<&str>) -> RepositoryInfo {
    RepositoryInfo {
        name: name.to_string(),
        owner: owner.to_string(),
        description: description.map(String::from),
        default_branch: "main".to_string(),
    }
}

/// Writes `json` to `catalogue.json` in a fresh temp directory.
///
/// Keep the `TempDir` alive for the duration of the test.
pub fn temp_catalogue(json: &str) -> (PathBuf, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("catalogue.json");
    std::fs::write(&path, json).expect("Failed to write catalogue");
    (path, dir)
}

/// A small catalogue with one enrichable entry, one complete entry and one
/// entry hosted outside GitHub.
pub const SAMPLE_CATALOGUE: &str = r#"{
	"com.x.y": {
		"repository": "https://github.com/x/y"
	},
	"com.done.plugin": {
		"name": "Done",
		"author": "done",
		"description": "Already described",
		"repository": "https://github.com/done/plugin"
	},
	"com.gitlab.z": {
		"repository": "https://gitlab.com/x/z",
		"custom": [1, 2]
	}
}
"#;
