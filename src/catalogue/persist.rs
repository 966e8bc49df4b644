//! Catalogue file reading and writing.
//!
//! The file is a tab-indented JSON object with non-ASCII text written as-is
//! and a trailing newline, so hand edits and tool edits diff cleanly.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::{CatalogueEntry, RecordStore};

/// Parse a catalogue from JSON text.
pub fn from_json_str(contents: &str) -> Result<RecordStore, CatalogueError> {
    let raw: Map<String, Value> = serde_json::from_str(contents).map_err(CatalogueError::Parse)?;

    let mut store = RecordStore::new();
    for (id, value) in raw {
        let entry = CatalogueEntry::try_from(value)
            .map_err(|_| CatalogueError::InvalidEntry(id.clone()))?;
        store.insert(id, entry);
    }
    Ok(store)
}

/// Serialize a catalogue to its on-disk text form.
pub fn to_json_string(store: &RecordStore) -> Result<String, CatalogueError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    store
        .serialize(&mut serializer)
        .map_err(CatalogueError::Serialize)?;
    buf.push(b'\n');

    // serde_json only ever emits UTF-8
    String::from_utf8(buf).map_err(|e| CatalogueError::Encoding(e.to_string()))
}

/// Load the catalogue from disk.
pub fn load(path: &Path) -> Result<RecordStore, CatalogueError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| CatalogueError::Read(path.to_path_buf(), e))?;
    let store = from_json_str(&contents)?;
    tracing::debug!("Loaded {} catalogue entries from {:?}", store.len(), path);
    Ok(store)
}

/// Save the catalogue to disk.
///
/// Writes atomically (write to temp, then rename) so an interrupted save
/// never leaves a truncated catalogue behind.
pub fn save(path: &Path, store: &RecordStore) -> Result<(), CatalogueError> {
    let contents = to_json_string(store)?;

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, contents)
        .map_err(|e| CatalogueError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| CatalogueError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::debug!("Saved {} catalogue entries to {:?}", store.len(), path);
    Ok(())
}

/// Catalogue persistence errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("Failed to read catalogue {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse catalogue: {0}")]
    Parse(serde_json::Error),

    #[error("Catalogue entry {0:?} is not a JSON object")]
    InvalidEntry(String),

    #[error("Failed to serialize catalogue: {0}")]
    Serialize(serde_json::Error),

    #[error("Catalogue is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("Failed to write catalogue to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Field;

    const SAMPLE: &str = "{\n\t\"com.b.plugin\": {\n\t\t\"repository\": \"https://github.com/b/plugin\",\n\t\t\"name\": \"Plügin\"\n\t},\n\t\"com.a.plugin\": {\n\t\t\"repository\": \"https://gitlab.com/a/plugin\",\n\t\t\"tags\": [\n\t\t\t\"x\"\n\t\t]\n\t}\n}\n";

    #[test]
    fn test_format_is_stable() {
        let store = from_json_str(SAMPLE).unwrap();
        assert_eq!(to_json_string(&store).unwrap(), SAMPLE);
    }

    #[test]
    fn test_file_order_is_store_order() {
        let store = from_json_str(SAMPLE).unwrap();
        assert_eq!(
            store.ids().collect::<Vec<_>>(),
            vec!["com.b.plugin", "com.a.plugin"]
        );
    }

    #[test]
    fn test_non_ascii_written_verbatim() {
        let store = from_json_str(SAMPLE).unwrap();
        let text = to_json_string(&store).unwrap();
        assert!(text.contains("Plügin"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_rejects_non_object_entries() {
        let err = from_json_str(r#"{"a": {}, "b": "oops"}"#).unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidEntry(ref id) if id == "b"));
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(matches!(
            from_json_str("[1, 2]"),
            Err(CatalogueError::Parse(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogue.json");

        let mut store = from_json_str(SAMPLE).unwrap();
        store
            .get_mut("com.a.plugin")
            .unwrap()
            .set(Field::Description, "added");
        save(&path, &store).unwrap();

        let reloaded = load(&path).unwrap();
        assert_eq!(reloaded, store);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogueError::Read(..)));
    }
}
