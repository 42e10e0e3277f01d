//! Snapshot Format Module
//!
//! On-disk image of the store: current values plus every version chain.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};

// == Store State ==
/// Authoritative map and version chains.
///
/// This is both the live record held under the store lock and the snapshot
/// document, stored as `memory_data` and `memory_versions`. Either field may
/// be absent in a snapshot file; the shorter `data`/`versions` names are also
/// accepted on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// Current value per key
    #[serde(rename = "memory_data", alias = "data", default)]
    pub data: HashMap<String, Value>,
    /// Every value ever written per key, oldest first
    #[serde(rename = "memory_versions", alias = "versions", default)]
    pub versions: HashMap<String, Vec<Value>>,
}

impl StoreState {
    /// Appends `value` as the newest version of `key` and makes it current.
    ///
    /// Returns the index of the new version.
    pub fn record(&mut self, key: String, value: Value) -> usize {
        let chain = self.versions.entry(key.clone()).or_default();
        chain.push(value.clone());
        let version = chain.len() - 1;
        self.data.insert(key, value);
        version
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.versions.clear();
    }

    /// Repairs a loaded state so every chain ends with the current value.
    ///
    /// - a key with a current value but no chain gets a one-element chain
    /// - a key with a chain but no current value takes the chain's last element
    /// - empty chains are dropped
    /// - a chain whose last element differs from the current value gets the
    ///   current value appended
    pub fn normalize(&mut self) {
        self.versions.retain(|_, chain| !chain.is_empty());

        for (key, chain) in &self.versions {
            if !self.data.contains_key(key) {
                if let Some(last) = chain.last() {
                    self.data.insert(key.clone(), last.clone());
                }
            }
        }

        for (key, value) in &self.data {
            let chain = self.versions.entry(key.clone()).or_default();
            if chain.last() != Some(value) {
                chain.push(value.clone());
            }
        }
    }
}

/// Path of the scratch file a snapshot is written to before being renamed.
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

// == Read ==
/// Reads the snapshot at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_snapshot(path: &Path) -> Result<Option<StoreState>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let mut state: StoreState = serde_json::from_slice(&bytes)?;
    state.normalize();
    Ok(Some(state))
}

// == Write ==
/// Overwrites the snapshot at `path` with `state`.
///
/// The document goes to a sibling temp file first and is renamed into place,
/// so a failed write leaves the previous snapshot intact.
pub async fn write_snapshot(path: &Path, state: &StoreState) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(state)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_keeps_chain_and_current_in_step() {
        let mut state = StoreState::default();

        assert_eq!(state.record("k".to_string(), json!(1)), 0);
        assert_eq!(state.record("k".to_string(), json!(2)), 1);

        assert_eq!(state.data["k"], json!(2));
        assert_eq!(state.versions["k"], vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let state: StoreState = serde_json::from_str("{}").unwrap();
        assert!(state.data.is_empty());
        assert!(state.versions.is_empty());

        let state: StoreState = serde_json::from_str(r#"{"data":{"a":1}}"#).unwrap();
        assert_eq!(state.data["a"], json!(1));
        assert!(state.versions.is_empty());
    }

    #[test]
    fn test_serializes_memory_field_names() {
        let mut state = StoreState::default();
        state.record("user_123".to_string(), json!({"name": "Alice"}));

        let doc = serde_json::to_value(&state).unwrap();
        assert_eq!(
            doc,
            json!({
                "memory_data": {"user_123": {"name": "Alice"}},
                "memory_versions": {"user_123": [{"name": "Alice"}]}
            })
        );
    }

    #[test]
    fn test_normalize_repairs_partial_state() {
        let mut state: StoreState = serde_json::from_value(json!({
            "data": {"only_data": "x", "stale": 3},
            "versions": {"only_versions": [1, 2], "empty": [], "stale": [1, 2]}
        }))
        .unwrap();

        state.normalize();

        assert_eq!(state.versions["only_data"], vec![json!("x")]);
        assert_eq!(state.data["only_versions"], json!(2));
        assert!(!state.versions.contains_key("empty"));
        assert!(!state.data.contains_key("empty"));
        assert_eq!(state.versions["stale"], vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_snapshot(&dir.path().join("absent.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(read_snapshot(&path), Err(StoreError::Format(_))));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snap.json");

        let mut state = StoreState::default();
        state.record("u1".to_string(), json!({"n": "Jo"}));
        state.record("u1".to_string(), json!({"n": "Jo2"}));

        write_snapshot(&path, &state).await.unwrap();

        assert!(!temp_path(&path).exists());
        let loaded = read_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("/var/lib/store/snap.json"));
        assert_eq!(tmp, PathBuf::from("/var/lib/store/snap.json.tmp"));
    }
}
