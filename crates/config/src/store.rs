//! File-backed YAML configuration.
//!
//! Layout inside the plugin data directory:
//! ```text
//! config.yml   - operator-editable settings, spawn entries and message templates
//! ```
//!
//! Values are addressed with dotted paths (`spawns.world`, `messages.success`).
//! Lookups consult the file first and the bundled defaults second, so a key
//! removed from the file still resolves to its default.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Errors from configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config path '{0}'")]
    InvalidPath(String),
    #[error("config root is not a mapping")]
    NotAMapping,
    #[error("config store has no backing file")]
    Detached,
}

/// YAML configuration tree with bundled defaults layered underneath.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    defaults: Value,
    root: Value,
}

impl ConfigStore {
    /// Open the configuration at `path`.
    ///
    /// If the file does not exist it is created from `defaults_yaml` (parent
    /// directories included). The file is then loaded with the defaults
    /// layered underneath.
    pub fn open(path: impl AsRef<Path>, defaults_yaml: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let defaults = parse_root(defaults_yaml)?;
        let mut store = Self {
            path: Some(path),
            defaults,
            root: Value::Mapping(Mapping::new()),
        };
        store.save_default(defaults_yaml)?;
        store.reload()?;
        Ok(store)
    }

    /// Build a store with no backing file. `save()` on it fails with `Detached`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            path: None,
            defaults: Value::Mapping(Mapping::new()),
            root: parse_root(yaml)?,
        })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-read the backing file. Keys missing from the file fall back to defaults.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::Detached)?;
        let text = std::fs::read_to_string(path)?;
        self.root = parse_root(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(())
    }

    /// Write the current tree to the backing file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::Detached)?;
        let text = serde_yaml::to_string(&self.root)?;
        std::fs::write(path, text)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    fn save_default(&self, defaults_yaml: &str) -> Result<(), ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::Detached)?;
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, defaults_yaml)?;
        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(())
    }

    /// Raw value at `path`, file first, then defaults.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = split_path(path)?;
        lookup(&self.root, &segments).or_else(|| lookup(&self.defaults, &segments))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Scalar at `path` rendered as text. Mappings, sequences and nulls read as absent.
    pub fn get_string(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> String {
        self.get_string(path).unwrap_or_else(|| default.to_string())
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        match self.get(path)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        match self.get(path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        match self.get(path)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Scalars of the sequence at `path`. Missing or non-sequence values give an empty list.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        let Some(Value::Sequence(items)) = self.get(path) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect()
    }

    /// Set `path` to `value`, creating intermediate mappings. A scalar in the
    /// way of an intermediate segment is replaced by a mapping.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        let segments = split_path(path).ok_or_else(|| ConfigError::InvalidPath(path.into()))?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ConfigError::InvalidPath(path.into()))?;

        let mut node = &mut self.root;
        for segment in parents {
            let map = as_mapping_mut(node);
            let key = Value::String((*segment).to_string());
            if !matches!(map.get(&key), Some(Value::Mapping(_))) {
                map.insert(key.clone(), Value::Mapping(Mapping::new()));
            }
            node = map.get_mut(&key).ok_or(ConfigError::NotAMapping)?;
        }
        as_mapping_mut(node).insert(Value::String((*last).to_string()), value.into());
        Ok(())
    }

    /// Remove `path` from the file tree. Returns the removed value.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let segments = split_path(path)?;
        let (last, parents) = segments.split_last()?;
        let mut node = &mut self.root;
        for segment in parents {
            node = node.as_mapping_mut()?.get_mut(*segment)?;
        }
        node.as_mapping_mut()?.remove(*last)
    }
}

fn parse_root(text: &str) -> Result<Value, ConfigError> {
    match serde_yaml::from_str::<Value>(text)? {
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        root @ Value::Mapping(_) => Ok(root),
        _ => Err(ConfigError::NotAMapping),
    }
}

fn split_path(path: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if path.trim().is_empty() || segments.iter().any(|s| s.is_empty()) {
        tracing::warn!(path, "ignoring malformed config path");
        return None;
    }
    Some(segments)
}

fn lookup<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |node, segment| node.as_mapping()?.get(*segment))
        .filter(|value| !value.is_null())
}

fn as_mapping_mut(node: &mut Value) -> &mut Mapping {
    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    match node {
        Value::Mapping(map) => map,
        _ => unreachable!("node was just replaced by a mapping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: &str = "\
spawns: {}
messages:
  success: '&aTeleported to {world}.'
  generic-failure: '&cSomething went wrong.'
";

    #[test]
    fn open_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let store = ConfigStore::open(&path, DEFAULTS).unwrap();

        assert!(path.exists());
        assert_eq!(
            store.get_string("messages.success").as_deref(),
            Some("&aTeleported to {world}.")
        );
    }

    #[test]
    fn open_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "messages:\n  success: custom\n").unwrap();

        let store = ConfigStore::open(&path, DEFAULTS).unwrap();
        assert_eq!(store.get_string("messages.success").as_deref(), Some("custom"));
        // Missing from the file, served from the bundled defaults.
        assert_eq!(
            store.get_string("messages.generic-failure").as_deref(),
            Some("&cSomething went wrong.")
        );
    }

    #[test]
    fn set_save_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let mut store = ConfigStore::open(&path, DEFAULTS).unwrap();

        store
            .set("spawns.world", "1.000000,64.000000,2.000000,0.00,0.00")
            .unwrap();
        store.save().unwrap();

        let mut reopened = ConfigStore::open(&path, DEFAULTS).unwrap();
        reopened.reload().unwrap();
        assert_eq!(
            reopened.get_string("spawns.world").as_deref(),
            Some("1.000000,64.000000,2.000000,0.00,0.00")
        );
    }

    #[test]
    fn scalars_read_as_strings() {
        let store = ConfigStore::from_yaml_str("a: 12\nb: true\nc: 1.5\nd:\n  e: x\n").unwrap();
        assert_eq!(store.get_string("a").as_deref(), Some("12"));
        assert_eq!(store.get_string("b").as_deref(), Some("true"));
        assert_eq!(store.get_string("c").as_deref(), Some("1.5"));
        assert_eq!(store.get_string("d"), None);
        assert_eq!(store.get_i64("a"), Some(12));
        assert_eq!(store.get_f64("c"), Some(1.5));
        assert_eq!(store.get_bool("b"), Some(true));
    }

    #[test]
    fn missing_and_null_values_are_absent() {
        let store = ConfigStore::from_yaml_str("spawns:\n  world: ~\n").unwrap();
        assert_eq!(store.get_string("spawns.world"), None);
        assert_eq!(store.get_string("spawns.world_nether"), None);
        assert!(!store.contains("nothing.here"));
        assert_eq!(store.get_string_or("nothing", "fallback"), "fallback");
    }

    #[test]
    fn malformed_paths_are_absent() {
        let store = ConfigStore::from_yaml_str("a:\n  b: 1\n").unwrap();
        assert_eq!(store.get_string(""), None);
        assert_eq!(store.get_string("a..b"), None);
        assert_eq!(store.get_string(".a"), None);
    }

    #[test]
    fn set_rejects_malformed_path() {
        let mut store = ConfigStore::from_yaml_str("").unwrap();
        assert!(matches!(
            store.set("spawns.", "x"),
            Err(ConfigError::InvalidPath(_))
        ));
    }

    #[test]
    fn set_replaces_scalar_parent_with_mapping() {
        let mut store = ConfigStore::from_yaml_str("spawns: nope\n").unwrap();
        store.set("spawns.world", "1,2,3").unwrap();
        assert_eq!(store.get_string("spawns.world").as_deref(), Some("1,2,3"));
    }

    #[test]
    fn string_lists() {
        let store = ConfigStore::from_yaml_str("l:\n  - a\n  - 2\n  - {x: 1}\n").unwrap();
        assert_eq!(store.get_string_list("l"), vec!["a".to_string(), "2".to_string()]);
        assert!(store.get_string_list("missing").is_empty());
    }

    #[test]
    fn remove_deletes_from_file_tree() {
        let mut store = ConfigStore::from_yaml_str("spawns:\n  world: 1,2,3\n").unwrap();
        assert!(store.remove("spawns.world").is_some());
        assert_eq!(store.get_string("spawns.world"), None);
    }

    #[test]
    fn detached_store_cannot_save() {
        let store = ConfigStore::from_yaml_str("a: 1\n").unwrap();
        assert!(matches!(store.save(), Err(ConfigError::Detached)));
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        assert!(matches!(
            ConfigStore::from_yaml_str("- a\n- b\n"),
            Err(ConfigError::NotAMapping)
        ));
    }
}
