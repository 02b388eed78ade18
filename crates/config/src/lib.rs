//! Configuration: YAML file, dotted-path lookups, bundled defaults.
//!
//! # Invariants
//! - Consumers receive configuration through the `ConfigReader` / `ConfigWriter`
//!   capabilities; there is no process-wide configuration singleton.
//! - A missing or malformed value never panics; it reads as absent.

mod store;

pub use store::{ConfigError, ConfigStore};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Read access to string values by dotted path.
pub trait ConfigReader: Send + Sync {
    fn get_string(&self, path: &str) -> Option<String>;
}

/// Write access: set a string value and persist the tree.
pub trait ConfigWriter: ConfigReader {
    fn set_string(&self, path: &str, value: &str) -> Result<(), ConfigError>;
    fn persist(&self) -> Result<(), ConfigError>;
}

impl ConfigReader for ConfigStore {
    fn get_string(&self, path: &str) -> Option<String> {
        ConfigStore::get_string(self, path)
    }
}

/// A `ConfigStore` shared between services.
#[derive(Debug, Clone)]
pub struct SharedConfig(Arc<RwLock<ConfigStore>>);

impl SharedConfig {
    pub fn new(store: ConfigStore) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ConfigStore> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ConfigStore> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConfigReader for SharedConfig {
    fn get_string(&self, path: &str) -> Option<String> {
        self.read().get_string(path)
    }
}

impl ConfigWriter for SharedConfig {
    fn set_string(&self, path: &str, value: &str) -> Result<(), ConfigError> {
        self.write().set(path, value)
    }

    fn persist(&self) -> Result<(), ConfigError> {
        self.read().save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_config_reads_and_writes() {
        let shared = SharedConfig::new(ConfigStore::from_yaml_str("spawns: {}\n").unwrap());
        assert_eq!(shared.get_string("spawns.world"), None);

        shared.set_string("spawns.world", "1,2,3").unwrap();
        assert_eq!(shared.get_string("spawns.world").as_deref(), Some("1,2,3"));

        let clone = shared.clone();
        assert_eq!(clone.get_string("spawns.world").as_deref(), Some("1,2,3"));
    }

    #[test]
    fn shared_config_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let shared = SharedConfig::new(ConfigStore::open(&path, "spawns: {}\n").unwrap());

        shared.set_string("spawns.world_nether", "0,70,0").unwrap();
        shared.persist().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("world_nether"));
    }

    #[test]
    fn detached_shared_config_fails_to_persist() {
        let shared = SharedConfig::new(ConfigStore::from_yaml_str("").unwrap());
        assert!(matches!(shared.persist(), Err(ConfigError::Detached)));
    }
}
