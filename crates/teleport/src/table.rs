use std::collections::BTreeMap;
use worldlink_common::WorldTarget;
use worldlink_config::ConfigReader;

/// Binding of each world identifier to the folder name the server uses.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldTable {
    folders: BTreeMap<WorldTarget, String>,
}

impl WorldTable {
    /// `world`, `world_nether`, `world_the_end`.
    pub fn vanilla() -> Self {
        Self {
            folders: WorldTarget::ALL
                .into_iter()
                .map(|t| (t, t.default_folder().to_string()))
                .collect(),
        }
    }

    /// Vanilla bindings with `worlds.<identifier>` overrides from the configuration.
    /// Blank overrides are ignored.
    pub fn from_config(config: &dyn ConfigReader) -> Self {
        let mut table = Self::vanilla();
        for target in WorldTarget::ALL {
            let path = format!("worlds.{}", target.config_key());
            if let Some(folder) = config.get_string(&path) {
                let folder = folder.trim();
                if folder.is_empty() {
                    continue;
                }
                tracing::info!(world = %target, folder, "world folder overridden");
                table.folders.insert(target, folder.to_string());
            }
        }
        table
    }

    pub fn folder(&self, target: WorldTarget) -> &str {
        self.folders
            .get(&target)
            .map(String::as_str)
            .unwrap_or_else(|| target.default_folder())
    }

    /// Identifier bound to a folder name.
    pub fn target_for_folder(&self, folder: &str) -> Option<WorldTarget> {
        self.folders
            .iter()
            .find(|(_, f)| f.as_str() == folder)
            .map(|(t, _)| *t)
    }

    /// Parse a command argument: a symbolic name in any case, or a bound folder name.
    pub fn parse_target(&self, input: &str) -> Option<WorldTarget> {
        input
            .parse::<WorldTarget>()
            .ok()
            .or_else(|| self.target_for_folder(input.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorldTarget, &str)> {
        self.folders.iter().map(|(t, f)| (*t, f.as_str()))
    }
}

impl Default for WorldTable {
    fn default() -> Self {
        Self::vanilla()
    }
}
