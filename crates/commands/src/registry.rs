use std::collections::BTreeMap;
use std::sync::Arc;
use worldlink_common::PlayerRef;

use crate::command::{Command, CommandError};

/// Commands by name and alias.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the command's name and every alias. A later
    /// registration for the same label replaces the earlier one.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        for label in std::iter::once(command.name()).chain(command.aliases().iter().copied()) {
            if self
                .commands
                .insert(label.to_ascii_lowercase(), Arc::clone(&command))
                .is_some()
            {
                tracing::warn!(label, "command label registered twice, replacing");
            }
        }
        tracing::debug!(command = command.name(), "command registered");
    }

    pub fn unregister_all(&mut self) {
        self.commands.clear();
    }

    pub fn get(&self, label: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(&label.to_ascii_lowercase())
    }

    /// Registered labels, names and aliases alike.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run a raw command line (`/tpworld nether` or `tpworld nether`) for `player`.
    pub fn dispatch(&self, player: &PlayerRef, line: &str) -> Result<(), CommandError> {
        let mut parts = line.trim().trim_start_matches('/').split_whitespace();
        let label = parts.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = parts.collect();
        let command = self
            .get(label)
            .ok_or_else(|| CommandError::Unknown(label.to_string()))?;
        tracing::debug!(player = %player.name, command = command.name(), ?args, "running command");
        command.execute(player, &args)
    }

    /// Suggestions for a partially typed command line.
    pub fn complete(&self, line: &str) -> Vec<String> {
        let line = line.trim_start().trim_start_matches('/');
        let mut parts: Vec<&str> = line.split_whitespace().collect();
        if line.ends_with(char::is_whitespace) {
            parts.push("");
        }
        match parts.as_slice() {
            [] => self.labels().map(str::to_string).collect(),
            [prefix] => {
                let prefix = prefix.to_ascii_lowercase();
                self.labels()
                    .filter(|l| l.starts_with(&prefix))
                    .map(str::to_string)
                    .collect()
            }
            [label, args @ ..] => self
                .get(label)
                .map(|c| c.complete(args))
                .unwrap_or_default(),
        }
    }
}
