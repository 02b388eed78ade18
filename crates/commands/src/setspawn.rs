use std::sync::Arc;
use worldlink_common::PlayerRef;
use worldlink_config::ConfigWriter;
use worldlink_kernel::SharedServer;
use worldlink_messages::MessageRenderer;
use worldlink_teleport::{format_spawn_entry, spawn_path};

use crate::command::{Command, CommandError};

/// `/setworldspawn`: store the sender's position as the spawn of their world.
pub struct SetWorldSpawnCommand {
    config: Arc<dyn ConfigWriter>,
    server: SharedServer,
    messages: Arc<dyn MessageRenderer>,
}

impl SetWorldSpawnCommand {
    pub fn new(
        config: Arc<dyn ConfigWriter>,
        server: SharedServer,
        messages: Arc<dyn MessageRenderer>,
    ) -> Self {
        Self {
            config,
            server,
            messages,
        }
    }
}

impl Command for SetWorldSpawnCommand {
    fn name(&self) -> &'static str {
        "setworldspawn"
    }

    fn description(&self) -> &'static str {
        "Set the spawn of your current world to where you stand."
    }

    fn execute(&self, player: &PlayerRef, _args: &[&str]) -> Result<(), CommandError> {
        let location = self
            .server
            .location_of(player)
            .ok_or_else(|| CommandError::PlayerOffline(player.name.clone()))?;

        let coords = format_spawn_entry(&location.coordinate);
        self.config
            .set_string(&spawn_path(&location.world), &coords)?;
        if let Err(err) = self.config.persist() {
            tracing::error!(world = %location.world, error = %err, "failed to save config");
        }
        tracing::info!(player = %player.name, world = %location.world, %coords, "world spawn set");

        self.messages.send(
            player,
            "set-spawn",
            &[("world", location.world.as_str()), ("coords", coords.as_str())],
        );
        Ok(())
    }
}
