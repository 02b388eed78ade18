use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use worldlink_common::{PlayerRef, TeleportOutcome, WorldTarget};
use worldlink_messages::MessageRenderer;
use worldlink_teleport::{ExecutionContext, ResultDispatcher, TeleportCoordinator};

use crate::command::{Command, CommandError};

/// `/tpworld <world>`: teleport the sender to the spawn of a world.
pub struct WorldTpCommand {
    coordinator: TeleportCoordinator,
    dispatcher: ResultDispatcher,
    messages: Arc<dyn MessageRenderer>,
    main_thread: Arc<dyn ExecutionContext>,
    runtime: Handle,
}

impl WorldTpCommand {
    pub fn new(
        coordinator: TeleportCoordinator,
        messages: Arc<dyn MessageRenderer>,
        main_thread: Arc<dyn ExecutionContext>,
        runtime: Handle,
    ) -> Self {
        Self {
            coordinator,
            dispatcher: ResultDispatcher::new(Arc::clone(&messages)),
            messages,
            main_thread,
            runtime,
        }
    }

    /// Announce the teleport and run it on the runtime. The result message is
    /// sent from the main thread; the handle resolves once it is scheduled.
    pub fn start(&self, player: &PlayerRef, target: WorldTarget) -> JoinHandle<TeleportOutcome> {
        self.messages
            .send(player, "teleporting", &[("world", target.name())]);

        let pending = self.coordinator.teleport_to_world(Some(player), Some(target));
        let folder = self.coordinator.worlds().folder(target).to_string();
        let dispatcher = self.dispatcher.clone();
        let main_thread = Arc::clone(&self.main_thread);
        let player = player.clone();
        self.runtime.spawn(async move {
            let outcome = pending.await;
            tracing::debug!(player = %player.name, %target, ?outcome, "teleport finished");
            main_thread.execute(Box::new(move || {
                dispatcher.dispatch(&player, outcome, &folder);
            }));
            outcome
        })
    }

    fn world_names(&self) -> Vec<String> {
        WorldTarget::ALL
            .into_iter()
            .map(|t| t.name().to_ascii_lowercase())
            .collect()
    }
}

impl Command for WorldTpCommand {
    fn name(&self) -> &'static str {
        "tpworld"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["worldtp"]
    }

    fn description(&self) -> &'static str {
        "Teleport to the spawn of the overworld, the nether or the end."
    }

    fn execute(&self, player: &PlayerRef, args: &[&str]) -> Result<(), CommandError> {
        let Some(input) = args.first().copied() else {
            self.messages.send(player, "usage", &[("command", self.name())]);
            return Ok(());
        };
        let Some(target) = self.coordinator.worlds().parse_target(input) else {
            let worlds = self.world_names().join(", ");
            self.messages.send(
                player,
                "invalid-world",
                &[("input", input), ("worlds", worlds.as_str())],
            );
            return Ok(());
        };
        drop(self.start(player, target));
        Ok(())
    }

    fn complete(&self, args: &[&str]) -> Vec<String> {
        match args {
            [prefix] => {
                let prefix = prefix.to_ascii_lowercase();
                self.world_names()
                    .into_iter()
                    .filter(|w| w.starts_with(&prefix))
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}
