use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use worldlink_common::{PlayerRef, TeleportOutcome, WorldTarget};
use worldlink_config::{ConfigError, ConfigStore, SharedConfig};
use worldlink_kernel::SharedServer;
use worldlink_messages::MessageService;
use worldlink_teleport::{MainThreadQueue, SpawnResolver, TeleportCoordinator, WorldTable};

use crate::command::CommandError;
use crate::registry::CommandRegistry;
use crate::setspawn::SetWorldSpawnCommand;
use crate::tpworld::WorldTpCommand;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.yml";

/// Configuration written on first start.
pub const DEFAULT_CONFIG: &str = include_str!("../resources/config.yml");

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("failed to load {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// The plugin: configuration, services and registered commands, bound to
/// one server and one async runtime.
pub struct WorldLink {
    config: SharedConfig,
    server: SharedServer,
    coordinator: TeleportCoordinator,
    teleport: Arc<WorldTpCommand>,
    commands: CommandRegistry,
    main_queue: MainThreadQueue,
}

impl WorldLink {
    /// Load `<data_dir>/config.yml` (writing the defaults if missing), build
    /// the services and register the commands.
    pub fn enable(
        data_dir: impl AsRef<Path>,
        server: SharedServer,
        runtime: Handle,
    ) -> Result<Self, PluginError> {
        let path = data_dir.as_ref().join(CONFIG_FILE);
        let store = ConfigStore::open(&path, DEFAULT_CONFIG)
            .map_err(|source| PluginError::Config { path, source })?;
        let config = SharedConfig::new(store);

        let main_queue = MainThreadQueue::new();
        let main_thread = Arc::new(main_queue.handle());
        let messages = Arc::new(MessageService::new(
            Arc::new(config.clone()),
            Arc::new(server.clone()),
        ));
        let registry = Arc::new(server.clone());
        let coordinator = TeleportCoordinator::new(
            WorldTable::from_config(&config),
            registry.clone(),
            registry.clone(),
            SpawnResolver::new(Arc::new(config.clone()), registry),
            main_thread.clone(),
        );

        let teleport = Arc::new(WorldTpCommand::new(
            coordinator.clone(),
            messages.clone(),
            main_thread,
            runtime,
        ));
        let mut commands = CommandRegistry::new();
        commands.register(teleport.clone());
        commands.register(Arc::new(SetWorldSpawnCommand::new(
            Arc::new(config.clone()),
            server.clone(),
            messages,
        )));

        tracing::info!(data_dir = %data_dir.as_ref().display(), "worldlink enabled");
        Ok(Self {
            config,
            server,
            coordinator,
            teleport,
            commands,
            main_queue,
        })
    }

    /// Unregister every command and run what is left on the main-thread queue.
    pub fn disable(&mut self) {
        self.commands.unregister_all();
        let ran = self.tick();
        tracing::info!(drained = ran, "worldlink disabled");
    }

    /// Run the tasks queued for the main thread. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        self.main_queue.run_pending()
    }

    /// Keep running main-thread tasks until none arrives for `quiet`.
    pub async fn run_until_quiet(&mut self, quiet: Duration) -> usize {
        let mut ran = 0;
        while let Ok(true) = tokio::time::timeout(quiet, self.main_queue.run_next()).await {
            ran += 1;
        }
        ran
    }

    /// Run a raw command line for `player`.
    pub fn dispatch(&self, player: &PlayerRef, line: &str) -> Result<(), CommandError> {
        self.commands.dispatch(player, line)
    }

    /// Start a teleport as `/tpworld` would, bypassing argument parsing.
    pub fn teleport(&self, player: &PlayerRef, target: WorldTarget) -> JoinHandle<TeleportOutcome> {
        self.teleport.start(player, target)
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn server(&self) -> &SharedServer {
        &self.server
    }

    pub fn coordinator(&self) -> &TeleportCoordinator {
        &self.coordinator
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }
}
