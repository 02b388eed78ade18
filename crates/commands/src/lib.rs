//! Player commands and the plugin lifecycle.
//!
//! # Invariants
//! - Commands run on the main thread; teleports run on the async runtime and
//!   report back through the main-thread queue.
//! - Every accepted `/tpworld` produces a `teleporting` message followed by
//!   exactly one result message.

mod command;
mod plugin;
mod registry;
mod setspawn;
mod tpworld;

pub use command::{Command, CommandError};
pub use plugin::{CONFIG_FILE, DEFAULT_CONFIG, PluginError, WorldLink};
pub use registry::CommandRegistry;
pub use setspawn::SetWorldSpawnCommand;
pub use tpworld::WorldTpCommand;
