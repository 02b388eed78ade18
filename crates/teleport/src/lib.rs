//! Teleport pipeline: resolve a world's spawn, relocate the player
//! asynchronously, report one outcome.
//!
//! # Invariants
//! - A teleport future completes exactly once with exactly one `TeleportOutcome`.
//! - Spawn parse failures degrade to the world default; they never reach the caller.
//! - Relocation faults are logged and become `GenericFailure`; they are never rethrown.
//! - Outcome continuations run on the execution context the host designates.
//!
//! Control flow: command → `TeleportCoordinator::teleport_to_world` →
//! `SpawnResolver::spawn_location` → `Relocator::relocate` → outcome →
//! `ResultDispatcher::dispatch` → message renderer.

mod context;
mod coordinator;
mod dispatch;
mod host;
mod resolver;
mod table;

#[cfg(test)]
mod test_support;

pub use context::{ExecutionContext, InlineContext, MainThread, MainThreadQueue, Task};
pub use coordinator::TeleportCoordinator;
pub use dispatch::{ResultDispatcher, message_key};
pub use host::{RelocationError, RelocationFuture, Relocator, WorldRef, WorldRegistry};
pub use resolver::{
    BLOCK_CENTER_OFFSET, SpawnParseError, SpawnResolver, format_spawn_entry, parse_spawn_entry,
    resolve, spawn_path,
};
pub use table::WorldTable;
