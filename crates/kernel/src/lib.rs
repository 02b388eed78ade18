//! Server kernel: authoritative state for loaded worlds and online players.
//!
//! # Invariants
//! - All state mutations flow through explicit operations; only current state is kept.
//! - Relocation only targets loaded worlds and online players.
//! - `SharedServer` is the only handle other threads get; it serializes access.

mod server;
mod shared;

pub use server::{PlayerData, Server, WorldData};
pub use shared::SharedServer;
