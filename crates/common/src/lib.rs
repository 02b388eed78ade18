//! Shared value types for WorldLink.
//!
//! # Invariants
//! - `SpawnCoordinate` is always fully populated; there is no partial coordinate.
//! - `WorldTarget` and `TeleportOutcome` are closed sets. Matching on them is exhaustive.

mod types;

pub use types::{
    Location, PlayerId, PlayerRef, SpawnCoordinate, TeleportOutcome, UnknownWorldTarget,
    WorldTarget,
};
