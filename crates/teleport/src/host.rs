//! Capabilities the teleport pipeline needs from the game server, and their
//! bindings to the in-process `SharedServer`.

use std::future::Future;
use std::pin::Pin;
use worldlink_common::{Location, PlayerRef, SpawnCoordinate};
use worldlink_kernel::SharedServer;

/// A loaded world as seen at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldRef {
    pub name: String,
    pub default_spawn: SpawnCoordinate,
}

/// Lookup of live worlds by folder name.
pub trait WorldRegistry: Send + Sync {
    fn find_world(&self, name: &str) -> Option<WorldRef>;

    /// Built-in spawn of a world.
    fn default_spawn(&self, world: &WorldRef) -> SpawnCoordinate {
        world.default_spawn
    }
}

/// Errors a relocation primitive can fault with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelocationError {
    #[error("destination chunk failed to load: {0}")]
    ChunkLoad(String),
}

/// Pending relocation. `Ok(false)` means the move was refused without a fault.
pub type RelocationFuture = Pin<Box<dyn Future<Output = Result<bool, RelocationError>> + Send>>;

/// The operation that physically moves a player.
pub trait Relocator: Send + Sync {
    fn relocate(&self, player: &PlayerRef, destination: Location) -> RelocationFuture;
}

impl WorldRegistry for SharedServer {
    fn find_world(&self, name: &str) -> Option<WorldRef> {
        self.lock().world(name).map(|w| WorldRef {
            name: name.to_string(),
            default_spawn: w.default_spawn,
        })
    }
}

/// A destination world unloaded since lookup faults with `ChunkLoad`; an
/// offline player is refused with `Ok(false)`.
impl Relocator for SharedServer {
    fn relocate(&self, player: &PlayerRef, destination: Location) -> RelocationFuture {
        let server = self.clone();
        let id = player.id;
        Box::pin(async move {
            server.with(|s| {
                if s.world(&destination.world).is_none() {
                    return Err(RelocationError::ChunkLoad(format!(
                        "world '{}' is not loaded",
                        destination.world
                    )));
                }
                Ok(s.relocate(id, destination))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldlink_kernel::Server;

    #[test]
    fn shared_server_finds_loaded_worlds_only() {
        let server = SharedServer::new(Server::with_vanilla_worlds());
        let nether = server.find_world("world_nether").unwrap();
        assert_eq!(nether.name, "world_nether");
        assert_eq!(server.default_spawn(&nether), nether.default_spawn);

        server.with(|s| s.unload_world("world_nether"));
        assert!(server.find_world("world_nether").is_none());
        assert!(server.find_world("world_aether").is_none());
    }

    #[test]
    fn shared_server_relocates_online_player() {
        let server = SharedServer::new(Server::with_vanilla_worlds());
        let steve = PlayerRef::new("Steve");
        server.with(|s| s.join_at_spawn(steve.clone(), "world"));

        let to = Location::new("world_the_end", SpawnCoordinate::new(5.5, 60.0, 5.5, 0.0, 0.0));
        let moved = pollster::block_on(server.relocate(&steve, to.clone()));
        assert_eq!(moved, Ok(true));
        assert_eq!(server.location_of(&steve), Some(to));
    }

    #[test]
    fn shared_server_faults_when_destination_world_is_gone() {
        let server = SharedServer::new(Server::with_vanilla_worlds());
        let steve = PlayerRef::new("Steve");
        server.with(|s| s.join_at_spawn(steve.clone(), "world"));
        server.with(|s| s.unload_world("world_nether"));

        let to = Location::new("world_nether", SpawnCoordinate::default());
        let result = pollster::block_on(server.relocate(&steve, to));
        assert!(matches!(
            result,
            Err(RelocationError::ChunkLoad(msg)) if msg.contains("world_nether")
        ));
        assert_eq!(server.location_of(&steve).unwrap().world, "world");
    }

    #[test]
    fn shared_server_refuses_offline_player() {
        let server = SharedServer::new(Server::with_vanilla_worlds());
        let ghost = PlayerRef::new("Ghost");
        let to = Location::new("world", SpawnCoordinate::default());
        assert_eq!(pollster::block_on(server.relocate(&ghost, to)), Ok(false));
    }
}
