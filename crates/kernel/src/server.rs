use std::collections::BTreeMap;
use worldlink_common::{Location, PlayerId, PlayerRef, SpawnCoordinate};

/// Per-world data.
#[derive(Debug, Clone)]
pub struct WorldData {
    pub default_spawn: SpawnCoordinate,
    pub loaded: bool,
}

/// Per-player data.
#[derive(Debug, Clone)]
pub struct PlayerData {
    pub name: String,
    pub location: Location,
    /// Chat lines delivered to this player, oldest first.
    pub inbox: Vec<String>,
}

/// The authoritative server state: worlds and online players.
///
/// Holds current state only; past moves are not retained. Uses BTreeMap for
/// deterministic iteration order.
#[derive(Debug, Clone, Default)]
pub struct Server {
    worlds: BTreeMap<String, WorldData>,
    players: BTreeMap<PlayerId, PlayerData>,
}

impl Server {
    /// Create a server with no worlds and no players.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a server with the three vanilla worlds loaded.
    pub fn with_vanilla_worlds() -> Self {
        let mut server = Self::new();
        server.load_world("world", SpawnCoordinate::new(0.5, 64.0, 0.5, 0.0, 0.0));
        server.load_world(
            "world_nether",
            SpawnCoordinate::new(0.5, 70.0, 0.5, 0.0, 0.0),
        );
        server.load_world(
            "world_the_end",
            SpawnCoordinate::new(100.5, 49.0, 0.5, 90.0, 0.0),
        );
        server
    }

    /// Load (or reload) a world with its built-in spawn.
    pub fn load_world(&mut self, name: impl Into<String>, default_spawn: SpawnCoordinate) {
        let name = name.into();
        tracing::info!(world = %name, spawn = %default_spawn, "world loaded");
        self.worlds.insert(
            name,
            WorldData {
                default_spawn,
                loaded: true,
            },
        );
    }

    /// Mark a world unloaded. Returns false if it was not loaded.
    pub fn unload_world(&mut self, name: &str) -> bool {
        match self.worlds.get_mut(name) {
            Some(world) if world.loaded => {
                world.loaded = false;
                tracing::info!(world = name, "world unloaded");
                true
            }
            _ => false,
        }
    }

    /// A loaded world by folder name.
    pub fn world(&self, name: &str) -> Option<&WorldData> {
        self.worlds.get(name).filter(|w| w.loaded)
    }

    /// Folder names of loaded worlds.
    pub fn loaded_worlds(&self) -> impl Iterator<Item = &str> {
        self.worlds
            .iter()
            .filter(|(_, w)| w.loaded)
            .map(|(name, _)| name.as_str())
    }

    /// Connect a player at a location.
    pub fn join(&mut self, player: PlayerRef, location: Location) {
        tracing::debug!(player = %player.name, world = %location.world, "player joined");
        self.players.insert(
            player.id,
            PlayerData {
                name: player.name,
                location,
                inbox: Vec::new(),
            },
        );
    }

    /// Connect a player at the default spawn of a loaded world.
    pub fn join_at_spawn(&mut self, player: PlayerRef, world: &str) -> bool {
        let Some(spawn) = self.world(world).map(|w| w.default_spawn) else {
            return false;
        };
        self.join(player, Location::new(world, spawn));
        true
    }

    /// Disconnect a player. Returns the data if they were online.
    pub fn leave(&mut self, id: PlayerId) -> Option<PlayerData> {
        self.players.remove(&id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerData> {
        self.players.get(&id)
    }

    /// Look up an online player by name, case-insensitively.
    pub fn find_player(&self, name: &str) -> Option<PlayerRef> {
        self.players
            .iter()
            .find(|(_, p)| p.name.eq_ignore_ascii_case(name))
            .map(|(id, p)| PlayerRef {
                id: *id,
                name: p.name.clone(),
            })
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Move a player. Returns false when the player is offline or the target
    /// world is not loaded.
    pub fn relocate(&mut self, id: PlayerId, to: Location) -> bool {
        if self.world(&to.world).is_none() {
            return false;
        }
        let Some(player) = self.players.get_mut(&id) else {
            return false;
        };
        tracing::debug!(player = %player.name, world = %to.world, "player relocated");
        player.location = to;
        true
    }

    /// Append a chat line to an online player's inbox.
    pub fn deliver(&mut self, id: PlayerId, line: impl Into<String>) -> bool {
        match self.players.get_mut(&id) {
            Some(player) => {
                player.inbox.push(line.into());
                true
            }
            None => false,
        }
    }
}
