use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle to a player: stable id plus the display name used in logs and messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
        }
    }
}

/// A point in a world a player can stand at: position plus view orientation.
///
/// Always fully populated. Orientation defaults to (0.0, 0.0) when a source
/// does not carry one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCoordinate {
    pub position: DVec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl SpawnCoordinate {
    pub const fn new(x: f64, y: f64, z: f64, yaw: f32, pitch: f32) -> Self {
        Self {
            position: DVec3::new(x, y, z),
            yaw,
            pitch,
        }
    }

    /// Coordinate at `position` looking straight ahead.
    pub const fn at(position: DVec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Default for SpawnCoordinate {
    fn default() -> Self {
        Self::at(DVec3::ZERO)
    }
}

impl fmt::Display for SpawnCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}) yaw={:.2} pitch={:.2}",
            self.position.x, self.position.y, self.position.z, self.yaw, self.pitch
        )
    }
}

/// A coordinate bound to the world folder it lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub coordinate: SpawnCoordinate,
}

impl Location {
    pub fn new(world: impl Into<String>, coordinate: SpawnCoordinate) -> Self {
        Self {
            world: world.into(),
            coordinate,
        }
    }
}

/// The fixed set of worlds players may teleport to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorldTarget {
    Overworld,
    Nether,
    TheEnd,
}

impl WorldTarget {
    pub const ALL: [WorldTarget; 3] = [Self::Overworld, Self::Nether, Self::TheEnd];

    /// Symbolic name shown to players, e.g. `NETHER`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Overworld => "OVERWORLD",
            Self::Nether => "NETHER",
            Self::TheEnd => "THE_END",
        }
    }

    /// Folder name the server uses for this world unless the world table overrides it.
    pub fn default_folder(self) -> &'static str {
        match self {
            Self::Overworld => "world",
            Self::Nether => "world_nether",
            Self::TheEnd => "world_the_end",
        }
    }

    /// Lowercase key used under `worlds.<key>` in the configuration.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Nether => "nether",
            Self::TheEnd => "the_end",
        }
    }
}

impl fmt::Display for WorldTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a command argument names no known world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown world '{0}'")]
pub struct UnknownWorldTarget(pub String);

impl FromStr for WorldTarget {
    type Err = UnknownWorldTarget;

    /// Accepts the symbolic name in any case (`nether`, `THE_END`, `the-end`)
    /// or the default folder name (`world_nether`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.config_key() == normalized || t.default_folder() == normalized)
            .ok_or_else(|| UnknownWorldTarget(s.to_string()))
    }
}

/// How a teleport attempt concluded. Exactly one per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeleportOutcome {
    Success,
    WorldNotFound,
    LocationUnsafe,
    GenericFailure,
}

impl TeleportOutcome {
    pub const ALL: [TeleportOutcome; 4] = [
        Self::Success,
        Self::WorldNotFound,
        Self::LocationUnsafe,
        Self::GenericFailure,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_uniqueness() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn spawn_coordinate_default_is_origin_without_orientation() {
        let c = SpawnCoordinate::default();
        assert_eq!(c.position, DVec3::ZERO);
        assert_eq!(c.yaw, 0.0);
        assert_eq!(c.pitch, 0.0);
    }

    #[test]
    fn world_target_folders_are_distinct() {
        let folders: std::collections::HashSet<_> =
            WorldTarget::ALL.iter().map(|t| t.default_folder()).collect();
        assert_eq!(folders.len(), WorldTarget::ALL.len());
    }

    #[test]
    fn world_target_parses_names_case_insensitively() {
        assert_eq!("nether".parse::<WorldTarget>(), Ok(WorldTarget::Nether));
        assert_eq!("THE_END".parse::<WorldTarget>(), Ok(WorldTarget::TheEnd));
        assert_eq!("the-end".parse::<WorldTarget>(), Ok(WorldTarget::TheEnd));
        assert_eq!("Overworld".parse::<WorldTarget>(), Ok(WorldTarget::Overworld));
    }

    #[test]
    fn world_target_parses_folder_names() {
        assert_eq!(
            "world_nether".parse::<WorldTarget>(),
            Ok(WorldTarget::Nether)
        );
        assert_eq!("world".parse::<WorldTarget>(), Ok(WorldTarget::Overworld));
    }

    #[test]
    fn world_target_rejects_unknown() {
        let err = "aether".parse::<WorldTarget>().unwrap_err();
        assert_eq!(err, UnknownWorldTarget("aether".into()));
    }

    #[test]
    fn spawn_coordinate_display() {
        let c = SpawnCoordinate::new(1.5, 64.0, -2.5, 90.0, 0.0);
        assert_eq!(c.to_string(), "(1.500, 64.000, -2.500) yaw=90.00 pitch=0.00");
    }
}
