//! Spawn entries: `spawns.<world>` = `x,y,z` or `x,y,z,yaw,pitch`.
//!
//! Parsed coordinates are centred on their block: x and z get +0.5, y is
//! used as-is. A malformed entry is never an error for the caller; it logs
//! one warning and the world's built-in spawn is used instead.

use std::sync::Arc;
use worldlink_common::SpawnCoordinate;
use worldlink_config::ConfigReader;

use crate::host::WorldRegistry;

/// Offset applied to x and z so a player lands in the middle of a block.
pub const BLOCK_CENTER_OFFSET: f64 = 0.5;

/// Why a spawn entry could not be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpawnParseError {
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),
    #[error("field {field} ('{value}') is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("field {field} ('{value}') is out of range")]
    OutOfRange { field: &'static str, value: String },
}

/// Config path holding the spawn entry of a world.
pub fn spawn_path(world_name: &str) -> String {
    format!("spawns.{world_name}")
}

/// Resolve the spawn of `world_name` from its raw entry.
///
/// - world not loaded: `None`
/// - entry absent: `default_spawn`
/// - entry malformed or blank: `default_spawn`, after one warning
/// - otherwise the parsed, block-centred coordinate
pub fn resolve(
    world_name: &str,
    raw_entry: Option<&str>,
    world_is_loaded: bool,
    default_spawn: SpawnCoordinate,
) -> Option<SpawnCoordinate> {
    if !world_is_loaded {
        return None;
    }
    let Some(raw) = raw_entry else {
        return Some(default_spawn);
    };
    match parse_spawn_entry(raw) {
        Ok(coordinate) => Some(coordinate),
        Err(err) => {
            tracing::warn!(
                world = world_name,
                entry = raw,
                error = %err,
                "invalid spawn entry in config, using world default"
            );
            Some(default_spawn)
        }
    }
}

/// Parse `x,y,z[,yaw,pitch]` into a block-centred coordinate.
///
/// Fields are trimmed. Trailing empty fields are dropped, so `1,2,3,` reads
/// as three fields. With four fields the fourth is ignored and orientation
/// stays (0.0, 0.0).
pub fn parse_spawn_entry(raw: &str) -> Result<SpawnCoordinate, SpawnParseError> {
    let mut fields: Vec<&str> = raw.split(',').collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.len() < 3 {
        return Err(SpawnParseError::TooFewFields(fields.len()));
    }

    let x: f64 = parse_field("x", fields[0])?;
    let y: f64 = parse_field("y", fields[1])?;
    let z: f64 = parse_field("z", fields[2])?;

    let (yaw, pitch) = if fields.len() >= 5 {
        (
            parse_field::<f32>("yaw", fields[3])?,
            parse_field::<f32>("pitch", fields[4])?,
        )
    } else {
        (0.0, 0.0)
    };

    Ok(SpawnCoordinate::new(
        x + BLOCK_CENTER_OFFSET,
        y,
        z + BLOCK_CENTER_OFFSET,
        yaw,
        pitch,
    ))
}

/// Render a coordinate the way `/setworldspawn` stores it: six decimals for
/// position, two for orientation.
pub fn format_spawn_entry(coordinate: &SpawnCoordinate) -> String {
    let p = coordinate.position;
    format!(
        "{:.6},{:.6},{:.6},{:.2},{:.2}",
        p.x, p.y, p.z, coordinate.yaw, coordinate.pitch
    )
}

trait Finite {
    fn finite(&self) -> bool;
}

impl Finite for f64 {
    fn finite(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for f32 {
    fn finite(&self) -> bool {
        self.is_finite()
    }
}

fn parse_field<T>(field: &'static str, text: &str) -> Result<T, SpawnParseError>
where
    T: std::str::FromStr + Finite,
{
    let value: T = text
        .trim()
        .parse()
        .map_err(|_| SpawnParseError::NotANumber {
            field,
            value: text.to_string(),
        })?;
    if !value.finite() {
        return Err(SpawnParseError::OutOfRange {
            field,
            value: text.to_string(),
        });
    }
    Ok(value)
}

/// Reads spawn entries from the configuration and world defaults from the registry.
#[derive(Clone)]
pub struct SpawnResolver {
    config: Arc<dyn ConfigReader>,
    registry: Arc<dyn WorldRegistry>,
}

impl SpawnResolver {
    pub fn new(config: Arc<dyn ConfigReader>, registry: Arc<dyn WorldRegistry>) -> Self {
        Self { config, registry }
    }

    /// Spawn for a world folder, or `None` when the world is not loaded.
    /// A fresh coordinate is computed on every call.
    pub fn spawn_location(&self, world_name: &str) -> Option<SpawnCoordinate> {
        let raw = self.config.get_string(&spawn_path(world_name));
        let world = self.registry.find_world(world_name);
        let default_spawn = world
            .as_ref()
            .map(|w| self.registry.default_spawn(w))
            .unwrap_or_default();
        resolve(world_name, raw.as_deref(), world.is_some(), default_spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::WorldRef;
    use crate::test_support::count_warnings;
    use worldlink_config::ConfigStore;

    const DEFAULT: SpawnCoordinate = SpawnCoordinate::new(0.5, 64.0, 0.5, 0.0, 0.0);

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn three_fields_get_centred_without_orientation() {
        let c = resolve("world", Some("10,64,-3"), true, DEFAULT).unwrap();
        assert_eq!(c, SpawnCoordinate::new(10.5, 64.0, -2.5, 0.0, 0.0));
    }

    #[test]
    fn five_fields_keep_orientation_exactly() {
        let c = resolve("world", Some("1,2,3,-45.25,12.5"), true, DEFAULT).unwrap();
        assert_eq!(c.yaw, -45.25);
        assert_eq!(c.pitch, 12.5);
        assert_eq!(c.position.x, 1.5);
        assert_eq!(c.position.y, 2.0);
        assert_eq!(c.position.z, 3.5);
    }

    #[test]
    fn stored_entry_resolves_to_expected_coordinate() {
        let c = resolve(
            "world",
            Some("100.123456,65.000000,-40.500000,90.00,0.00"),
            true,
            DEFAULT,
        )
        .unwrap();
        assert!(approx(c.position.x, 100.623456));
        assert_eq!(c.position.y, 65.0);
        assert_eq!(c.position.z, -40.0);
        assert_eq!(c.yaw, 90.0);
        assert_eq!(c.pitch, 0.0);
    }

    #[test]
    fn offset_holds_across_many_values() {
        for i in -50..50 {
            let x = i as f64 * 3.25;
            let z = i as f64 * -7.5;
            let raw = format!("{x},70,{z}");
            let c = parse_spawn_entry(&raw).unwrap();
            assert!(approx(c.position.x - x, 0.5), "x for {raw}");
            assert!(approx(c.position.z - z, 0.5), "z for {raw}");
            assert_eq!((c.yaw, c.pitch), (0.0, 0.0));
        }
    }

    #[test]
    fn four_fields_ignore_the_fourth() {
        let c = parse_spawn_entry("1,2,3,90").unwrap();
        assert_eq!((c.yaw, c.pitch), (0.0, 0.0));
    }

    #[test]
    fn whitespace_around_fields_is_accepted() {
        let c = parse_spawn_entry(" 1 , 2 ,3 , 10, 20 ").unwrap();
        assert_eq!(c, SpawnCoordinate::new(1.5, 2.0, 3.5, 10.0, 20.0));
    }

    #[test]
    fn trailing_empty_fields_are_dropped() {
        let c = parse_spawn_entry("1,2,3,,").unwrap();
        assert_eq!(c, SpawnCoordinate::new(1.5, 2.0, 3.5, 0.0, 0.0));
    }

    #[test]
    fn parse_errors_are_specific() {
        assert_eq!(
            parse_spawn_entry("1,2"),
            Err(SpawnParseError::TooFewFields(2))
        );
        assert!(matches!(
            parse_spawn_entry("a,b,c"),
            Err(SpawnParseError::NotANumber { field: "x", .. })
        ));
        assert!(matches!(
            parse_spawn_entry("1,2,3,north,0"),
            Err(SpawnParseError::NotANumber { field: "yaw", .. })
        ));
        assert!(matches!(
            parse_spawn_entry("1,inf,3"),
            Err(SpawnParseError::OutOfRange { field: "y", .. })
        ));
        assert!(matches!(
            parse_spawn_entry("1,2,3,1e40,0"),
            Err(SpawnParseError::OutOfRange { field: "yaw", .. })
        ));
    }

    #[test]
    fn malformed_entries_fall_back_with_one_warning() {
        for raw in ["1,2", "a,b,c", " , , ", "1,2,NaN", "1;2;3", "", "   "] {
            let (resolved, warnings) =
                count_warnings(|| resolve("world", Some(raw), true, DEFAULT));
            assert_eq!(resolved, Some(DEFAULT), "entry {raw:?}");
            assert_eq!(warnings, 1, "entry {raw:?}");
        }
    }

    #[test]
    fn absent_entry_uses_default_silently() {
        let (resolved, warnings) = count_warnings(|| resolve("world", None, true, DEFAULT));
        assert_eq!(resolved, Some(DEFAULT));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn unloaded_world_resolves_to_nothing() {
        assert_eq!(resolve("world", Some("1,2,3"), false, DEFAULT), None);
        assert_eq!(resolve("world", None, false, DEFAULT), None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve("world", Some("3.5,80,-1.25,45,10"), true, DEFAULT);
        let b = resolve("world", Some("3.5,80,-1.25,45,10"), true, DEFAULT);
        assert_eq!(a, b);
    }

    #[test]
    fn format_uses_fixed_precision() {
        let c = SpawnCoordinate::new(100.123456, 65.0, -40.5, 90.0, 0.0);
        assert_eq!(
            format_spawn_entry(&c),
            "100.123456,65.000000,-40.500000,90.00,0.00"
        );
    }

    struct OneWorld;

    impl WorldRegistry for OneWorld {
        fn find_world(&self, name: &str) -> Option<WorldRef> {
            (name == "world").then(|| WorldRef {
                name: name.into(),
                default_spawn: DEFAULT,
            })
        }
    }

    fn resolver(yaml: &str) -> SpawnResolver {
        SpawnResolver::new(
            Arc::new(ConfigStore::from_yaml_str(yaml).unwrap()),
            Arc::new(OneWorld),
        )
    }

    #[test]
    fn resolver_reads_config_entry() {
        let r = resolver("spawns:\n  world: '8,70,8,180,0'\n");
        assert_eq!(
            r.spawn_location("world"),
            Some(SpawnCoordinate::new(8.5, 70.0, 8.5, 180.0, 0.0))
        );
    }

    #[test]
    fn resolver_uses_default_without_entry() {
        let r = resolver("spawns: {}\n");
        assert_eq!(r.spawn_location("world"), Some(DEFAULT));
    }

    #[test]
    fn resolver_returns_nothing_for_missing_world() {
        let r = resolver("spawns:\n  world_nether: '1,2,3'\n");
        assert_eq!(r.spawn_location("world_nether"), None);
    }
}
