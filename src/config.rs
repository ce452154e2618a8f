//! Tuning configuration for the simulation
//!
//! Every constant the simulation depends on lives here: physics, cadences,
//! entity sizes, spawn ranges and the delays of the terminal sequences.
//! `GameConfig::default()` is the shipped tuning; a JSON file can
//! override any subset of fields (missing fields fall back to the defaults).
//!
//! # Example
//!
//! ```ignore
//! let config = GameConfig::load_from_file("assets/config/game.json")?;
//! let physics_period = config.physics.tick_period();
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Converts a rate in hertz into the period between two ticks.
pub fn period_from_hz(rate_hz: f64) -> Duration {
    Duration::from_secs_f64(1.0 / rate_hz.max(f64::EPSILON))
}

/// Gravity, ground and damage rules shared by every movable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// The y below which non-projectile entities cannot fall
    pub ground_y: f32,
    /// Subtracted from vertical velocity every physics tick
    pub gravity: f32,
    pub jump_velocity: f32,
    pub tick_hz: f64,
    pub hurt_window_ms: u64,
    /// Energy lost per `hit()`
    pub contact_damage: u8,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            ground_y: 132.5,
            gravity: 2.5,
            jump_velocity: 25.0,
            tick_hz: 25.0,
            hurt_window_ms: 1000,
            contact_damage: 5,
        }
    }
}

impl PhysicsConfig {
    pub fn tick_period(&self) -> Duration {
        period_from_hz(self.tick_hz)
    }

    pub fn hurt_window(&self) -> Duration {
        Duration::from_millis(self.hurt_window_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start_x: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Player may only walk left while `x` is greater than this
    pub left_limit: f32,
    /// Camera offset is `-x + camera_lead`
    pub camera_lead: f32,
    pub movement_hz: f64,
    pub animation_interval_ms: u64,
    pub long_idle_secs: u64,
    /// Vertical velocity given to the player after a stomp kill
    pub stomp_bounce: f32,
    pub death_frame_ms: u64,
    pub game_over_delay_ms: u64,
    pub restart_controls_delay_ms: u64,
    pub throw_offset_x: f32,
    pub throw_offset_y: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            start_x: 120.0,
            width: 120.0,
            height: 300.0,
            speed: 3.0,
            left_limit: -510.0,
            camera_lead: 100.0,
            movement_hz: 60.0,
            animation_interval_ms: 100,
            long_idle_secs: 10,
            stomp_bounce: 10.0,
            death_frame_ms: 100,
            game_over_delay_ms: 500,
            restart_controls_delay_ms: 1000,
            throw_offset_x: 100.0,
            throw_offset_y: 100.0,
        }
    }
}

/// Geometry and speed range of one roaming enemy variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoamerConfig {
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed_min: f32,
    pub speed_max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub normal: RoamerConfig,
    pub small: RoamerConfig,
    pub spawn_x_min: f32,
    pub spawn_x_max: f32,
    pub start_poll_ms: u64,
    pub movement_hz: f64,
    pub walk_frame_ms: u64,
    pub collect_delay_ms: u64,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        EnemyConfig {
            normal: RoamerConfig {
                y: 360.0,
                width: 70.0,
                height: 70.0,
                speed_min: 0.15,
                speed_max: 0.6,
            },
            small: RoamerConfig {
                y: 379.0,
                width: 50.0,
                height: 50.0,
                speed_min: 0.5,
                speed_max: 1.1,
            },
            spawn_x_min: 500.0,
            spawn_x_max: 2300.0,
            start_poll_ms: 100,
            movement_hz: 60.0,
            walk_frame_ms: 200,
            collect_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// The boss activates once the player's x exceeds this
    pub activation_x: f32,
    pub projectile_damage: u8,
    pub alert_frame_ms: u64,
    pub walk_tick_ms: u64,
    pub walk_frame_ms: u64,
    pub hurt_frame_ms: u64,
    pub hurt_duration_ms: u64,
    pub death_frame_ms: u64,
    pub finalize_delay_ms: u64,
}

impl Default for BossConfig {
    fn default() -> Self {
        BossConfig {
            x: 2250.0,
            y: 50.0,
            width: 200.0,
            height: 400.0,
            speed: 0.8,
            activation_x: 1800.0,
            projectile_damage: 20,
            alert_frame_ms: 250,
            walk_tick_ms: 4,
            walk_frame_ms: 200,
            hurt_frame_ms: 100,
            hurt_duration_ms: 1000,
            death_frame_ms: 300,
            finalize_delay_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub width: f32,
    pub height: f32,
    pub launch_velocity: f32,
    /// Horizontal distance covered per drift tick
    pub drift: f32,
    pub drift_interval_ms: u64,
    pub spin_interval_ms: u64,
    /// The y at which a projectile counts as landed
    pub ground_y: f32,
    pub splash_frame_ms: u64,
    /// Where a finished projectile is parked
    pub disposed_position: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        ProjectileConfig {
            width: 60.0,
            height: 60.0,
            launch_velocity: 30.0,
            drift: 10.0,
            drift_interval_ms: 25,
            spin_interval_ms: 100,
            ground_y: 380.5,
            splash_frame_ms: 10,
            disposed_position: -9999.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Maximum number of bottles held at once
    pub bottle_cap: usize,
    pub bottle_y: f32,
    pub coin_y: f32,
    pub width: f32,
    pub height: f32,
    pub spawn_x_min: f32,
    pub spawn_x_max: f32,
    pub bottle_frame_ms: u64,
    /// Status bar percentage contributed by each held item
    pub percent_per_item: u32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        PickupConfig {
            bottle_cap: 5,
            bottle_y: 370.0,
            coin_y: 270.0,
            width: 70.0,
            height: 70.0,
            spawn_x_min: 250.0,
            spawn_x_max: 1650.0,
            bottle_frame_ms: 250,
            percent_per_item: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    pub layer_width: f32,
    pub layer_height: f32,
    pub screen_height: f32,
    pub cloud_y: f32,
    pub cloud_width: f32,
    pub cloud_height: f32,
    pub cloud_speed_min: f32,
    pub cloud_speed_max: f32,
    pub cloud_spawn_x_max: f32,
    pub cloud_respawn_x_min: f32,
    pub cloud_respawn_x_max: f32,
    pub cloud_hz: f64,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        SceneryConfig {
            layer_width: 720.0,
            layer_height: 480.0,
            screen_height: 480.0,
            cloud_y: 20.0,
            cloud_width: 400.0,
            cloud_height: 205.0,
            cloud_speed_min: 0.15,
            cloud_speed_max: 0.4,
            cloud_spawn_x_max: 2000.0,
            cloud_respawn_x_min: 700.0,
            cloud_respawn_x_max: 2400.0,
            cloud_hz: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub level_end_x: f32,
    pub logic_hz: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            level_end_x: 2250.0,
            logic_hz: 5.0,
        }
    }
}

/// Root configuration. Every section falls back to its defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
    pub boss: BossConfig,
    pub projectile: ProjectileConfig,
    pub pickups: PickupConfig,
    pub scenery: SceneryConfig,
    pub world: WorldConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.pollo_loco/config.json`, or `./config.json` without a home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|p| p.join(".pollo_loco").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("./config.json"))
    }

    /// Loads `path` if it exists, otherwise falls back to the defaults.
    ///
    /// A file that exists but cannot be parsed is reported and ignored; the
    /// game always starts.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return GameConfig::default();
        }
        match GameConfig::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                GameConfig::default()
            }
        }
    }

    /// Rejects values that would make a tick rate, a size or a spawn range meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("physics.tick_hz", self.physics.tick_hz),
            ("player.movement_hz", self.player.movement_hz),
            ("enemies.movement_hz", self.enemies.movement_hz),
            ("scenery.cloud_hz", self.scenery.cloud_hz),
            ("world.logic_hz", self.world.logic_hz),
        ];
        for (name, rate) in rates {
            if !(rate > 0.0) {
                return Err(ConfigError::InvalidValue(format!("{} must be positive", name)));
            }
        }

        let sizes = [
            ("player", self.player.width, self.player.height),
            ("enemies.normal", self.enemies.normal.width, self.enemies.normal.height),
            ("enemies.small", self.enemies.small.width, self.enemies.small.height),
            ("boss", self.boss.width, self.boss.height),
            ("projectile", self.projectile.width, self.projectile.height),
            ("pickups", self.pickups.width, self.pickups.height),
        ];
        for (name, width, height) in sizes {
            if !(width > 0.0 && height > 0.0) {
                return Err(ConfigError::InvalidValue(format!("{} size must be positive", name)));
            }
        }

        // Spawn positions and speeds are sampled from half-open ranges
        let ranges = [
            ("enemies.spawn_x", self.enemies.spawn_x_min, self.enemies.spawn_x_max),
            ("enemies.normal.speed", self.enemies.normal.speed_min, self.enemies.normal.speed_max),
            ("enemies.small.speed", self.enemies.small.speed_min, self.enemies.small.speed_max),
            ("pickups.spawn_x", self.pickups.spawn_x_min, self.pickups.spawn_x_max),
            ("scenery.cloud_spawn_x", 0.0, self.scenery.cloud_spawn_x_max),
            ("scenery.cloud_speed", self.scenery.cloud_speed_min, self.scenery.cloud_speed_max),
            (
                "scenery.cloud_respawn_x",
                self.scenery.cloud_respawn_x_min,
                self.scenery.cloud_respawn_x_max,
            ),
        ];
        for (name, min, max) in ranges {
            if !(min < max) {
                return Err(ConfigError::InvalidValue(format!(
                    "{} range is empty ({}..{})",
                    name, min, max
                )));
            }
        }

        if self.boss.walk_tick_ms == 0 {
            return Err(ConfigError::InvalidValue("boss.walk_tick_ms must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration or level layouts
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err)
    }
}

impl From<ConfigError> for String {
    fn from(error: ConfigError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.physics.ground_y, 132.5);
        assert_eq!(config.physics.gravity, 2.5);
        assert_eq!(config.physics.jump_velocity, 25.0);
        assert_eq!(config.pickups.bottle_cap, 5);
        assert_eq!(config.boss.projectile_damage, 20);
        assert_eq!(config.world.level_end_x, 2250.0);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{ "physics": { "gravity": 3.0 }, "world": { "logic_hz": 10.0 } }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.physics.gravity, 3.0);
        // Unspecified fields inside a present section keep their defaults
        assert_eq!(config.physics.ground_y, 132.5);
        assert_eq!(config.world.logic_hz, 10.0);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let mut config = GameConfig::default();
        config.world.logic_hz = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_rejects_empty_size() {
        let mut config = GameConfig::default();
        config.boss.width = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_spawn_range() {
        let json = r#"{ "enemies": { "spawn_x_min": 800.0, "spawn_x_max": 800.0 } }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let mut config = GameConfig::default();
        config.enemies.small.speed_min = 2.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.pickups.spawn_x_max = config.pickups.spawn_x_min - 1.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.scenery.cloud_respawn_x_min = 3000.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.scenery.cloud_spawn_x_max = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.scenery.cloud_speed_max = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_ranges_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_period_from_hz() {
        assert_eq!(period_from_hz(25.0), Duration::from_millis(40));
        assert_eq!(period_from_hz(5.0), Duration::from_millis(200));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GameConfig::load_from_file("/definitely/not/here/config.json");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
