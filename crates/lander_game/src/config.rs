//! Game configuration loaded from JSON.
//!
//! Every field has a default, and the defaults describe the stock level, so a
//! config file only needs the values it changes. Validation runs after parsing
//! so the rest of the game can rely on positive sizes and a usable layout.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use lander_core::animation::{Direction, FrameTable, SpriteSheet};
use lander_platform::window::PlatformConfig;
use serde::Deserialize;

use crate::error::GameError;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/lander.json";
pub const CONFIG_PATH_ENV: &str = "LANDER_CONFIG";
/// Upper bound for one walk-cycle frame.
pub const MAX_FRAME_DURATION_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: PlatformConfig,
    pub camera: CameraConfig,
    pub timing: TimingConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub platforms: PlatformLayout,
    pub decorations: Vec<DecorationConfig>,
    pub assets: AssetPaths,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub half_width: f32,
    pub half_height: f32,
    pub clear_color: [f64; 4],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            half_width: 5.0,
            half_height: 3.75,
            clear_color: [0.8, 0.8, 0.8, 1.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fixed_dt: f64,
    /// Frames longer than this are logged as hitches; their time is still simulated.
    pub slow_frame_dt: f64,
    /// How long the final frame stays on screen after a landing.
    pub outcome_linger_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_dt: lander_core::time::DEFAULT_FIXED_DT,
            slow_frame_dt: lander_core::time::DEFAULT_SLOW_FRAME_DT,
            outcome_linger_secs: 1.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Fraction of `gravity` applied to the lander.
    pub gravity_scale: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -1.3,
            gravity_scale: 0.1,
        }
    }
}

impl PhysicsConfig {
    pub fn acceleration(&self) -> Vec3 {
        Vec3::new(0.0, self.gravity * self.gravity_scale, 0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub sheet: SpriteSheet,
    pub frames: FrameTable,
    pub frame_duration_ms: u64,
    pub facing: Direction,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: [-4.3, 3.0, 0.0],
            width: 0.9,
            height: 0.9,
            speed: 1.0,
            sheet: SpriteSheet::default(),
            frames: FrameTable::default(),
            frame_duration_ms: 250,
            facing: Direction::Right,
        }
    }
}

/// A row of platforms; every `bad_every`-th one (starting at index 0) is bad.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformLayout {
    pub count: usize,
    pub bad_every: usize,
    pub x_start: f32,
    pub spacing: f32,
    pub good_y: f32,
    pub bad_y: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PlatformLayout {
    fn default() -> Self {
        Self {
            count: 12,
            bad_every: 4,
            x_start: -4.5,
            spacing: 1.0,
            good_y: -3.0,
            bad_y: -1.0,
            z: 1.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecorationConfig {
    pub name: String,
    pub texture: PathBuf,
    pub position: [f32; 3],
    #[serde(default = "default_decoration_size")]
    pub width: f32,
    #[serde(default = "default_decoration_size")]
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub sprite_sheet: PathBuf,
    pub good_platform: PathBuf,
    pub bad_platform: PathBuf,
    pub win: PathBuf,
    pub lose: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            sprite_sheet: PathBuf::from("assets/textures/lander_sheet.png"),
            good_platform: PathBuf::from("assets/textures/good_platform.png"),
            bad_platform: PathBuf::from("assets/textures/bad_platform.png"),
            win: PathBuf::from("assets/textures/win.png"),
            lose: PathBuf::from("assets/textures/game_over.png"),
        }
    }
}

impl GameConfig {
    /// The stock level including its two decorations.
    pub fn stock() -> Self {
        Self {
            decorations: vec![
                DecorationConfig {
                    name: "arrow".to_string(),
                    texture: PathBuf::from("assets/textures/down_arrow.png"),
                    position: [2.7, -2.0, 1.0],
                    width: 1.0,
                    height: 1.0,
                },
                DecorationConfig {
                    name: "lightbulb".to_string(),
                    texture: PathBuf::from("assets/textures/lightbulb.png"),
                    position: [3.0, 3.0, 0.0],
                    width: 1.0,
                    height: 1.0,
                },
            ],
            ..Self::default()
        }
    }

    /// Path named by `LANDER_CONFIG`, if set.
    pub fn env_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from)
    }
}

/// Load the startup config. A path the user asked for must exist; only the
/// bundled `fallback` may be missing, in which case the stock level is used.
pub fn load_startup_config(
    requested: Option<&Path>,
    fallback: &Path,
) -> Result<GameConfig, GameError> {
    if let Some(path) = requested {
        let config = load_config_from_path(path)?;
        log::info!("Loaded config '{}' ({})", path.display(), CONFIG_PATH_ENV);
        return Ok(config);
    }
    if fallback.exists() {
        let config = load_config_from_path(fallback)?;
        log::info!("Loaded config '{}'", fallback.display());
        Ok(config)
    } else {
        log::warn!(
            "Config '{}' not found, using the stock level",
            fallback.display()
        );
        Ok(GameConfig::stock())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, GameError> {
    let raw = fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GameConfig =
        serde_json::from_str(&raw).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), GameError> {
    let invalid = |msg: String| Err(GameError::InvalidConfig(msg));

    if config.window.width == 0 || config.window.height == 0 {
        return invalid("window width and height must be > 0".to_string());
    }
    if config.camera.half_width <= 0.0 || config.camera.half_height <= 0.0 {
        return invalid("camera half extents must be > 0".to_string());
    }
    if config.timing.fixed_dt <= 0.0 {
        return invalid("timing.fixed_dt must be > 0".to_string());
    }
    if config.timing.slow_frame_dt <= 0.0 {
        return invalid("timing.slow_frame_dt must be > 0".to_string());
    }
    if config.timing.outcome_linger_secs < 0.0 {
        return invalid("timing.outcome_linger_secs must be >= 0".to_string());
    }
    if config.player.width <= 0.0 || config.player.height <= 0.0 {
        return invalid("player width and height must be > 0".to_string());
    }
    if config.player.frame_duration_ms == 0
        || config.player.frame_duration_ms > MAX_FRAME_DURATION_MS
    {
        return invalid(format!(
            "player.frame_duration_ms must be in 1..={}",
            MAX_FRAME_DURATION_MS
        ));
    }
    if config.platforms.count == 0 {
        return invalid("platforms.count must be > 0".to_string());
    }
    if config.platforms.bad_every == 0 {
        return invalid("platforms.bad_every must be > 0".to_string());
    }
    if config.platforms.width <= 0.0 || config.platforms.height <= 0.0 {
        return invalid("platform width and height must be > 0".to_string());
    }
    for decoration in &config.decorations {
        if decoration.width <= 0.0 || decoration.height <= 0.0 {
            return invalid(format!(
                "decoration '{}' width and height must be > 0",
                decoration.name
            ));
        }
    }
    Ok(())
}

const fn default_decoration_size() -> f32 {
    1.0
}
