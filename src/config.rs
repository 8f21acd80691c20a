use anyhow::Context;
use macroquad::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "ONE_ROOM_CONFIG";
pub const MAP_ENV_VAR: &str = "ONE_ROOM_MAP";
pub const DEBUG_ENV_VAR: &str = "ONE_ROOM_DEBUG";

pub const SCREEN_W: f32 = 420.0;
pub const SCREEN_H: f32 = 240.0;
pub const CAMERA_SLACK: f32 = 30.0;

pub const GRAVITY: f32 = 8.0 * 9.8;
pub const VX_MAX: f32 = 60.0;
pub const VY_MAX: f32 = 60.0;
pub const ACCEL: f32 = 120.0;
pub const DRAG: f32 = 2.0;
pub const V_JUMP: f32 = -60.0;
pub const MAX_STEP: f32 = 1.0 / 30.0;

/// Tunables for actor integration. Velocities are pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub vx_max: f32,
    pub vy_max: f32,
    pub accel: f32,
    pub drag: f32,
    pub v_jump: f32,
    /// Longest single integration step `advance` will take.
    pub max_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: GRAVITY,
            vx_max: VX_MAX,
            vy_max: VY_MAX,
            accel: ACCEL,
            drag: DRAG,
            v_jump: V_JUMP,
            max_step: MAX_STEP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map_path: PathBuf,
    pub screen_size: (f32, f32),
    pub camera_slack: f32,
    pub debug: bool,
    pub hero_name: String,
    pub physics: PhysicsConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            map_path: PathBuf::from("assets/levels/level_1.json"),
            screen_size: (SCREEN_W, SCREEN_H),
            camera_slack: CAMERA_SLACK,
            debug: false,
            hero_name: "hero".to_owned(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn screen_size(&self) -> Vec2 {
        vec2(self.screen_size.0, self.screen_size.1)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        serde_json::from_str(&txt)
            .with_context(|| format!("Parsing config file {}", path.display()))
    }

    /// Defaults, then the file named by `ONE_ROOM_CONFIG`, then the
    /// `ONE_ROOM_MAP` and `ONE_ROOM_DEBUG` overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(
            std::env::var(MAP_ENV_VAR).ok().as_deref(),
            std::env::var(DEBUG_ENV_VAR).ok().as_deref(),
        );
        Ok(config)
    }

    fn apply_overrides(&mut self, map: Option<&str>, debug: Option<&str>) {
        if let Some(map) = map.filter(|m| !m.is_empty()) {
            self.map_path = PathBuf::from(map);
        }
        if let Some(flag) = debug {
            self.debug = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
    }
}
