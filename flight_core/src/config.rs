//! Configuration system.
//!
//! Loads flight configuration from JSON strings/files. Every field has a
//! default, so a config file only needs to name what it changes. Values are
//! read once at start-up and are not reloaded while running.

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::vector::Vec4;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Time each simulation tick integrates over (seconds).
    pub tick_delta_s: f32,
    /// Upper bound on ticks run to catch up within one frame.
    pub max_ticks_per_frame: u32,
    pub ship: ShipConfig,
    pub camera: CameraConfig,
    pub spawn: SpawnConfig,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            tick_delta_s: 0.016_666_6,
            max_ticks_per_frame: 5,
            ship: ShipConfig::default(),
            camera: CameraConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}

/// Limits for one rotation axis of the ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngularConfig {
    pub max_velocity_deg_per_s: f32,
    /// Rate the angular velocity ramps toward its target, both when a
    /// rotation starts and when it decays back to rest.
    pub acceleration_deg_per_s2: f32,
}

impl Default for AngularConfig {
    fn default() -> Self {
        Self {
            max_velocity_deg_per_s: 60.0,
            acceleration_deg_per_s2: 240.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub roll: AngularConfig,
    pub pitch: AngularConfig,
    pub boost_acceleration_m_per_s2: f32,
    pub min_speed_m_per_s: f32,
    pub max_speed_m_per_s: f32,
    /// Re-orthonormalise `front`/`right` every this many ticks. `None` keeps
    /// the pure incremental rotation and its floating-point drift.
    pub reorthonormalize_interval_ticks: Option<u32>,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            roll: AngularConfig::default(),
            pitch: AngularConfig::default(),
            boost_acceleration_m_per_s2: 2.0,
            min_speed_m_per_s: 0.0,
            max_speed_m_per_s: 10.0,
            reorthonormalize_interval_ticks: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// How far behind the ship, in time, the camera trails.
    pub follow_delay_s: f32,
    /// Eye distance behind the ship along the ship's local +z (meters).
    pub separation_m: f32,
    /// Eye offset along the ship's local +y (meters).
    pub view_height_m: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_delay_s: 0.25,
            separation_m: 10.0,
            view_height_m: 0.0,
        }
    }
}

impl CameraConfig {
    /// Number of poses the camera keeps: the follow delay in whole ticks,
    /// rounded up, and at least one.
    pub fn history_len(&self, tick_delta_s: f32) -> usize {
        let ticks = (self.follow_delay_s / tick_delta_s).ceil();
        if ticks.is_finite() && ticks >= 1.0 {
            ticks as usize
        } else {
            1
        }
    }
}

/// Initial pose of the ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub position: Vec4,
    pub look_at: Vec4,
    pub world_up: Vec4,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            position: Vec4::point(0.0, 0.0, 0.0),
            look_at: Vec4::point(0.0, 0.0, -1.0),
            world_up: Vec4::direction(0.0, 1.0, 0.0),
        }
    }
}

impl FlightConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg = Self::from_json_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(cfg)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.tick_delta_s.is_finite() && self.tick_delta_s > 0.0) {
            bail!("tick_delta_s must be positive, got {}", self.tick_delta_s);
        }
        if self.max_ticks_per_frame == 0 {
            bail!("max_ticks_per_frame must be at least 1");
        }
        for (name, axis) in [("roll", &self.ship.roll), ("pitch", &self.ship.pitch)] {
            if axis.max_velocity_deg_per_s < 0.0 || axis.acceleration_deg_per_s2 < 0.0 {
                bail!("{name} limits must not be negative: {axis:?}");
            }
        }
        let ship = &self.ship;
        if ship.min_speed_m_per_s > ship.max_speed_m_per_s {
            bail!(
                "min_speed_m_per_s ({}) exceeds max_speed_m_per_s ({})",
                ship.min_speed_m_per_s,
                ship.max_speed_m_per_s
            );
        }
        if ship.reorthonormalize_interval_ticks == Some(0) {
            bail!("reorthonormalize_interval_ticks must be at least 1 when set");
        }
        if self.camera.follow_delay_s < 0.0 {
            bail!("follow_delay_s must not be negative");
        }
        let spawn = &self.spawn;
        if !spawn.position.is_point() || !spawn.look_at.is_point() {
            bail!("spawn position and look_at must be points (w = 1)");
        }
        if !spawn.world_up.is_direction() {
            bail!("spawn world_up must be a direction (w = 0)");
        }
        if (spawn.look_at - spawn.position).length() == 0.0 {
            bail!("spawn look_at must differ from position");
        }
        Ok(())
    }
}
