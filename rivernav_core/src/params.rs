//! Simulation configuration
//!
//! Supplied once at startup and read-only afterwards. Loaded from TOML or YAML,
//! every field has a default so partial files are accepted.

use crate::error::{NavError, NavResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Segment dimensions in cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 200,
        }
    }
}

/// Hull dimensions and motion limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoatConfig {
    pub length: usize,
    pub width: usize,
    /// Forward displacement per tick, in cells
    pub step: usize,
    /// Heading limit in degrees either side of straight ahead
    pub max_angle: f32,
    pub max_speed: f32,
}

impl Default for BoatConfig {
    fn default() -> Self {
        Self {
            length: 6,
            width: 3,
            step: 1,
            max_angle: 45.0,
            max_speed: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Rows sounded ahead of the bow and columns sounded outboard of each side
    pub proximity: usize,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { proximity: 5 }
    }
}

/// Depth normalization bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Normalization bound of the active segment
    pub max_depth: f32,
    /// Normalization bound of the prefetched segment
    pub max_buffer_depth: f32,
    /// Cells at or below this depth are impassable for the route planner
    pub min_passable_depth: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            max_depth: 255.0,
            max_buffer_depth: 255.0,
            min_passable_depth: 0.0,
        }
    }
}

/// Output universes of the fuzzy controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Steering universe is [-steering_range, steering_range] degrees
    pub steering_range: f32,
    /// Speed universe is [0, speed_range]
    pub speed_range: f32,
    /// Discretization points per half universe
    pub resolution: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            steering_range: 10.0,
            speed_range: 5.0,
            resolution: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Rows the source may still deliver; `None` reads until the data ends
    pub remaining_rows: Option<usize>,
}

/// How the next segment is prepared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefetchMode {
    /// Load and approximate on the simulation thread at rollover
    #[default]
    Eager,
    /// Load and approximate on a worker thread while the current segment is navigated
    Background,
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub map: MapConfig,
    pub boat: BoatConfig,
    pub sensors: SensorConfig,
    pub depth: DepthConfig,
    pub controller: ControllerConfig,
    pub source: SourceConfig,
    pub prefetch: PrefetchMode,
}

impl SimConfig {
    /// Load and validate a configuration file.
    ///
    /// `.toml` files are parsed as TOML, everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> NavResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config: SimConfig = if is_toml {
            toml::from_str(&content).map_err(|e| NavError::Parse(e.to_string()))?
        } else {
            serde_yaml::from_str(&content).map_err(|e| NavError::Parse(e.to_string()))?
        };

        debug!("Loaded configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> NavResult<()> {
        fn invalid(msg: impl Into<String>) -> NavResult<()> {
            Err(NavError::InvalidConfig(msg.into()))
        }

        if self.map.width == 0 || self.map.height == 0 {
            return invalid("map width and height must be positive");
        }
        if self.boat.length == 0 || self.boat.width == 0 {
            return invalid("boat length and width must be positive");
        }
        if self.boat.length >= self.map.height {
            return invalid(format!(
                "boat length {} must be smaller than map height {}",
                self.boat.length, self.map.height
            ));
        }
        if self.boat.step == 0 {
            return invalid("boat step must be positive");
        }
        if self.sensors.proximity == 0 {
            return invalid("sensor proximity must be positive");
        }
        if self.controller.resolution == 0 {
            return invalid("controller resolution must be positive");
        }

        let limits = [
            ("boat.max_angle", self.boat.max_angle),
            ("boat.max_speed", self.boat.max_speed),
            ("depth.max_depth", self.depth.max_depth),
            ("depth.max_buffer_depth", self.depth.max_buffer_depth),
            ("controller.steering_range", self.controller.steering_range),
            ("controller.speed_range", self.controller.speed_range),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be a positive finite number, got {value}"));
            }
        }
        if !self.depth.min_passable_depth.is_finite() || self.depth.min_passable_depth < 0.0 {
            return invalid("depth.min_passable_depth must be a non-negative finite number");
        }
        // At the heading limit a step must still advance at least one row
        let forward = (self.boat.step as f32 * self.boat.max_angle.to_radians().cos()).round();
        if forward < 1.0 {
            return invalid(format!(
                "boat.max_angle {} leaves no forward progress at step {}",
                self.boat.max_angle, self.boat.step
            ));
        }

        Ok(())
    }
}
