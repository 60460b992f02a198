//! Cell configuration: pallet geometry, timing and task-arena sizing.
//!
//! Loaded from an optional `palletizer.toml` in the working directory;
//! every field has a default so an absent or partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing failed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A point in the arm's coordinate space, in integer position units.
///
/// Larger `z` is further down: the floor sits at a larger `z` than the
/// travel height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// Pallet geometry and handover positions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// The two x coordinates of the stacking columns.
    pub slot_x: [i64; 2],
    /// The two y coordinates of the stacking columns.
    pub slot_y: [i64; 2],
    /// Where the arm parks between boxes.
    pub wait_pos: Position,
    /// Where the inlet conveyor presents a box.
    pub pickup_pos: Position,
    /// Height of one box, in position units.
    pub box_height: i64,
    /// `z` of the pallet floor (first layer).
    pub floor_z: i64,
    /// Safe height for horizontal travel.
    pub travel_z: i64,
    /// Boxes per full pallet; reaching this triggers a magazine reload.
    pub boxes_per_pallet: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            slot_x: [250, 150],
            slot_y: [300, 200],
            wait_pos: Position { x: 100, y: 100, z: 100 },
            pickup_pos: Position { x: 100, y: 100, z: 200 },
            box_height: 30,
            floor_z: 300,
            travel_z: 100,
            boxes_per_pallet: 48,
        }
    }
}

impl LayoutConfig {
    /// The four stacking columns, as `(x, y)` pairs.
    pub fn columns(&self) -> [(i64, i64); 4] {
        let [x1, x2] = self.slot_x;
        let [y1, y2] = self.slot_y;
        [(x1, y1), (x2, y1), (x1, y2), (x2, y2)]
    }

    /// Slot for the `box_index`-th box on the current pallet.
    ///
    /// The horizontal slot cycles through the four columns; the layer steps
    /// by one box height every four boxes, starting at `floor_z`.
    pub fn stack_slot(&self, box_index: i64) -> Position {
        let (x, y) = self.columns()[box_index.rem_euclid(4) as usize];
        Position {
            x,
            y,
            z: self.floor_z + (box_index / 4) * self.box_height,
        }
    }
}

/// Top-level cell configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Fixed tick period in milliseconds.
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    /// Axis speed in position units per tick.
    #[serde(default = "default_motor_speed")]
    pub motor_speed: i64,
    /// Capacity of the arm task family's arena, in bytes.
    #[serde(default = "default_arena_capacity")]
    pub arena_capacity: usize,
}

fn default_tick_period_ms() -> u64 {
    10
}
fn default_motor_speed() -> i64 {
    55
}
fn default_arena_capacity() -> usize {
    4096
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            tick_period_ms: default_tick_period_ms(),
            motor_speed: default_motor_speed(),
            arena_capacity: default_arena_capacity(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
