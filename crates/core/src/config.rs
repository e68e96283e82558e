//! House settings: defaults, TOML loading, and validation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GenerationError};

/// Upper bound on `width * depth`; each floor allocates one grid slot per cell.
pub const MAX_FLOOR_CELLS: i64 = 1 << 20;
/// Upper bound on `floor_count`.
pub const MAX_FLOORS: i32 = 64;

/// Inputs for one generation run.
///
/// `floor_height` is carried for the presentation layer and never read by
/// generation. A missing `random_seed` means each run draws a fresh seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseConfig {
    pub width: i32,
    pub depth: i32,
    pub floor_count: i32,
    pub min_room_size: i32,
    pub floor_height: f32,
    pub random_seed: Option<u64>,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            width: 20,
            depth: 20,
            floor_count: 2,
            min_room_size: 5,
            floor_height: 3.0,
            random_seed: None,
        }
    }
}

impl HouseConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Rejects settings that could not be partitioned into rooms.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let positive = [
            ("width", self.width),
            ("depth", self.depth),
            ("floor_count", self.floor_count),
            ("min_room_size", self.min_room_size),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(GenerationError::InvalidConfiguration {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        let cells = i64::from(self.width) * i64::from(self.depth);
        if cells > MAX_FLOOR_CELLS {
            return Err(GenerationError::InvalidConfiguration {
                field: "width",
                reason: format!(
                    "{}x{} is {cells} cells per floor, above the limit of {MAX_FLOOR_CELLS}",
                    self.width, self.depth
                ),
            });
        }
        if self.floor_count > MAX_FLOORS {
            return Err(GenerationError::InvalidConfiguration {
                field: "floor_count",
                reason: format!("{} is above the limit of {MAX_FLOORS}", self.floor_count),
            });
        }

        let shorter_side = self.width.min(self.depth);
        if self.min_room_size.saturating_mul(2) > shorter_side {
            return Err(GenerationError::InvalidConfiguration {
                field: "min_room_size",
                reason: format!(
                    "{} is too large: twice it must fit in the shorter side ({shorter_side})",
                    self.min_room_size
                ),
            });
        }

        Ok(())
    }
}
