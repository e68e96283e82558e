//! Failure modes of configuration loading and building generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a building could not be produced. No partial building is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    /// The partitioner produced no rooms; indicates an internal fault.
    #[error("floor {level} produced no rooms")]
    EmptyFloor { level: usize },

    #[error("no room on floor {lower_level} can host a stair footprint")]
    StairPlacementImpossible { lower_level: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse house config")]
    Parse(#[from] toml::de::Error),
}
