//! Procedural multi-floor house layouts: BSP room subdivision, shared wall
//! topology, door and window placement, and stairs between floors.

pub mod audit;
pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod model;
pub mod openings;
pub mod partition;
pub mod rng;

mod rooms;
mod stairs;
mod walls;

pub use audit::{Violation, audit};
pub use config::HouseConfig;
pub use error::{ConfigError, GenerationError};
pub use generator::{HouseGenerator, generate};
pub use geometry::{Cell, Direction, Rect, SplitAxis};
pub use model::{Building, CellKind, Floor, Room, RoomId, StairLink, Wall, WallKey, WallKind};
pub use partition::{NodeId, NodeKind, PartitionNode, PartitionTree, partition};
pub use rng::{RandomSource, SeededRandom};
