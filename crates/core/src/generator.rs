//! High-level building generation that sequences the per-floor stages and
//! then links the floors with stairs.

use crate::config::HouseConfig;
use crate::error::GenerationError;
use crate::geometry::Rect;
use crate::model::{Building, FloorBuilder, WallKind};
use crate::openings::place_openings;
use crate::partition::partition;
use crate::rng::{RandomSource, SeededRandom};
use crate::rooms::fill_rooms;
use crate::stairs::place_stairs;
use crate::walls::build_walls;

pub struct HouseGenerator {
    config: HouseConfig,
}

impl HouseGenerator {
    /// Validates `config` up front so generation never starts on bad input.
    pub fn new(config: HouseConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HouseConfig {
        &self.config
    }

    /// Generates with the configured seed, or a fresh runtime seed when none is set.
    pub fn generate(&self) -> Result<Building, GenerationError> {
        let mut rng = match self.config.random_seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_runtime_entropy(),
        };
        log::debug!("generating with seed {}", rng.seed());
        self.generate_with(&mut rng)
    }

    /// Generates from a caller-supplied random source, ignoring `random_seed`.
    pub fn generate_with(&self, rng: &mut impl RandomSource) -> Result<Building, GenerationError> {
        let floor_count = self.config.floor_count as usize;
        let mut floors = Vec::with_capacity(floor_count);
        for level in 0..floor_count {
            floors.push(self.generate_floor(level, rng)?);
        }

        let stairs = place_stairs(&mut floors, rng)?;
        let floors = floors.into_iter().map(FloorBuilder::freeze).collect();
        let building = Building::new(floors, stairs);

        log::info!(
            "generated {} floor(s) with {} stair(s), fingerprint {:016x}",
            building.floors().len(),
            building.stairs().len(),
            building.fingerprint()
        );
        Ok(building)
    }

    fn generate_floor(
        &self,
        level: usize,
        rng: &mut impl RandomSource,
    ) -> Result<FloorBuilder, GenerationError> {
        let HouseConfig { width, depth, min_room_size, .. } = self.config;

        let tree = partition(Rect::new(0, 0, width, depth), min_room_size, rng);
        let mut floor = FloorBuilder::new(level, width as usize, depth as usize, tree);
        fill_rooms(&mut floor);
        if floor.rooms.is_empty() {
            return Err(GenerationError::EmptyFloor { level });
        }

        build_walls(&mut floor);
        place_openings(&mut floor, rng, level == 0);

        let count = |kind: WallKind| floor.walls.values().filter(|wall| wall.kind == kind).count();
        log::debug!(
            "floor {level}: {} rooms, {} walls ({} doors, {} windows), partition depth {}",
            floor.rooms.len(),
            floor.walls.len(),
            count(WallKind::Door),
            count(WallKind::Window),
            floor.partition.depth()
        );
        Ok(floor)
    }
}

/// Validates `config` and generates one building from it.
pub fn generate(config: &HouseConfig) -> Result<Building, GenerationError> {
    HouseGenerator::new(config.clone())?.generate()
}
