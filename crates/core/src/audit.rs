//! Structural checks over a finished [`Building`].
//!
//! Generation upholds all of these by construction; the audit exists so the
//! fuzz harness and tests can confirm it on arbitrary seeds.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::geometry::{Cell, Direction, Rect};
use crate::model::{Building, CellKind, Floor, RoomId, StairLink, WallKind};
use crate::openings::{MAX_EXTERIOR_DOORS, MAX_WINDOWS_PER_ROOM};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("floor {level}: room {room:?} extends past the floor")]
    RoomOutOfBounds { level: usize, room: RoomId },

    #[error("floor {level}: rooms {first:?} and {second:?} overlap")]
    RoomsOverlap { level: usize, first: RoomId, second: RoomId },

    #[error("floor {level}: cell {cell:?} is {found:?}, expected {expected:?}")]
    CellMismatch { level: usize, cell: Cell, expected: CellKind, found: CellKind },

    #[error("floor {level}: room {room:?} has no wall on {cell:?} {direction:?}")]
    MissingWall { level: usize, room: RoomId, cell: Cell, direction: Direction },

    #[error("floor {level}: wall on {cell:?} {direction:?} does not reference its room")]
    WallDetached { level: usize, cell: Cell, direction: Direction },

    #[error("floor {level}: exterior wall on {cell:?} {direction:?} faces another room")]
    ExteriorWallFacesRoom { level: usize, cell: Cell, direction: Direction },

    #[error("floor {level}: interior wall on {cell:?} {direction:?} names the wrong rooms")]
    InteriorWallMisattributed { level: usize, cell: Cell, direction: Direction },

    #[error("floor {level}: partition leaf {rect:?} is below the minimum room size")]
    LeafTooSmall { level: usize, rect: Rect },

    #[error("floor {level}: room {room:?} has {count} windows")]
    TooManyWindows { level: usize, room: RoomId, count: usize },

    #[error("floor {level}: window on interior wall {cell:?} {direction:?}")]
    WindowOnInteriorWall { level: usize, cell: Cell, direction: Direction },

    #[error("floor {level}: {count} exterior doors")]
    ExteriorDoorCount { level: usize, count: usize },

    #[error("floor {level}: only {reachable} of {total} rooms reachable through doors")]
    UnreachableRooms { level: usize, reachable: usize, total: usize },

    #[error("expected {expected} stair links, found {found}")]
    StairCount { expected: usize, found: usize },

    #[error("stair at {origin:?} does not join consecutive floors {lower} -> {upper}")]
    StairLevels { origin: Cell, lower: usize, upper: usize },

    #[error("stair at {origin:?} is not inside a single room on floor {lower}")]
    StairOutsideRoom { origin: Cell, lower: usize },
}

/// Returns the first violated invariant, if any.
pub fn audit(building: &Building, min_room_size: i32) -> Result<(), Violation> {
    audit_stairs(building)?;
    for floor in building.floors() {
        audit_rooms(floor)?;
        audit_cells(building, floor)?;
        audit_walls(floor)?;
        audit_partition(floor, min_room_size)?;
        audit_openings(floor)?;
    }
    Ok(())
}

fn audit_stairs(building: &Building) -> Result<(), Violation> {
    let expected = building.floors().len().saturating_sub(1);
    let found = building.stairs().len();
    if found != expected {
        return Err(Violation::StairCount { expected, found });
    }

    for link in building.stairs() {
        let StairLink { origin, lower, upper } = *link;
        if upper != lower + 1 || upper >= building.floors().len() {
            return Err(Violation::StairLevels { origin, lower, upper });
        }
        let footprint = link.footprint_rect();
        let hosted = building.floors()[lower]
            .rooms()
            .iter()
            .any(|room| room.rect.contains_rect(footprint));
        if !hosted {
            return Err(Violation::StairOutsideRoom { origin, lower });
        }
    }
    Ok(())
}

fn audit_rooms(floor: &Floor) -> Result<(), Violation> {
    let level = floor.level();
    let bounds = Rect::new(0, 0, floor.width() as i32, floor.depth() as i32);
    let rooms = floor.rooms();
    for (index, room) in rooms.iter().enumerate() {
        if !bounds.contains_rect(room.rect) {
            return Err(Violation::RoomOutOfBounds { level, room: room.id });
        }
        let overlapping = rooms[index + 1..].iter().find(|other| other.rect.intersects(room.rect));
        if let Some(other) = overlapping {
            return Err(Violation::RoomsOverlap { level, first: room.id, second: other.id });
        }
    }
    Ok(())
}

/// Room cells are `Floor` except where a stair sits (`Stair`) or the stair
/// from the floor below cuts through (`Empty`); everything else is `Empty`.
fn audit_cells(building: &Building, floor: &Floor) -> Result<(), Violation> {
    let level = floor.level();
    let stair_cells: BTreeSet<Cell> = building
        .stairs()
        .iter()
        .filter(|link| link.lower == level)
        .flat_map(|link| link.footprint())
        .collect();
    let hole_cells: BTreeSet<Cell> = building
        .stairs()
        .iter()
        .filter(|link| link.upper == level)
        .flat_map(|link| link.footprint())
        .collect();

    for (cell, found) in floor.cells() {
        let expected = if stair_cells.contains(&cell) {
            CellKind::Stair
        } else if hole_cells.contains(&cell) || floor.room_at(cell).is_none() {
            CellKind::Empty
        } else {
            CellKind::Floor
        };
        if found != expected {
            return Err(Violation::CellMismatch { level, cell, expected, found });
        }
    }
    Ok(())
}

fn audit_walls(floor: &Floor) -> Result<(), Violation> {
    let level = floor.level();
    for room in floor.rooms() {
        for (cell, direction) in room.rect.boundary_edges() {
            let Some(wall) = floor.wall(cell, direction) else {
                return Err(Violation::MissingWall { level, room: room.id, cell, direction });
            };
            if !wall.touches(room.id) {
                return Err(Violation::WallDetached { level, cell, direction });
            }
        }
    }

    for wall in floor.walls() {
        let (cell, direction) = (wall.cell(), wall.direction());
        let inside = floor.room_at(cell).map(|room| room.id);
        let outside = floor.room_at(wall.outer_cell()).map(|room| room.id);
        match wall.room_b() {
            None if outside.is_some() => {
                return Err(Violation::ExteriorWallFacesRoom { level, cell, direction });
            }
            Some(room_b)
                if room_b == wall.room_a()
                    || inside != Some(wall.room_a())
                    || outside != Some(room_b) =>
            {
                return Err(Violation::InteriorWallMisattributed { level, cell, direction });
            }
            _ => {}
        }
    }
    Ok(())
}

fn audit_partition(floor: &Floor, min_room_size: i32) -> Result<(), Violation> {
    let tree = floor.partition();
    let root = tree.root().rect;
    if root.width < min_room_size || root.height < min_room_size {
        return Ok(());
    }
    for leaf in tree.leaves() {
        let rect = tree.node(leaf).rect;
        if rect.width < min_room_size || rect.height < min_room_size {
            return Err(Violation::LeafTooSmall { level: floor.level(), rect });
        }
    }
    Ok(())
}

fn audit_openings(floor: &Floor) -> Result<(), Violation> {
    let level = floor.level();

    for wall in floor.walls() {
        if wall.kind() == WallKind::Window && !wall.is_exterior() {
            let (cell, direction) = (wall.cell(), wall.direction());
            return Err(Violation::WindowOnInteriorWall { level, cell, direction });
        }
    }

    for room in floor.rooms() {
        let count = floor.walls_of(room.id).filter(|wall| wall.kind() == WallKind::Window).count();
        if count > MAX_WINDOWS_PER_ROOM {
            return Err(Violation::TooManyWindows { level, room: room.id, count });
        }
    }

    let exterior_doors = floor
        .walls()
        .filter(|wall| wall.is_exterior() && wall.kind() == WallKind::Door)
        .count();
    let allowed = if level == 0 { 1..=MAX_EXTERIOR_DOORS } else { 0..=0 };
    if !allowed.contains(&exterior_doors) {
        return Err(Violation::ExteriorDoorCount { level, count: exterior_doors });
    }

    if let Some(first) = floor.rooms().first() {
        let reachable = floor.reachable_from(first.id).len();
        let total = floor.rooms().len();
        if reachable != total {
            return Err(Violation::UnreachableRooms { level, reachable, total });
        }
    }
    Ok(())
}
