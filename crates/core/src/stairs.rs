//! Stair placement between consecutive floors.

use crate::error::GenerationError;
use crate::geometry::Cell;
use crate::model::{CellKind, FloorBuilder, STAIR_SPAN, StairLink};
use crate::rng::RandomSource;

/// Links every floor to the one above it with a 2x2 stair.
///
/// The footprint becomes `Stair` on the lower floor and a hole (`Empty`) on
/// the upper floor. Buildings with a single floor get no stairs.
pub(crate) fn place_stairs(
    floors: &mut [FloorBuilder],
    rng: &mut impl RandomSource,
) -> Result<Vec<StairLink>, GenerationError> {
    let mut links = Vec::with_capacity(floors.len().saturating_sub(1));

    for lower_level in 0..floors.len().saturating_sub(1) {
        let (below, above) = floors.split_at_mut(lower_level + 1);
        let lower = &mut below[lower_level];
        let upper = &mut above[0];

        let origin = choose_origin(lower, rng)
            .ok_or(GenerationError::StairPlacementImpossible { lower_level })?;
        let link = StairLink { origin, lower: lower_level, upper: lower_level + 1 };

        for cell in link.footprint() {
            if lower.is_inside(cell) {
                lower.set_cell(cell, CellKind::Stair);
            }
            if upper.is_inside(cell) {
                upper.set_cell(cell, CellKind::Empty);
            }
        }
        log::debug!("stair {} -> {} at {:?}", link.lower, link.upper, link.origin);
        links.push(link);
    }

    Ok(links)
}

/// Picks a room uniformly among those that can host the footprint, then an
/// origin uniformly among that room's free positions.
fn choose_origin(floor: &FloorBuilder, rng: &mut impl RandomSource) -> Option<Cell> {
    let hosts: Vec<Vec<Cell>> = floor
        .rooms
        .iter()
        .map(|room| {
            let rect = room.rect;
            (rect.x..=rect.x_max() - STAIR_SPAN)
                .flat_map(|x| (rect.y..=rect.y_max() - STAIR_SPAN).map(move |y| Cell::new(x, y)))
                .filter(|&origin| footprint_is_clear(floor, origin))
                .collect()
        })
        .filter(|origins: &Vec<Cell>| !origins.is_empty())
        .collect();

    let origins = rng.choose(&hosts)?;
    rng.choose(origins).copied()
}

/// Every footprint cell is still plain floor, so a hole cut by the stair
/// below is never reused.
fn footprint_is_clear(floor: &FloorBuilder, origin: Cell) -> bool {
    let link = StairLink { origin, lower: floor.level, upper: floor.level + 1 };
    link.footprint().iter().all(|&cell| floor.cell_kind(cell) == CellKind::Floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::partition::{PartitionTree, partition};
    use crate::rng::SeededRandom;
    use crate::rooms::fill_rooms;

    fn floors(count: usize, width: i32, depth: i32, min_size: i32, seed: u64) -> Vec<FloorBuilder> {
        let mut rng = SeededRandom::new(seed);
        (0..count)
            .map(|level| {
                let tree = partition(Rect::new(0, 0, width, depth), min_size, &mut rng);
                let mut floor = FloorBuilder::new(level, width as usize, depth as usize, tree);
                fill_rooms(&mut floor);
                floor
            })
            .collect()
    }

    #[test]
    fn single_floor_gets_no_stairs() {
        let mut single = floors(1, 10, 10, 3, 1);
        let links = place_stairs(&mut single, &mut SeededRandom::new(1)).expect("no-op");
        assert!(links.is_empty());
        assert_eq!(single[0].grid.iter().filter(|&&cell| cell == CellKind::Stair).count(), 0);
    }

    #[test]
    fn each_link_cuts_stair_below_and_hole_above() {
        let mut stack = floors(4, 16, 12, 3, 21);
        let links = place_stairs(&mut stack, &mut SeededRandom::new(21)).expect("stairs fit");

        assert_eq!(links.len(), 3);
        for (index, link) in links.iter().enumerate() {
            assert_eq!((link.lower, link.upper), (index, index + 1));
            let host = stack[link.lower].rooms.iter().find(|room| room.rect.contains(link.origin));
            let host = host.expect("origin should sit in a room");
            assert!(host.rect.contains_rect(link.footprint_rect()));
            for cell in link.footprint() {
                assert_eq!(stack[link.lower].cell_kind(cell), CellKind::Stair);
                assert_eq!(stack[link.upper].cell_kind(cell), CellKind::Empty);
            }
        }
    }

    #[test]
    fn stairs_avoid_the_hole_from_the_floor_below() {
        // Ground floor only has a 2x2 room at the bottom of a 2x4 plot, so the
        // first stair lands at the origin and the next must clear its hole.
        let plot = Rect::new(0, 0, 2, 4);
        let mut stack: Vec<FloorBuilder> = (0..3)
            .map(|level| {
                let rect = if level == 0 { Rect::new(0, 0, 2, 2) } else { plot };
                let mut floor = FloorBuilder::new(level, 2, 4, PartitionTree::single(rect));
                fill_rooms(&mut floor);
                floor
            })
            .collect();

        let links = place_stairs(&mut stack, &mut SeededRandom::new(5)).expect("stairs fit");
        assert_eq!(links[0].origin, Cell::new(0, 0));
        assert_eq!(links[1].origin, Cell::new(0, 2));
        for cell in links[0].footprint() {
            assert_eq!(stack[1].cell_kind(cell), CellKind::Empty);
        }
        for cell in links[1].footprint() {
            assert_eq!(stack[1].cell_kind(cell), CellKind::Stair);
            assert_eq!(stack[2].cell_kind(cell), CellKind::Empty);
        }
    }

    #[test]
    fn rooms_too_thin_for_a_footprint_are_an_error() {
        let rect = Rect::new(0, 0, 1, 6);
        let mut stack: Vec<FloorBuilder> = (0..2)
            .map(|level| {
                let mut floor = FloorBuilder::new(level, 1, 6, PartitionTree::single(rect));
                fill_rooms(&mut floor);
                floor
            })
            .collect();

        let err = place_stairs(&mut stack, &mut SeededRandom::new(3)).expect_err("no 2x2 fits");
        assert_eq!(err, GenerationError::StairPlacementImpossible { lower_level: 0 });
    }
}
