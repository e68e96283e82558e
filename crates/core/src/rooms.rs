//! Turns partition leaves into rooms and stamps their cells onto the grid.

use crate::model::{CellKind, FloorBuilder};

/// Walks the floor's partition depth-first, creating one room per leaf.
///
/// Room ids follow leaf order, and each leaf records the room it produced.
pub(crate) fn fill_rooms(floor: &mut FloorBuilder) {
    for leaf in floor.partition.leaves() {
        let rect = floor.partition.node(leaf).rect;
        let room = floor.push_room(rect);
        floor.partition.assign_room(leaf, room);
        for cell in rect.cells() {
            floor.set_cell(cell, CellKind::Floor);
        }
    }
}
