//! Wall topology: one record per unit edge, shared by the rooms on either side.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::geometry::{Cell, Direction};
use crate::model::{FloorBuilder, RoomId, Wall, WallKey};

/// Emits every boundary edge of every room and resolves it against the
/// floor's wall map. The first room to reach an edge becomes its A side; a
/// different room reaching the same edge becomes its B side.
pub(crate) fn build_walls(floor: &mut FloorBuilder) {
    let FloorBuilder { rooms, walls, .. } = floor;
    for room in rooms.iter() {
        for (cell, direction) in room.rect.boundary_edges() {
            add_wall(walls, cell, direction, room.id);
        }
    }
}

fn add_wall(walls: &mut BTreeMap<WallKey, Wall>, cell: Cell, direction: Direction, room: RoomId) {
    match walls.entry(WallKey::new(cell, direction)) {
        Entry::Vacant(slot) => {
            slot.insert(Wall::new(cell, direction, room));
        }
        Entry::Occupied(mut slot) => {
            let wall = slot.get_mut();
            if wall.room_a != room {
                debug_assert!(
                    wall.room_b.is_none_or(|existing| existing == room),
                    "edge {cell:?} {direction:?} reached by a third room"
                );
                wall.room_b = Some(room);
            }
        }
    }
}
