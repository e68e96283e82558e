//! Door and window placement on a floor's wall graph.
//!
//! Doors go in before windows; both only ever claim `Normal` walls, so a
//! wall promoted to a door is never reconsidered for a window.

use std::collections::BTreeMap;

use crate::model::{FloorBuilder, RoomId, Wall, WallKey, WallKind};
use crate::rng::RandomSource;

pub const MAX_EXTERIOR_DOORS: usize = 2;
pub const MAX_WINDOWS_PER_ROOM: usize = 2;

/// Runs every placement pass in order. Exterior doors are only cut when
/// `ground_floor` is set.
pub(crate) fn place_openings(
    floor: &mut FloorBuilder,
    rng: &mut impl RandomSource,
    ground_floor: bool,
) {
    place_interior_doors(floor, rng);
    connect_rooms(floor, rng);
    if ground_floor {
        place_exterior_doors(floor, rng);
    }
    place_windows(floor, rng);
}

/// Each room with a `Normal` interior wall gets one of them turned into a door.
///
/// A room may still end up with several doors, since its neighbours' passes
/// can pick walls it shares with them.
fn place_interior_doors(floor: &mut FloorBuilder, rng: &mut impl RandomSource) {
    let FloorBuilder { rooms, walls, .. } = floor;
    for room in rooms.iter() {
        let pool = candidates(walls, |wall| !wall.is_exterior() && wall.touches(room.id));
        if let Some(key) = rng.choose(&pool) {
            set_kind(walls, *key, WallKind::Door);
        }
    }
}

/// Adds doors between rooms the interior pass left in separate door-connected
/// groups, until every room can reach every other.
fn connect_rooms(floor: &mut FloorBuilder, rng: &mut impl RandomSource) {
    let mut groups = RoomGroups::new(floor.rooms.len());
    for wall in floor.walls.values().filter(|wall| wall.kind == WallKind::Door) {
        if let Some(room_b) = wall.room_b {
            groups.join(wall.room_a, room_b);
        }
    }

    while groups.count > 1 {
        let pool = candidates(&floor.walls, |wall| {
            wall.room_b.is_some_and(|room_b| !groups.same(wall.room_a, room_b))
        });
        let Some(&key) = rng.choose(&pool) else {
            log::warn!(
                "floor {}: {} room groups left with no wall between them",
                floor.level,
                groups.count
            );
            break;
        };
        set_kind(&mut floor.walls, key, WallKind::Door);
        if let Some(wall) = floor.walls.get(&key)
            && let Some(room_b) = wall.room_b
        {
            groups.join(wall.room_a, room_b);
        }
    }
}

fn place_exterior_doors(floor: &mut FloorBuilder, rng: &mut impl RandomSource) {
    let pool = candidates(&floor.walls, Wall::is_exterior);
    let count = rng.range_usize(1, MAX_EXTERIOR_DOORS + 1);
    promote_without_replacement(&mut floor.walls, pool, count, WallKind::Door, rng);
}

/// Gives each room between one and [`MAX_WINDOWS_PER_ROOM`] windows on its
/// exterior walls; rooms without a free exterior wall get none.
fn place_windows(floor: &mut FloorBuilder, rng: &mut impl RandomSource) {
    let FloorBuilder { rooms, walls, .. } = floor;
    for room in rooms.iter() {
        let pool = candidates(walls, |wall| wall.is_exterior() && wall.touches(room.id));
        let count = rng.range_usize(1, (MAX_WINDOWS_PER_ROOM + 1).min(pool.len() + 1));
        promote_without_replacement(walls, pool, count, WallKind::Window, rng);
    }
}

/// Keys of `Normal` walls matching `filter`, in key order.
fn candidates(
    walls: &BTreeMap<WallKey, Wall>,
    mut filter: impl FnMut(&Wall) -> bool,
) -> Vec<WallKey> {
    walls
        .iter()
        .filter(|(_, wall)| wall.kind == WallKind::Normal && filter(wall))
        .map(|(key, _)| *key)
        .collect()
}

fn promote_without_replacement(
    walls: &mut BTreeMap<WallKey, Wall>,
    mut pool: Vec<WallKey>,
    count: usize,
    kind: WallKind,
    rng: &mut impl RandomSource,
) {
    for _ in 0..count {
        if pool.is_empty() {
            break;
        }
        let key = pool.remove(rng.range_usize(0, pool.len()));
        set_kind(walls, key, kind);
    }
}

fn set_kind(walls: &mut BTreeMap<WallKey, Wall>, key: WallKey, kind: WallKind) {
    if let Some(wall) = walls.get_mut(&key) {
        wall.kind = kind;
    }
}

/// Disjoint sets of rooms joined by doors.
struct RoomGroups {
    parent: Vec<usize>,
    count: usize,
}

impl RoomGroups {
    fn new(rooms: usize) -> Self {
        Self { parent: (0..rooms).collect(), count: rooms }
    }

    fn root(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    fn same(&mut self, a: RoomId, b: RoomId) -> bool {
        self.root(a.0) == self.root(b.0)
    }

    fn join(&mut self, a: RoomId, b: RoomId) {
        let (root_a, root_b) = (self.root(a.0), self.root(b.0));
        if root_a != root_b {
            self.parent[root_b] = root_a;
            self.count -= 1;
        }
    }
}
