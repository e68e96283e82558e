//! Generated building data: floors, rooms, walls, and stair links.
//!
//! Generation stages mutate a [`FloorBuilder`]; once every stage has run the
//! builders are frozen into [`Floor`]s, which only expose read access.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Serialize, Serializer};
use xxhash_rust::xxh3::xxh3_64;

use crate::geometry::{Cell, Direction, Rect};
use crate::partition::PartitionTree;

/// Side length of the square stair footprint.
pub const STAIR_SPAN: i32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CellKind {
    #[default]
    Empty,
    Floor,
    Stair,
}

/// Index of a room in its floor's room list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RoomId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub rect: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WallKind {
    Normal,
    Door,
    Window,
}

/// Identity of one unit edge of the grid.
///
/// South and west edges are folded onto the north and east edges of the
/// neighbouring cell, so both faces of a shared boundary produce equal keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WallKey {
    cell: Cell,
    direction: Direction,
}

impl WallKey {
    pub fn new(cell: Cell, direction: Direction) -> Self {
        match direction {
            Direction::North | Direction::East => Self { cell, direction },
            Direction::South => {
                Self { cell: cell.step(Direction::South), direction: Direction::North }
            }
            Direction::West => {
                Self { cell: cell.step(Direction::West), direction: Direction::East }
            }
        }
    }

    pub fn cell(self) -> Cell {
        self.cell
    }

    pub fn direction(self) -> Direction {
        self.direction
    }
}

/// One unit wall segment. `cell`/`direction` are as seen from the A-side room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Wall {
    pub(crate) cell: Cell,
    pub(crate) direction: Direction,
    pub(crate) kind: WallKind,
    pub(crate) room_a: RoomId,
    pub(crate) room_b: Option<RoomId>,
}

impl Wall {
    pub(crate) fn new(cell: Cell, direction: Direction, room: RoomId) -> Self {
        Self { cell, direction, kind: WallKind::Normal, room_a: room, room_b: None }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn key(&self) -> WallKey {
        WallKey::new(self.cell, self.direction)
    }

    pub fn kind(&self) -> WallKind {
        self.kind
    }

    pub fn room_a(&self) -> RoomId {
        self.room_a
    }

    pub fn room_b(&self) -> Option<RoomId> {
        self.room_b
    }

    pub fn is_exterior(&self) -> bool {
        self.room_b.is_none()
    }

    pub fn touches(&self, room: RoomId) -> bool {
        self.room_a == room || self.room_b == Some(room)
    }

    /// The room across this wall from `room`, if the wall is interior and touches it.
    pub fn other_side(&self, room: RoomId) -> Option<RoomId> {
        match self.room_b {
            Some(b) if self.room_a == room => Some(b),
            Some(b) if b == room => Some(self.room_a),
            _ => None,
        }
    }

    /// The cell just outside this wall, seen from the A side.
    pub fn outer_cell(&self) -> Cell {
        self.cell.step(self.direction)
    }
}

/// Vertical connection between floor `lower` and floor `upper`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StairLink {
    pub origin: Cell,
    pub lower: usize,
    pub upper: usize,
}

impl StairLink {
    pub fn footprint(&self) -> [Cell; 4] {
        let Cell { x, y } = self.origin;
        [Cell::new(x, y), Cell::new(x, y + 1), Cell::new(x + 1, y), Cell::new(x + 1, y + 1)]
    }

    pub fn footprint_rect(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, STAIR_SPAN, STAIR_SPAN)
    }
}

/// Mutable floor state threaded through the generation stages.
#[derive(Clone, Debug)]
pub(crate) struct FloorBuilder {
    pub(crate) level: usize,
    pub(crate) width: usize,
    pub(crate) depth: usize,
    pub(crate) grid: Vec<CellKind>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) walls: BTreeMap<WallKey, Wall>,
    pub(crate) partition: PartitionTree,
}

impl FloorBuilder {
    pub(crate) fn new(level: usize, width: usize, depth: usize, partition: PartitionTree) -> Self {
        Self {
            level,
            width,
            depth,
            grid: vec![CellKind::Empty; width * depth],
            rooms: Vec::new(),
            walls: BTreeMap::new(),
            partition,
        }
    }

    pub(crate) fn is_inside(&self, cell: Cell) -> bool {
        grid_index(self.width, self.depth, cell).is_some()
    }

    pub(crate) fn cell_kind(&self, cell: Cell) -> CellKind {
        grid_index(self.width, self.depth, cell).map_or(CellKind::Empty, |index| self.grid[index])
    }

    pub(crate) fn set_cell(&mut self, cell: Cell, kind: CellKind) {
        if let Some(index) = grid_index(self.width, self.depth, cell) {
            self.grid[index] = kind;
        }
    }

    pub(crate) fn push_room(&mut self, rect: Rect) -> RoomId {
        let id = RoomId(self.rooms.len());
        self.rooms.push(Room { id, rect });
        id
    }

    pub(crate) fn freeze(self) -> Floor {
        Floor {
            level: self.level,
            width: self.width,
            depth: self.depth,
            grid: self.grid,
            rooms: self.rooms,
            walls: self.walls,
            partition: self.partition,
        }
    }
}

fn grid_index(width: usize, depth: usize, cell: Cell) -> Option<usize> {
    let x = usize::try_from(cell.x).ok()?;
    let y = usize::try_from(cell.y).ok()?;
    (x < width && y < depth).then_some(y * width + x)
}

fn walls_as_list<S: Serializer>(
    walls: &BTreeMap<WallKey, Wall>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(walls.values())
}

/// One finished storey. Read-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Floor {
    level: usize,
    width: usize,
    depth: usize,
    grid: Vec<CellKind>,
    rooms: Vec<Room>,
    #[serde(serialize_with = "walls_as_list")]
    walls: BTreeMap<WallKey, Wall>,
    partition: PartitionTree,
}

impl Floor {
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_inside(&self, cell: Cell) -> bool {
        grid_index(self.width, self.depth, cell).is_some()
    }

    /// Kind of `cell`; anything off the grid reads as [`CellKind::Empty`].
    pub fn cell_kind(&self, cell: Cell) -> CellKind {
        grid_index(self.width, self.depth, cell).map_or(CellKind::Empty, |index| self.grid[index])
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, CellKind)> + '_ {
        Rect::new(0, 0, self.width as i32, self.depth as i32)
            .cells()
            .map(|cell| (cell, self.cell_kind(cell)))
    }

    pub fn count_cells(&self, kind: CellKind) -> usize {
        self.grid.iter().filter(|&&cell| cell == kind).count()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0)
    }

    /// Room whose rectangle contains `cell`.
    pub fn room_at(&self, cell: Cell) -> Option<&Room> {
        self.rooms.iter().find(|room| room.rect.contains(cell))
    }

    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls.values()
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Wall on the given edge, looked up from either face.
    pub fn wall(&self, cell: Cell, direction: Direction) -> Option<&Wall> {
        self.walls.get(&WallKey::new(cell, direction))
    }

    pub fn walls_of(&self, room: RoomId) -> impl Iterator<Item = &Wall> {
        self.walls.values().filter(move |wall| wall.touches(room))
    }

    pub fn partition(&self) -> &PartitionTree {
        &self.partition
    }

    /// Rooms reachable from `start` by walking through interior doors.
    pub fn reachable_from(&self, start: RoomId) -> BTreeSet<RoomId> {
        let mut seen = BTreeSet::from([start]);
        let mut open = VecDeque::from([start]);
        while let Some(room) = open.pop_front() {
            for wall in self.walls_of(room).filter(|wall| wall.kind == WallKind::Door) {
                if let Some(next) = wall.other_side(room)
                    && seen.insert(next)
                {
                    open.push_back(next);
                }
            }
        }
        seen
    }

    fn write_canonical_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.extend((self.level as u32).to_le_bytes());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.depth as u32).to_le_bytes());
        for cell in &self.grid {
            bytes.push(match cell {
                CellKind::Empty => 0,
                CellKind::Floor => 1,
                CellKind::Stair => 2,
            });
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            for value in [room.rect.x, room.rect.y, room.rect.width, room.rect.height] {
                bytes.extend(value.to_le_bytes());
            }
        }

        bytes.extend((self.walls.len() as u32).to_le_bytes());
        for wall in self.walls.values() {
            bytes.extend(wall.cell.x.to_le_bytes());
            bytes.extend(wall.cell.y.to_le_bytes());
            bytes.push(match wall.direction {
                Direction::North => 0,
                Direction::South => 1,
                Direction::East => 2,
                Direction::West => 3,
            });
            bytes.push(match wall.kind {
                WallKind::Normal => 0,
                WallKind::Door => 1,
                WallKind::Window => 2,
            });
            bytes.extend((wall.room_a.0 as u32).to_le_bytes());
            bytes.extend(wall.room_b.map_or(u32::MAX, |room| room.0 as u32).to_le_bytes());
        }
    }
}

/// A finished multi-storey building. Read-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Building {
    floors: Vec<Floor>,
    stairs: Vec<StairLink>,
}

impl Building {
    pub(crate) fn new(floors: Vec<Floor>, stairs: Vec<StairLink>) -> Self {
        Self { floors, stairs }
    }

    /// Floors in ascending level order; index equals [`Floor::level`].
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, level: usize) -> Option<&Floor> {
        self.floors.get(level)
    }

    pub fn stairs(&self) -> &[StairLink] {
        &self.stairs
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.floors.len() as u32).to_le_bytes());
        for floor in &self.floors {
            floor.write_canonical_bytes(&mut bytes);
        }
        bytes.extend((self.stairs.len() as u32).to_le_bytes());
        for stair in &self.stairs {
            bytes.extend(stair.origin.x.to_le_bytes());
            bytes.extend(stair.origin.y.to_le_bytes());
            bytes.extend((stair.lower as u32).to_le_bytes());
            bytes.extend((stair.upper as u32).to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_faces_of_an_edge_share_a_key() {
        let below = Cell::new(3, 4);
        let above = below.step(Direction::North);
        assert_eq!(WallKey::new(below, Direction::North), WallKey::new(above, Direction::South));

        let left = Cell::new(0, 0);
        let right = left.step(Direction::East);
        assert_eq!(WallKey::new(left, Direction::East), WallKey::new(right, Direction::West));

        assert_ne!(WallKey::new(left, Direction::North), WallKey::new(left, Direction::South));
    }

    #[test]
    fn wall_sides_resolve_from_either_room() {
        let mut wall = Wall::new(Cell::new(0, 0), Direction::East, RoomId(0));
        assert!(wall.is_exterior());
        assert_eq!(wall.other_side(RoomId(0)), None);

        wall.room_b = Some(RoomId(3));
        assert!(!wall.is_exterior());
        assert_eq!(wall.other_side(RoomId(0)), Some(RoomId(3)));
        assert_eq!(wall.other_side(RoomId(3)), Some(RoomId(0)));
        assert_eq!(wall.other_side(RoomId(1)), None);
        assert!(wall.touches(RoomId(3)) && !wall.touches(RoomId(1)));
        assert_eq!(wall.outer_cell(), Cell::new(1, 0));
    }

    #[test]
    fn stair_footprint_is_a_two_by_two_square() {
        let link = StairLink { origin: Cell::new(4, 7), lower: 0, upper: 1 };
        let rect = link.footprint_rect();
        assert_eq!(rect.area(), 4);
        assert!(link.footprint().iter().all(|cell| rect.contains(*cell)));
    }

    #[test]
    fn off_grid_cells_read_as_empty_and_ignore_writes() {
        let mut builder =
            FloorBuilder::new(0, 3, 2, PartitionTree::single(Rect::new(0, 0, 3, 2)));
        builder.set_cell(Cell::new(-1, 0), CellKind::Floor);
        builder.set_cell(Cell::new(3, 0), CellKind::Floor);
        builder.set_cell(Cell::new(2, 1), CellKind::Stair);

        let floor = builder.freeze();
        assert_eq!(floor.cell_kind(Cell::new(-1, 0)), CellKind::Empty);
        assert_eq!(floor.cell_kind(Cell::new(2, 1)), CellKind::Stair);
        assert_eq!(floor.count_cells(CellKind::Floor), 0);
        assert_eq!(floor.cells().count(), 6);
    }
}
