//! Cell-space primitives shared by partitioning, wall topology, and stair placement.

use serde::Serialize;

/// Integer grid coordinate. `y` grows towards [`Direction::North`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Which edge of a cell a wall sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// Orientation of a partition cut.
///
/// A horizontal cut runs along the x axis and divides the height; a vertical
/// cut divides the width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SplitAxis {
    Horizontal,
    Vertical,
}

/// Axis-aligned rectangle in cell coordinates. `x_max`/`y_max` are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn x_max(self) -> i32 {
        self.x + self.width
    }

    pub fn y_max(self) -> i32 {
        self.y + self.height
    }

    pub fn area(self) -> i32 {
        self.width * self.height
    }

    /// Length of the side a cut along `axis` divides.
    pub fn span(self, axis: SplitAxis) -> i32 {
        match axis {
            SplitAxis::Horizontal => self.height,
            SplitAxis::Vertical => self.width,
        }
    }

    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= self.x && cell.x < self.x_max() && cell.y >= self.y && cell.y < self.y_max()
    }

    pub fn contains_rect(self, other: Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x_max() <= self.x_max()
            && other.y_max() <= self.y_max()
    }

    pub fn intersects(self, other: Self) -> bool {
        self.x < other.x_max()
            && other.x < self.x_max()
            && self.y < other.y_max()
            && other.y < self.y_max()
    }

    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (self.x..self.x_max())
            .flat_map(move |x| (self.y..self.y_max()).map(move |y| Cell::new(x, y)))
    }

    /// Cuts the rectangle `offset` cells from its origin along `axis`, returning
    /// the low half first.
    pub fn split(self, axis: SplitAxis, offset: i32) -> (Self, Self) {
        match axis {
            SplitAxis::Horizontal => (
                Self::new(self.x, self.y, self.width, offset),
                Self::new(self.x, self.y + offset, self.width, self.height - offset),
            ),
            SplitAxis::Vertical => (
                Self::new(self.x, self.y, offset, self.height),
                Self::new(self.x + offset, self.y, self.width - offset, self.height),
            ),
        }
    }

    /// Every outward-facing unit edge on the perimeter: north and south edges
    /// along the top and bottom rows, then east and west edges along the
    /// right and left columns.
    pub fn boundary_edges(self) -> impl Iterator<Item = (Cell, Direction)> {
        let rows = (self.x..self.x_max()).flat_map(move |x| {
            [
                (Cell::new(x, self.y_max() - 1), Direction::North),
                (Cell::new(x, self.y), Direction::South),
            ]
        });
        let columns = (self.y..self.y_max()).flat_map(move |y| {
            [
                (Cell::new(self.x_max() - 1, y), Direction::East),
                (Cell::new(self.x, y), Direction::West),
            ]
        });
        rows.chain(columns)
    }
}
