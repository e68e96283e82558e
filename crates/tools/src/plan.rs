//! ASCII floor plans. Each cell takes one character with wall slots between
//! cells, so a `w` by `d` floor renders as `2w+1` columns by `2d+1` rows.

use housegen::{Cell, CellKind, Direction, Floor, WallKind};

pub fn render(floor: &Floor) -> String {
    let (width, depth) = (floor.width() as i32, floor.depth() as i32);
    let mut canvas = Canvas::new(2 * width as usize + 1, 2 * depth as usize + 1);

    for (cell, kind) in floor.cells() {
        let glyph = match kind {
            CellKind::Empty => ' ',
            CellKind::Floor => '.',
            CellKind::Stair => 'S',
        };
        let (col, row) = center(cell, depth);
        canvas.put(col, row, glyph);
    }

    for wall in floor.walls() {
        let (col, row) = center(wall.cell(), depth);
        let (col, row, edge) = match wall.direction() {
            Direction::North => (col, row - 1, '-'),
            Direction::South => (col, row + 1, '-'),
            Direction::East => (col + 1, row, '|'),
            Direction::West => (col - 1, row, '|'),
        };
        let glyph = match wall.kind() {
            WallKind::Normal => edge,
            WallKind::Door => 'D',
            WallKind::Window => 'W',
        };
        canvas.put(col, row, glyph);
    }

    canvas.add_corners();
    canvas.into_string()
}

/// Canvas position of a cell, with north at the top.
fn center(cell: Cell, depth: i32) -> (i32, i32) {
    (2 * cell.x + 1, 2 * (depth - 1 - cell.y) + 1)
}

struct Canvas {
    width: usize,
    rows: Vec<Vec<char>>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self { width, rows: vec![vec![' '; width]; height] }
    }

    fn get(&self, col: i32, row: i32) -> char {
        if col < 0 || row < 0 {
            return ' ';
        }
        self.rows.get(row as usize).and_then(|line| line.get(col as usize)).copied().unwrap_or(' ')
    }

    fn put(&mut self, col: i32, row: i32, glyph: char) {
        if col < 0 || row < 0 {
            return;
        }
        let slot = self.rows.get_mut(row as usize).and_then(|line| line.get_mut(col as usize));
        if let Some(slot) = slot {
            *slot = glyph;
        }
    }

    /// Marks every grid corner that touches a wall slot.
    fn add_corners(&mut self) {
        for row in (0..self.rows.len() as i32).step_by(2) {
            for col in (0..self.width as i32).step_by(2) {
                let touches_wall = [(col - 1, row), (col + 1, row), (col, row - 1), (col, row + 1)]
                    .into_iter()
                    .any(|(c, r)| self.get(c, r) != ' ');
                if touches_wall {
                    self.put(col, row, '+');
                }
            }
        }
    }

    fn into_string(self) -> String {
        self.rows
            .into_iter()
            .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
