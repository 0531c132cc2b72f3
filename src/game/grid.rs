use super::direction::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta, without wrapping
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one step in a direction, without wrapping
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Fixed grid dimensions with wrap-around (toroidal) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    /// Both dimensions must be positive.
    pub fn new(width: i32, height: i32) -> Self {
        debug_assert!(width > 0 && height > 0, "grid must be non-empty");
        Self { width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    /// Map any coordinate pair onto the grid. Leaving one edge re-enters at the
    /// opposite one.
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell::new(
            cell.x.rem_euclid(self.width),
            cell.y.rem_euclid(self.height),
        )
    }

    /// One wrapped step from `cell` in `direction`
    pub fn step(&self, cell: Cell, direction: Direction) -> Cell {
        self.wrap(cell.moved_in_direction(direction))
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}
