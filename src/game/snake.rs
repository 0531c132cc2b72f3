use super::direction::Direction;
use super::grid::{Cell, Grid};

/// One occupied cell of the body. `ahead` links to the next segment toward the
/// head; the head itself has none.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    cell: Cell,
    ahead: Option<usize>,
}

/// The snake, stored as an arena of segments chained from tail to head.
///
/// Slots freed by the tail are recycled, so growing and sliding are O(1) and the
/// arena never holds more slots than the longest body it has had.
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeBody {
    grid: Grid,
    segments: Vec<Segment>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
    direction: Direction,
}

impl SnakeBody {
    /// Create a snake of length 1 at `start`, moving in the default direction
    pub fn new(grid: Grid, start: Cell) -> Self {
        let mut snake = Self {
            grid,
            segments: Vec::new(),
            free: Vec::new(),
            head: 0,
            tail: 0,
            len: 0,
            direction: Direction::default(),
        };
        snake.reset(start);
        snake
    }

    /// Replace the whole body with a single segment at `center`
    pub fn reset(&mut self, center: Cell) {
        self.segments.clear();
        self.free.clear();
        let id = self.alloc(center, None);
        self.head = id;
        self.tail = id;
        self.len = 1;
        self.direction = Direction::default();
    }

    pub fn head(&self) -> Cell {
        self.segments[self.head].cell
    }

    pub fn tail(&self) -> Cell {
        self.segments[self.tail].cell
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a live snake has at least one segment
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current moving direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Adopt a new moving direction. Callers pass the effective direction from
    /// [`SnakeBody::next_head_cell`].
    pub fn turn(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Body cells from tail to head
    pub fn cells(&self) -> Cells<'_> {
        Cells {
            snake: self,
            next: Some(self.tail),
            remaining: self.len,
        }
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells().any(|c| c == cell)
    }

    /// Where the head would go next, and the direction it would travel in.
    /// A request to reverse is ignored in favour of the current direction.
    pub fn next_head_cell(&self, requested: Direction) -> (Cell, Direction) {
        let direction = self.direction.steer(requested);
        (self.grid.step(self.head(), direction), direction)
    }

    /// Grow at the front: new head at `cell`, tail untouched
    pub fn advance_head(&mut self, cell: Cell) {
        self.push_head(cell);
        self.len += 1;
    }

    /// Ordinary move: new head at `cell` and the tail segment dropped
    pub fn slide(&mut self, cell: Cell) {
        self.push_head(cell);
        let old_tail = self.tail;
        // push_head linked the old head forward, so even a length 1 body has a
        // segment ahead of its tail here.
        if let Some(next) = self.segments[old_tail].ahead {
            self.tail = next;
            self.free.push(old_tail);
        }
    }

    /// Grow at the back by duplicating the tail cell. The duplicate falls away
    /// on the next slide, which is what makes the body longer.
    pub fn grow_tail(&mut self) {
        let cell = self.tail();
        self.tail = self.alloc(cell, Some(self.tail));
        self.len += 1;
    }

    fn push_head(&mut self, cell: Cell) {
        let id = self.alloc(cell, None);
        self.segments[self.head].ahead = Some(id);
        self.head = id;
    }

    fn alloc(&mut self, cell: Cell, ahead: Option<usize>) -> usize {
        let segment = Segment { cell, ahead };
        match self.free.pop() {
            Some(id) => {
                self.segments[id] = segment;
                id
            }
            None => {
                self.segments.push(segment);
                self.segments.len() - 1
            }
        }
    }
}

/// Iterator over body cells, tail first
pub struct Cells<'a> {
    snake: &'a SnakeBody,
    next: Option<usize>,
    remaining: usize,
}

impl Iterator for Cells<'_> {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.remaining == 0 {
            return None;
        }
        let segment = self.snake.segments[self.next?];
        self.next = segment.ahead;
        self.remaining -= 1;
        Some(segment.cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Cells<'_> {}
