use super::grid::{Grid, Pos};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order in which candidate moves are evaluated.
    /// Earlier directions win ties.
    pub(crate) const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The unit vector for the direction, with y increasing downwards
    pub(crate) fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Return the neighbor of `pos` in this direction if it lies within
    /// `grid`
    pub(crate) fn advance(self, pos: Pos, grid: Grid) -> Option<Pos> {
        Some(pos.step(self)).filter(|&p| grid.contains(p))
    }
}
