use super::direction::Direction;
use std::fmt;

/// A cell on the board, in tile coordinates relative to the top-left corner.
///
/// Coordinates are signed so that a head which has just left the board can
/// still be represented (and detected as out of bounds).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Pos {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Pos {
    pub(crate) const fn new(x: i32, y: i32) -> Pos {
        Pos { x, y }
    }

    /// Return the neighboring cell in the given direction
    pub(crate) fn step(self, direction: Direction) -> Pos {
        let (dx, dy) = direction.delta();
        Pos::new(self.x + dx, self.y + dy)
    }

    /// Return `self` displaced by `times` multiples of the vector `by`
    pub(crate) fn shift(self, by: (i32, i32), times: i32) -> Pos {
        Pos::new(self.x + by.0 * times, self.y + by.1 * times)
    }

    /// The displacement from `from` to `self`
    pub(crate) fn delta_from(self, from: Pos) -> (i32, i32) {
        (self.x - from.x, self.y - from.y)
    }

    pub(crate) fn manhattan(self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The cell halfway between `self` and `other`, flooring each axis
    /// independently
    pub(crate) fn midpoint(self, other: Pos) -> Pos {
        Pos::new(
            (self.x + other.x).div_euclid(2),
            (self.y + other.y).div_euclid(2),
        )
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The discretized board: `width` × `height` tiles, with (0, 0) at the
/// top-left.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub(crate) fn new(width: u16, height: u16) -> Grid {
        Grid {
            width: i32::from(width),
            height: i32::from(height),
        }
    }

    pub(crate) fn width(self) -> i32 {
        self.width
    }

    pub(crate) fn height(self) -> i32 {
        self.height
    }

    /// Return the number of tiles on the board
    pub(crate) fn area(self) -> usize {
        usize::try_from(self.width * self.height).unwrap_or_default()
    }

    pub(crate) fn contains(self, pos: Pos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Iterate over every cell on the board in row-major order
    #[cfg(test)]
    pub(crate) fn cells(self) -> impl Iterator<Item = Pos> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos::new(x, y)))
    }

    /// Where the player's snake starts a session, and which way it faces
    pub(crate) fn player_spawn(self) -> (Pos, Direction) {
        (
            Pos::new(self.width / 6, self.height / 3),
            Direction::Right,
        )
    }

    /// Where the rival's snake starts a session, and which way it faces
    pub(crate) fn rival_spawn(self) -> (Pos, Direction) {
        (
            Pos::new(
                self.width - 1 - self.width / 6,
                self.height - 1 - self.height / 3,
            ),
            Direction::Left,
        )
    }
}
