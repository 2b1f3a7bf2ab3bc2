use super::grid::{Grid, Pos};
use crate::consts;
use rand::Rng;

/// Pick a random cell on `grid` for which `occupied` is false, trying at
/// most [`PLACEMENT_ATTEMPTS`][consts::PLACEMENT_ATTEMPTS] times.
///
/// Returns `None` if every attempt landed on an occupied cell, which the
/// engine takes to mean the board is full.
pub(crate) fn relocate<R, F>(grid: Grid, occupied: F, rng: &mut R) -> Option<Pos>
where
    R: Rng + ?Sized,
    F: Fn(Pos) -> bool,
{
    (0..consts::PLACEMENT_ATTEMPTS)
        .map(|_| {
            Pos::new(
                rng.random_range(0..grid.width()),
                rng.random_range(0..grid.height()),
            )
        })
        .find(|&p| !occupied(p))
}
