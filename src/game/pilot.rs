use super::direction::Direction;
use super::grid::{Grid, Pos};
use super::obstacles::Obstacles;
use super::rival::Rival;
use super::snake::Snake;
use crate::consts;
use enum_dispatch::enum_dispatch;
use rand::RngCore;
use std::collections::VecDeque;

/// What a pilot can see of the board when deciding where to go
#[derive(Clone, Copy, Debug)]
pub(crate) struct Arena<'a> {
    pub(crate) grid: Grid,
    pub(crate) food: Pos,
    pub(crate) obstacles: &'a Obstacles,
    /// The other snake on the board, if any
    pub(crate) opponent: Option<&'a Snake>,
}

/// Something that chooses which way a snake should turn before it moves
#[enum_dispatch]
pub(crate) trait Steer {
    fn steer(&mut self, snake: &mut Snake, arena: &Arena<'_>, rng: &mut dyn RngCore);
}

#[enum_dispatch(Steer)]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Pilot {
    Keyboard,
    Rival,
}

/// Steering by the player.  Key presses are queued so that two quick turns
/// within a single tick (e.g., up then left to make a U-turn) both take
/// effect, one per tick.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Keyboard {
    queue: VecDeque<Direction>,
}

impl Keyboard {
    /// Queue a direction press.  Presses beyond the buffer's capacity and
    /// repeats of the last queued direction are dropped.
    pub(crate) fn press(&mut self, direction: Direction) {
        if self.queue.len() < consts::INPUT_BUFFER && self.queue.back() != Some(&direction) {
            self.queue.push_back(direction);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }

    #[cfg(test)]
    pub(crate) fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl Steer for Keyboard {
    fn steer(&mut self, snake: &mut Snake, _arena: &Arena<'_>, _rng: &mut dyn RngCore) {
        // A refused reversal still uses up its tick so that the next press
        // gets evaluated against the direction actually being travelled.
        if let Some(d) = self.queue.pop_front() {
            let _ = snake.set_direction(d);
        }
    }
}

/// A snake together with whatever is steering it
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Contender {
    pub(crate) snake: Snake,
    pub(crate) pilot: Pilot,
}

impl Contender {
    pub(crate) fn new(snake: Snake, pilot: Pilot) -> Contender {
        Contender { snake, pilot }
    }

    /// Let the pilot steer, then move one cell
    pub(crate) fn advance(&mut self, arena: &Arena<'_>, rng: &mut dyn RngCore) {
        self.pilot.steer(&mut self.snake, arena, rng);
        self.snake.step();
    }

    pub(crate) fn keyboard(&mut self) -> Option<&mut Keyboard> {
        match self.pilot {
            Pilot::Keyboard(ref mut kb) => Some(kb),
            Pilot::Rival(_) => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn rival(&self) -> Option<&Rival> {
        match self.pilot {
            Pilot::Rival(ref r) => Some(r),
            Pilot::Keyboard(_) => None,
        }
    }
}
