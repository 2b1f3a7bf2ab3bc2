//! The AI-controlled rival snake's decision-making.
//!
//! Each tick the rival (1) watches where the player's head went, (2) picks a
//! strategy from how far each snake is from the food, (3) turns that
//! strategy into a target cell, and (4) takes the single legal step that
//! gets closest to the target.  There is no lookahead: the rival can and
//! will walk into dead ends.
use super::direction::Direction;
use super::grid::Pos;
use super::pilot::{Arena, Steer};
use super::snake::Snake;
use crate::consts;
use rand::{Rng, RngCore};

/// The rival's intent for a tick, before it's resolved into a direction
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Strategy {
    /// Head for the point between the player and the food
    Block,

    /// Head straight for the food
    Collect,

    /// Go for the food, but back off first if the player is close
    Cautious,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Rival {
    /// Probability of trying to block when the player is closer to the food
    aggressiveness: f64,

    /// The player's head as of the previous tick
    last_seen: Option<Pos>,

    /// Where the player's head is expected to be over the next two ticks,
    /// extrapolated from its last move
    predicted: Option<[Pos; 2]>,
}

impl Default for Rival {
    fn default() -> Rival {
        Rival::new(consts::RIVAL_AGGRESSIVENESS)
    }
}

impl Rival {
    pub(crate) fn new(aggressiveness: f64) -> Rival {
        Rival {
            aggressiveness,
            last_seen: None,
            predicted: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn predicted(&self) -> Option<[Pos; 2]> {
        self.predicted
    }

    /// Record the opponent's head and, if it was seen on an earlier tick,
    /// extrapolate its next two positions from its latest displacement.
    pub(crate) fn observe(&mut self, opponent_head: Pos) {
        if let Some(last) = self.last_seen {
            let delta = opponent_head.delta_from(last);
            self.predicted = Some([opponent_head.shift(delta, 1), opponent_head.shift(delta, 2)]);
        }
        self.last_seen = Some(opponent_head);
    }

    /// Decide how to play this tick.  The random draw is only made when the
    /// opponent is nearer the food, so blocking is never certain.
    pub(crate) fn choose_strategy<R: Rng + ?Sized>(
        &self,
        me: Pos,
        opponent: Pos,
        food: Pos,
        rng: &mut R,
    ) -> Strategy {
        let mine = me.manhattan(food);
        let theirs = opponent.manhattan(food);
        if theirs < mine && rng.random::<f64>() < self.aggressiveness {
            Strategy::Block
        } else if mine < theirs - consts::COLLECT_MARGIN {
            Strategy::Collect
        } else {
            Strategy::Cautious
        }
    }

    /// Turn a strategy into the cell to steer towards
    pub(crate) fn target(strategy: Strategy, me: Pos, opponent: Pos, food: Pos) -> Pos {
        match strategy {
            Strategy::Block => opponent.midpoint(food),
            Strategy::Collect => food,
            Strategy::Cautious if me.manhattan(opponent) < consts::CAUTION_RADIUS => {
                // Equal coordinates back off in the negative direction.
                let away = |mine: i32, theirs: i32| if mine > theirs { mine + 1 } else { mine - 1 };
                Pos::new(away(me.x, opponent.x), away(me.y, opponent.y))
            }
            Strategy::Cautious => food,
        }
    }

    /// Can `me` step onto `pos` without immediately hitting something?
    pub(crate) fn legal(me: &Snake, pos: Pos, arena: &Arena<'_>, opponent: &Snake) -> bool {
        arena.grid.contains(pos)
            && !me.occupies(pos)
            && !arena.obstacles.blocks(pos)
            && !opponent.occupies(pos)
    }

    /// Pick the legal step that ends nearest `target`.  Ties go to the
    /// direction evaluated first (up, down, left, right).  Returns `None` if
    /// every step is illegal.
    pub(crate) fn pathfind(
        me: &Snake,
        target: Pos,
        arena: &Arena<'_>,
        opponent: &Snake,
    ) -> Option<Direction> {
        let head = me.head();
        let mut best: Option<(Direction, i32)> = None;
        for d in Direction::ALL {
            let pos = head.step(d);
            if !Rival::legal(me, pos, arena, opponent) {
                continue;
            }
            let distance = pos.manhattan(target);
            if best.is_none_or(|(_, b)| distance < b) {
                best = Some((d, distance));
            }
        }
        best.map(|(d, _)| d)
    }

    /// Run the whole decision pipeline for one tick
    pub(crate) fn decide<R: Rng + ?Sized>(
        &mut self,
        me: &Snake,
        arena: &Arena<'_>,
        rng: &mut R,
    ) -> Option<Direction> {
        let opponent = arena.opponent?;
        self.observe(opponent.head());
        let strategy = self.choose_strategy(me.head(), opponent.head(), arena.food, rng);
        let target = Rival::target(strategy, me.head(), opponent.head(), arena.food);
        let choice = Rival::pathfind(me, target, arena, opponent);
        tracing::trace!(
            ?strategy,
            %target,
            ?choice,
            predicted = ?self.predicted,
            "rival decided"
        );
        choice
    }
}

impl Steer for Rival {
    fn steer(&mut self, snake: &mut Snake, arena: &Arena<'_>, rng: &mut dyn RngCore) {
        if let Some(d) = self.decide(snake, arena, rng) {
            snake.set_direction(d);
        }
    }
}
