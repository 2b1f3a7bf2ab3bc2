use super::direction::Direction;
use super::grid::Pos;
use std::collections::VecDeque;

/// A snake on the board
///
/// The body is stored head-first.  Positions are not bounded by the board:
/// a snake happily steps off the edge, and it's up to the engine to notice.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells occupied by the snake, with the head at the front
    pub(super) body: VecDeque<Pos>,

    /// The direction the snake moved in on its most recent step
    pub(super) direction: Direction,

    /// The direction the snake will move in on its next step
    pending: Direction,

    /// Whether the next step should leave the tail in place
    growing: bool,
}

impl Snake {
    /// Create a one-cell snake at `start` facing in `direction`
    pub(crate) fn new(start: Pos, direction: Direction) -> Snake {
        Snake {
            body: VecDeque::from([start]),
            direction,
            pending: direction,
            growing: false,
        }
    }

    /// Put the snake back to a single cell at `start` facing in `direction`
    pub(crate) fn reset(&mut self, start: Pos, direction: Direction) {
        *self = Snake::new(start, direction);
    }

    pub(crate) fn head(&self) -> Pos {
        self.body.front().copied().unwrap_or_default()
    }

    /// Return the cells occupied by the snake, head first
    pub(crate) fn body(&self) -> &VecDeque<Pos> {
        &self.body
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// Stage `direction` to be applied on the next step.  Turning straight
    /// back on the direction of the last step is refused, and `false` is
    /// returned.
    pub(crate) fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction.reverse() {
            return false;
        }
        self.pending = direction;
        true
    }

    /// Move one cell in the staged direction.  The tail follows unless the
    /// snake has eaten since its last step, in which case it grows by one.
    pub(crate) fn step(&mut self) {
        self.direction = self.pending;
        let head = self.head().step(self.direction);
        self.body.push_front(head);
        if self.growing {
            self.growing = false;
        } else {
            let _ = self.body.pop_back();
        }
    }

    /// Make the next step leave the tail in place
    pub(crate) fn grow(&mut self) {
        self.growing = true;
    }

    pub(crate) fn occupies(&self, pos: Pos) -> bool {
        self.body.contains(&pos)
    }

    /// Has the head run into the rest of the body?
    pub(crate) fn self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&p| p == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coiled() -> Snake {
        // A 5-cell snake heading up, about to turn back into itself
        let mut snake = Snake::new(Pos::new(3, 3), Direction::Up);
        snake.body = VecDeque::from([
            Pos::new(3, 3),
            Pos::new(3, 4),
            Pos::new(4, 4),
            Pos::new(4, 3),
            Pos::new(4, 2),
        ]);
        snake
    }

    #[test]
    fn step_keeps_length() {
        let mut snake = Snake::new(Pos::new(5, 5), Direction::Right);
        snake.step();
        assert_eq!(snake.head(), Pos::new(6, 5));
        assert_eq!(snake.len(), 1);
        let mut snake = coiled();
        snake.step();
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.head(), Pos::new(3, 2));
        assert!(!snake.occupies(Pos::new(4, 2)));
    }

    #[test]
    fn growth_adds_exactly_one() {
        let mut snake = Snake::new(Pos::new(5, 5), Direction::Right);
        snake.grow();
        snake.step();
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.body(), &VecDeque::from([Pos::new(6, 5), Pos::new(5, 5)]));
        snake.step();
        assert_eq!(snake.len(), 2, "growth flag should be one-shot");
    }

    #[test]
    fn reversal_refused() {
        let mut snake = Snake::new(Pos::new(5, 5), Direction::Right);
        assert!(!snake.set_direction(Direction::Left));
        snake.step();
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.head(), Pos::new(6, 5));
    }

    #[test]
    fn reversal_refused_within_one_tick() {
        // Up then Left within a single tick must not sneak a reversal in
        let mut snake = Snake::new(Pos::new(5, 5), Direction::Right);
        assert!(snake.set_direction(Direction::Up));
        assert!(!snake.set_direction(Direction::Left));
        snake.step();
        assert_eq!(snake.direction(), Direction::Up);
        assert_eq!(snake.head(), Pos::new(5, 4));
    }

    #[test]
    fn last_valid_turn_wins() {
        let mut snake = Snake::new(Pos::new(5, 5), Direction::Right);
        assert!(snake.set_direction(Direction::Up));
        assert!(snake.set_direction(Direction::Down));
        snake.step();
        assert_eq!(snake.direction(), Direction::Down);
    }

    #[test]
    fn single_cell_never_bites_itself() {
        let mut snake = Snake::new(Pos::new(0, 0), Direction::Down);
        for d in [Direction::Right, Direction::Up, Direction::Left, Direction::Down] {
            snake.set_direction(d);
            snake.step();
            assert!(!snake.self_collision());
        }
    }

    #[test]
    fn self_collision_after_step() {
        let mut snake = coiled();
        assert!(!snake.self_collision());
        assert!(snake.set_direction(Direction::Right));
        snake.step();
        assert_eq!(snake.head(), Pos::new(4, 3));
        assert!(snake.self_collision());
    }

    #[test]
    fn reset_clears_everything() {
        let mut snake = coiled();
        snake.grow();
        snake.reset(Pos::new(1, 1), Direction::Down);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Pos::new(1, 1));
        assert!(!snake.self_collision());
        snake.step();
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Pos::new(1, 2));
    }

    #[test]
    fn occupies_checks_whole_body() {
        let snake = coiled();
        assert!(snake.occupies(Pos::new(3, 3)));
        assert!(snake.occupies(Pos::new(4, 2)));
        assert!(!snake.occupies(Pos::new(2, 2)));
    }
}
