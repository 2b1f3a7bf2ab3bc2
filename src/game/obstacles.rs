use super::direction::Direction;
use super::grid::{Grid, Pos};
use crate::consts;
use rand::Rng;
use std::collections::HashSet;
use std::f64::consts::PI;

/// Everything on the board that a snake must not run into other than snakes
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Obstacles {
    fixed: HashSet<Pos>,
    moving: Vec<MovingObstacle>,
}

impl Obstacles {
    /// An empty board
    pub(crate) fn none() -> Obstacles {
        Obstacles::default()
    }

    /// Scatter `grid.area() / OBSTACLE_DENSITY` fixed obstacles over the
    /// board, keeping clear of the area around each of the `spawns` and of
    /// the cells ahead of them, and add a pair of obstacles patrolling the
    /// middle of the board.
    pub(crate) fn scatter<R: Rng + ?Sized>(
        grid: Grid,
        spawns: &[(Pos, Direction)],
        rng: &mut R,
    ) -> Obstacles {
        let mut keep_clear = HashSet::new();
        for &(start, direction) in spawns {
            keep_clear.extend(
                std::iter::successors(Some(start), |&p| direction.advance(p, grid))
                    .take(consts::FORWARDS_CLEARANCE),
            );
        }
        let near_spawn = |p: Pos| {
            keep_clear.contains(&p)
                || spawns.iter().any(|&(s, _)| {
                    (p.x - s.x).abs() < consts::SPAWN_CLEARANCE
                        && (p.y - s.y).abs() < consts::SPAWN_CLEARANCE
                })
        };
        let mut fixed = HashSet::new();
        for _ in 0..(grid.area() / consts::OBSTACLE_DENSITY) {
            let spot = (0..consts::PLACEMENT_ATTEMPTS)
                .map(|_| {
                    Pos::new(
                        rng.random_range(0..grid.width()),
                        rng.random_range(0..grid.height()),
                    )
                })
                .find(|&p| !near_spawn(p) && !fixed.contains(&p));
            if let Some(p) = spot {
                fixed.insert(p);
            }
        }
        let left = grid.width() / 3;
        let right = grid.width() - 1 - grid.width() / 3;
        let moving = [grid.height() / 4, grid.height() - 1 - grid.height() / 4]
            .into_iter()
            .map(|row| {
                MovingObstacle::new(
                    Pos::new(left, row),
                    Pos::new(right, row),
                    consts::MOVING_OBSTACLE_SPEED,
                )
            })
            .collect();
        Obstacles { fixed, moving }
    }

    #[cfg(test)]
    pub(crate) fn from_cells<I: IntoIterator<Item = Pos>>(cells: I) -> Obstacles {
        Obstacles {
            fixed: cells.into_iter().collect(),
            moving: Vec::new(),
        }
    }

    /// Is `pos` currently blocked by a fixed or moving obstacle?
    pub(crate) fn blocks(&self, pos: Pos) -> bool {
        self.fixed.contains(&pos) || self.moving.iter().any(|m| m.position() == pos)
    }

    pub(crate) fn fixed(&self) -> &HashSet<Pos> {
        &self.fixed
    }

    pub(crate) fn moving(&self) -> &[MovingObstacle] {
        &self.moving
    }

    /// Advance every moving obstacle by one frame
    pub(crate) fn animate(&mut self) {
        for m in &mut self.moving {
            m.advance();
        }
    }
}

/// An obstacle sliding back and forth between two cells with an eased
/// motion.  Only the cell it currently occupies matters for collisions.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MovingObstacle {
    start: Pos,
    end: Pos,
    /// Progress from `start` (0.0) to `end` (1.0)
    phase: f64,
    /// +1.0 when heading towards `end`, -1.0 when heading back
    heading: f64,
    speed: f64,
}

impl MovingObstacle {
    pub(crate) fn new(start: Pos, end: Pos, speed: f64) -> MovingObstacle {
        MovingObstacle {
            start,
            end,
            phase: 0.0,
            heading: 1.0,
            speed,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.phase += self.speed * self.heading;
        if self.phase >= 1.0 {
            self.phase = 1.0;
            self.heading = -1.0;
        } else if self.phase <= 0.0 {
            self.phase = 0.0;
            self.heading = 1.0;
        }
    }

    #[cfg(test)]
    pub(crate) fn heading_to_end(&self) -> bool {
        self.heading > 0.0
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn position(&self) -> Pos {
        let t = -((PI * self.phase).cos() - 1.0) / 2.0;
        let lerp = |a: i32, b: i32| (f64::from(a) + f64::from(b - a) * t).floor() as i32;
        Pos::new(lerp(self.start.x, self.end.x), lerp(self.start.y, self.end.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn moving_obstacle_bounces() {
        let mut m = MovingObstacle::new(Pos::new(2, 3), Pos::new(12, 3), 0.25);
        assert_eq!(m.position(), Pos::new(2, 3));
        for _ in 0..4 {
            m.advance();
        }
        assert_eq!(m.position(), Pos::new(12, 3));
        assert!(!m.heading_to_end());
        for _ in 0..4 {
            m.advance();
        }
        assert_eq!(m.position(), Pos::new(2, 3));
        assert!(m.heading_to_end());
    }

    #[test]
    fn moving_obstacle_eases() {
        let mut m = MovingObstacle::new(Pos::new(0, 0), Pos::new(11, 0), 0.5);
        m.advance();
        // Halfway through the phase is halfway along the path
        assert_eq!(m.position(), Pos::new(5, 0));
        let mut m = MovingObstacle::new(Pos::new(0, 0), Pos::new(10, 0), 0.25);
        m.advance();
        // -(cos(π/4) - 1) / 2 ≈ 0.146
        assert_eq!(m.position(), Pos::new(1, 0));
    }

    #[test]
    fn scatter_keeps_spawns_clear() {
        let grid = Grid::new(50, 15);
        let spawns = [grid.player_spawn(), grid.rival_spawn()];
        for seed in 0..20 {
            let mut rng = ChaCha12Rng::seed_from_u64(seed);
            let obstacles = Obstacles::scatter(grid, &spawns, &mut rng);
            assert!(!obstacles.fixed().is_empty());
            assert!(obstacles.fixed().len() <= grid.area() / consts::OBSTACLE_DENSITY);
            for &p in obstacles.fixed() {
                assert!(grid.contains(p));
                for &(s, _) in &spawns {
                    assert!(
                        (p.x - s.x).abs() >= consts::SPAWN_CLEARANCE
                            || (p.y - s.y).abs() >= consts::SPAWN_CLEARANCE,
                        "obstacle {p} too close to spawn {s}"
                    );
                }
            }
            let (start, direction) = grid.player_spawn();
            let mut ahead = start;
            for _ in 0..consts::FORWARDS_CLEARANCE {
                assert!(!obstacles.fixed().contains(&ahead));
                ahead = ahead.step(direction);
            }
            assert_eq!(obstacles.moving().len(), 2);
        }
    }

    #[test]
    fn blocks_moving_cell() {
        let mut obstacles = Obstacles::none();
        assert!(!obstacles.blocks(Pos::new(0, 0)));
        obstacles
            .moving
            .push(MovingObstacle::new(Pos::new(3, 1), Pos::new(9, 1), 0.1));
        assert!(obstacles.blocks(Pos::new(3, 1)));
        for _ in 0..11 {
            obstacles.animate();
        }
        assert!(!obstacles.blocks(Pos::new(3, 1)));
        assert!(obstacles.blocks(Pos::new(9, 1)));
    }
}
