//! The rules of the game, independent of terminals and clocks
use super::direction::Direction;
use super::food;
use super::grid::{Grid, Pos};
use super::obstacles::Obstacles;
use super::particles::{Burst, Particles};
use super::pilot::{Arena, Contender, Keyboard, Pilot};
use super::rival::Rival;
use super::snake::Snake;
use super::state::{Collision, GameState, Outcome, Phase};
use crate::audio::Cue;
use crate::consts;
use crate::options::{Choice, Options};
use rand::{rngs::StdRng, Rng};
use std::sync::mpsc::Sender;
use std::time::Duration;

/// What is reported about a session once it's over
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SessionSummary {
    pub(crate) options: Options,
    pub(crate) outcome: Outcome,
    pub(crate) score: u32,
    pub(crate) best_streak: u32,
    pub(crate) food_eaten: u32,
    /// Total time spent moving, not counting pauses
    pub(crate) elapsed: Duration,
    /// Whether the session beat the high score it started with
    pub(crate) new_high_score: bool,
}

/// A game session: the board, the snakes, and the rules that move them.
///
/// The engine does nothing on its own.  Its owner calls [`Engine::tick()`]
/// every time the current [`interval`](Engine::interval) elapses and
/// [`Engine::animate()`] once per displayed frame.
#[derive(Debug)]
pub(crate) struct Engine<R = StdRng> {
    rng: R,
    options: Options,
    grid: Grid,
    state: GameState,
    player: Contender,
    rival: Option<Contender>,
    food: Pos,
    obstacles: Obstacles,
    particles: Particles,
    /// Current time between ticks
    interval: Duration,
    /// Time left in a timed session
    remaining: Option<Duration>,
    elapsed: Duration,
    streak: u32,
    best_streak: u32,
    food_eaten: u32,
    /// Where the player crashed, if it did
    crash: Option<Pos>,
    cues: Vec<Cue>,
    sink: Sender<SessionSummary>,
}

impl<R: Rng> Engine<R> {
    /// Create an engine sitting at the menu.  Each finished session is
    /// reported through `sink`.
    pub(crate) fn new(
        options: Options,
        high_score: u32,
        sink: Sender<SessionSummary>,
        rng: R,
    ) -> Engine<R> {
        let grid = Grid::new(
            options.board_size.as_size().width,
            options.board_size.as_size().height,
        );
        let (start, direction) = grid.player_spawn();
        Engine {
            rng,
            options,
            grid,
            state: GameState::new(high_score),
            player: Contender::new(
                Snake::new(start, direction),
                Pilot::from(Keyboard::default()),
            ),
            rival: None,
            food: Pos::default(),
            obstacles: Obstacles::none(),
            particles: Particles::default(),
            interval: options.difficulty.base_interval(),
            remaining: options.mode.time_limit(),
            elapsed: Duration::ZERO,
            streak: 0,
            best_streak: 0,
            food_eaten: 0,
            crash: None,
            cues: Vec::new(),
            sink,
        }
    }

    /// Begin a new session from the menu or a game over.  Returns `false`
    /// if the engine was in any other phase.
    pub(crate) fn start(&mut self) -> bool {
        if !self.state.start() {
            return false;
        }
        self.setup();
        tracing::info!(
            mode = self.options.mode.as_str(),
            difficulty = self.options.difficulty.as_str(),
            board_size = self.options.board_size.as_str(),
            rival = self.options.rival,
            "session started"
        );
        if !self.relocate_food() {
            self.finish(Outcome::Won);
        }
        true
    }

    /// Abandon the current session, if paused, and begin a new one.  An
    /// abandoned session is not reported.
    pub(crate) fn restart(&mut self) -> bool {
        if self.state.phase() == Phase::Paused {
            tracing::info!(score = self.state.score(), "session abandoned");
            let _ = self.state.to_menu();
        }
        self.start()
    }

    pub(crate) fn pause(&mut self) -> bool {
        let paused = self.state.pause();
        if paused {
            // Turns queued before pausing don't carry over into the resumed
            // session
            if let Some(kb) = self.player.keyboard() {
                kb.clear();
            }
            self.cues.push(Cue::Pause);
        }
        paused
    }

    pub(crate) fn resume(&mut self) -> bool {
        self.state.resume()
    }

    /// Leave a paused or finished session for the menu
    pub(crate) fn to_menu(&mut self) -> bool {
        if self.state.phase() == Phase::Paused {
            tracing::info!(score = self.state.score(), "session abandoned");
        }
        self.state.to_menu()
    }

    /// Queue a turn for the player's snake
    pub(crate) fn steer(&mut self, direction: Direction) {
        if !self.state.playing() {
            return;
        }
        if let Some(kb) = self.player.keyboard() {
            kb.press(direction);
        }
    }

    /// Run one step of the game.  Does nothing unless a session is in play.
    pub(crate) fn tick(&mut self) {
        if !self.state.playing() {
            return;
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(self.interval);
            if remaining.is_zero() {
                self.finish(Outcome::TimeUp);
                return;
            }
        }

        let arena = Arena {
            grid: self.grid,
            food: self.food,
            obstacles: &self.obstacles,
            opponent: self.rival.as_ref().map(|r| &r.snake),
        };
        self.player.advance(&arena, &mut self.rng);
        if let Some(rival) = self.rival.as_mut() {
            let arena = Arena {
                grid: self.grid,
                food: self.food,
                obstacles: &self.obstacles,
                opponent: Some(&self.player.snake),
            };
            rival.advance(&arena, &mut self.rng);
        }

        let head = self.player.snake.head();
        if head == self.food {
            self.player.snake.grow();
            self.state.add_point();
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            self.food_eaten += 1;
            self.cues.push(Cue::Eat);
            self.particles.spawn(Burst::Food, head, &mut self.rng);
            if self.state.score() % consts::LEVEL_UP_EVERY == 0 {
                self.cues.push(Cue::LevelUp);
            }
            self.interval = self.options.difficulty.interval(self.food_eaten);
            if !self.relocate_food() {
                self.finish(Outcome::Won);
                return;
            }
        } else if let Some(rival) = self
            .rival
            .as_mut()
            .filter(|r| r.snake.head() == self.food)
        {
            rival.snake.grow();
            self.streak = 0;
            if !self.relocate_food() {
                self.finish(Outcome::Won);
                return;
            }
        }

        let rival_snake = self.rival.as_ref().map(|r| &r.snake);
        if let Some(collision) =
            collision(&self.player.snake, self.grid, &self.obstacles, rival_snake)
        {
            self.crash = Some(head);
            self.particles.spawn(Burst::Explosion, head, &mut self.rng);
            self.finish(Outcome::Crashed(collision));
            return;
        }

        if let Some(rival) = self.rival.as_ref() {
            if let Some(collision) = collision(
                &rival.snake,
                self.grid,
                &self.obstacles,
                Some(&self.player.snake),
            ) {
                let at = rival.snake.head();
                tracing::info!(?collision, %at, "rival eliminated");
                self.particles.spawn(Burst::Explosion, at, &mut self.rng);
                self.rival = None;
            }
        }

        self.elapsed += self.interval;
    }

    /// Advance the cosmetic parts of the board by one frame
    pub(crate) fn animate(&mut self) {
        self.particles.advance();
        if self.state.playing() {
            self.obstacles.animate();
        }
    }

    /// Take the sound cues raised since the last call
    pub(crate) fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Lay out a fresh board for the current options
    fn setup(&mut self) {
        let player_spawn = self.grid.player_spawn();
        self.player.snake.reset(player_spawn.0, player_spawn.1);
        if let Some(kb) = self.player.keyboard() {
            kb.clear();
        }
        let mut spawns = vec![player_spawn];
        self.rival = if self.options.rival {
            let rival_spawn = self.grid.rival_spawn();
            spawns.push(rival_spawn);
            Some(Contender::new(
                Snake::new(rival_spawn.0, rival_spawn.1),
                Pilot::from(Rival::default()),
            ))
        } else {
            None
        };
        self.obstacles = if self.options.mode.has_obstacles() {
            Obstacles::scatter(self.grid, &spawns, &mut self.rng)
        } else {
            Obstacles::none()
        };
        self.particles.clear();
        self.interval = self.options.difficulty.base_interval();
        self.remaining = self.options.mode.time_limit();
        self.elapsed = Duration::ZERO;
        self.streak = 0;
        self.best_streak = 0;
        self.food_eaten = 0;
        self.crash = None;
    }

    /// Move the food to a random free cell.  Returns `false` if no free
    /// cell could be found.
    fn relocate_food(&mut self) -> bool {
        let Engine {
            grid,
            player,
            rival,
            obstacles,
            rng,
            ..
        } = self;
        let occupied = |p: Pos| {
            player.snake.occupies(p)
                || rival.as_ref().is_some_and(|r| r.snake.occupies(p))
                || obstacles.blocks(p)
        };
        match food::relocate(*grid, occupied, rng) {
            Some(p) => {
                self.food = p;
                true
            }
            None => {
                tracing::info!("no free cell left for food");
                false
            }
        }
    }

    /// End the session in play and report it
    fn finish(&mut self, outcome: Outcome) {
        let previous_best = self.state.high_score();
        if !self.state.end(outcome) {
            return;
        }
        self.cues.push(Cue::GameOver);
        let summary = SessionSummary {
            options: self.options,
            outcome,
            score: self.state.score(),
            best_streak: self.best_streak,
            food_eaten: self.food_eaten,
            elapsed: self.elapsed,
            new_high_score: self.state.score() > previous_best,
        };
        tracing::info!(
            %outcome,
            score = summary.score,
            best_streak = summary.best_streak,
            new_high_score = summary.new_high_score,
            "session ended"
        );
        if self.sink.send(summary).is_err() {
            tracing::warn!("nobody is listening for session summaries");
        }
    }
}

impl<R> Engine<R> {
    pub(crate) fn options(&self) -> Options {
        self.options
    }

    pub(crate) fn grid(&self) -> Grid {
        self.grid
    }

    pub(crate) fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn player(&self) -> &Snake {
        &self.player.snake
    }

    pub(crate) fn rival(&self) -> Option<&Contender> {
        self.rival.as_ref()
    }

    pub(crate) fn food(&self) -> Pos {
        self.food
    }

    pub(crate) fn obstacles(&self) -> &Obstacles {
        &self.obstacles
    }

    pub(crate) fn particles(&self) -> &Particles {
        &self.particles
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    pub(crate) fn streak(&self) -> u32 {
        self.streak
    }

    pub(crate) fn crash(&self) -> Option<Pos> {
        self.crash
    }
}

/// Check what, if anything, `snake`'s head has run into
fn collision(
    snake: &Snake,
    grid: Grid,
    obstacles: &Obstacles,
    other: Option<&Snake>,
) -> Option<Collision> {
    let head = snake.head();
    if !grid.contains(head) {
        Some(Collision::Wall)
    } else if obstacles.blocks(head) {
        Some(Collision::Obstacle)
    } else if snake.self_collision() {
        Some(Collision::SelfBite)
    } else if other.is_some_and(|o| o.occupies(head)) {
        Some(Collision::Rival)
    } else {
        None
    }
}
