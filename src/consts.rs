//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Time between redraws of the game screen.  Particles and moving obstacles
/// advance once per frame; the snakes move on their own, slower clock.
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(33);

/// How much faster the snakes move each time the player eats
pub(crate) const INTERVAL_STEP: Duration = Duration::from_millis(2);

/// Length of a session in timed mode
pub(crate) const TIME_LIMIT: Duration = Duration::from_secs(60);

/// Play the level-up sound every time the score reaches a multiple of this
pub(crate) const LEVEL_UP_EVERY: u32 = 5;

/// Maximum number of direction presses remembered between ticks
pub(crate) const INPUT_BUFFER: usize = 2;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Probability that the rival tries to cut the player off when the player
/// is closer to the food
pub(crate) const RIVAL_AGGRESSIVENESS: f64 = 0.7;

/// The rival goes straight for the food only when it's more than this many
/// cells closer to it than the player
pub(crate) const COLLECT_MARGIN: i32 = 2;

/// When playing cautiously, the rival backs away from a player head closer
/// than this (Manhattan distance)
pub(crate) const CAUTION_RADIUS: i32 = 3;

/// Number of random cells to try before giving up on placing food or an
/// obstacle
pub(crate) const PLACEMENT_ATTEMPTS: usize = 100;

/// One fixed obstacle is placed per this many cells of the board
pub(crate) const OBSTACLE_DENSITY: usize = 40;

/// Keep obstacles out of the square of cells within this distance (on both
/// axes) of each snake's starting point, exclusive.
pub(crate) const SPAWN_CLEARANCE: i32 = 3;

/// When creating a level with random obstacles, remove any obstacles in front
/// of each snake's head this many cells forwards.
pub(crate) const FORWARDS_CLEARANCE: usize = 7;

/// Fraction of its path that a moving obstacle covers per frame
pub(crate) const MOVING_OBSTACLE_SPEED: f64 = 0.02;

/// Number of particles sprayed when the player eats
pub(crate) const FOOD_PARTICLES: usize = 12;

/// Number of particles thrown out when a snake crashes
pub(crate) const EXPLOSION_PARTICLES: usize = 20;

/// Maximum initial speed along each axis of a food particle, in cells per
/// frame
pub(crate) const FOOD_PARTICLE_SPREAD: f64 = 0.16;

/// Minimum initial speed of an explosion particle, in cells per frame
pub(crate) const EXPLOSION_MIN_SPEED: f64 = 0.08;

/// Maximum initial speed of an explosion particle, in cells per frame
pub(crate) const EXPLOSION_MAX_SPEED: f64 = 0.32;

/// Life lost by a food particle per frame
pub(crate) const FOOD_PARTICLE_DECAY: f64 = 0.02;

/// Life lost by an explosion particle per frame
pub(crate) const EXPLOSION_PARTICLE_DECAY: f64 = 0.015;

/// Downwards acceleration of food particles, in cells per frame per frame
pub(crate) const PARTICLE_GRAVITY: f64 = 0.008;

/// Factor applied to particle velocities every frame
pub(crate) const PARTICLE_DRAG: f64 = 0.98;

/// Particles with less life than this are drawn with
/// [`FADING_PARTICLE_SYMBOL`]
pub(crate) const PARTICLE_FADE: f64 = 0.4;

/// Glyph for the snake's head when it is moving north/up
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for fixed obstacles
pub(crate) const OBSTACLE_SYMBOL: char = '█';

/// Glyph for moving obstacles
pub(crate) const MOVING_OBSTACLE_SYMBOL: char = '▓';

/// Glyph for a particle in its prime
pub(crate) const PARTICLE_SYMBOL: char = '*';

/// Glyph for a particle that's about to disappear
pub(crate) const FADING_PARTICLE_SYMBOL: char = '·';

/// Glyph for a snake's head when it's collided with something
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the player's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the rival's head and body
pub(crate) const RIVAL_STYLE: Style = Style::new()
    .fg(Color::Magenta)
    .add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for obstacles
pub(crate) const OBSTACLE_STYLE: Style = Style::new().fg(Color::Gray);

/// Style for particles sprayed by eating
pub(crate) const FOOD_PARTICLE_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for particles thrown out by a crash
pub(crate) const EXPLOSION_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);
