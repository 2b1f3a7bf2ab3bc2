use super::direction::Direction;
use super::engine::Engine;
use super::grid::{Grid, Pos};
use super::obstacles::Obstacles;
use super::particles::{Burst, Particles};
use super::snake::Snake;
use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Rect, Size},
    style::Style,
    widgets::{Block, Widget},
};

/// Everything that's visible on the board in a single frame
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scene<'a> {
    pub(crate) grid: Grid,
    pub(crate) player: &'a Snake,
    pub(crate) rival: Option<&'a Snake>,
    pub(crate) food: Pos,
    pub(crate) obstacles: &'a Obstacles,
    pub(crate) particles: &'a Particles,
    /// Where the player crashed, if it did
    pub(crate) crash: Option<Pos>,
}

impl<'a, R> From<&'a Engine<R>> for Scene<'a> {
    fn from(engine: &'a Engine<R>) -> Scene<'a> {
        Scene {
            grid: engine.grid(),
            player: engine.player(),
            rival: engine.rival().map(|r| &r.snake),
            food: engine.food(),
            obstacles: engine.obstacles(),
            particles: engine.particles(),
            crash: engine.crash(),
        }
    }
}

impl Scene<'_> {
    /// The size of the board, including its border
    pub(crate) fn size(&self) -> Size {
        let width = u16::try_from(self.grid.width()).unwrap_or(u16::MAX);
        let height = u16::try_from(self.grid.height()).unwrap_or(u16::MAX);
        Size {
            width: width.saturating_add(2),
            height: height.saturating_add(2),
        }
    }
}

impl Widget for Scene<'_> {
    // `area` should be the size returned by `Scene::size()`; anything that
    // doesn't fit is clipped.
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::bordered().render(area, buf);
        let mut canvas = Canvas { area, buf };
        // Particles go underneath everything else so that they never hide
        // anything that matters.
        for p in self.particles {
            let symbol = if p.life < consts::PARTICLE_FADE {
                consts::FADING_PARTICLE_SYMBOL
            } else {
                consts::PARTICLE_SYMBOL
            };
            let style = match p.kind {
                Burst::Food => consts::FOOD_PARTICLE_STYLE,
                Burst::Explosion => consts::EXPLOSION_STYLE,
            };
            let pos = Pos::new(p.x.floor() as i32, p.y.floor() as i32);
            if self.grid.contains(pos) {
                canvas.draw_cell(pos, symbol, style);
            }
        }
        for &pos in self.obstacles.fixed() {
            canvas.draw_cell(pos, consts::OBSTACLE_SYMBOL, consts::OBSTACLE_STYLE);
        }
        for m in self.obstacles.moving() {
            canvas.draw_cell(
                m.position(),
                consts::MOVING_OBSTACLE_SYMBOL,
                consts::OBSTACLE_STYLE,
            );
        }
        canvas.draw_cell(self.food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        if let Some(rival) = self.rival {
            canvas.draw_snake(rival, consts::RIVAL_STYLE);
        }
        canvas.draw_snake(self.player, consts::SNAKE_STYLE);
        // Draw the crash last so that it overwrites whatever the head ran
        // into
        if let Some(pos) = self.crash {
            canvas.draw_cell(pos, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
        }
    }
}

/// Draws board cells into the area inside a one-cell border.  Cells one
/// step outside the board land on the border itself.
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, pos: Pos, symbol: char, style: Style) {
        let Ok(x) = u16::try_from(pos.x + 1) else {
            return;
        };
        let Ok(y) = u16::try_from(pos.y + 1) else {
            return;
        };
        if x >= self.area.width || y >= self.area.height {
            return;
        }
        if let Some(cell) = self.buf.cell_mut((self.area.x + x, self.area.y + y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }

    fn draw_snake(&mut self, snake: &Snake, style: Style) {
        for &p in snake.body().iter().skip(1) {
            self.draw_cell(p, consts::SNAKE_BODY_SYMBOL, style);
        }
        self.draw_cell(snake.head(), head_symbol(snake.direction()), style);
    }
}

fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::Up => consts::SNAKE_HEAD_NORTH_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_SOUTH_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_WEST_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_EAST_SYMBOL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::VecDeque;

    fn snake_at(cells: &[(i32, i32)], direction: Direction) -> Snake {
        let mut snake = Snake::new(Pos::new(cells[0].0, cells[0].1), direction);
        snake.body = cells.iter().map(|&(x, y)| Pos::new(x, y)).collect::<VecDeque<_>>();
        snake
    }

    #[test]
    fn render_board() {
        let player = snake_at(&[(2, 1), (1, 1)], Direction::Right);
        let rival = snake_at(&[(5, 0)], Direction::Left);
        let obstacles = Obstacles::from_cells([Pos::new(0, 2)]);
        let particles = Particles::default();
        let scene = Scene {
            grid: Grid::new(6, 3),
            player: &player,
            rival: Some(&rival),
            food: Pos::new(4, 1),
            obstacles: &obstacles,
            particles: &particles,
            crash: None,
        };
        assert_eq!(
            scene.size(),
            Size {
                width: 8,
                height: 5
            }
        );
        let area = Rect::new(0, 0, 8, 5);
        let mut buffer = Buffer::empty(area);
        scene.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "┌──────┐",
            "│     >│",
            "│ ⚬< ● │",
            "│█     │",
            "└──────┘",
        ]);
        expected.set_style(Rect::new(6, 1, 1, 1), consts::RIVAL_STYLE);
        expected.set_style(Rect::new(2, 2, 2, 1), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(5, 2, 1, 1), consts::FOOD_STYLE);
        expected.set_style(Rect::new(1, 3, 1, 1), consts::OBSTACLE_STYLE);
        pretty_assertions::assert_eq!(buffer, expected);
    }

    #[test]
    fn crash_into_wall_marks_border() {
        let player = snake_at(&[(-1, 1), (0, 1)], Direction::Left);
        let obstacles = Obstacles::none();
        let particles = Particles::default();
        let scene = Scene {
            grid: Grid::new(4, 2),
            player: &player,
            rival: None,
            food: Pos::new(3, 0),
            obstacles: &obstacles,
            particles: &particles,
            crash: Some(Pos::new(-1, 1)),
        };
        let area = Rect::new(0, 0, 6, 4);
        let mut buffer = Buffer::empty(area);
        scene.render(area, &mut buffer);
        let mut expected = Buffer::with_lines(["┌────┐", "│   ●│", "×⚬   │", "└────┘"]);
        expected.set_style(Rect::new(4, 1, 1, 1), consts::FOOD_STYLE);
        expected.set_style(Rect::new(1, 2, 1, 1), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(0, 2, 1, 1), consts::COLLISION_STYLE);
        pretty_assertions::assert_eq!(buffer, expected);
    }

    #[test]
    fn particles_under_food() {
        let player = snake_at(&[(0, 0)], Direction::Down);
        let obstacles = Obstacles::none();
        let mut particles = Particles::default();
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        particles.spawn(Burst::Food, Pos::new(2, 1), &mut rng);
        particles.spawn(Burst::Explosion, Pos::new(3, 1), &mut rng);
        let scene = Scene {
            grid: Grid::new(5, 3),
            player: &player,
            rival: None,
            food: Pos::new(3, 1),
            obstacles: &obstacles,
            particles: &particles,
            crash: None,
        };
        let area = Rect::new(0, 0, 7, 5);
        let mut buffer = Buffer::empty(area);
        scene.render(area, &mut buffer);
        assert_eq!(buffer[(3, 2)].symbol(), "*");
        assert_eq!(buffer[(3, 2)].fg, consts::FOOD_PARTICLE_STYLE.fg.unwrap());
        assert_eq!(buffer[(4, 2)].symbol(), "●");
        assert_eq!(buffer[(1, 1)].symbol(), "^");
    }
}
