mod direction;
mod engine;
mod food;
mod grid;
mod obstacles;
mod particles;
mod paused;
mod pilot;
mod rival;
mod scene;
mod snake;
mod state;
pub(crate) use self::direction::Direction;
pub(crate) use self::engine::SessionSummary;
use self::engine::Engine;
use self::paused::{PauseOpt, Paused};
use self::scene::Scene;
#[cfg(test)]
pub(crate) use self::state::{Collision, Outcome};
use self::state::Phase;
use crate::app::{Globals, Screen};
use crate::audio::{Audio, Bell};
use crate::command::{Command, Controls};
use crate::consts;
use crate::menu::MainMenu;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event};
use rand::{rngs::StdRng, Rng};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect, Size},
    text::{Line, Span},
    widgets::Widget,
    Frame,
};
use std::io;
use std::time::{Duration, Instant};

/// The game screen: runs an [`Engine`] against the clock and the keyboard
#[derive(Debug)]
pub(crate) struct Game<R = StdRng> {
    engine: Engine<R>,
    audio: Box<dyn Audio>,
    controls: Controls,
    /// Present exactly when the engine is paused
    popup: Option<Paused>,
    next_frame: Option<Instant>,
    next_tick: Option<Instant>,
}

impl Game {
    /// Start a new session with the current options and a freshly-seeded RNG
    pub(crate) fn new(globals: &mut Globals) -> Game {
        let rng = globals.session_rng();
        Game::new_with_rng(globals, rng)
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: &Globals, rng: R) -> Game<R> {
        let mut engine = Engine::new(
            globals.options,
            globals.high_score(),
            globals.sessions.clone(),
            rng,
        );
        engine.start();
        Game {
            engine,
            audio: Box::new(Bell::new(globals.options.sound)),
            controls: globals.controls,
            popup: None,
            next_frame: None,
            next_tick: None,
        }
    }

    /// Wait for either an input event or the next frame, whichever comes
    /// first, and handle it
    pub(crate) fn process_input(&mut self, globals: &Globals) -> io::Result<Option<Screen>> {
        let now = Instant::now();
        let next_frame = *self.next_frame.get_or_insert(now + consts::FRAME_PERIOD);
        let wait = next_frame.saturating_duration_since(now);
        let screen = if !wait.is_zero() && poll(wait)? {
            self.handle_event(read()?, globals)
        } else {
            self.next_frame = None;
            self.frame(Instant::now());
            None
        };
        self.play_cues();
        Ok(screen)
    }

    /// Animate the board and, if the current interval has elapsed, run a
    /// logic tick
    fn frame(&mut self, now: Instant) {
        self.engine.animate();
        if !self.engine.state().playing() {
            self.next_tick = None;
            return;
        }
        let due = *self
            .next_tick
            .get_or_insert_with(|| now + self.engine.interval());
        if now >= due {
            self.engine.tick();
            self.next_tick = Some(now + self.engine.interval());
        }
    }

    fn handle_event(&mut self, event: Event, globals: &Globals) -> Option<Screen> {
        match self.engine.state().phase() {
            Phase::Playing => {
                if event == Event::FocusLost {
                    self.pause();
                    return None;
                }
                let ev = event.as_key_press_event()?;
                if let Some(direction) = self.controls.direction(ev) {
                    self.engine.steer(direction);
                    return None;
                }
                match Command::from_key_event(ev)? {
                    Command::Quit | Command::Q => return Some(Screen::Quit),
                    Command::Esc | Command::P => self.pause(),
                    cmd => {
                        if let Some(direction) = cmd.direction() {
                            self.engine.steer(direction);
                        }
                    }
                }
            }
            Phase::Paused => match self.popup.as_mut()?.handle_event(event)? {
                PauseOpt::Resume => {
                    if self.engine.resume() {
                        self.popup = None;
                        self.next_tick = None;
                    }
                }
                PauseOpt::Restart => self.restart(),
                PauseOpt::MainMenu => return Some(self.main_menu(globals)),
                PauseOpt::Quit => return Some(Screen::Quit),
            },
            Phase::GameOver(_) => match Command::from_key_event(event.as_key_press_event()?)? {
                Command::R | Command::Space | Command::Enter => self.restart(),
                Command::M | Command::Esc => return Some(self.main_menu(globals)),
                Command::Quit | Command::Q => return Some(Screen::Quit),
                _ => (),
            },
            Phase::Menu => return Some(self.main_menu(globals)),
        }
        None
    }

    fn pause(&mut self) {
        if self.engine.pause() {
            self.popup = Some(Paused::new(self.engine.state().score()));
        }
    }

    fn restart(&mut self) {
        if self.engine.restart() {
            self.popup = None;
            self.next_tick = None;
        }
    }

    fn main_menu(&mut self, globals: &Globals) -> Screen {
        self.engine.to_menu();
        Screen::Main(MainMenu::new(globals.options))
    }

    fn play_cues(&mut self) {
        for cue in self.engine.drain_cues() {
            self.audio.play(cue);
        }
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    fn score_bar(&self) -> String {
        let state = self.engine.state();
        let mut fields = vec![
            format!("Score: {}", state.score()),
            format!("High: {}", state.high_score()),
            format!("Streak: {}", self.engine.streak()),
        ];
        if let Some(remaining) = self.engine.remaining() {
            fields.push(format!("Time: {}s", whole_seconds(remaining)));
        }
        if self.engine.options().rival {
            let status = if self.engine.rival().is_some() {
                "hunting"
            } else {
                "out"
            };
            fields.push(format!("Rival: {status}"));
        }
        format!(" {}", fields.join("  "))
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, board_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(self.score_bar(), consts::SCORE_BAR_STYLE).render(score_area, buf);

        let scene = Scene::from(&self.engine);
        let board_area = center_rect(board_area, scene.size());
        scene.render(board_area, buf);

        if let Some(outcome) = self.engine.state().outcome() {
            Span::from(format!(" — GAME OVER: {outcome} —")).render(msg1_area, buf);
            Line::from_iter([
                Span::raw(" Restart ("),
                Span::styled("r", consts::KEY_STYLE),
                Span::raw(") — Main Menu ("),
                Span::styled("m", consts::KEY_STYLE),
                Span::raw(") — Quit ("),
                Span::styled("q", consts::KEY_STYLE),
                Span::raw(")"),
            ])
            .render(msg2_area, buf);
        } else if let Some(paused) = self.popup {
            let popup_area = center_rect(
                display,
                Size {
                    width: Paused::WIDTH,
                    height: Paused::HEIGHT,
                },
            );
            paused.render(popup_area, buf);
        }
    }
}

/// Round a duration up to whole seconds for display
fn whole_seconds(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BoardSize, Mode, Options};
    use crate::records::Records;
    use crossterm::event::{KeyCode, KeyEvent};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::sync::mpsc::{channel, Receiver};

    const RNG_SEED: u64 = 0x0123_4567_89AB_CDEF;

    fn globals(options: Options) -> (Globals, Receiver<SessionSummary>) {
        let (tx, rx) = channel();
        let options = Options {
            sound: false,
            ..options
        };
        let globals = Globals::new(options, Controls::default(), Records::default(), tx, None);
        (globals, rx)
    }

    fn solo_small() -> Options {
        Options {
            board_size: BoardSize::Small,
            rival: false,
            ..Options::default()
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::from(code))
    }

    fn game(globals: &Globals) -> Game<ChaCha12Rng> {
        Game::new_with_rng(globals, ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    /// Tick until the session ends, which it must by running into the wall
    fn run_to_game_over(game: &mut Game<ChaCha12Rng>) {
        for _ in 0..100 {
            game.engine.tick();
            if game.engine.state().outcome().is_some() {
                return;
            }
        }
        panic!("session never ended");
    }

    #[test]
    fn ticks_wait_for_interval() {
        let (globals, _rx) = globals(solo_small());
        let mut game = game(&globals);
        let start = game.engine.player().head();
        let t0 = Instant::now();
        game.frame(t0);
        assert_eq!(game.engine.player().head(), start);
        game.frame(t0 + game.engine.interval() / 2);
        assert_eq!(game.engine.player().head(), start);
        game.frame(t0 + game.engine.interval());
        assert_eq!(game.engine.player().head(), start.step(Direction::Right));
    }

    #[test]
    fn pause_and_resume() {
        let (globals, _rx) = globals(solo_small());
        let mut game = game(&globals);
        game.frame(Instant::now());
        assert!(game.handle_event(key(KeyCode::Esc), &globals).is_none());
        assert_eq!(game.engine.state().phase(), Phase::Paused);
        assert!(game.popup.is_some());
        let head = game.engine.player().head();
        let t0 = Instant::now();
        game.frame(t0);
        game.frame(t0 + Duration::from_secs(1));
        assert_eq!(game.engine.player().head(), head);
        assert!(game.handle_event(key(KeyCode::Char('p')), &globals).is_none());
        assert_eq!(game.engine.state().phase(), Phase::Playing);
        assert!(game.popup.is_none());
        assert!(game.next_tick.is_none());
    }

    #[test]
    fn focus_lost_pauses() {
        let (globals, _rx) = globals(solo_small());
        let mut game = game(&globals);
        assert!(game.handle_event(Event::FocusLost, &globals).is_none());
        assert_eq!(game.engine.state().phase(), Phase::Paused);
    }

    #[test]
    fn keys_steer() {
        let (globals, _rx) = globals(solo_small());
        let mut game = game(&globals);
        assert!(game.handle_event(key(KeyCode::Char('w')), &globals).is_none());
        game.engine.tick();
        assert_eq!(game.engine.player().direction(), Direction::Up);
    }

    #[test]
    fn quit_while_playing() {
        let (globals, _rx) = globals(solo_small());
        let mut game = game(&globals);
        assert!(matches!(
            game.handle_event(key(KeyCode::Char('q')), &globals),
            Some(Screen::Quit)
        ));
    }

    #[test]
    fn game_over_then_restart() {
        let (globals, rx) = globals(solo_small());
        let mut game = game(&globals);
        run_to_game_over(&mut game);
        let summary = rx.try_recv().unwrap();
        assert_eq!(summary.outcome, Outcome::Crashed(Collision::Wall));
        assert!(game.handle_event(key(KeyCode::Char('r')), &globals).is_none());
        assert_eq!(game.engine.state().phase(), Phase::Playing);
        assert_eq!(game.engine.state().score(), 0);
    }

    #[test]
    fn game_over_then_menu() {
        let (globals, _rx) = globals(solo_small());
        let mut game = game(&globals);
        run_to_game_over(&mut game);
        assert!(matches!(
            game.handle_event(key(KeyCode::Char('m')), &globals),
            Some(Screen::Main(_))
        ));
        assert_eq!(game.engine.state().phase(), Phase::Menu);
    }

    #[test]
    fn restart_from_pause_menu() {
        let (globals, rx) = globals(solo_small());
        let mut game = game(&globals);
        game.engine.tick();
        game.handle_event(key(KeyCode::Esc), &globals);
        assert!(game.handle_event(key(KeyCode::Char('r')), &globals).is_none());
        assert_eq!(game.engine.state().phase(), Phase::Playing);
        assert!(game.popup.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn render_score_bar_and_board() {
        let options = Options {
            mode: Mode::Timed,
            board_size: BoardSize::Small,
            ..Options::default()
        };
        let (globals, _rx) = globals(options);
        let game = game(&globals);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        let row = |y: u16| {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        };
        assert_eq!(
            row(0).trim_end(),
            " Score: 0  High: 0  Streak: 0  Time: 60s  Rival: hunting"
        );
        let top = (1..22)
            .find(|&y| row(y).contains('┌'))
            .expect("board should have a top border");
        assert_eq!(row(top).trim(), format!("┌{}┐", "─".repeat(30)));
        assert_eq!(row(top + 11).trim(), format!("└{}┘", "─".repeat(30)));
        assert_eq!(row(22).trim(), "");
    }

    #[test]
    fn render_game_over() {
        let (globals, _rx) = globals(solo_small());
        let mut game = game(&globals);
        run_to_game_over(&mut game);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        let row = |y: u16| {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        };
        assert_eq!(row(22).trim_end(), " — GAME OVER: crashed into the wall —");
        assert_eq!(
            row(23).trim_end(),
            " Restart (r) — Main Menu (m) — Quit (q)"
        );
    }

    #[test]
    fn seconds_round_up() {
        assert_eq!(whole_seconds(Duration::from_millis(59_001)), 60);
        assert_eq!(whole_seconds(Duration::from_secs(3)), 3);
        assert_eq!(whole_seconds(Duration::ZERO), 0);
    }
}
