use crate::game::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Esc,
    Home,
    End,
    Next,
    Prev,
    M,
    P,
    Q,
    R,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (KeyModifiers::NONE, KeyCode::Char('w' | 'k') | KeyCode::Up) => Some(Command::Up),
            (KeyModifiers::NONE, KeyCode::Char('s' | 'j') | KeyCode::Down) => Some(Command::Down),
            (KeyModifiers::NONE, KeyCode::Char('a' | 'h') | KeyCode::Left) => Some(Command::Left),
            (KeyModifiers::NONE, KeyCode::Char('d' | 'l') | KeyCode::Right) => Some(Command::Right),
            (_, KeyCode::Enter) => Some(Command::Enter),
            (KeyModifiers::NONE, KeyCode::Char(' ')) => Some(Command::Space),
            (_, KeyCode::Esc) => Some(Command::Esc),
            (_, KeyCode::Home) => Some(Command::Home),
            (_, KeyCode::End) => Some(Command::End),
            (_, KeyCode::Tab) => Some(Command::Next),
            (_, KeyCode::BackTab) => Some(Command::Prev),
            (KeyModifiers::NONE, KeyCode::Char('m')) => Some(Command::M),
            (KeyModifiers::NONE, KeyCode::Char('p')) => Some(Command::P),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Command::Q),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Command::R),
            _ => None,
        }
    }

    pub(crate) fn direction(self) -> Option<Direction> {
        match self {
            Command::Up => Some(Direction::Up),
            Command::Down => Some(Direction::Down),
            Command::Left => Some(Direction::Left),
            Command::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Extra keys for steering the snake, on top of the built-in arrows, `wasd`,
/// and `hjkl`
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(from = "RawControls")]
pub(crate) struct Controls {
    pub(crate) up: Key,
    pub(crate) down: Key,
    pub(crate) left: Key,
    pub(crate) right: Key,
}

impl Default for Controls {
    fn default() -> Controls {
        Controls {
            up: Key(KeyCode::Up),
            down: Key(KeyCode::Down),
            left: Key(KeyCode::Left),
            right: Key(KeyCode::Right),
        }
    }
}

impl Controls {
    /// Return the direction bound to the key pressed in `ev`, if any
    pub(crate) fn direction(&self, ev: KeyEvent) -> Option<Direction> {
        if !ev.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return None;
        }
        let code = match ev.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            code => code,
        };
        [
            (self.up, Direction::Up),
            (self.down, Direction::Down),
            (self.left, Direction::Left),
            (self.right, Direction::Right),
        ]
        .into_iter()
        .find_map(|(key, d)| (key.0 == code).then_some(d))
    }
}

/// A key named in the configuration file.  Accepts arrow names (`ArrowUp`,
/// `Up`), single characters (`w`), and DOM-style key codes (`KeyW`,
/// `Digit8`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Key(KeyCode);

impl Key {
    pub(crate) fn parse(s: &str) -> Option<Key> {
        let s = s.trim();
        let code = match s.to_ascii_lowercase().as_str() {
            "arrowup" | "up" => KeyCode::Up,
            "arrowdown" | "down" => KeyCode::Down,
            "arrowleft" | "left" => KeyCode::Left,
            "arrowright" | "right" => KeyCode::Right,
            "space" => KeyCode::Char(' '),
            _ => {
                let c = s
                    .strip_prefix("Key")
                    .or_else(|| s.strip_prefix("Digit"))
                    .unwrap_or(s);
                let mut chars = c.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if ch.is_ascii_graphic() => {
                        KeyCode::Char(ch.to_ascii_lowercase())
                    }
                    _ => return None,
                }
            }
        };
        Some(Key(code))
    }
}

/// The `[controls]` table as written.  Names that can't be parsed fall back
/// to the arrow key for that direction.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
struct RawControls {
    up: Option<String>,
    down: Option<String>,
    left: Option<String>,
    right: Option<String>,
}

impl From<RawControls> for Controls {
    fn from(raw: RawControls) -> Controls {
        let arrows = Controls::default();
        let pick = |name: &str, value: Option<String>, default: Key| {
            let Some(value) = value else {
                return default;
            };
            Key::parse(&value).unwrap_or_else(|| {
                tracing::warn!(control = name, value, "unrecognized key name; using arrow key");
                default
            })
        };
        Controls {
            up: pick("up", raw.up, arrows.up),
            down: pick("down", raw.down, arrows.down),
            left: pick("left", raw.left, arrows.left),
            right: pick("right", raw.right, arrows.right),
        }
    }
}
