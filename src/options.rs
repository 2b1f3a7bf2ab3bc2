use crate::consts;
use crate::util::EnumExt;
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use ratatui::layout::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Gameplay options, adjustable from the main menu
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Options {
    pub(crate) mode: Mode,
    pub(crate) difficulty: Difficulty,
    pub(crate) board_size: BoardSize,
    /// Whether an AI-controlled rival shares the board
    pub(crate) rival: bool,
    pub(crate) sound: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            mode: Mode::default(),
            difficulty: Difficulty::default(),
            board_size: BoardSize::default(),
            rival: true,
            sound: true,
        }
    }
}

impl Options {
    pub(crate) fn get(&self, key: OptKey) -> OptValue {
        match key {
            OptKey::Mode => self.mode.into(),
            OptKey::Difficulty => self.difficulty.into(),
            OptKey::BoardSize => self.board_size.into(),
            OptKey::Rival => self.rival.into(),
            OptKey::Sound => self.sound.into(),
        }
    }

    pub(crate) fn set(&mut self, key: OptKey, value: OptValue) {
        match (key, value) {
            (OptKey::Mode, OptValue::Mode(v)) => self.mode = v,
            (OptKey::Difficulty, OptValue::Difficulty(v)) => self.difficulty = v,
            (OptKey::BoardSize, OptValue::BoardSize(v)) => self.board_size = v,
            (OptKey::Rival, OptValue::Bool(v)) => self.rival = v,
            (OptKey::Sound, OptValue::Bool(v)) => self.sound = v,
            (key, value) => tracing::warn!(?key, ?value, "ignoring option value of wrong type"),
        }
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum OptKey {
    Mode,
    Difficulty,
    BoardSize,
    Rival,
    Sound,
}

impl OptKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            OptKey::Mode => "Mode",
            OptKey::Difficulty => "Difficulty",
            OptKey::BoardSize => "Board Size",
            OptKey::Rival => "Rival",
            OptKey::Sound => "Sound",
        }
    }
}

impl fmt::Display for OptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn toggle(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OptValue {
    Bool(bool),
    Mode,
    Difficulty,
    BoardSize,
}

impl OptValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 12;
}

// This is needed for EnumMap to be convenient to construct.
impl Default for OptValue {
    fn default() -> OptValue {
        OptValue::Bool(false)
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, adj): (_, &dyn Adjustable) = match self {
            OptValue::Bool(false) => return write!(f, "    [ ]     "),
            OptValue::Bool(true) => return write!(f, "    [✓]     "),
            OptValue::Mode(m) => (m.label(), m),
            OptValue::Difficulty(d) => (d.label(), d),
            OptValue::BoardSize(sz) => (sz.label(), sz),
        };
        write!(
            f,
            "{left} {label:^8} {right}",
            left = if adj.can_decrease() { '◀' } else { '◁' },
            right = if adj.can_increase() { '▶' } else { '▷' }
        )
    }
}

impl Adjustable for bool {
    fn increase(&mut self) {
        *self = true;
    }

    fn decrease(&mut self) {
        *self = false;
    }

    fn toggle(&mut self) {
        *self = !*self;
    }

    fn can_increase(&self) -> bool {
        !*self
    }

    fn can_decrease(&self) -> bool {
        *self
    }
}

/// An option whose values form a short, ordered list of names
pub(crate) trait Choice: Enum + Copy + Default + Eq + fmt::Debug {
    /// The option's name in configuration & data files
    const KEY: &'static str;

    /// The value's name in configuration & data files
    fn as_str(self) -> &'static str;

    /// The value's name as shown in the menu
    fn label(self) -> &'static str;

    /// Parse a value by name (ignoring case), falling back to the default
    /// value if the name is not recognized
    fn parse_or_default(s: &str) -> Self {
        Self::iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_else(|| {
                let fallback = Self::default();
                tracing::warn!(
                    option = Self::KEY,
                    value = s,
                    fallback = fallback.as_str(),
                    "unrecognized option value; using default"
                );
                fallback
            })
    }
}

impl<T: Choice> Adjustable for T {
    fn increase(&mut self) {
        if self.can_increase() {
            *self = T::from_usize(self.into_usize() + 1);
        }
    }

    fn decrease(&mut self) {
        if self.can_decrease() {
            *self = T::from_usize(self.into_usize() - 1);
        }
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        self.into_usize() + 1 < T::LENGTH
    }

    fn can_decrease(&self) -> bool {
        self.into_usize() > 0
    }
}

/// The rules a session is played under
#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "&'static str")]
pub(crate) enum Mode {
    /// Play until crashing
    #[default]
    Classic,

    /// Play against the clock
    Timed,

    /// Play on a board strewn with obstacles
    Obstacle,
}

impl Mode {
    pub(crate) fn time_limit(self) -> Option<Duration> {
        (self == Mode::Timed).then_some(consts::TIME_LIMIT)
    }

    pub(crate) fn has_obstacles(self) -> bool {
        self == Mode::Obstacle
    }
}

impl Choice for Mode {
    const KEY: &'static str = "mode";

    fn as_str(self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Timed => "timed",
            Mode::Obstacle => "obstacle",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Mode::Classic => "Classic",
            Mode::Timed => "Timed",
            Mode::Obstacle => "Obstacle",
        }
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Mode {
        Mode::parse_or_default(&s)
    }
}

impl From<Mode> for &'static str {
    fn from(value: Mode) -> &'static str {
        value.as_str()
    }
}

/// How fast the snakes move
#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "&'static str")]
pub(crate) enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    /// Time between moves at the start of a session
    pub(crate) fn base_interval(self) -> Duration {
        Duration::from_millis(match self {
            Difficulty::Easy => 200,
            Difficulty::Medium => 150,
            Difficulty::Hard => 100,
            Difficulty::Insane => 60,
        })
    }

    /// Time between moves after the player has eaten `eaten` times.  Each
    /// meal speeds the snakes up by [`consts::INTERVAL_STEP`], down to
    /// 8/15 of the base interval; on easy, the speed never changes.
    pub(crate) fn interval(self, eaten: u32) -> Duration {
        let base = self.base_interval();
        if self == Difficulty::Easy {
            return base;
        }
        let floor = base * 8 / 15;
        base.saturating_sub(consts::INTERVAL_STEP.saturating_mul(eaten))
            .max(floor)
    }
}

impl Choice for Difficulty {
    const KEY: &'static str = "difficulty";

    fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Difficulty {
        Difficulty::parse_or_default(&s)
    }
}

impl From<Difficulty> for &'static str {
    fn from(value: Difficulty) -> &'static str {
        value.as_str()
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "&'static str")]
pub(crate) enum BoardSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl BoardSize {
    /// Return the number of cells across & down
    pub(crate) fn as_size(self) -> Size {
        match self {
            BoardSize::Small => Size {
                width: 30,
                height: 10,
            },
            BoardSize::Medium => Size {
                width: 50,
                height: 15,
            },
            BoardSize::Large => Size {
                width: 76,
                height: 19,
            },
        }
    }
}

impl Choice for BoardSize {
    const KEY: &'static str = "board-size";

    fn as_str(self) -> &'static str {
        match self {
            BoardSize::Small => "small",
            BoardSize::Medium => "medium",
            BoardSize::Large => "large",
        }
    }

    fn label(self) -> &'static str {
        match self {
            BoardSize::Small => "Small",
            BoardSize::Medium => "Medium",
            BoardSize::Large => "Large",
        }
    }
}

impl From<String> for BoardSize {
    fn from(s: String) -> BoardSize {
        BoardSize::parse_or_default(&s)
    }
}

impl From<BoardSize> for &'static str {
    fn from(value: BoardSize) -> &'static str {
        value.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    mod opt_key {
        use super::*;

        #[test]
        fn display_width() {
            let actual_width = OptKey::iter()
                .map(|key| key.as_str().chars().count())
                .max()
                .unwrap();
            assert_eq!(actual_width, usize::from(OptKey::DISPLAY_WIDTH));
        }

        #[test]
        fn fmt_width() {
            assert_eq!(
                format!(
                    "{:width$}",
                    OptKey::Mode,
                    width = usize::from(OptKey::DISPLAY_WIDTH)
                ),
                "Mode      "
            );
        }
    }

    mod opt_value {
        use super::*;

        #[test]
        fn display_width() {
            let values = [OptValue::Bool(false), OptValue::Bool(true)]
                .into_iter()
                .chain(Mode::iter().map(OptValue::from))
                .chain(Difficulty::iter().map(OptValue::from))
                .chain(BoardSize::iter().map(OptValue::from));
            for value in values {
                assert_eq!(
                    value.to_string().chars().count(),
                    usize::from(OptValue::DISPLAY_WIDTH),
                    "{value:?}"
                );
            }
        }

        #[test]
        fn arrows() {
            assert_eq!(
                OptValue::from(Difficulty::Easy).to_string(),
                "◁   Easy   ▶"
            );
            assert_eq!(
                OptValue::from(Difficulty::Insane).to_string(),
                "◀  Insane  ▷"
            );
        }
    }

    mod choice {
        use super::*;

        #[test]
        fn adjust_through_range() {
            let mut d = Difficulty::Easy;
            d.decrease();
            assert_eq!(d, Difficulty::Easy);
            d.increase();
            d.increase();
            d.increase();
            assert_eq!(d, Difficulty::Insane);
            assert!(!d.can_increase());
            d.increase();
            assert_eq!(d, Difficulty::Insane);
        }

        #[rstest]
        #[case("timed", Mode::Timed)]
        #[case("OBSTACLE", Mode::Obstacle)]
        #[case("zen", Mode::Classic)]
        #[case("", Mode::Classic)]
        fn parse_mode(#[case] s: &str, #[case] mode: Mode) {
            assert_eq!(Mode::parse_or_default(s), mode);
        }
    }

    mod intervals {
        use super::*;

        #[rstest]
        #[case(Difficulty::Easy, 0, 200)]
        #[case(Difficulty::Easy, 30, 200)]
        #[case(Difficulty::Medium, 0, 150)]
        #[case(Difficulty::Medium, 10, 130)]
        #[case(Difficulty::Medium, 35, 80)]
        #[case(Difficulty::Medium, 1000, 80)]
        #[case(Difficulty::Hard, 5, 90)]
        #[case(Difficulty::Insane, 100, 32)]
        fn test_interval(#[case] d: Difficulty, #[case] eaten: u32, #[case] millis: u64) {
            assert_eq!(d.interval(eaten), Duration::from_millis(millis));
        }
    }

    mod serialization {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn unknown_values_fall_back() {
            let opts = toml::from_str::<Options>(concat!(
                "mode = \"zen\"\n",
                "difficulty = \"hard\"\n",
                "board-size = \"enormous\"\n",
                "sound = false\n",
            ))
            .unwrap();
            assert_eq!(
                opts,
                Options {
                    mode: Mode::Classic,
                    difficulty: Difficulty::Hard,
                    board_size: BoardSize::Medium,
                    rival: true,
                    sound: false,
                }
            );
        }

        #[test]
        fn json_round_trip() {
            let opts = Options {
                mode: Mode::Timed,
                difficulty: Difficulty::Insane,
                board_size: BoardSize::Large,
                rival: false,
                sound: true,
            };
            let value = serde_json::to_value(opts).unwrap();
            assert_eq!(
                value,
                serde_json::json!({
                    "mode": "timed",
                    "difficulty": "insane",
                    "board-size": "large",
                    "rival": false,
                    "sound": true,
                })
            );
            assert_eq!(serde_json::from_value::<Options>(value).unwrap(), opts);
        }
    }
}
