use super::MainMenu;
use crate::app::{Globals, Screen};
use crate::command::Command;
use crate::consts;
use crate::options::{Choice, Options};
use crate::records::Statistics;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{read, Event};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect, Size},
    text::{Line, Span, Text},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};
use std::io;

/// Lifetime statistics & the high score for the current options
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct StatsScreen {
    statistics: Statistics,
    options: Options,
    high_score: u32,
    /// Whether the "reset statistics?" question is showing
    confirming: bool,
}

impl StatsScreen {
    const WIDTH: u16 = 50;
    const HEIGHT: u16 = 13;
    const LABEL_WIDTH: usize = 16;

    pub(crate) fn new(globals: &Globals) -> StatsScreen {
        StatsScreen {
            statistics: globals.records.statistics,
            options: globals.options,
            high_score: globals.high_score(),
            confirming: false,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self, globals: &mut Globals) -> io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?, globals))
    }

    fn handle_event(&mut self, event: Event, globals: &mut Globals) -> Option<Screen> {
        let key = event.as_key_press_event()?;
        let cmd = Command::from_key_event(key);
        if cmd == Some(Command::Quit) {
            return Some(Screen::Quit);
        }
        if self.confirming {
            // Only Enter confirms; every other key, mapped or not, backs out
            self.confirming = false;
            if cmd == Some(Command::Enter) {
                tracing::info!("resetting statistics");
                globals.records.statistics = Statistics::default();
                self.statistics = Statistics::default();
            }
            return None;
        }
        match cmd? {
            Command::R => self.confirming = true,
            Command::Esc | Command::Enter | Command::M => {
                return Some(Screen::Main(MainMenu::new(globals.options)))
            }
            Command::Q => return Some(Screen::Quit),
            _ => (),
        }
        None
    }

    fn stat_line(label: &str, value: String) -> Line<'static> {
        Line::from(format!("{label:<width$}{value}", width = Self::LABEL_WIDTH))
    }

    fn options_line(&self) -> Line<'static> {
        Line::from(format!(
            "  {} · {} · {} board · {}",
            self.options.mode.label(),
            self.options.difficulty.label(),
            self.options.board_size.label(),
            if self.options.rival {
                "with rival"
            } else {
                "no rival"
            },
        ))
    }

    fn footer(&self) -> Line<'static> {
        let key = |s: &'static str| Span::styled(s, consts::KEY_STYLE);
        let line = if self.confirming {
            Line::from_iter([
                Span::raw("Reset statistics? "),
                key("Enter"),
                Span::raw(" yes, any other key no"),
            ])
        } else {
            Line::from_iter([
                Span::raw("Back ("),
                key("Esc"),
                Span::raw(") — Reset ("),
                key("r"),
                Span::raw(")"),
            ])
        };
        line.centered()
    }
}

impl Widget for &StatsScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block_area = center_rect(
            get_display_area(area),
            Size {
                width: StatsScreen::WIDTH,
                height: StatsScreen::HEIGHT,
            },
        );
        let block = Block::bordered()
            .title(" STATISTICS ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let inner = block.inner(block_area);
        block.render(block_area, buf);
        let stats = &self.statistics;
        Text::from_iter([
            StatsScreen::stat_line("Games played", stats.total_games.to_string()),
            StatsScreen::stat_line("Total score", stats.total_score.to_string()),
            StatsScreen::stat_line("Average score", format!("{:.1}", stats.average_score())),
            StatsScreen::stat_line("Best streak", stats.best_streak.to_string()),
            StatsScreen::stat_line("Food eaten", stats.food_eaten.to_string()),
            StatsScreen::stat_line(
                "Time played",
                format_duration(stats.time_played().as_secs()),
            ),
            Line::default(),
            StatsScreen::stat_line("High score", self.high_score.to_string()),
            self.options_line(),
            Line::default(),
            self.footer(),
        ])
        .render(inner, buf);
    }
}

fn format_duration(secs: u64) -> String {
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Controls;
    use crate::game::SessionSummary;
    use crate::options::Mode;
    use crate::records::Records;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::mpsc::{channel, Receiver};

    fn globals() -> (Globals, Receiver<SessionSummary>) {
        let (tx, rx) = channel();
        let options = Options {
            mode: Mode::Timed,
            sound: false,
            ..Options::default()
        };
        let mut records = Records::default();
        records.high_scores.record(options, 17);
        records.statistics = Statistics {
            total_games: 3,
            total_score: 25,
            best_streak: 6,
            time_played_ms: 3_725_300,
            food_eaten: 31,
        };
        let globals = Globals::new(options, Controls::default(), records, tx, None);
        (globals, rx)
    }

    fn press(screen: &mut StatsScreen, globals: &mut Globals, code: KeyCode) -> Option<Screen> {
        screen.handle_event(Event::Key(code.into()), globals)
    }

    fn rows(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim()
                    .to_owned()
            })
            .filter(|row| !row.is_empty())
            .collect()
    }

    #[test]
    fn render() {
        let (globals, _rx) = globals();
        let screen = StatsScreen::new(&globals);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        screen.render(area, &mut buffer);
        assert_eq!(
            rows(&buffer),
            [
                "┌────────────────── STATISTICS ──────────────────┐",
                "│ Games played    3                              │",
                "│ Total score     25                             │",
                "│ Average score   8.3                            │",
                "│ Best streak     6                              │",
                "│ Food eaten      31                             │",
                "│ Time played     1h 02m 05s                     │",
                "│                                                │",
                "│ High score      17                             │",
                "│   Timed · Medium · Medium board · with rival   │",
                "│                                                │",
                "│             Back (Esc) — Reset (r)             │",
                "└────────────────────────────────────────────────┘",
            ]
        );
    }

    #[test]
    fn reset_needs_confirmation() {
        let (mut globals, _rx) = globals();
        let mut screen = StatsScreen::new(&globals);
        assert!(press(&mut screen, &mut globals, KeyCode::Char('r')).is_none());
        assert!(screen.confirming);
        assert!(press(&mut screen, &mut globals, KeyCode::Char('n')).is_none());
        assert!(!screen.confirming);
        assert_eq!(globals.records.statistics.total_games, 3);
        assert!(press(&mut screen, &mut globals, KeyCode::Char('r')).is_none());
        assert!(press(&mut screen, &mut globals, KeyCode::Enter).is_none());
        assert_eq!(globals.records.statistics, Statistics::default());
        assert_eq!(screen.statistics, Statistics::default());
        // High scores survive
        assert_eq!(globals.high_score(), 17);
    }

    #[rstest]
    #[case(KeyCode::Char('y'))]
    #[case(KeyCode::Char('x'))]
    #[case(KeyCode::Char(' '))]
    #[case(KeyCode::Esc)]
    #[case(KeyCode::Char('r'))]
    fn any_other_key_cancels_reset(#[case] code: KeyCode) {
        let (mut globals, _rx) = globals();
        let mut screen = StatsScreen::new(&globals);
        assert!(press(&mut screen, &mut globals, KeyCode::Char('r')).is_none());
        assert!(press(&mut screen, &mut globals, code).is_none());
        assert!(!screen.confirming);
        // Enter now means "back", not "yes"
        assert!(matches!(
            press(&mut screen, &mut globals, KeyCode::Enter),
            Some(Screen::Main(_))
        ));
        assert_eq!(globals.records.statistics.total_games, 3);
        assert_eq!(screen.statistics.total_games, 3);
    }

    #[test]
    fn back_to_menu() {
        let (mut globals, _rx) = globals();
        let mut screen = StatsScreen::new(&globals);
        assert!(matches!(
            press(&mut screen, &mut globals, KeyCode::Esc),
            Some(Screen::Main(_))
        ));
        assert!(matches!(
            press(&mut screen, &mut globals, KeyCode::Char('q')),
            Some(Screen::Quit)
        ));
    }

    #[rstest]
    #[case(0, "0s")]
    #[case(59, "59s")]
    #[case(60, "1m 00s")]
    #[case(754, "12m 34s")]
    #[case(3725, "1h 02m 05s")]
    #[case(90061, "25h 01m 01s")]
    fn test_format_duration(#[case] secs: u64, #[case] s: &str) {
        assert_eq!(format_duration(secs), s);
    }
}
