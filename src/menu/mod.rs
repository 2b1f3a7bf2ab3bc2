mod stats;
mod widgets;
pub(crate) use self::stats::StatsScreen;
use self::widgets::{Instructions, Logo};
use crate::app::{Globals, Screen};
use crate::command::Command;
use crate::consts;
use crate::game::Game;
use crate::options::{Adjustable, OptKey, OptValue, Options};
use crate::util::{get_display_area, EnumExt};
use crossterm::event::{read, Event};
use enum_map::{Enum, EnumMap};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MainMenu {
    selection: Selection,
    options: OptionsMenu,
}

impl MainMenu {
    pub(crate) fn new(options: Options) -> Self {
        MainMenu {
            selection: Selection::default(),
            options: OptionsMenu::new(options),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(
        &mut self,
        globals: &mut Globals,
    ) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?, globals))
    }

    fn handle_event(&mut self, event: Event, globals: &mut Globals) -> Option<Screen> {
        match (
            self.selection,
            Command::from_key_event(event.as_key_press_event()?)?,
        ) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (_, Command::Home) => self.select(Selection::PlayButton, None),
            (_, Command::End) => self.select(Selection::QuitButton, None),
            (Selection::PlayButton, Command::Enter) | (_, Command::P) => {
                return Some(Screen::Game(Box::new(Game::new(globals))))
            }
            (Selection::PlayButton, Command::Prev) => self.select(Selection::QuitButton, None),
            (Selection::PlayButton, Command::Down | Command::Next) => {
                self.select(Selection::Options, Some(true));
            }
            (Selection::Options, Command::Up | Command::Prev) => {
                if let Some(sel) = self.options.move_up() {
                    self.select(sel, None);
                }
            }
            (Selection::Options, Command::Down | Command::Next) => {
                if let Some(sel) = self.options.move_down() {
                    self.select(sel, None);
                }
            }
            (Selection::Options, Command::Left) => {
                self.options.move_left();
                globals.options = self.options.to_options();
            }
            (Selection::Options, Command::Right) => {
                self.options.move_right();
                globals.options = self.options.to_options();
            }
            (Selection::Options, Command::Space | Command::Enter) => {
                self.options.toggle();
                globals.options = self.options.to_options();
            }
            (Selection::StatsButton, Command::Enter) => {
                return Some(Screen::Stats(StatsScreen::new(globals)))
            }
            (Selection::StatsButton, Command::Up | Command::Prev) => {
                self.select(Selection::Options, Some(false));
            }
            (Selection::StatsButton, Command::Down | Command::Next) => {
                self.select(Selection::QuitButton, None);
            }
            (Selection::QuitButton, Command::Enter) | (_, Command::Q) => {
                return Some(Screen::Quit);
            }
            (Selection::QuitButton, Command::Next) => self.select(Selection::PlayButton, None),
            (Selection::QuitButton, Command::Up | Command::Prev) => {
                self.select(Selection::StatsButton, None);
            }
            _ => (),
        }
        None
    }

    fn select(&mut self, selection: Selection, first_option: Option<bool>) {
        self.selection = selection;
        if selection == Selection::Options {
            if let Some(first) = first_option {
                self.options.selection = if first {
                    Some(OptKey::min())
                } else {
                    Some(OptKey::max())
                };
            } else {
                self.options.selection = None;
            }
        } else {
            self.options.selection = None;
        }
    }
}

/// Render a `[Label (k)]` button, highlighted if selected.  `key` must be
/// the character in `label` to mark as the shortcut, or `None`.
fn button(label: &'static str, key: Option<&'static str>, selected: bool) -> Line<'static> {
    let style = if selected {
        consts::MENU_SELECTION_STYLE
    } else {
        Style::new()
    };
    let mut spans = vec![Span::styled("[", style), Span::styled(label, style)];
    if let Some(key) = key {
        spans.push(Span::styled(" (", style));
        spans.push(Span::styled(key, consts::KEY_STYLE.patch(style)));
        spans.push(Span::styled(")", style));
    }
    spans.push(Span::styled("]", style));
    Line::from(spans).centered()
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [logo_area, instructions_area, play_area, options_area, stats_area, quit_area] =
            Layout::vertical([
                Logo::HEIGHT,
                Instructions::HEIGHT,
                1,
                OptionsMenu::HEIGHT,
                1,
                1,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        let [logo_area] = Layout::horizontal([Logo::WIDTH])
            .flex(Flex::Center)
            .areas(logo_area);
        Logo.render(logo_area, buf);

        let [instructions_area] = Layout::horizontal([Instructions::WIDTH])
            .flex(Flex::Center)
            .areas(instructions_area);
        Instructions.render(instructions_area, buf);

        button("Play", Some("p"), self.selection == Selection::PlayButton).render(play_area, buf);

        let [options_area] = Layout::horizontal([OptionsMenu::WIDTH])
            .flex(Flex::Center)
            .areas(options_area);
        (&self.options).render(options_area, buf);

        button(
            "Statistics",
            None,
            self.selection == Selection::StatsButton,
        )
        .render(stats_area, buf);
        button("Quit", Some("q"), self.selection == Selection::QuitButton).render(quit_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Selection {
    #[default]
    PlayButton,
    Options,
    StatsButton,
    QuitButton,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct OptionsMenu {
    /// If the currently-selected main menu item is an element of this menu,
    /// then `selection` is `Some(key)`, where `key` is the key of the selected
    /// item within the `OptionsMenu`.
    selection: Option<OptKey>,
    settings: EnumMap<OptKey, OptValue>,
}

impl OptionsMenu {
    #[allow(clippy::cast_possible_truncation)]
    const HEIGHT: u16 = (OptKey::LENGTH as u16) + 2 /* for border */;
    const HORIZONTAL_PADDING: u16 = 1; // padding on each side
    const POINTER_WIDTH: u16 = 2;
    const LABEL_VALUE_GUTTER: u16 = 2;
    const WIDTH: u16 = 2 /* for border */ + 2 * Self::HORIZONTAL_PADDING + Self::POINTER_WIDTH + OptKey::DISPLAY_WIDTH + Self::LABEL_VALUE_GUTTER + OptValue::DISPLAY_WIDTH;

    fn new(options: Options) -> Self {
        let settings = EnumMap::from_iter(OptKey::iter().map(|key| (key, options.get(key))));
        OptionsMenu {
            selection: None,
            settings,
        }
    }

    fn to_options(&self) -> Options {
        let mut opts = Options::default();
        for key in OptKey::iter() {
            opts.set(key, self.settings[key]);
        }
        opts
    }

    fn move_up(&mut self) -> Option<Selection> {
        self.selection = self.selection?.prev();
        self.selection.is_none().then_some(Selection::PlayButton)
    }

    fn move_down(&mut self) -> Option<Selection> {
        self.selection = self.selection?.next();
        self.selection.is_none().then_some(Selection::StatsButton)
    }

    fn move_left(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].decrease();
        }
    }

    fn move_right(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].increase();
        }
    }

    fn toggle(&mut self) {
        if let Some(sel) = self.selection {
            self.settings[sel].toggle();
        }
    }
}

impl Widget for &OptionsMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Options: ")
            .padding(Padding::horizontal(OptionsMenu::HORIZONTAL_PADDING));
        let menu_area = block.inner(area);
        block.render(area, buf);
        for ((key, value), row) in OptKey::iter()
            .map(|key| (key, self.settings[key]))
            .zip(menu_area.rows())
        {
            let selected = Some(key) == self.selection;
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{key:lwidth$}{space:gutter$}{value}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(OptionsMenu::POINTER_WIDTH),
                lwidth = usize::from(OptKey::DISPLAY_WIDTH),
                space = "",
                gutter = usize::from(OptionsMenu::LABEL_VALUE_GUTTER),
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Controls;
    use crate::game::SessionSummary;
    use crate::options::{Difficulty, Mode};
    use crate::records::Records;
    use crossterm::event::KeyCode;
    use std::sync::mpsc::{channel, Receiver};

    fn globals() -> (Globals, Receiver<SessionSummary>) {
        let (tx, rx) = channel();
        let options = Options {
            sound: false,
            ..Options::default()
        };
        let globals = Globals::new(options, Controls::default(), Records::default(), tx, Some(7));
        (globals, rx)
    }

    fn press(menu: &mut MainMenu, globals: &mut Globals, code: KeyCode) -> Option<Screen> {
        menu.handle_event(Event::Key(code.into()), globals)
    }

    fn rows(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_owned()
            })
            .collect()
    }

    #[test]
    fn draw_initial() {
        let (globals, _rx) = globals();
        let menu = MainMenu::new(globals.options);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        menu.render(area, &mut buffer);
        #[rustfmt::skip]
        let expected = [
             "                 ____              _         ____             _",
            r"                / ___| _ __   __ _| | _____ |  _ \ _   _  ___| |",
            r"                \___ \| '_ \ / _` | |/ / _ \| | | | | | |/ _ \ |",
             "                 ___) | | | | (_| |   <  __/| |_| | |_| |  __/ |",
            r"                |____/|_| |_|\__,_|_|\_\___||____/ \__,_|\___|_|",
             "",
             "                               ⚬⚬⚬⚬⚬<  ●  >⚬⚬⚬⚬⚬",
             "",
             "                    Steer with ← ↓ ↑ →, h j k l, or a s w d",
             "                    Beat the rival to the food; don't crash!",
             "",
             "                                   [Play (p)]",
             "",
             "                         ┌ Options: ──────────────────┐",
             "                         │   Mode        ◁ Classic  ▶ │",
             "                         │   Difficulty  ◀  Medium  ▶ │",
             "                         │   Board Size  ◀  Medium  ▶ │",
             "                         │   Rival           [✓]      │",
             "                         │   Sound           [ ]      │",
             "                         └────────────────────────────┘",
             "",
             "                                  [Statistics]",
             "",
             "                                   [Quit (q)]",
        ];
        pretty_assertions::assert_eq!(rows(&buffer), expected);
        assert_eq!(
            buffer[(35, 11)].modifier,
            consts::MENU_SELECTION_STYLE.add_modifier
        );
        assert_eq!(buffer[(42, 11)].fg, consts::KEY_STYLE.fg.unwrap());
    }

    #[test]
    fn adjust_options() {
        let (mut globals, _rx) = globals();
        let mut menu = MainMenu::new(globals.options);
        assert!(press(&mut menu, &mut globals, KeyCode::Down).is_none());
        assert_eq!(menu.selection, Selection::Options);
        assert_eq!(menu.options.selection, Some(OptKey::Mode));
        assert!(press(&mut menu, &mut globals, KeyCode::Right).is_none());
        assert_eq!(globals.options.mode, Mode::Timed);
        assert!(press(&mut menu, &mut globals, KeyCode::Down).is_none());
        assert!(press(&mut menu, &mut globals, KeyCode::Left).is_none());
        assert_eq!(globals.options.difficulty, Difficulty::Easy);
        assert!(press(&mut menu, &mut globals, KeyCode::Left).is_none());
        assert_eq!(globals.options.difficulty, Difficulty::Easy);
        assert!(press(&mut menu, &mut globals, KeyCode::Down).is_none());
        assert!(press(&mut menu, &mut globals, KeyCode::Down).is_none());
        assert!(press(&mut menu, &mut globals, KeyCode::Char(' ')).is_none());
        assert!(!globals.options.rival);
        assert_eq!(menu.options.to_options(), globals.options);
    }

    #[test]
    fn play_starts_game() {
        let (mut globals, _rx) = globals();
        let mut menu = MainMenu::new(globals.options);
        assert!(matches!(
            press(&mut menu, &mut globals, KeyCode::Enter),
            Some(Screen::Game(_))
        ));
        assert!(matches!(
            press(&mut menu, &mut globals, KeyCode::Char('p')),
            Some(Screen::Game(_))
        ));
    }

    #[test]
    fn open_statistics() {
        let (mut globals, _rx) = globals();
        let mut menu = MainMenu::new(globals.options);
        assert!(press(&mut menu, &mut globals, KeyCode::End).is_none());
        assert!(press(&mut menu, &mut globals, KeyCode::Up).is_none());
        assert_eq!(menu.selection, Selection::StatsButton);
        assert!(matches!(
            press(&mut menu, &mut globals, KeyCode::Enter),
            Some(Screen::Stats(_))
        ));
    }

    #[test]
    fn quit() {
        let (mut globals, _rx) = globals();
        let mut menu = MainMenu::new(globals.options);
        assert!(matches!(
            press(&mut menu, &mut globals, KeyCode::Char('q')),
            Some(Screen::Quit)
        ));
    }

    /// Tabbing through every item comes back around to the start of the
    /// options
    #[test]
    fn tab_wraparound() {
        let (mut globals, _rx) = globals();
        let mut menu = MainMenu::new(globals.options);
        assert_eq!(menu.options.selection, None);
        for _ in OptKey::iter() {
            assert!(press(&mut menu, &mut globals, KeyCode::Tab).is_none());
        }
        assert_eq!(menu.options.selection, Some(OptKey::max()));
        assert!(press(&mut menu, &mut globals, KeyCode::Tab).is_none());
        assert_eq!(menu.options.selection, None);
        assert_eq!(menu.selection, Selection::StatsButton);
        assert!(press(&mut menu, &mut globals, KeyCode::Tab).is_none());
        assert!(press(&mut menu, &mut globals, KeyCode::Tab).is_none());
        assert!(press(&mut menu, &mut globals, KeyCode::Tab).is_none());
        assert_eq!(menu.options.selection, Some(OptKey::min()));
    }

    #[test]
    fn options_roundtrip() {
        let opts = Options {
            mode: Mode::Obstacle,
            difficulty: Difficulty::Insane,
            rival: false,
            ..Options::default()
        };
        assert_eq!(OptionsMenu::new(opts).to_options(), opts);
        assert_eq!(
            OptionsMenu::new(Options::default()).to_options(),
            Options::default()
        );
    }
}
