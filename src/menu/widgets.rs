use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::Widget,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Logo;

impl Logo {
    const SNAKE_WIDTH: u16 = 28;
    const DUEL_WIDTH: u16 = 20;
    const BODY_LENGTH: u16 = 5;
    const GUTTER: u16 = 2;
    const DIAGRAM_WIDTH: u16 = 2 * (Self::BODY_LENGTH + 1 + Self::GUTTER) + 1;
    const TEXT_HEIGHT: u16 = 5;
    pub(super) const HEIGHT: u16 = Self::TEXT_HEIGHT + 2;
    pub(super) const WIDTH: u16 = Self::SNAKE_WIDTH + Self::DUEL_WIDTH;

    #[rustfmt::skip]
    const SNAKE: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " ____              _        ",
         "/ ___| _ __   __ _| | _____ ",
        r"\___ \| '_ \ / _` | |/ / _ \",
         " ___) | | | | (_| |   <  __/",
        r"|____/|_| |_|\__,_|_|\_\___|",
    ];

    #[rustfmt::skip]
    const DUEL: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " ____             _ ",
        r"|  _ \ _   _  ___| |",
        r"| | | | | | |/ _ \ |",
         "| |_| | |_| |  __/ |",
        r"|____/ \__,_|\___|_|",
    ];
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Self::WIDTH])
            .flex(Flex::Start)
            .areas(area);
        let [words_area, diagram_area] = Layout::vertical([Self::TEXT_HEIGHT, 1])
            .flex(Flex::Start)
            .spacing(1)
            .areas(area);
        let [snake_area, duel_area] = Layout::horizontal([Self::SNAKE_WIDTH, Self::DUEL_WIDTH])
            .flex(Flex::Start)
            .areas(words_area);
        Text::from_iter(Self::SNAKE)
            .style(consts::SNAKE_STYLE)
            .render(snake_area, buf);
        Text::from_iter(Self::DUEL)
            .style(consts::RIVAL_STYLE)
            .render(duel_area, buf);

        // Two snakes racing for the same food:  ⚬⚬⚬⚬⚬<  ●  >⚬⚬⚬⚬⚬
        let offset = diagram_area.width.saturating_sub(Self::DIAGRAM_WIDTH) / 2;
        let diagram_area = Rect {
            x: diagram_area.x + offset,
            width: diagram_area.width - offset,
            ..diagram_area
        };
        let [player_body, player_head, _, food, _, rival_head, rival_body] = Layout::horizontal([
            Constraint::Length(Self::BODY_LENGTH),
            Constraint::Length(1),
            Constraint::Length(Self::GUTTER),
            Constraint::Length(1),
            Constraint::Length(Self::GUTTER),
            Constraint::Length(1),
            Constraint::Length(Self::BODY_LENGTH),
        ])
        .flex(Flex::Start)
        .areas(diagram_area);
        let mut fill = |area: Rect, symbol: char, style: Style| {
            for p in area.positions() {
                if let Some(cell) = buf.cell_mut(p) {
                    cell.set_char(symbol);
                    cell.set_style(style);
                }
            }
        };
        fill(player_body, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        fill(player_head, consts::SNAKE_HEAD_EAST_SYMBOL, consts::SNAKE_STYLE);
        fill(food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        fill(rival_head, consts::SNAKE_HEAD_WEST_SYMBOL, consts::RIVAL_STYLE);
        fill(rival_body, consts::SNAKE_BODY_SYMBOL, consts::RIVAL_STYLE);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 2;
    pub(super) const WIDTH: u16 = 40;
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = |s: &'static str| Span::styled(s, consts::KEY_STYLE);
        let text = Text::from_iter([
            Line::from_iter([
                Span::raw("Steer with "),
                key("← ↓ ↑ →"),
                Span::raw(", "),
                key("h j k l"),
                Span::raw(", or "),
                key("a s w d"),
            ]),
            Line::from("Beat the rival to the food; don't crash!"),
        ]);
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        debug_assert_eq!(
            text.width(),
            usize::from(Self::WIDTH),
            "Instructions::WIDTH is wrong"
        );
        text.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    mod logo {
        use super::*;

        #[test]
        fn test_render() {
            let mut buffer = Buffer::empty(Rect::new(0, 0, 52, 9));
            Logo.render(Rect::new(2, 1, Logo::WIDTH, Logo::HEIGHT), &mut buffer);
            #[rustfmt::skip]
            let expected = [
                 "                                                    ",
                 "   ____              _         ____             _   ",
                r"  / ___| _ __   __ _| | _____ |  _ \ _   _  ___| |  ",
                r"  \___ \| '_ \ / _` | |/ / _ \| | | | | | |/ _ \ |  ",
                 "   ___) | | | | (_| |   <  __/| |_| | |_| |  __/ |  ",
                r"  |____/|_| |_|\__,_|_|\_\___||____/ \__,_|\___|_|  ",
                 "                                                    ",
                 "                 ⚬⚬⚬⚬⚬<  ●  >⚬⚬⚬⚬⚬                  ",
                 "                                                    ",
            ];
            pretty_assertions::assert_eq!(rows(&buffer), expected);
            assert_eq!(buffer[(2, 2)].fg, consts::SNAKE_STYLE.fg.unwrap());
            assert_eq!(buffer[(30, 2)].fg, consts::RIVAL_STYLE.fg.unwrap());
            assert_eq!(buffer[(25, 7)].fg, consts::FOOD_STYLE.fg.unwrap());
            assert_eq!(buffer[(28, 7)].fg, consts::RIVAL_STYLE.fg.unwrap());
        }

        #[test]
        fn snake_width() {
            assert!(Logo::SNAKE
                .iter()
                .all(|ln| ln.len() == usize::from(Logo::SNAKE_WIDTH)));
        }

        #[test]
        fn duel_width() {
            assert!(Logo::DUEL
                .iter()
                .all(|ln| ln.len() == usize::from(Logo::DUEL_WIDTH)));
        }
    }

    #[test]
    fn instructions() {
        let area = Rect::new(0, 0, Instructions::WIDTH, Instructions::HEIGHT);
        let mut buffer = Buffer::empty(area);
        Instructions.render(area, &mut buffer);
        pretty_assertions::assert_eq!(
            rows(&buffer),
            [
                "Steer with ← ↓ ↑ →, h j k l, or a s w d ",
                "Beat the rival to the food; don't crash!",
            ]
        );
        assert_eq!(buffer[(11, 0)].fg, consts::KEY_STYLE.fg.unwrap());
    }
}
