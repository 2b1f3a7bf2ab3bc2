use crate::command::Controls;
use crate::config::Config;
use crate::game::{Game, SessionSummary};
use crate::menu::{MainMenu, StatsScreen};
use crate::options::Options;
use crate::records::Records;
use crate::store::{self, MemoryStore, Store};
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::read;
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{backend::Backend, Terminal};
use std::error::Error;
use std::io;
use std::sync::mpsc::{channel, Receiver, Sender};

/// State shared by every screen
#[derive(Clone, Debug)]
pub(crate) struct Globals {
    /// The options the next session will be played with
    pub(crate) options: Options,
    pub(crate) controls: Controls,
    pub(crate) records: Records,
    /// Where finished sessions report their results
    pub(crate) sessions: Sender<SessionSummary>,
    seed: Option<u64>,
    session_count: u64,
}

impl Globals {
    pub(crate) fn new(
        options: Options,
        controls: Controls,
        records: Records,
        sessions: Sender<SessionSummary>,
        seed: Option<u64>,
    ) -> Globals {
        Globals {
            options,
            controls,
            records,
            sessions,
            seed,
            session_count: 0,
        }
    }

    /// Return an RNG for a new game screen.  With a fixed seed, the n-th game
    /// of a run is seeded with the seed plus n.
    pub(crate) fn session_rng(&mut self) -> StdRng {
        let seed = match self.seed {
            Some(base) => base.wrapping_add(self.session_count),
            None => rand::rng().random(),
        };
        self.session_count += 1;
        tracing::info!(seed, "seeding new session");
        StdRng::seed_from_u64(seed)
    }

    /// Return the high score for the current options
    pub(crate) fn high_score(&self) -> u32 {
        self.records.high_scores.get(self.options)
    }
}

#[derive(Debug)]
pub(crate) struct App {
    screen: Screen,
    globals: Globals,
    store: Box<dyn Store>,
    sessions: Receiver<SessionSummary>,
    warning: Option<Warning>,
    /// The options & records as of the last time they were written to the
    /// store
    saved_options: Options,
    saved_records: Records,
}

impl App {
    /// Open the data store named by `config` and load the saved options and
    /// records from it.  Problems with the data file are shown to the user
    /// as a warning rather than stopping the program.
    pub(crate) fn new(config: &Config, seed: Option<u64>) -> App {
        let mut warning = None;
        let store: Box<dyn Store> = match config.open_store() {
            Ok(store) => store,
            Err(e) => {
                report(&mut warning, &e);
                Box::new(MemoryStore::default())
            }
        };
        let options = store::load(&*store, store::SETTINGS)
            .unwrap_or_else(|e| {
                report(&mut warning, &e);
                None
            })
            .unwrap_or(config.options);
        let records = Records::load(&*store).unwrap_or_else(|e| {
            report(&mut warning, &e);
            Records::default()
        });
        let (sender, receiver) = channel();
        let globals = Globals::new(options, config.controls, records.clone(), sender, seed);
        App {
            screen: Screen::Main(MainMenu::new(options)),
            globals,
            store,
            sessions: receiver,
            warning,
            saved_options: options,
            saved_records: records,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
            self.persist();
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| {
            match self.screen {
                Screen::Main(ref menu) => menu.draw(frame),
                Screen::Game(ref game) => game.draw(frame),
                Screen::Stats(ref stats) => stats.draw(frame),
                Screen::Quit => (),
            }
            if let Some(ref warning) = self.warning {
                frame.render_widget(warning, frame.area());
            }
        })?;
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        if let Some(ref mut warning) = self.warning {
            match warning.handle_event(read()?) {
                Some(WarningOutcome::Dismissed) => self.warning = None,
                Some(WarningOutcome::Quit) => self.screen = Screen::Quit,
                None => (),
            }
            return Ok(());
        }
        let next = match self.screen {
            Screen::Main(ref mut menu) => menu.process_input(&mut self.globals)?,
            Screen::Game(ref mut game) => game.process_input(&self.globals)?,
            Screen::Stats(ref mut stats) => stats.process_input(&mut self.globals)?,
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            self.screen = screen;
        }
        Ok(())
    }

    /// Fold finished sessions into the records, then write out whatever
    /// changed since the last save
    fn persist(&mut self) {
        for summary in self.sessions.try_iter() {
            tracing::info!(
                outcome = %summary.outcome,
                score = summary.score,
                best_streak = summary.best_streak,
                elapsed_ms = u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
                "session ended"
            );
            if self.globals.records.record(&summary) {
                tracing::info!(score = summary.score, "new high score");
            }
        }
        if self.globals.options != self.saved_options {
            // A failed save isn't retried until the value changes again
            self.saved_options = self.globals.options;
            if let Err(e) = store::save(&mut *self.store, store::SETTINGS, &self.globals.options)
            {
                report(&mut self.warning, &e);
            }
        }
        if self.globals.records != self.saved_records {
            self.saved_records = self.globals.records.clone();
            if let Err(e) = self.globals.records.save(&mut *self.store) {
                report(&mut self.warning, &e);
            }
        }
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

/// Log an error and show it in a warning pop-up, unless a warning is already
/// showing
fn report(warning: &mut Option<Warning>, e: &dyn Error) {
    tracing::warn!(error = %e, "data file problem");
    if warning.is_none() {
        *warning = Some(Warning::from_error(e));
    }
}

#[derive(Debug)]
pub(crate) enum Screen {
    Main(MainMenu),
    Game(Box<Game>),
    Stats(StatsScreen),
    Quit,
}
