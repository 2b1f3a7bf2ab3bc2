use std::fmt;
use std::io::Write;

/// A named sound effect requested by the game
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Cue {
    Eat,
    GameOver,
    Pause,
    LevelUp,
}

/// Something that can play sound effects.  Playing is fire-and-forget:
/// failures are the implementation's problem and never reach the game.
pub(crate) trait Audio: fmt::Debug {
    fn play(&mut self, cue: Cue);
}

/// Plays cues by ringing the terminal bell
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bell {
    enabled: bool,
}

impl Bell {
    pub(crate) fn new(enabled: bool) -> Bell {
        Bell { enabled }
    }

    /// Number of rings for each cue, so that the cues are at least a little
    /// distinguishable from each other
    fn rings(cue: Cue) -> usize {
        match cue {
            Cue::Eat | Cue::Pause => 1,
            Cue::LevelUp => 2,
            Cue::GameOver => 3,
        }
    }
}

impl Audio for Bell {
    fn play(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let mut out = std::io::stdout().lock();
        let r = out
            .write_all("\x07".repeat(Bell::rings(cue)).as_bytes())
            .and_then(|()| out.flush());
        if let Err(e) = r {
            tracing::debug!(?cue, error = %e, "failed to ring terminal bell");
        }
    }
}

/// Remembers every cue played; used in tests
#[cfg(test)]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Recorder(pub(crate) Vec<Cue>);

#[cfg(test)]
impl Audio for Recorder {
    fn play(&mut self, cue: Cue) {
        self.0.push(cue);
    }
}
