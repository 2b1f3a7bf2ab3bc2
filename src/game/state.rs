use std::fmt;

/// Where a session currently stands.  Transitions only happen on request
/// (input) or when the engine detects the end of a session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Phase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver(Outcome),
}

/// How a session ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Outcome {
    /// There was nowhere left to put the food
    Won,

    /// The clock ran out in timed mode
    TimeUp,

    /// The player's snake ran into something
    Crashed(Collision),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Won => write!(f, "board cleared"),
            Outcome::TimeUp => write!(f, "time up"),
            Outcome::Crashed(c) => write!(f, "crashed into {c}"),
        }
    }
}

/// What a snake crashed into
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    Wall,
    Obstacle,
    SelfBite,
    Rival,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Collision::Wall => "the wall",
            Collision::Obstacle => "an obstacle",
            Collision::SelfBite => "itself",
            Collision::Rival => "the rival",
        };
        f.write_str(s)
    }
}

/// The session's phase, score, and best score
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct GameState {
    phase: Phase,
    score: u32,
    high_score: u32,
}

impl GameState {
    pub(crate) fn new(high_score: u32) -> GameState {
        GameState {
            phase: Phase::Menu,
            score: 0,
            high_score,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn high_score(&self) -> u32 {
        self.high_score
    }

    pub(crate) fn playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub(crate) fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Begin a fresh session with a score of zero.  Only allowed from the
    /// menu or after a game over.
    pub(crate) fn start(&mut self) -> bool {
        if !matches!(self.phase, Phase::Menu | Phase::GameOver(_)) {
            return false;
        }
        self.score = 0;
        self.phase = Phase::Playing;
        true
    }

    pub(crate) fn pause(&mut self) -> bool {
        self.transition(Phase::Playing, Phase::Paused)
    }

    pub(crate) fn resume(&mut self) -> bool {
        self.transition(Phase::Paused, Phase::Playing)
    }

    /// Return to the menu from a paused or finished session
    pub(crate) fn to_menu(&mut self) -> bool {
        if !matches!(self.phase, Phase::Paused | Phase::GameOver(_)) {
            return false;
        }
        self.phase = Phase::Menu;
        true
    }

    /// End the running session.  The high score is raised if the score
    /// beats it.
    pub(crate) fn end(&mut self, outcome: Outcome) -> bool {
        if !self.transition(Phase::Playing, Phase::GameOver(outcome)) {
            return false;
        }
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        true
    }

    pub(crate) fn add_point(&mut self) {
        self.score += 1;
    }

    fn transition(&mut self, from: Phase, to: Phase) -> bool {
        if self.phase != from {
            return false;
        }
        self.phase = to;
        true
    }
}
