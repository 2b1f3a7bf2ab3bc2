use crate::game::SessionSummary;
use crate::options::{BoardSize, Difficulty, Mode, Options};
use crate::store::{self, LoadError, SaveError, Store};
use enum_map::Enum;
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;

/// Everything remembered between runs about past sessions
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Records {
    pub(crate) high_scores: HighScores,
    pub(crate) statistics: Statistics,
}

impl Records {
    /// Load records from `store`.  Missing entries start out empty.
    pub(crate) fn load(store: &dyn Store) -> Result<Records, LoadError> {
        let high_scores = store::load(store, store::HIGH_SCORES)?.unwrap_or_default();
        let statistics = store::load(store, store::STATISTICS)?.unwrap_or_default();
        Ok(Records {
            high_scores,
            statistics,
        })
    }

    /// Add a finished session to the records.  Returns `true` if it set a
    /// new high score.
    pub(crate) fn record(&mut self, summary: &SessionSummary) -> bool {
        self.statistics.record(summary);
        self.high_scores.record(summary.options, summary.score)
    }

    /// Write the records to `store`.  Statistics that have been reset to
    /// nothing are removed from the store outright.
    pub(crate) fn save(&self, store: &mut dyn Store) -> Result<(), SaveError> {
        store::save(store, store::HIGH_SCORES, &self.high_scores)?;
        if self.statistics == Statistics::default() {
            store.remove(store::STATISTICS)
        } else {
            store::save(store, store::STATISTICS, &self.statistics)
        }
    }
}

/// The gameplay options that a high score is kept separately for.  Sound
/// doesn't count.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ScoreKey {
    mode: Mode,
    difficulty: Difficulty,
    board_size: BoardSize,
    rival: bool,
}

impl From<Options> for ScoreKey {
    fn from(options: Options) -> ScoreKey {
        ScoreKey {
            mode: options.mode,
            difficulty: options.difficulty,
            board_size: options.board_size,
            rival: options.rival,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HighScores(HashMap<ScoreKey, NonZeroU32>);

impl HighScores {
    /// Return the high score for the given options, or zero if there is none
    pub(crate) fn get(&self, options: Options) -> u32 {
        self.0
            .get(&ScoreKey::from(options))
            .map_or(0, |&score| score.get())
    }

    /// Record a score, returning `true` if it beats the previous high score
    pub(crate) fn record(&mut self, options: Options, score: u32) -> bool {
        let Some(score) = NonZeroU32::new(score) else {
            return false;
        };
        let key = ScoreKey::from(options);
        if self.0.get(&key).is_some_and(|&best| best >= score) {
            return false;
        }
        self.0.insert(key, score);
        true
    }

    fn to_json_array(&self) -> Vec<HighScoreEntry> {
        let mut entries = self
            .0
            .iter()
            .map(|(&key, &score)| HighScoreEntry { key, score })
            .collect::<Vec<_>>();
        // Keep the file stable from one save to the next
        entries.sort_by_key(|e| {
            (
                e.key.mode.into_usize(),
                e.key.difficulty.into_usize(),
                e.key.board_size.into_usize(),
                e.key.rival,
            )
        });
        entries
    }

    fn from_json_array(array: Vec<HighScoreEntry>) -> HighScores {
        HighScores(array.into_iter().map(|e| (e.key, e.score)).collect())
    }
}

impl Serialize for HighScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HighScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<HighScoreEntry>::deserialize(deserializer).map(HighScores::from_json_array)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct HighScoreEntry {
    #[serde(flatten)]
    key: ScoreKey,
    score: NonZeroU32,
}

/// Lifetime totals over every finished session
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Statistics {
    pub(crate) total_games: u32,
    pub(crate) total_score: u32,
    pub(crate) best_streak: u32,
    /// Time spent playing, in milliseconds
    pub(crate) time_played_ms: u64,
    pub(crate) food_eaten: u32,
}

impl Statistics {
    pub(crate) fn record(&mut self, summary: &SessionSummary) {
        self.total_games = self.total_games.saturating_add(1);
        self.total_score = self.total_score.saturating_add(summary.score);
        self.best_streak = self.best_streak.max(summary.best_streak);
        let elapsed_ms = u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX);
        self.time_played_ms = self.time_played_ms.saturating_add(elapsed_ms);
        self.food_eaten = self.food_eaten.saturating_add(summary.food_eaten);
    }

    pub(crate) fn time_played(&self) -> Duration {
        Duration::from_millis(self.time_played_ms)
    }

    pub(crate) fn average_score(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            f64::from(self.total_score) / f64::from(self.total_games)
        }
    }
}
