//! Difficulty levels and the policy table behind them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opponent strength, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    /// Answers threats and grabs material before searching.
    Reactive,
    Average,
    /// Deepest search; consults an external advisor when one is attached.
    WorldChampion,
}

/// Tunables for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Plies searched by minimax.
    pub depth: u32,
    /// Chance of playing a beginner-weighted random move.
    pub random_move_probability: f64,
    /// Chance of playing a bad or mediocre move instead of searching.
    pub suboptimal_move_probability: f64,
    /// Part of the suboptimal chance that goes to bad moves; the rest
    /// goes to mediocre ones.
    pub bad_move_share: f64,
    /// Chance that a searched move is kept. Otherwise a random move is
    /// played instead.
    pub search_acceptance: f64,
    /// Whether threat/tactic heuristics run before the search.
    pub reactive: bool,
    /// Whether an attached advisor is asked first.
    pub consult_advisor: bool,
}

impl DifficultyProfile {
    /// Plain search at `depth` with no randomness.
    pub const fn search_only(depth: u32) -> Self {
        DifficultyProfile {
            depth,
            random_move_probability: 0.0,
            suboptimal_move_probability: 0.0,
            bad_move_share: 0.0,
            search_acceptance: 1.0,
            reactive: false,
            consult_advisor: false,
        }
    }

    /// Maps a uniform roll in `[0, 1)` onto the branch this profile plays.
    ///
    /// The random band comes first, then bad moves, then mediocre moves;
    /// anything above goes to the search.
    pub fn policy(&self, roll: f64) -> Policy {
        let bad = self.suboptimal_move_probability * self.bad_move_share;
        let mut edge = self.random_move_probability;
        if roll < edge {
            return Policy::Random;
        }
        edge += bad;
        if roll < edge {
            return Policy::Bad;
        }
        edge += self.suboptimal_move_probability - bad;
        if roll < edge {
            return Policy::Mediocre;
        }
        Policy::Search
    }
}

/// Where a single move decision comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Beginner-weighted random move.
    Random,
    /// A move from the careless pool.
    Bad,
    /// A move from the middling pool.
    Mediocre,
    /// Reactive heuristics if enabled, then minimax.
    Search,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Reactive,
        Difficulty::Average,
        Difficulty::WorldChampion,
    ];

    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                random_move_probability: 0.5,
                suboptimal_move_probability: 0.4,
                bad_move_share: 0.625,
                search_acceptance: 0.8,
                ..DifficultyProfile::search_only(2)
            },
            Difficulty::Medium => DifficultyProfile {
                random_move_probability: 0.1,
                ..DifficultyProfile::search_only(3)
            },
            Difficulty::Hard => DifficultyProfile::search_only(4),
            Difficulty::Reactive => DifficultyProfile {
                reactive: true,
                ..DifficultyProfile::search_only(3)
            },
            Difficulty::Average => DifficultyProfile::search_only(5),
            Difficulty::WorldChampion => DifficultyProfile {
                consult_advisor: true,
                ..DifficultyProfile::search_only(6)
            },
        }
    }

    /// Name as written in config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Reactive => "reactive",
            Difficulty::Average => "average",
            Difficulty::WorldChampion => "world_champion",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    /// Case-insensitive; `world-champion`, `WorldChampion` and
    /// `world_champion` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().replace('_', "") == normalized)
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}
