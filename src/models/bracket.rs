//! BracketData: the per-tournament document the engine transforms round by round.

use crate::models::court::CourtName;
use crate::models::game::{Match, MatchId};
use crate::models::standing::Standing;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounds in every tournament, both formats.
pub const MAX_ROUNDS: u32 = 4;

/// Tournament format.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Format {
    /// Ladder movement between courts, results-driven.
    #[default]
    Mexicano,
    /// Fixed colored groups, predetermined rotation.
    Americano,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Mexicano => f.write_str("Mexicano"),
            Format::Americano => f.write_str("Americano"),
        }
    }
}

/// A Mexicano court and the matches of the current round played on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub name: CourtName,
    pub matches: Vec<Match>,
}

/// One Americano round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    /// All matches of the round have both scores.
    pub completed: bool,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn refresh_completed(&mut self) {
        self.completed = self.matches.iter().all(|m| m.completed);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MexicanoBracket {
    /// 0 until round 1 has been generated.
    pub current_round: u32,
    pub courts: Vec<Court>,
    pub completed_matches: Vec<Match>,
    pub standings: Vec<Standing>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmericanoBracket {
    /// 0 until the rounds have been generated, then the first round still being played.
    pub current_round: u32,
    pub rounds: Vec<Round>,
    pub completed_matches: Vec<Match>,
    pub standings: Vec<Standing>,
    /// Ranked standings, set once every round is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_standings: Option<Vec<Standing>>,
}

/// Aggregate root, one per tournament. Serialized with a `format` tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format")]
pub enum BracketData {
    Mexicano(MexicanoBracket),
    Americano(AmericanoBracket),
}

impl BracketData {
    /// Empty bracket for a freshly created tournament.
    pub fn new(format: Format) -> Self {
        match format {
            Format::Mexicano => BracketData::Mexicano(MexicanoBracket::default()),
            Format::Americano => BracketData::Americano(AmericanoBracket::default()),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            BracketData::Mexicano(_) => Format::Mexicano,
            BracketData::Americano(_) => Format::Americano,
        }
    }

    pub fn current_round(&self) -> u32 {
        match self {
            BracketData::Mexicano(b) => b.current_round,
            BracketData::Americano(b) => b.current_round,
        }
    }

    /// The round has been generated at least once.
    pub fn is_started(&self) -> bool {
        self.current_round() > 0
    }

    pub fn completed_matches(&self) -> &[Match] {
        match self {
            BracketData::Mexicano(b) => &b.completed_matches,
            BracketData::Americano(b) => &b.completed_matches,
        }
    }

    pub fn standings(&self) -> &[Standing] {
        match self {
            BracketData::Mexicano(b) => &b.standings,
            BracketData::Americano(b) => &b.standings,
        }
    }

    /// Matches still on the board: the current round's court matches (Mexicano) or every
    /// scheduled match (Americano).
    pub fn live_matches(&self) -> Box<dyn Iterator<Item = &Match> + '_> {
        match self {
            BracketData::Mexicano(b) => Box::new(b.courts.iter().flat_map(|c| c.matches.iter())),
            BracketData::Americano(b) => Box::new(b.rounds.iter().flat_map(|r| r.matches.iter())),
        }
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.live_matches()
            .find(|m| m.id == id)
            .or_else(|| self.completed_matches().iter().find(|m| m.id == id))
    }
}
