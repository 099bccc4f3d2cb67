//! Courts, the Mexicano ladder movement table, and Americano group colors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of courts (and therefore matches per round at full capacity).
pub const COURT_COUNT: usize = 4;

/// One of the four fixed courts, ordered from the top of the ladder to the bottom.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum CourtName {
    #[serde(rename = "Padel Arenas")]
    PadelArenas,
    #[serde(rename = "Coolbet")]
    Coolbet,
    #[serde(rename = "Lux Express")]
    LuxExpress,
    #[serde(rename = "3p Logistics")]
    ThreePLogistics,
}

/// How a player's team fared, as far as court movement is concerned.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

impl CourtName {
    /// All courts in ladder order (top first).
    pub const ALL: [CourtName; COURT_COUNT] = [
        CourtName::PadelArenas,
        CourtName::Coolbet,
        CourtName::LuxExpress,
        CourtName::ThreePLogistics,
    ];

    /// Position on the ladder, 0 being the top court.
    pub fn index(self) -> usize {
        match self {
            CourtName::PadelArenas => 0,
            CourtName::Coolbet => 1,
            CourtName::LuxExpress => 2,
            CourtName::ThreePLogistics => 3,
        }
    }

    /// Display name as shown on the venue boards.
    pub fn name(self) -> &'static str {
        match self {
            CourtName::PadelArenas => "Padel Arenas",
            CourtName::Coolbet => "Coolbet",
            CourtName::LuxExpress => "Lux Express",
            CourtName::ThreePLogistics => "3p Logistics",
        }
    }

    /// Ladder movement: winners climb one court, losers drop one. The top court keeps
    /// its winners and the bottom court keeps its losers.
    pub fn next(self, outcome: Outcome) -> CourtName {
        use CourtName::*;
        match (self, outcome) {
            (PadelArenas, Outcome::Win) => PadelArenas,
            (PadelArenas, Outcome::Loss) => Coolbet,
            (Coolbet, Outcome::Win) => PadelArenas,
            (Coolbet, Outcome::Loss) => LuxExpress,
            (LuxExpress, Outcome::Win) => Coolbet,
            (LuxExpress, Outcome::Loss) => ThreePLogistics,
            (ThreePLogistics, Outcome::Win) => LuxExpress,
            (ThreePLogistics, Outcome::Loss) => ThreePLogistics,
        }
    }
}

impl fmt::Display for CourtName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Americano group. Each group owns one court for the within-group rounds.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Green,
    Blue,
    Yellow,
    Pink,
}

impl GroupColor {
    /// All groups, strongest quartile first.
    pub const ALL: [GroupColor; 4] = [
        GroupColor::Green,
        GroupColor::Blue,
        GroupColor::Yellow,
        GroupColor::Pink,
    ];

    pub fn court(self) -> CourtName {
        match self {
            GroupColor::Green => CourtName::PadelArenas,
            GroupColor::Blue => CourtName::Coolbet,
            GroupColor::Yellow => CourtName::LuxExpress,
            GroupColor::Pink => CourtName::ThreePLogistics,
        }
    }

    pub fn index(self) -> usize {
        self.court().index()
    }
}

impl fmt::Display for GroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupColor::Green => "green",
            GroupColor::Blue => "blue",
            GroupColor::Yellow => "yellow",
            GroupColor::Pink => "pink",
        };
        f.write_str(s)
    }
}
