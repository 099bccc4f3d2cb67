//! Match and Side for 2v2 padel games.

use crate::models::court::{CourtName, GroupColor};
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Highest score a side can record once both scores are known.
pub const MAX_SCORE: i32 = 10;

/// A pair of players playing together.
pub type Pair = [Player; 2];

/// Which side of the net a score belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// A single 2v2 match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub team1: Pair,
    pub team2: Pair,
    /// None until entered.
    pub score1: Option<i32>,
    pub score2: Option<i32>,
    /// Both scores entered.
    pub completed: bool,
    /// Round number, 1-based.
    pub round: u32,
    pub court: CourtName,
    /// Americano group this match belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_color: Option<GroupColor>,
    /// Second group of an Americano mix-round match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_with: Option<GroupColor>,
}

impl Match {
    pub fn new(team1: Pair, team2: Pair, round: u32, court: CourtName) -> Self {
        Self {
            id: Uuid::new_v4(),
            team1,
            team2,
            score1: None,
            score2: None,
            completed: false,
            round,
            court,
            group_color: None,
            mixed_with: None,
        }
    }

    /// Pair up four players sorted strongest first: highest with lowest, middle two together.
    pub fn balanced(sorted: [Player; 4], round: u32, court: CourtName) -> Self {
        let [p0, p1, p2, p3] = sorted;
        Self::new([p0, p3], [p1, p2], round, court)
    }

    pub fn with_group(mut self, group: GroupColor) -> Self {
        self.group_color = Some(group);
        self
    }

    pub fn mixed_with(mut self, other: GroupColor) -> Self {
        self.mixed_with = Some(other);
        self
    }

    pub fn score(&self, side: Side) -> Option<i32> {
        match side {
            Side::One => self.score1,
            Side::Two => self.score2,
        }
    }

    /// Set one side's score and refresh `completed`.
    pub fn set_score(&mut self, side: Side, score: i32) {
        match side {
            Side::One => self.score1 = Some(score),
            Side::Two => self.score2 = Some(score),
        }
        self.refresh_completed();
    }

    /// Wipe both scores (used when a round is rolled back).
    pub fn clear_scores(&mut self) {
        self.score1 = None;
        self.score2 = None;
        self.completed = false;
    }

    pub fn refresh_completed(&mut self) {
        self.completed = self.score1.is_some() && self.score2.is_some();
    }

    pub fn team(&self, side: Side) -> &Pair {
        match side {
            Side::One => &self.team1,
            Side::Two => &self.team2,
        }
    }

    /// All four players, team 1 first.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.team1.iter().chain(self.team2.iter())
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.players().any(|p| p.id == player_id)
    }

    /// Same round and the same player ids on the same sides.
    pub fn same_lineup(&self, other: &Match) -> bool {
        fn ids(pair: &Pair) -> [PlayerId; 2] {
            let mut ids = [pair[0].id, pair[1].id];
            ids.sort();
            ids
        }
        self.round == other.round
            && ids(&self.team1) == ids(&other.team1)
            && ids(&self.team2) == ids(&other.team2)
    }
}
