//! Cumulative per-player standing.

use crate::models::court::GroupColor;
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// A player's cumulative results. Always rebuilt from the completed-match ledger.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupColor>,
    /// Sum of the scores this player's teams obtained. Saturates instead of overflowing.
    pub points: i64,
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
}

impl Standing {
    /// Fresh, all-zero standing for a roster player.
    pub fn new(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            group: player.group,
            points: 0,
            wins: 0,
            losses: 0,
            games_played: 0,
        }
    }

    /// Same player, counters back to zero.
    pub fn reset(&self) -> Self {
        Self {
            player_id: self.player_id,
            name: self.name.clone(),
            group: self.group,
            points: 0,
            wins: 0,
            losses: 0,
            games_played: 0,
        }
    }

    /// Record one finished game.
    pub fn record(&mut self, score: i32, won: bool) {
        self.points = self.points.saturating_add(i64::from(score));
        self.games_played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}
