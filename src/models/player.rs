//! Player data structure.

use crate::models::court::GroupColor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches, standings and lookups).
pub type PlayerId = Uuid;

/// A player on the tournament roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Seed strength. Used for round 1 seeding and as the GameScore tie-break.
    pub rating: f64,
    /// Americano group color, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupColor>,
    /// Manual position within the group. Present only after a human re-arranged the groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_order: Option<u32>,
}

impl Player {
    /// Create a new player with the given name and rating, not yet in any group.
    pub fn new(name: impl Into<String>, rating: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rating,
            group: None,
            group_order: None,
        }
    }

    /// Builder-style group assignment (used by roster import and tests).
    pub fn in_group(mut self, group: GroupColor) -> Self {
        self.group = Some(group);
        self
    }

    /// Builder-style manual position inside the group.
    pub fn with_group_order(mut self, order: u32) -> Self {
        self.group_order = Some(order);
        self
    }
}
