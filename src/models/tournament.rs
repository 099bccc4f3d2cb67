//! Tournament record: name, format and the player roster.

use crate::logic::partition_groups;
use crate::models::bracket::Format;
use crate::models::court::GroupColor;
use crate::models::error::{StateError, TournamentError, ValidationError};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A tournament and its roster. The bracket itself lives in the bracket store.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: Format,
    pub players: Vec<Player>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament with no players.
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            players: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a tournament with an initial roster. Ids and names must be unique.
    pub fn with_players(
        name: impl Into<String>,
        format: Format,
        players: Vec<Player>,
    ) -> Result<Self, TournamentError> {
        validate_roster(&players)?;
        Ok(Self {
            players,
            ..Self::new(name, format)
        })
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Add a player. Names must be unique (case-insensitive) and non-empty.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        rating: f64,
    ) -> Result<PlayerId, TournamentError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(ValidationError::EmptyPlayerName.into());
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(ValidationError::DuplicatePlayerName(name_trimmed.to_string()).into());
        }
        let player = Player::new(name_trimmed, rating);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<Player, TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        Ok(self.players.remove(idx))
    }

    /// Move a player into `group` at `position` (clamped to the group's size).
    ///
    /// The current partition is written onto every player first, then `group_order` is
    /// rewritten for all members of the source and destination groups. The presence of
    /// `group_order` marks the groups as manually arranged, which lets Americano rounds
    /// be regenerated.
    pub fn move_player_to_group(
        &mut self,
        player_id: PlayerId,
        group: GroupColor,
        position: usize,
    ) -> Result<(), TournamentError> {
        if self.format != Format::Americano {
            return Err(StateError::WrongFormat {
                expected: Format::Americano,
                actual: self.format,
            }
            .into());
        }
        if self.get_player(player_id).is_none() {
            return Err(TournamentError::PlayerNotFound(player_id));
        }

        let mut groups = partition_groups(&self.players);
        let mut moved = None;
        for members in groups.values_mut() {
            if let Some(idx) = members.iter().position(|p| p.id == player_id) {
                moved = Some(members.remove(idx));
            }
        }
        // Players left out of a pre-assigned partition are not in any group yet.
        let moved = match moved {
            Some(p) => p,
            None => self
                .get_player(player_id)
                .cloned()
                .ok_or(TournamentError::PlayerNotFound(player_id))?,
        };
        let target = groups.entry(group).or_default();
        let at = position.min(target.len());
        target.insert(at, moved);

        for (color, members) in &groups {
            for (order, member) in members.iter().enumerate() {
                if let Some(p) = self.players.iter_mut().find(|p| p.id == member.id) {
                    p.group = Some(*color);
                    p.group_order = Some(order as u32);
                }
            }
        }
        log::debug!(
            "Tournament {}: moved player {} to {} at {}",
            self.id,
            player_id,
            group,
            at
        );
        Ok(())
    }
}

/// Roster ids and names must be unique; names must be non-empty.
pub fn validate_roster(players: &[Player]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for p in players {
        if !ids.insert(p.id) {
            return Err(ValidationError::DuplicatePlayer(p.id));
        }
        let name = p.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyPlayerName);
        }
        if !names.insert(name.to_ascii_lowercase()) {
            return Err(ValidationError::DuplicatePlayerName(name.to_string()));
        }
    }
    Ok(())
}
