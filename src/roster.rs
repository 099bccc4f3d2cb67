//! Roster import from CSV with header `name,rating[,group][,group_order]`.

use crate::models::{validate_roster, GroupColor, Player, ValidationError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    rating: f64,
    #[serde(default)]
    group: Option<GroupColor>,
    #[serde(default)]
    group_order: Option<u32>,
}

/// Read players from CSV. Every row gets a fresh id; names must be unique.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Player>, ValidationError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut players = Vec::new();
    for row in rdr.deserialize::<RosterRow>() {
        let row = row.map_err(|e| ValidationError::MalformedRoster(e.to_string()))?;
        let mut player = Player::new(row.name, row.rating);
        player.group = row.group;
        player.group_order = row.group_order;
        players.push(player);
    }
    validate_roster(&players)?;
    log::info!("Imported {} player(s) from CSV", players.len());
    Ok(players)
}
