//! Shared sorting helpers: GameScore, rating order, standings rank.

use crate::models::{GroupColor, Player, Standing};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ranking key for movement and within-court pairing. Score dominates, rating breaks ties.
pub fn game_score(score: i32, rating: f64) -> f64 {
    f64::from(score) * 100.0 + rating
}

/// Strongest first. Stable, so equal ratings keep roster order.
pub fn sort_by_rating_desc(players: &mut [Player]) {
    players.sort_by(|a, b| b.rating.total_cmp(&a.rating));
}

/// Leaderboard order: points, then wins, then fewer losses, then name.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.losses.cmp(&b.losses))
        .then_with(|| a.name.cmp(&b.name))
}

/// Ranked copy of the standings.
pub fn rank_standings(standings: &[Standing]) -> Vec<Standing> {
    let mut ranked = standings.to_vec();
    ranked.sort_by(compare_standings);
    ranked
}

/// Ranked standings per Americano group. Players without a group are left out.
pub fn standings_by_group(standings: &[Standing]) -> BTreeMap<GroupColor, Vec<Standing>> {
    let mut groups: BTreeMap<GroupColor, Vec<Standing>> = BTreeMap::new();
    for s in standings {
        if let Some(group) = s.group {
            groups.entry(group).or_default().push(s.clone());
        }
    }
    for members in groups.values_mut() {
        members.sort_by(compare_standings);
    }
    groups
}
