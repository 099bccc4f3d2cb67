//! Standings calculator: full rebuild from the completed-match ledger.

use crate::models::{Match, Player, Standing};
use std::collections::HashMap;

/// Recompute every roster player's standing from `completed_matches`.
///
/// Team 1 wins only when `score1 > score2` and team 2 only when `score2 > score1`, so a
/// drawn match counts as a loss for all four players. Each player earns their team's
/// score as points either way. Pure: the same inputs always give the same output.
pub fn recalculate_standings(roster: &[Player], completed_matches: &[Match]) -> Vec<Standing> {
    tally(roster.iter().map(Standing::new).collect(), completed_matches)
}

/// Recompute using an existing standings list as the roster (keeps ids, names, groups).
pub(crate) fn retally(standings: &[Standing], completed_matches: &[Match]) -> Vec<Standing> {
    tally(standings.iter().map(Standing::reset).collect(), completed_matches)
}

fn tally(mut standings: Vec<Standing>, completed_matches: &[Match]) -> Vec<Standing> {
    let index: HashMap<_, _> = standings
        .iter()
        .enumerate()
        .map(|(i, s)| (s.player_id, i))
        .collect();

    for m in completed_matches {
        let (score1, score2) = match (m.score1, m.score2) {
            (Some(s1), Some(s2)) => (s1, s2),
            _ => {
                log::warn!("Skipping incomplete match {} found in the ledger", m.id);
                continue;
            }
        };
        let sides = [(&m.team1, score1, score1 > score2), (&m.team2, score2, score2 > score1)];
        for (team, score, won) in sides {
            for player in team {
                let Some(&i) = index.get(&player.id) else {
                    log::warn!(
                        "Match {} references player {} who is not on the roster",
                        m.id,
                        player.id
                    );
                    continue;
                };
                let standing = &mut standings[i];
                standing.record(score, won);
                if standing.group.is_none() {
                    standing.group = player.group;
                }
            }
        }
    }

    standings
}
