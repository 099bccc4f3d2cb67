//! Americano: four fixed colored groups with a predetermined partner rotation.

use crate::logic::ranking::{rank_standings, sort_by_rating_desc};
use crate::logic::rounds::RoundGenerator;
use crate::logic::standings::recalculate_standings;
use crate::models::{
    validate_roster, AmericanoBracket, BracketData, Format, GroupColor, Match, Player, Round,
    StateError, TournamentError, ValidationError, MAX_ROUNDS,
};
use std::collections::BTreeMap;

/// Positions (within a sorted group) of each team for the within-group rounds.
type Rotation = ([usize; 2], [usize; 2]);

const ROUND_1: Rotation = ([0, 3], [1, 2]);
const ROUND_2: Rotation = ([0, 1], [2, 3]);
const ROUND_4: Rotation = ([0, 2], [1, 3]);

/// Group pairs that meet in the mix round.
const MIX_PAIRS: [(GroupColor, GroupColor); 2] = [
    (GroupColor::Green, GroupColor::Blue),
    (GroupColor::Yellow, GroupColor::Pink),
];

/// Whole-schedule generator. Results never change the pairings.
#[derive(Clone, Copy, Debug, Default)]
pub struct Americano;

impl RoundGenerator for Americano {
    /// Generate all four rounds at once.
    ///
    /// Once rounds exist they are regenerated only if the groups were arranged by hand
    /// (some player carries a `group_order`). Matches whose line-up survives keep their
    /// id and scores.
    fn generate_next(
        &self,
        bracket: &BracketData,
        roster: &[Player],
    ) -> Result<BracketData, TournamentError> {
        let BracketData::Americano(current) = bracket else {
            return Err(StateError::WrongFormat {
                expected: Format::Americano,
                actual: bracket.format(),
            }
            .into());
        };
        if !current.rounds.is_empty() && !roster.iter().any(|p| p.group_order.is_some()) {
            return Err(StateError::RoundsAlreadyGenerated.into());
        }
        validate_roster(roster)?;
        if roster.len() < 4 || roster.len() > 16 {
            return Err(ValidationError::InvalidRosterSize { count: roster.len() }.into());
        }

        let groups = partition_groups(roster);
        let mut rounds = build_rounds(&groups);
        let mut carried = 0;
        for m in rounds.iter_mut().flat_map(|r| r.matches.iter_mut()) {
            let previous = current
                .rounds
                .iter()
                .flat_map(|r| r.matches.iter())
                .find(|old| old.same_lineup(m));
            if let Some(old) = previous {
                m.id = old.id;
                m.score1 = old.score1;
                m.score2 = old.score2;
                m.refresh_completed();
                carried += 1;
            }
        }

        let completed_matches: Vec<Match> = rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .filter(|m| m.completed)
            .cloned()
            .collect();
        let grouped_roster: Vec<Player> = groups.values().flatten().cloned().collect();

        let mut next = AmericanoBracket {
            current_round: 0,
            rounds,
            standings: recalculate_standings(&grouped_roster, &completed_matches),
            completed_matches,
            final_standings: None,
        };
        refresh_progress(&mut next);
        log::info!(
            "Generated Americano schedule: {} match(es) over {} rounds, {} carried over",
            next.rounds.iter().map(|r| r.matches.len()).sum::<usize>(),
            next.rounds.len(),
            carried
        );
        Ok(BracketData::Americano(next))
    }
}

/// Split the roster into the four colored groups, each ordered for pairing.
///
/// Existing `group` fields are used when every color has at least one member. Otherwise
/// players are sorted by rating and cut into quartiles of `ceil(n / 4)`: strongest to
/// green, then blue, yellow and pink. Within a group the manual `group_order` wins when
/// every member has one, else rating descending. Returned players carry their group.
pub fn partition_groups(players: &[Player]) -> BTreeMap<GroupColor, Vec<Player>> {
    let mut groups: BTreeMap<GroupColor, Vec<Player>> =
        GroupColor::ALL.iter().map(|&c| (c, Vec::new())).collect();
    for p in players {
        if let Some(color) = p.group {
            groups.entry(color).or_default().push(p.clone());
        }
    }

    if groups.values().any(Vec::is_empty) {
        let mut sorted = players.to_vec();
        sort_by_rating_desc(&mut sorted);
        let size = ((sorted.len() + 3) / 4).max(1);
        for members in groups.values_mut() {
            members.clear();
        }
        for (chunk, color) in sorted.chunks(size).zip(GroupColor::ALL) {
            let members = groups.entry(color).or_default();
            for p in chunk {
                let mut p = p.clone();
                p.group = Some(color);
                p.group_order = None;
                members.push(p);
            }
        }
    } else {
        let skipped = players.iter().filter(|p| p.group.is_none()).count();
        if skipped > 0 {
            log::warn!("{} player(s) without a group left out of the Americano groups", skipped);
        }
    }

    for members in groups.values_mut() {
        if members.iter().all(|p| p.group_order.is_some()) {
            members.sort_by_key(|p| p.group_order);
        } else {
            sort_by_rating_desc(members);
        }
    }
    groups
}

/// The full four-round schedule for fixed groups.
fn build_rounds(groups: &BTreeMap<GroupColor, Vec<Player>>) -> Vec<Round> {
    (1..=MAX_ROUNDS)
        .map(|number| {
            let matches = match number {
                1 => within_groups(groups, number, ROUND_1),
                2 => within_groups(groups, number, ROUND_2),
                3 => mix_round(groups, number),
                _ => within_groups(groups, number, ROUND_4),
            };
            Round {
                number,
                completed: false,
                matches,
            }
        })
        .collect()
}

/// One match per group on the group's own court. Groups short of four are skipped.
fn within_groups(
    groups: &BTreeMap<GroupColor, Vec<Player>>,
    round: u32,
    (team1, team2): Rotation,
) -> Vec<Match> {
    let mut matches = Vec::new();
    for (&color, members) in groups {
        if members.len() < 4 {
            log::debug!("Group {} has {} player(s); no match in round {}", color, members.len(), round);
            continue;
        }
        if members.len() > 4 {
            log::warn!("Group {} has {} players; only the first four are paired", color, members.len());
        }
        let pick = |[a, b]: [usize; 2]| [members[a].clone(), members[b].clone()];
        matches.push(Match::new(pick(team1), pick(team2), round, color.court()).with_group(color));
    }
    matches
}

/// Round 3: green plays with blue and yellow with pink, crossing partners between groups.
fn mix_round(groups: &BTreeMap<GroupColor, Vec<Player>>, round: u32) -> Vec<Match> {
    let empty = Vec::new();
    let mut matches = Vec::new();
    for (first, second) in MIX_PAIRS {
        let a = groups.get(&first).unwrap_or(&empty);
        let b = groups.get(&second).unwrap_or(&empty);
        if a.len() < 2 || b.len() < 2 {
            log::debug!("No mix match for {} and {} in round {}", first, second, round);
            continue;
        }
        matches.push(
            Match::new(
                [a[0].clone(), b[1].clone()],
                [a[1].clone(), b[0].clone()],
                round,
                first.court(),
            )
            .with_group(first)
            .mixed_with(second),
        );
        if a.len() >= 4 && b.len() >= 4 {
            matches.push(
                Match::new(
                    [a[2].clone(), b[3].clone()],
                    [a[3].clone(), b[2].clone()],
                    round,
                    second.court(),
                )
                .with_group(first)
                .mixed_with(second),
            );
        }
    }
    matches
}

/// Refresh round completion, the current round and the final standings.
///
/// The current round is the first one not yet complete, or the last round once all are.
pub(crate) fn refresh_progress(bracket: &mut AmericanoBracket) {
    for round in &mut bracket.rounds {
        round.refresh_completed();
    }
    bracket.current_round = if bracket.rounds.is_empty() {
        0
    } else {
        bracket
            .rounds
            .iter()
            .find(|r| !r.completed)
            .map_or(MAX_ROUNDS, |r| r.number)
    };
    let finished = !bracket.rounds.is_empty() && bracket.rounds.iter().all(|r| r.completed);
    bracket.final_standings = finished.then(|| rank_standings(&bracket.standings));
}
