//! Mexicano: ladder movement between courts.

use crate::logic::ranking::{game_score, sort_by_rating_desc};
use crate::logic::rounds::{ensure_can_advance, RoundGenerator};
use crate::logic::standings::recalculate_standings;
use crate::models::{
    validate_roster, BracketData, Court, CourtName, Format, Match, MexicanoBracket, Outcome,
    Player, PlayerId, StateError, TournamentError, ValidationError, COURT_COUNT, MAX_ROUNDS,
};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Ladder generator: round 1 seeded by rating, later rounds driven by results.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mexicano;

impl RoundGenerator for Mexicano {
    fn generate_next(
        &self,
        bracket: &BracketData,
        roster: &[Player],
    ) -> Result<BracketData, TournamentError> {
        let BracketData::Mexicano(current) = bracket else {
            return Err(StateError::WrongFormat {
                expected: Format::Mexicano,
                actual: bracket.format(),
            }
            .into());
        };
        let active = active_courts(roster)?;
        let next = if current.current_round == 0 {
            seed_first_round(current, roster, active)
        } else {
            if current.current_round >= MAX_ROUNDS {
                return Err(StateError::TournamentFinished.into());
            }
            ensure_can_advance(bracket)?;
            ladder_round(current, roster, active)
        };
        log::info!(
            "Generated Mexicano round {} on {} court(s)",
            next.current_round,
            next.courts.len()
        );
        Ok(BracketData::Mexicano(next))
    }
}

/// Number of courts the roster fills: one per four players, at most four.
fn active_courts(roster: &[Player]) -> Result<usize, TournamentError> {
    validate_roster(roster)?;
    let count = roster.len();
    if count == 0 || count % 4 != 0 || count / 4 > COURT_COUNT {
        return Err(ValidationError::InvalidRosterSize { count }.into());
    }
    Ok(count / 4)
}

/// Round 1: rating order, four players per court from the top court down.
fn seed_first_round(current: &MexicanoBracket, roster: &[Player], active: usize) -> MexicanoBracket {
    let mut sorted = roster.to_vec();
    sort_by_rating_desc(&mut sorted);

    let courts = sorted
        .chunks_exact(4)
        .zip(CourtName::ALL)
        .take(active)
        .map(|(chunk, name)| Court {
            name,
            matches: vec![Match::balanced(quartet(chunk), 1, name)],
        })
        .collect();

    MexicanoBracket {
        current_round: 1,
        courts,
        completed_matches: current.completed_matches.clone(),
        standings: recalculate_standings(roster, &current.completed_matches),
    }
}

/// Rounds 2+: move every player up or down from the court they just played on.
fn ladder_round(current: &MexicanoBracket, roster: &[Player], active: usize) -> MexicanoBracket {
    let round = current.current_round;
    let by_id: HashMap<PlayerId, &Player> = roster.iter().map(|p| (p.id, p)).collect();

    let mut scores: HashMap<PlayerId, f64> = HashMap::new();
    let mut assigned: HashSet<PlayerId> = HashSet::new();
    let mut buckets: [Vec<Player>; COURT_COUNT] = Default::default();

    for m in current.completed_matches.iter().filter(|m| m.round == round) {
        let (Some(score1), Some(score2)) = (m.score1, m.score2) else {
            continue;
        };
        for (player, next_court) in movements(m, score1, score2, &by_id, &mut scores) {
            let Some(&p) = by_id.get(&player) else {
                log::warn!("Player {} left the roster; not paired again", player);
                continue;
            };
            if !assigned.insert(player) {
                continue;
            }
            log::debug!("{} moves from {} to {}", p.name, m.court, next_court);
            buckets[next_court.index()].push(p.clone());
        }
    }

    let bench: Vec<Player> = roster
        .iter()
        .filter(|p| !assigned.contains(&p.id))
        .cloned()
        .collect();
    let key = |p: &Player| scores.get(&p.id).copied().unwrap_or(p.rating);
    resolve_court_sizes(&mut buckets, bench, active, &key);

    let courts = CourtName::ALL
        .into_iter()
        .zip(buckets)
        .take(active)
        .map(|(name, mut players)| {
            players.sort_by(|a, b| key(b).total_cmp(&key(a)));
            Court {
                name,
                matches: vec![Match::balanced(quartet(&players), round + 1, name)],
            }
        })
        .collect();

    MexicanoBracket {
        current_round: round + 1,
        courts,
        completed_matches: current.completed_matches.clone(),
        standings: current.standings.clone(),
    }
}

/// Next court for each of the four players of a finished match. Records every
/// player's GameScore into `scores` along the way.
///
/// A drawn match is split inside each team: the partner with the higher GameScore
/// moves as a winner, the other as a loser. Equal GameScores favor the first-listed
/// partner.
fn movements(
    m: &Match,
    score1: i32,
    score2: i32,
    by_id: &HashMap<PlayerId, &Player>,
    scores: &mut HashMap<PlayerId, f64>,
) -> Vec<(PlayerId, CourtName)> {
    let rating = |p: &Player| by_id.get(&p.id).map_or(p.rating, |r| r.rating);
    for p in &m.team1 {
        scores.insert(p.id, game_score(score1, rating(p)));
    }
    for p in &m.team2 {
        scores.insert(p.id, game_score(score2, rating(p)));
    }

    let mut moves = Vec::with_capacity(4);
    if score1 != score2 {
        let (team1, team2) = if score1 > score2 {
            (Outcome::Win, Outcome::Loss)
        } else {
            (Outcome::Loss, Outcome::Win)
        };
        for p in &m.team1 {
            moves.push((p.id, m.court.next(team1)));
        }
        for p in &m.team2 {
            moves.push((p.id, m.court.next(team2)));
        }
    } else {
        for [a, b] in [&m.team1, &m.team2] {
            let (a_out, b_out) = if scores[&a.id] >= scores[&b.id] {
                (Outcome::Win, Outcome::Loss)
            } else {
                (Outcome::Loss, Outcome::Win)
            };
            moves.push((a.id, m.court.next(a_out)));
            moves.push((b.id, m.court.next(b_out)));
        }
    }
    moves
}

/// Even out the courts so each active court holds exactly four players.
///
/// Benched players (no result to move on) fill the largest deficit first. After that,
/// one player at a time moves from the most over-subscribed court to the most
/// under-subscribed one; courts beyond `active` count as fully over-subscribed. Ties go
/// to the higher court. A player moving down the ladder is the court's lowest ranked,
/// a player moving up its highest ranked.
fn resolve_court_sizes(
    buckets: &mut [Vec<Player>; COURT_COUNT],
    mut bench: Vec<Player>,
    active: usize,
    key: &dyn Fn(&Player) -> f64,
) {
    let capacity = |i: usize| if i < active { 4 } else { 0 };
    loop {
        let deficit = (0..active)
            .filter(|&i| buckets[i].len() < 4)
            .max_by_key(|&i| (4 - buckets[i].len(), Reverse(i)));
        let Some(to) = deficit else {
            break;
        };
        if !bench.is_empty() {
            let p = bench.remove(0);
            log::debug!("{} has no result to move on; placed on {}", p.name, CourtName::ALL[to]);
            buckets[to].push(p);
            continue;
        }
        let surplus = (0..COURT_COUNT)
            .filter(|&i| buckets[i].len() > capacity(i))
            .max_by_key(|&i| (buckets[i].len() - capacity(i), Reverse(i)));
        let Some(from) = surplus else {
            break;
        };
        let ranked = buckets[from].iter().enumerate();
        let by_key = |a: &(usize, &Player), b: &(usize, &Player)| key(a.1).total_cmp(&key(b.1));
        let pick = if from < to {
            ranked.min_by(by_key)
        } else {
            ranked.max_by(by_key)
        };
        let Some((pick, _)) = pick else {
            break;
        };
        let p = buckets[from].remove(pick);
        log::debug!(
            "Court balance: {} moved from {} to {}",
            p.name,
            CourtName::ALL[from],
            CourtName::ALL[to]
        );
        buckets[to].push(p);
    }
}

/// First four players of a slice known to hold at least four.
fn quartet(players: &[Player]) -> [Player; 4] {
    [
        players[0].clone(),
        players[1].clone(),
        players[2].clone(),
        players[3].clone(),
    ]
}
