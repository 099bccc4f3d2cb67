//! Score entry: one side of one match at a time.

use crate::logic::americano::refresh_progress;
use crate::logic::rounds::{can_advance, is_finished};
use crate::logic::standings::retally;
use crate::models::{
    BracketData, Match, MatchId, Side, TournamentError, ValidationError, MAX_SCORE,
};
use serde::Serialize;

/// Result of a score edit: the new bracket plus what changed about progress.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub bracket: BracketData,
    /// The edited match's round now has every score in.
    pub round_complete: bool,
    /// The last round is complete; show the final results.
    pub tournament_complete: bool,
}

/// Set `side`'s score on match `match_id`.
///
/// The match is looked up among the live matches first, then in the ledger (a
/// correction to an earlier round). The 0..=10 range is only enforced once the other
/// side's score is known. When the match is complete it is upserted into the ledger by
/// id and the standings are rebuilt from the ledger.
pub fn update_score(
    bracket: &BracketData,
    match_id: MatchId,
    side: Side,
    score: i32,
) -> Result<ScoreUpdate, TournamentError> {
    let mut next = bracket.clone();
    let round = match &mut next {
        BracketData::Mexicano(b) => {
            let live = b.courts.iter_mut().flat_map(|c| c.matches.iter_mut());
            let round = apply_score(live, &mut b.completed_matches, match_id, side, score)?;
            b.standings = retally(&b.standings, &b.completed_matches);
            round
        }
        BracketData::Americano(b) => {
            let live = b.rounds.iter_mut().flat_map(|r| r.matches.iter_mut());
            let round = apply_score(live, &mut b.completed_matches, match_id, side, score)?;
            b.standings = retally(&b.standings, &b.completed_matches);
            refresh_progress(b);
            round
        }
    };

    let round_complete = match &next {
        BracketData::Mexicano(b) => round == b.current_round && can_advance(&next),
        BracketData::Americano(b) => b
            .rounds
            .iter()
            .find(|r| r.number == round)
            .is_some_and(|r| r.completed),
    };
    let tournament_complete = is_finished(&next);
    if tournament_complete {
        log::info!("All {} rounds complete", next.format());
    } else if round_complete {
        log::info!("Round {} complete", round);
    }

    Ok(ScoreUpdate {
        bracket: next,
        round_complete,
        tournament_complete,
    })
}

/// Apply the edit and keep the ledger in sync. Returns the match's round.
fn apply_score<'a>(
    mut live: impl Iterator<Item = &'a mut Match>,
    ledger: &mut Vec<Match>,
    match_id: MatchId,
    side: Side,
    score: i32,
) -> Result<u32, TournamentError> {
    if let Some(m) = live.find(|m| m.id == match_id) {
        set_checked(m, side, score)?;
        if m.completed {
            upsert(ledger, m.clone());
        }
        return Ok(m.round);
    }
    let m = ledger
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    set_checked(m, side, score)?;
    Ok(m.round)
}

fn set_checked(m: &mut Match, side: Side, score: i32) -> Result<(), ValidationError> {
    if m.score(side.opposite()).is_some() && !(0..=MAX_SCORE).contains(&score) {
        return Err(ValidationError::ScoreOutOfRange { score });
    }
    m.set_score(side, score);
    Ok(())
}

/// Replace by id, or append.
fn upsert(ledger: &mut Vec<Match>, m: Match) {
    match ledger.iter_mut().find(|existing| existing.id == m.id) {
        Some(existing) => *existing = m,
        None => ledger.push(m),
    }
}
