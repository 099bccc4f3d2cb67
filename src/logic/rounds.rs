//! Round state machine: generator dispatch, advance guard, rollback.

use crate::logic::americano::{refresh_progress, Americano};
use crate::logic::mexicano::Mexicano;
use crate::logic::standings::retally;
use crate::models::{BracketData, Player, StateError, TournamentError, ValidationError, MAX_ROUNDS};

/// Produces the next state of a bracket from the current one and the roster.
///
/// Implementations never mutate `bracket`; they return a new value or an error, in which
/// case the caller's bracket is still the latest valid state.
pub trait RoundGenerator {
    fn generate_next(
        &self,
        bracket: &BracketData,
        roster: &[Player],
    ) -> Result<BracketData, TournamentError>;
}

/// Generator for the bracket's format.
pub fn generator_for(bracket: &BracketData) -> &'static dyn RoundGenerator {
    match bracket {
        BracketData::Mexicano(_) => &Mexicano,
        BracketData::Americano(_) => &Americano,
    }
}

/// Generate the next round (Mexicano) or the full schedule (Americano).
pub fn generate_round(
    bracket: &BracketData,
    roster: &[Player],
) -> Result<BracketData, TournamentError> {
    generator_for(bracket).generate_next(bracket, roster)
}

/// Every match of the current round has both scores.
///
/// Mexicano checks every match on every court. Americano checks the current round.
pub fn can_advance(bracket: &BracketData) -> bool {
    match bracket {
        BracketData::Mexicano(b) => b
            .courts
            .iter()
            .all(|c| c.matches.iter().all(|m| m.completed)),
        BracketData::Americano(b) => b
            .rounds
            .iter()
            .find(|r| r.number == b.current_round)
            .map_or(true, |r| r.completed),
    }
}

/// Same as [`can_advance`] but as an error for callers that need the reason.
pub fn ensure_can_advance(bracket: &BracketData) -> Result<(), StateError> {
    if can_advance(bracket) {
        Ok(())
    } else {
        Err(StateError::PreviousRoundIncomplete {
            round: bracket.current_round(),
        })
    }
}

/// The last round has been played in full.
pub fn is_finished(bracket: &BracketData) -> bool {
    match bracket {
        BracketData::Mexicano(b) => b.current_round >= MAX_ROUNDS && can_advance(bracket),
        BracketData::Americano(b) => !b.rounds.is_empty() && b.rounds.iter().all(|r| r.completed),
    }
}

/// Roll back to `round`, discarding every result recorded after it.
///
/// Mexicano: ledger entries after `round` are dropped, live court matches are cleared and
/// `current_round` becomes `round`, so the next generation pairs from round `round`'s
/// results. Americano: scores of later rounds are wiped and progress is recomputed.
/// Standings are rebuilt from the truncated ledger in both cases.
///
/// Discarded results cannot be recovered, so `confirmed` must be true.
pub fn rollback_to_round(
    bracket: &BracketData,
    round: u32,
    confirmed: bool,
) -> Result<BracketData, TournamentError> {
    if !confirmed {
        return Err(StateError::RollbackNotConfirmed.into());
    }
    // Americano rounds after the current one may already hold scores, so any earlier round
    // is a valid target there.
    let upper = match bracket {
        BracketData::Mexicano(b) => b.current_round,
        BracketData::Americano(b) if b.rounds.is_empty() => 0,
        BracketData::Americano(_) => MAX_ROUNDS,
    };
    if round == 0 || round >= upper {
        return Err(ValidationError::InvalidRound(round).into());
    }

    let mut next = bracket.clone();
    match &mut next {
        BracketData::Mexicano(b) => {
            b.completed_matches.retain(|m| m.round <= round);
            b.courts.clear();
            b.standings = retally(&b.standings, &b.completed_matches);
            b.current_round = round;
        }
        BracketData::Americano(b) => {
            for r in b.rounds.iter_mut().filter(|r| r.number > round) {
                for m in &mut r.matches {
                    m.clear_scores();
                }
            }
            b.completed_matches.retain(|m| m.round <= round);
            b.standings = retally(&b.standings, &b.completed_matches);
            refresh_progress(b);
        }
    }
    log::info!(
        "Rolled back {} bracket from round {} to round {}",
        bracket.format(),
        bracket.current_round(),
        round
    );
    Ok(next)
}
