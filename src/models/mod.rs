//! Data structures for the padel tournament: players, matches, brackets, standings.

mod bracket;
mod court;
mod error;
mod game;
mod player;
mod standing;
mod tournament;

pub use bracket::{AmericanoBracket, BracketData, Court, Format, MexicanoBracket, Round, MAX_ROUNDS};
pub use court::{CourtName, GroupColor, Outcome, COURT_COUNT};
pub use error::{PersistenceError, StateError, TournamentError, ValidationError};
pub use game::{Match, MatchId, Pair, Side, MAX_SCORE};
pub use player::{Player, PlayerId};
pub use standing::Standing;
pub use tournament::{validate_roster, Tournament, TournamentId};
