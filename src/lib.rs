//! Padel tournament organizer: Mexicano / Americano pairing engine, standings, and
//! the collaborators (store, events, service) the web app runs on.

pub mod events;
pub mod logic;
pub mod models;
pub mod roster;
pub mod service;
pub mod store;

pub use logic::{
    can_advance, generate_round, is_finished, partition_groups, rank_standings,
    recalculate_standings, rollback_to_round, update_score, Americano, Mexicano, RoundGenerator,
    ScoreUpdate,
};
pub use models::{
    AmericanoBracket, BracketData, Court, CourtName, Format, GroupColor, Match, MatchId,
    MexicanoBracket, Outcome, Player, PlayerId, Round, Side, Standing, StateError, Tournament,
    TournamentError, TournamentId, ValidationError,
};
pub use service::TournamentService;
pub use store::{BracketStore, JsonFileStore, MemoryStore};
