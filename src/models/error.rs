//! Errors for engine, roster and persistence operations.

use crate::models::bracket::Format;
use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use std::fmt;

/// Input rejected; nothing was changed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    /// Score outside 0..=10 while the other side's score is already known.
    ScoreOutOfRange { score: i32 },
    /// Roster cannot fill whole matches on up to four courts.
    InvalidRosterSize { count: usize },
    /// The same player id appears twice in the roster.
    DuplicatePlayer(PlayerId),
    /// A player name is already taken (names are unique, case-insensitive).
    DuplicatePlayerName(String),
    EmptyPlayerName,
    /// A round number outside the rounds played so far.
    InvalidRound(u32),
    /// A roster row could not be read.
    MalformedRoster(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ScoreOutOfRange { score } => {
                write!(f, "Score {} is out of range (0-10)", score)
            }
            ValidationError::InvalidRosterSize { count } => write!(
                f,
                "Need 4, 8, 12 or 16 players to fill the courts (have {})",
                count
            ),
            ValidationError::DuplicatePlayer(id) => write!(f, "Player {} listed twice", id),
            ValidationError::DuplicatePlayerName(name) => {
                write!(f, "A player named {} already exists", name)
            }
            ValidationError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            ValidationError::InvalidRound(round) => write!(f, "Round {} is not valid here", round),
            ValidationError::MalformedRoster(msg) => write!(f, "Malformed roster: {}", msg),
        }
    }
}

/// The tournament is not in a state that allows the operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StateError {
    /// Not every match of the current round has both scores.
    PreviousRoundIncomplete { round: u32 },
    /// All rounds have been generated already.
    TournamentFinished,
    /// Americano rounds exist and the groups were not edited since.
    RoundsAlreadyGenerated,
    /// Rollback discards later rounds and needs explicit consent.
    RollbackNotConfirmed,
    /// Roster edits are only possible before the first round.
    AlreadyStarted,
    /// Operation only applies to the other format.
    WrongFormat { expected: Format, actual: Format },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::PreviousRoundIncomplete { round } => {
                write!(f, "Round {} is not complete yet", round)
            }
            StateError::TournamentFinished => write!(f, "All rounds have been played"),
            StateError::RoundsAlreadyGenerated => {
                write!(f, "Rounds are already generated; edit the groups to regenerate")
            }
            StateError::RollbackNotConfirmed => {
                write!(f, "Rolling back discards later rounds and must be confirmed")
            }
            StateError::AlreadyStarted => write!(f, "The tournament has already started"),
            StateError::WrongFormat { expected, actual } => {
                write!(f, "Only available for {} (this is {})", expected, actual)
            }
        }
    }
}

/// Saving or loading a bracket failed. Never retried here.
#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A lock around the store was poisoned by a panicking writer.
    Poisoned,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "Storage IO error: {}", e),
            PersistenceError::Json(e) => write!(f, "Storage JSON error: {}", e),
            PersistenceError::Poisoned => write!(f, "Storage lock poisoned"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Json(e) => Some(e),
            PersistenceError::Poisoned => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

/// Errors that can occur during tournament operations.
#[derive(Debug)]
pub enum TournamentError {
    Validation(ValidationError),
    State(StateError),
    /// Match id absent from both the live matches and the ledger.
    MatchNotFound(MatchId),
    PlayerNotFound(PlayerId),
    TournamentNotFound(TournamentId),
    Persistence(PersistenceError),
}

impl fmt::Display for TournamentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentError::Validation(e) => e.fmt(f),
            TournamentError::State(e) => e.fmt(f),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::TournamentNotFound(_) => write!(f, "No tournament"),
            TournamentError::Persistence(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TournamentError::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for TournamentError {
    fn from(e: ValidationError) -> Self {
        TournamentError::Validation(e)
    }
}

impl From<StateError> for TournamentError {
    fn from(e: StateError) -> Self {
        TournamentError::State(e)
    }
}

impl From<PersistenceError> for TournamentError {
    fn from(e: PersistenceError) -> Self {
        TournamentError::Persistence(e)
    }
}
