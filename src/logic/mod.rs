//! Tournament business logic: pairing, standings, score entry, round progression.

mod americano;
mod mexicano;
mod ranking;
mod rounds;
mod scoring;
mod standings;

pub use americano::{partition_groups, Americano};
pub use mexicano::Mexicano;
pub use ranking::{compare_standings, game_score, rank_standings, sort_by_rating_desc, standings_by_group};
pub use rounds::{
    can_advance, ensure_can_advance, generate_round, generator_for, is_finished, rollback_to_round,
    RoundGenerator,
};
pub use scoring::{update_score, ScoreUpdate};
pub use standings::recalculate_standings;
