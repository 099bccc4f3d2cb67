//! Tournament service: the context object that wires rosters, engine, store and events.
//!
//! Tournament records are written through the store next to their brackets and read
//! back when the service starts, so a durable store survives restarts.
//!
//! Each write operation holds the tournament map's write lock for its whole
//! load → transform → save → publish sequence, so two transformations of the same
//! tournament never interleave and every save is a full document built from the latest
//! snapshot.

use crate::events::{BracketEvent, EventBus};
use crate::logic::{
    can_advance, generate_round, rank_standings, rollback_to_round, standings_by_group, update_score,
    ScoreUpdate,
};
use crate::models::{
    BracketData, Format, GroupColor, MatchId, PersistenceError, Player, PlayerId, Side, Standing,
    StateError, Tournament, TournamentError, TournamentId,
};
use crate::store::BracketStore;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Tournament record together with its current bracket.
#[derive(Clone, Debug, Serialize)]
pub struct TournamentView {
    pub tournament: Tournament,
    pub bracket: BracketData,
}

/// Ranked standings, plus per-group tables and final results for Americano.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsView {
    pub standings: Vec<Standing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<GroupColor, Vec<Standing>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_standings: Option<Vec<Standing>>,
}

pub struct TournamentService {
    store: Box<dyn BracketStore>,
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
    events: EventBus,
}

impl TournamentService {
    /// Wrap `store`, loading every tournament it already holds.
    pub fn new(store: impl BracketStore + 'static) -> Result<Self, PersistenceError> {
        let tournaments: HashMap<TournamentId, Tournament> = store
            .load_tournaments()?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        if !tournaments.is_empty() {
            log::info!("Loaded {} saved tournament(s)", tournaments.len());
        }
        Ok(Self {
            store: Box::new(store),
            tournaments: RwLock::new(tournaments),
            events: EventBus::default(),
        })
    }

    /// Receive every saved bracket snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<BracketEvent> {
        self.events.subscribe()
    }

    /// Create a tournament with an empty bracket.
    pub fn create_tournament(
        &self,
        name: &str,
        format: Format,
        players: Vec<Player>,
    ) -> Result<TournamentView, TournamentError> {
        let tournament = Tournament::with_players(name.trim(), format, players)?;
        let bracket = BracketData::new(format);
        let mut g = self.write()?;
        self.store.save_tournament(&tournament)?;
        self.commit(tournament.id, &bracket)?;
        log::info!(
            "Created {} tournament {} ({}) with {} player(s)",
            format,
            tournament.name,
            tournament.id,
            tournament.players.len()
        );
        g.insert(tournament.id, tournament.clone());
        Ok(TournamentView { tournament, bracket })
    }

    pub fn tournament(&self, id: TournamentId) -> Result<TournamentView, TournamentError> {
        let g = self.read()?;
        let tournament = g
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))?;
        let bracket = self.load(id)?;
        Ok(TournamentView { tournament, bracket })
    }

    /// Drop the record and its bracket.
    pub fn delete_tournament(&self, id: TournamentId) -> Result<(), TournamentError> {
        let mut g = self.write()?;
        if !g.contains_key(&id) {
            return Err(TournamentError::TournamentNotFound(id));
        }
        self.store.delete(id)?;
        g.remove(&id);
        Ok(())
    }

    /// Add a player (only before the first round).
    pub fn add_player(
        &self,
        id: TournamentId,
        name: &str,
        rating: f64,
    ) -> Result<Tournament, TournamentError> {
        let mut g = self.write()?;
        let tournament = g.get_mut(&id).ok_or(TournamentError::TournamentNotFound(id))?;
        if self.load(id)?.is_started() {
            return Err(StateError::AlreadyStarted.into());
        }
        let mut edited = tournament.clone();
        edited.add_player(name, rating)?;
        self.store.save_tournament(&edited)?;
        *tournament = edited;
        Ok(tournament.clone())
    }

    /// Remove a player (only before the first round).
    pub fn remove_player(
        &self,
        id: TournamentId,
        player_id: PlayerId,
    ) -> Result<Tournament, TournamentError> {
        let mut g = self.write()?;
        let tournament = g.get_mut(&id).ok_or(TournamentError::TournamentNotFound(id))?;
        if self.load(id)?.is_started() {
            return Err(StateError::AlreadyStarted.into());
        }
        let mut edited = tournament.clone();
        edited.remove_player(player_id)?;
        self.store.save_tournament(&edited)?;
        *tournament = edited;
        Ok(tournament.clone())
    }

    /// Re-arrange an Americano group. If the schedule exists it is regenerated at once.
    pub fn move_player_to_group(
        &self,
        id: TournamentId,
        player_id: PlayerId,
        group: GroupColor,
        position: usize,
    ) -> Result<TournamentView, TournamentError> {
        let mut g = self.write()?;
        let tournament = g.get_mut(&id).ok_or(TournamentError::TournamentNotFound(id))?;
        let bracket = self.load(id)?;

        let mut edited = tournament.clone();
        edited.move_player_to_group(player_id, group, position)?;
        let regenerated = if bracket.is_started() {
            Some(generate_round(&bracket, &edited.players)?)
        } else {
            None
        };
        self.store.save_tournament(&edited)?;
        let bracket = match regenerated {
            Some(regenerated) => {
                self.commit(id, &regenerated)?;
                regenerated
            }
            None => bracket,
        };
        *tournament = edited;
        Ok(TournamentView {
            tournament: tournament.clone(),
            bracket,
        })
    }

    /// Generate the next round (Mexicano) or the schedule (Americano).
    pub fn generate_round(&self, id: TournamentId) -> Result<BracketData, TournamentError> {
        let g = self.write()?;
        let tournament = g.get(&id).ok_or(TournamentError::TournamentNotFound(id))?;
        let bracket = generate_round(&self.load(id)?, &tournament.players)?;
        self.commit(id, &bracket)?;
        Ok(bracket)
    }

    /// Enter one side's score.
    pub fn update_score(
        &self,
        id: TournamentId,
        match_id: MatchId,
        side: Side,
        score: i32,
    ) -> Result<ScoreUpdate, TournamentError> {
        let g = self.write()?;
        if !g.contains_key(&id) {
            return Err(TournamentError::TournamentNotFound(id));
        }
        let update = update_score(&self.load(id)?, match_id, side, score)?;
        self.commit(id, &update.bracket)?;
        Ok(update)
    }

    /// Roll back to `round`; see [`rollback_to_round`].
    pub fn rollback(
        &self,
        id: TournamentId,
        round: u32,
        confirmed: bool,
    ) -> Result<BracketData, TournamentError> {
        let g = self.write()?;
        if !g.contains_key(&id) {
            return Err(TournamentError::TournamentNotFound(id));
        }
        let bracket = rollback_to_round(&self.load(id)?, round, confirmed)?;
        self.commit(id, &bracket)?;
        Ok(bracket)
    }

    pub fn standings(&self, id: TournamentId) -> Result<StandingsView, TournamentError> {
        let g = self.read()?;
        if !g.contains_key(&id) {
            return Err(TournamentError::TournamentNotFound(id));
        }
        let bracket = self.load(id)?;
        let standings = rank_standings(bracket.standings());
        Ok(match bracket {
            BracketData::Mexicano(_) => StandingsView {
                standings,
                groups: None,
                final_standings: None,
            },
            BracketData::Americano(b) => StandingsView {
                groups: Some(standings_by_group(&b.standings)),
                final_standings: b.final_standings,
                standings,
            },
        })
    }

    pub fn can_advance(&self, id: TournamentId) -> Result<bool, TournamentError> {
        let g = self.read()?;
        if !g.contains_key(&id) {
            return Err(TournamentError::TournamentNotFound(id));
        }
        Ok(can_advance(&self.load(id)?))
    }

    fn load(&self, id: TournamentId) -> Result<BracketData, TournamentError> {
        self.store
            .load(id)?
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Save the full document, then notify subscribers.
    fn commit(&self, id: TournamentId, bracket: &BracketData) -> Result<(), TournamentError> {
        self.store.save(id, bracket)?;
        let receivers = self.events.publish(id, bracket.clone());
        log::debug!("Saved tournament {} round {}, {} subscriber(s) notified", id, bracket.current_round(), receivers);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<TournamentId, Tournament>>, PersistenceError> {
        self.tournaments.read().map_err(|_| PersistenceError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<TournamentId, Tournament>>, PersistenceError> {
        self.tournaments.write().map_err(|_| PersistenceError::Poisoned)
    }
}
