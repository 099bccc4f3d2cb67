//! Tournament persistence: one whole JSON document per bracket and per tournament record.
//!
//! Saves always replace the full document, so a repeated save is harmless and a reader
//! never sees half of an update.

use crate::models::{BracketData, PersistenceError, Tournament, TournamentId};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const RECORD_SUFFIX: &str = ".tournament.json";

/// The engine's only contact with durability.
pub trait BracketStore: Send + Sync {
    /// Latest saved bracket, or `None` if the tournament has none.
    fn load(&self, id: TournamentId) -> Result<Option<BracketData>, PersistenceError>;

    /// Replace the stored bracket with `bracket`.
    fn save(&self, id: TournamentId, bracket: &BracketData) -> Result<(), PersistenceError>;

    /// Every saved tournament record, in no particular order.
    fn load_tournaments(&self) -> Result<Vec<Tournament>, PersistenceError>;

    /// Replace the stored record (name, format, roster) of `tournament`.
    fn save_tournament(&self, tournament: &Tournament) -> Result<(), PersistenceError>;

    /// Forget the tournament record and its bracket. Missing documents are not an error.
    fn delete(&self, id: TournamentId) -> Result<(), PersistenceError>;
}

/// Documents kept as serialized JSON in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    brackets: RwLock<HashMap<TournamentId, String>>,
    records: RwLock<HashMap<TournamentId, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BracketStore for MemoryStore {
    fn load(&self, id: TournamentId) -> Result<Option<BracketData>, PersistenceError> {
        let docs = self.brackets.read().map_err(|_| PersistenceError::Poisoned)?;
        docs.get(&id)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(PersistenceError::from)
    }

    fn save(&self, id: TournamentId, bracket: &BracketData) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(bracket)?;
        let mut docs = self.brackets.write().map_err(|_| PersistenceError::Poisoned)?;
        docs.insert(id, json);
        Ok(())
    }

    fn load_tournaments(&self) -> Result<Vec<Tournament>, PersistenceError> {
        let records = self.records.read().map_err(|_| PersistenceError::Poisoned)?;
        records
            .values()
            .map(|json| serde_json::from_str(json).map_err(PersistenceError::from))
            .collect()
    }

    fn save_tournament(&self, tournament: &Tournament) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(tournament)?;
        let mut records = self.records.write().map_err(|_| PersistenceError::Poisoned)?;
        records.insert(tournament.id, json);
        Ok(())
    }

    fn delete(&self, id: TournamentId) -> Result<(), PersistenceError> {
        self.brackets.write().map_err(|_| PersistenceError::Poisoned)?.remove(&id);
        self.records.write().map_err(|_| PersistenceError::Poisoned)?.remove(&id);
        Ok(())
    }
}

/// Under `dir`: `<id>.json` holds the bracket, `<id>.tournament.json` the record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create the store, making `dir` if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, id: TournamentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn record_path(&self, id: TournamentId) -> PathBuf {
        self.dir.join(format!("{}{}", id, RECORD_SUFFIX))
    }

    // Write then rename so the previous document stays intact if the write fails.
    fn replace(&self, path: &Path, json: String) -> Result<(), PersistenceError> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> Result<(), PersistenceError> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

impl BracketStore for JsonFileStore {
    fn load(&self, id: TournamentId) -> Result<Option<BracketData>, PersistenceError> {
        match fs::read_to_string(self.path(id)) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, id: TournamentId, bracket: &BracketData) -> Result<(), PersistenceError> {
        self.replace(&self.path(id), serde_json::to_string_pretty(bracket)?)?;
        log::debug!("Saved bracket {} to {:?}", id, self.dir);
        Ok(())
    }

    fn load_tournaments(&self) -> Result<Vec<Tournament>, PersistenceError> {
        let mut tournaments = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_record = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(RECORD_SUFFIX));
            if is_record {
                tournaments.push(serde_json::from_str(&fs::read_to_string(&path)?)?);
            }
        }
        Ok(tournaments)
    }

    fn save_tournament(&self, tournament: &Tournament) -> Result<(), PersistenceError> {
        self.replace(
            &self.record_path(tournament.id),
            serde_json::to_string_pretty(tournament)?,
        )?;
        log::debug!("Saved tournament record {} to {:?}", tournament.id, self.dir);
        Ok(())
    }

    fn delete(&self, id: TournamentId) -> Result<(), PersistenceError> {
        remove_if_present(&self.path(id))?;
        remove_if_present(&self.record_path(id))
    }
}
