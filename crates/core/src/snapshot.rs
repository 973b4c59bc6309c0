use crate::{CardHistory, CardId, GameStatus, Ledger, TurnDice};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub const SAVE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("invalid save: {0}")]
    Invalid(String),
    #[error("save was made for different game content (saved {saved}, current {current})")]
    ContentMismatch { saved: String, current: String },
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}

/// Everything needed to resume a game, written as one blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u32,
    pub tokens: i64,
    pub stability: u32,
    pub deck: Vec<CardId>,
    #[serde(default)]
    pub history: CardHistory,
    #[serde(default)]
    pub pending: Option<CardId>,
    pub status: GameStatus,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub turn: Option<TurnDice>,
    /// Empty for saves that predate signing; those are accepted as-is.
    #[serde(default)]
    pub content_signature: String,
}

impl Snapshot {
    pub fn new(
        ledger: Ledger,
        deck: Vec<CardId>,
        history: CardHistory,
        pending: Option<CardId>,
        status: GameStatus,
        journal: String,
    ) -> Self {
        Self {
            version: SAVE_SCHEMA_VERSION,
            tokens: ledger.tokens(),
            stability: ledger.stability(),
            deck,
            history,
            pending,
            status,
            journal,
            turn: None,
            content_signature: String::new(),
        }
    }

    /// Structural checks a save must pass before a game is rebuilt from it:
    /// the pending card and the deck hold distinct identities, and the turn
    /// die is a real d6 result.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        for card in self.pending.iter().chain(self.deck.iter()) {
            if !seen.insert(*card) {
                return Err(StoreError::Invalid(format!(
                    "{card} appears more than once in the deck"
                )));
            }
        }
        if let Some(turn) = self.turn {
            if !turn.is_consistent() {
                return Err(StoreError::Invalid(format!(
                    "turn {} has die {} with {} cards left",
                    turn.number, turn.rolled, turn.remaining
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(body: &str) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(body)?;
        if snapshot.version != SAVE_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                expected: SAVE_SCHEMA_VERSION,
            });
        }
        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// Single-slot durable storage. Last write wins.
pub trait SaveStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Keeps the serialized blob in memory; same format as the file store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blob: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.blob = Some(snapshot.to_json()?);
        self.writes += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        self.blob.as_deref().map(Snapshot::from_json).transpose()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.blob = None;
        Ok(())
    }
}
