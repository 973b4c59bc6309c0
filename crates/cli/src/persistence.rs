use std::fs;
use std::path::{Path, PathBuf};
use wretched_core::{SaveStore, Snapshot, StoreError};

pub fn default_save_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("WRETCHED_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".wretched_save.json"))
}

/// The single save slot as one JSON file. Writes go to a sibling temp file
/// and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SaveStore for FileStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = snapshot.to_json()?;
        let temp = self.temp_path();
        fs::write(&temp, body)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let body = fs::read_to_string(&self.path)?;
        Snapshot::from_json(&body).map(Some)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wretched_core::{
        CardCatalog, CardDef, CardHistory, CardId, EventBus, GameConfig, GameStatus, Ledger,
        Rank, RngState, Session, SessionError, Suit, Thresholds,
    };

    fn sample() -> Snapshot {
        let history: CardHistory = CardId::all().skip(40).collect();
        Snapshot::new(
            Ledger::new(7, 3),
            CardId::all().take(30).collect(),
            history,
            Some(CardId::new(Suit::Diamonds, Rank::Ten)),
            GameStatus::Active,
            "The fog came in.\nI stayed up.".to_string(),
        )
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path().join("nested").join("save.json"));
        assert_eq!(store.load().expect("load"), None);
        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), Some(sample()));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn last_write_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path().join("save.json"));
        store.save(&sample()).expect("save");
        let mut later = sample();
        later.tokens = 1;
        later.status = GameStatus::LostByTokensZero;
        store.save(&later).expect("save");
        assert_eq!(store.load().expect("load"), Some(later));
        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
        store.clear().expect("clear twice");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("save.json");
        fs::write(&path, "{ not json").expect("write");
        let store = FileStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Serialize(_))));
    }

    fn catalog(title: &str) -> CardCatalog {
        CardCatalog::from_entries(CardId::all().map(|id| {
            (
                id,
                CardDef {
                    title: format!("{title} {id}"),
                    description: String::new(),
                    token_delta: 0,
                    block_pulls: 0,
                },
            )
        }))
    }

    #[test]
    fn one_slot_does_not_resume_another_game() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("save.json");
        let config = GameConfig::with_mechanics(5, 10, Thresholds::default());
        let mut events = EventBus::default();
        Session::open(
            config.clone(),
            catalog("Lighthouse"),
            FileStore::new(&path),
            Box::new(RngState::from_seed(1)),
            &mut events,
        )
        .expect("first game");

        let err = Session::open(
            config,
            catalog("Orbit"),
            FileStore::new(&path),
            Box::new(RngState::from_seed(1)),
            &mut events,
        )
        .expect_err("second game");
        assert!(matches!(
            err,
            SessionError::Store(StoreError::ContentMismatch { .. })
        ));
        assert!(path.exists());
    }
}
