use crate::validate::{read_catalog, read_config};
use anyhow::Context;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use wretched_core::{CardCatalog, GameConfig};

pub const CONFIG_FILE: &str = "config.yaml";
pub const CARDS_FILE: &str = "cards.yaml";
pub const STORY_FILE: &str = "story.md";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("malformed configuration: {}", .0.join("; "))]
    MalformedConfiguration(Vec<String>),
    #[error("malformed card catalog: {}", .0.join("; "))]
    MalformedCardCatalog(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub config: GameConfig,
    pub catalog: CardCatalog,
    /// Raw markdown introduction, when the game ships one.
    pub story: Option<String>,
}

/// Loads and validates a game directory. Anything that fails validation is
/// rejected here so the engine only ever sees complete inputs.
pub fn load_game_dir(dir: &Path) -> anyhow::Result<LoadedGame> {
    let config = load_config(dir)?;
    let catalog = load_catalog(dir)?;
    let story_path = dir.join(STORY_FILE);
    let story = if story_path.exists() {
        Some(
            fs::read_to_string(&story_path)
                .with_context(|| format!("read {}", story_path.display()))?,
        )
    } else {
        None
    };
    tracing::info!(
        target: "wretched::data",
        dir = %dir.display(),
        title = %config.game.title,
        cards = catalog.len(),
        story = story.is_some(),
        "game.loaded"
    );
    Ok(LoadedGame {
        config,
        catalog,
        story,
    })
}

pub fn load_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    let value = read_yaml(&path)?;
    match read_config(&value) {
        (Some(config), problems) if problems.is_empty() => Ok(config),
        (_, problems) => Err(ContentError::MalformedConfiguration(problems))
            .with_context(|| format!("validate {}", path.display())),
    }
}

pub fn load_catalog(dir: &Path) -> anyhow::Result<CardCatalog> {
    let path = dir.join(CARDS_FILE);
    let value = read_yaml(&path)?;
    let (catalog, problems) = read_catalog(&value);
    if !problems.is_empty() || !catalog.is_complete() {
        return Err(ContentError::MalformedCardCatalog(problems))
            .with_context(|| format!("validate {}", path.display()));
    }
    Ok(catalog)
}

/// Whatever cards decode, ignoring gaps. Only for reporting.
pub fn load_catalog_partial(dir: &Path) -> anyhow::Result<CardCatalog> {
    let value = read_yaml(&dir.join(CARDS_FILE))?;
    Ok(read_catalog(&value).0)
}

pub(crate) fn read_yaml(path: &Path) -> anyhow::Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_yaml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
