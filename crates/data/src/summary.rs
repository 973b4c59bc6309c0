use serde::Serialize;
use wretched_core::{CardCatalog, CardId, GameConfig};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GameSummary {
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub systems: Vec<String>,
    pub tokens_name: String,
    pub tokens_initial: i64,
    pub stability_name: String,
    pub stability_initial: u32,
    pub danger: u32,
    pub critical: u32,
    pub reshuffle: bool,
    pub cards_defined: usize,
    pub cards_expected: usize,
}

impl GameSummary {
    pub fn from_parts(config: &GameConfig, catalog: &CardCatalog) -> Self {
        let game = &config.game;
        let mechanics = &config.mechanics;
        Self {
            title: game.title.clone(),
            subtitle: game.subtitle.clone(),
            author: game.author.clone(),
            version: game.version.clone(),
            description: game.description.clone(),
            systems: mechanics.systems.clone(),
            tokens_name: mechanics.tokens.name.clone(),
            tokens_initial: mechanics.tokens.initial,
            stability_name: mechanics.stability.name.clone(),
            stability_initial: mechanics.stability.initial,
            danger: mechanics.stability.thresholds.danger,
            critical: mechanics.stability.thresholds.critical,
            reshuffle: mechanics.deck.reshuffle,
            cards_defined: catalog.len(),
            cards_expected: CardId::all().count(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cards_defined == self.cards_expected
    }
}
