use crate::GameStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameMeta {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRule {
    pub name: String,
    pub initial: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thresholds {
    pub danger: u32,
    pub critical: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            danger: 5,
            critical: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StabilityRule {
    pub name: String,
    pub initial: u32,
    #[serde(default)]
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckRule {
    #[serde(default)]
    pub reshuffle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mechanics {
    #[serde(default)]
    pub systems: Vec<String>,
    pub tokens: TokenRule,
    pub stability: StabilityRule,
    #[serde(default)]
    pub deck: DeckRule,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    DeckEmpty,
    StabilityZero,
    TokensZero,
}

impl ConditionKind {
    pub fn for_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::Active => None,
            GameStatus::WonByDeckExhaustion => Some(Self::DeckEmpty),
            GameStatus::LostByStabilityZero => Some(Self::StabilityZero),
            GameStatus::LostByTokensZero => Some(Self::TokensZero),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionDef {
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conditions {
    #[serde(default)]
    pub win: Vec<ConditionDef>,
    #[serde(default)]
    pub lose: Vec<ConditionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub game: GameMeta,
    pub mechanics: Mechanics,
    #[serde(default)]
    pub conditions: Conditions,
}

impl GameConfig {
    pub fn thresholds(&self) -> Thresholds {
        self.mechanics.stability.thresholds
    }

    pub fn reshuffle(&self) -> bool {
        self.mechanics.deck.reshuffle
    }

    /// Message of the condition descriptor matching a terminal status.
    pub fn message_for(&self, status: GameStatus) -> Option<&str> {
        let kind = ConditionKind::for_status(status)?;
        let pool = if status.is_win() {
            &self.conditions.win
        } else {
            &self.conditions.lose
        };
        pool.iter()
            .find(|condition| condition.kind == kind)
            .map(|condition| condition.message.as_str())
    }

    /// Minimal configuration used by tests and tooling that only care about
    /// the mechanics.
    pub fn with_mechanics(tokens: i64, stability: u32, thresholds: Thresholds) -> Self {
        Self {
            game: GameMeta {
                title: "Untitled".to_string(),
                author: "Unknown".to_string(),
                ..GameMeta::default()
            },
            mechanics: Mechanics {
                systems: Vec::new(),
                tokens: TokenRule {
                    name: "Tokens".to_string(),
                    initial: tokens,
                },
                stability: StabilityRule {
                    name: "Stability".to_string(),
                    initial: stability,
                    thresholds,
                },
                deck: DeckRule::default(),
            },
            conditions: Conditions::default(),
        }
    }
}
