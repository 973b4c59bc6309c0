use crate::Ledger;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GameStatus {
    #[default]
    Active,
    WonByDeckExhaustion,
    LostByStabilityZero,
    LostByTokensZero,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Active)
    }

    pub fn is_win(self) -> bool {
        matches!(self, GameStatus::WonByDeckExhaustion)
    }

    pub fn default_message(self) -> &'static str {
        match self {
            GameStatus::Active => "The game continues.",
            GameStatus::WonByDeckExhaustion => "The deck is spent and you endure.",
            GameStatus::LostByStabilityZero => "The tower has fallen.",
            GameStatus::LostByTokensZero => "You have nothing left to give.",
        }
    }
}

/// First match wins: stability, then tokens, then deck exhaustion.
///
/// `deck_can_run_out` is false when the deck reshuffles itself, in which case
/// exhaustion never ends the game.
pub fn evaluate(ledger: &Ledger, deck_remaining: usize, deck_can_run_out: bool) -> GameStatus {
    if ledger.stability() == 0 {
        GameStatus::LostByStabilityZero
    } else if ledger.tokens() <= 0 {
        GameStatus::LostByTokensZero
    } else if deck_can_run_out && deck_remaining == 0 {
        GameStatus::WonByDeckExhaustion
    } else {
        GameStatus::Active
    }
}
