use serde::{Deserialize, Serialize};

/// The two depletable counters. Both floor at zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    tokens: i64,
    stability: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialEq> Change<T> {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

impl Ledger {
    pub fn new(tokens: i64, stability: u32) -> Self {
        Self {
            tokens: tokens.max(0),
            stability,
        }
    }

    pub fn tokens(&self) -> i64 {
        self.tokens
    }

    pub fn stability(&self) -> u32 {
        self.stability
    }

    /// Tokens have no ceiling, only the zero floor.
    pub fn apply_token_delta(&mut self, delta: i64) -> Change<i64> {
        let from = self.tokens;
        self.tokens = from.saturating_add(delta).max(0);
        Change {
            from,
            to: self.tokens,
        }
    }

    pub fn lose_stability(&mut self, amount: u32) -> Change<u32> {
        let from = self.stability;
        self.stability = from.saturating_sub(amount);
        Change {
            from,
            to: self.stability,
        }
    }
}
