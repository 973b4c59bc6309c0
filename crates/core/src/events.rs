use crate::{CardId, GameStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    GameStarted { deck: usize },
    GameRestored { deck: usize, status: GameStatus },
    Reshuffled { deck: usize },
    TurnRolled { number: u32, roll: u8 },
    TurnEnded { number: u32 },
    CardDrawn { card: CardId, remaining: usize },
    CardApplied {
        card: CardId,
        token_delta: i64,
        blocks: u32,
    },
    TokensChanged { from: i64, to: i64 },
    BlockPulled {
        stability_before: u32,
        threshold: u8,
        rolls: Vec<u8>,
        lost: u32,
    },
    StabilityChanged { from: u32, to: u32 },
    GameEnded { status: GameStatus },
    JournalSaved { chars: usize },
}

/// Notifications queued by engine actions; the presentation layer drains it
/// after each action.
#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
