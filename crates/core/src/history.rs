use crate::CardId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const HISTORY_LIMIT: usize = 10;

/// Applied cards, most recent first. Display only.
///
/// Saved as a plain list; loading goes through `FromIterator`, so an
/// oversized list is cut back to the limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<CardId>", into = "Vec<CardId>")]
pub struct CardHistory {
    entries: VecDeque<CardId>,
}

impl CardHistory {
    pub fn push(&mut self, card: CardId) {
        self.entries.push_front(card);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<CardId> {
        self.entries.front().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<CardId> {
        self.entries.iter().copied().collect()
    }
}

impl FromIterator<CardId> for CardHistory {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        let mut entries: VecDeque<CardId> = iter.into_iter().collect();
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }
}

impl From<Vec<CardId>> for CardHistory {
    fn from(cards: Vec<CardId>) -> Self {
        cards.into_iter().collect()
    }
}

impl From<CardHistory> for Vec<CardId> {
    fn from(history: CardHistory) -> Self {
        history.entries.into_iter().collect()
    }
}
