use crate::{shuffle, CardId, GameError, RandomSource};

/// Undrawn cards for the current life of the deck. The top is the last element.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<CardId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub card: CardId,
    pub reshuffled: bool,
}

impl Deck {
    pub fn standard52() -> Self {
        Self {
            cards: CardId::all().collect(),
        }
    }

    pub fn from_order(cards: Vec<CardId>) -> Self {
        Self { cards }
    }

    /// Fresh 52 cards, shuffled.
    pub fn initialize(&mut self, rng: &mut dyn RandomSource) {
        *self = Self::standard52();
        self.shuffle(rng);
    }

    pub fn shuffled(rng: &mut dyn RandomSource) -> Self {
        let mut deck = Self::default();
        deck.initialize(rng);
        deck
    }

    pub fn shuffle(&mut self, rng: &mut dyn RandomSource) {
        shuffle(&mut self.cards, rng);
    }

    /// Pops the top card. An empty deck is rebuilt first when `reshuffle` is
    /// set, otherwise the draw fails without touching anything.
    pub fn draw(&mut self, reshuffle: bool, rng: &mut dyn RandomSource) -> Result<Draw, GameError> {
        let mut reshuffled = false;
        if self.cards.is_empty() {
            if !reshuffle {
                return Err(GameError::EmptyDeck);
            }
            self.initialize(rng);
            reshuffled = true;
        }
        let card = self.cards.pop().ok_or(GameError::EmptyDeck)?;
        Ok(Draw { card, reshuffled })
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn peek(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    pub fn order(&self) -> &[CardId] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RngState;
    use std::collections::HashSet;

    #[test]
    fn draws_every_card_once_then_fails() {
        let mut rng = RngState::from_seed(3);
        let mut deck = Deck::shuffled(&mut rng);
        assert_eq!(deck.remaining(), 52);
        let mut seen = HashSet::new();
        while !deck.is_empty() {
            let draw = deck.draw(false, &mut rng).expect("draw");
            assert!(!draw.reshuffled);
            assert!(seen.insert(draw.card), "duplicate {}", draw.card);
        }
        assert_eq!(seen.len(), 52);
        assert!(matches!(deck.draw(false, &mut rng), Err(GameError::EmptyDeck)));
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn empty_deck_reshuffles_when_enabled() {
        let mut rng = RngState::from_seed(4);
        let mut deck = Deck::default();
        let draw = deck.draw(true, &mut rng).expect("draw");
        assert!(draw.reshuffled);
        assert_eq!(deck.remaining(), 51);
        assert!(!deck.order().contains(&draw.card));
    }

    #[test]
    fn draw_takes_the_last_element() {
        let order: Vec<CardId> = CardId::all().take(3).collect();
        let mut deck = Deck::from_order(order.clone());
        let mut rng = RngState::from_seed(0);
        assert_eq!(deck.peek(), Some(order[2]));
        assert_eq!(deck.draw(false, &mut rng).expect("draw").card, order[2]);
        assert_eq!(deck.order(), &order[..2]);
    }
}
