use crate::tower::DIE_FACES;
use crate::RandomSource;
use serde::{Deserialize, Serialize};

/// The turn die: one d6 at the start of a turn sets how many cards the turn
/// resolves. Cards still go through the draw/apply cycle one at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnDice {
    /// 1-based turn counter within the current game.
    pub number: u32,
    pub rolled: u8,
    /// Cards left to apply before the turn is over.
    pub remaining: u8,
}

impl TurnDice {
    pub fn roll(number: u32, rng: &mut dyn RandomSource) -> Self {
        let rolled = rng.roll_d6();
        Self {
            number,
            rolled,
            remaining: rolled,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.remaining > 0
    }

    /// Counts one applied card. Returns true when that card closed the turn.
    pub fn card_applied(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn is_consistent(&self) -> bool {
        (1..=DIE_FACES).contains(&self.rolled) && self.remaining <= self.rolled && self.number > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRandom;

    #[test]
    fn roll_sets_the_card_count() {
        let mut rng = ScriptedRandom::new([3]);
        let mut turn = TurnDice::roll(1, &mut rng);
        assert_eq!((turn.rolled, turn.remaining), (3, 3));
        assert!(!turn.card_applied());
        assert!(!turn.card_applied());
        assert!(turn.card_applied());
        assert!(!turn.in_progress());
        assert!(!turn.card_applied());
        assert!(turn.is_consistent());
    }

    #[test]
    fn out_of_range_dice_are_inconsistent() {
        let bad = TurnDice {
            number: 2,
            rolled: 7,
            remaining: 1,
        };
        assert!(!bad.is_consistent());
        let overdrawn = TurnDice {
            number: 2,
            rolled: 2,
            remaining: 3,
        };
        assert!(!overdrawn.is_consistent());
    }
}
