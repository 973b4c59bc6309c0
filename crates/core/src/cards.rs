use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn key(self) -> &'static str {
        match self {
            Suit::Spades => "spades",
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        Suit::ALL
            .into_iter()
            .find(|suit| suit.key().eq_ignore_ascii_case(value.trim()))
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

/// Ranks in the order card tables are authored: ace high down to two.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "2")]
    Two,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Ten,
        Rank::Nine,
        Rank::Eight,
        Rank::Seven,
        Rank::Six,
        Rank::Five,
        Rank::Four,
        Rank::Three,
        Rank::Two,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::King => "K",
            Rank::Queen => "Q",
            Rank::Jack => "J",
            Rank::Ten => "10",
            Rank::Nine => "9",
            Rank::Eight => "8",
            Rank::Seven => "7",
            Rank::Six => "6",
            Rank::Five => "5",
            Rank::Four => "4",
            Rank::Three => "3",
            Rank::Two => "2",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        let value = value.trim();
        Rank::ALL
            .into_iter()
            .find(|rank| rank.key().eq_ignore_ascii_case(value))
    }
}

/// Composite identity of one of the 52 cards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId {
    pub suit: Suit,
    pub rank: Rank,
}

impl CardId {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Every identity, suit-major in authoring order.
    pub fn all() -> impl Iterator<Item = CardId> {
        Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| CardId::new(suit, rank)))
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank.key(), self.suit.key())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDef {
    pub title: String,
    pub description: String,
    #[serde(default, rename = "tokens")]
    pub token_delta: i64,
    #[serde(default, rename = "blocks")]
    pub block_pulls: u32,
}

/// Flat (suit, rank) -> card lookup. Immutable for the length of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardCatalog {
    cards: HashMap<CardId, CardDef>,
}

impl CardCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = (CardId, CardDef)>) -> Self {
        Self {
            cards: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, id: CardId) -> Option<&CardDef> {
        self.cards.get(&id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn missing(&self) -> Vec<CardId> {
        CardId::all().filter(|id| !self.cards.contains_key(id)).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_space_has_52_unique_cards() {
        let ids: Vec<CardId> = CardId::all().collect();
        assert_eq!(ids.len(), 52);
        let unique: std::collections::HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn rank_keys_parse_back() {
        for rank in Rank::ALL {
            assert_eq!(Rank::from_key(rank.key()), Some(rank));
        }
        assert_eq!(Rank::from_key("a"), Some(Rank::Ace));
        assert_eq!(Rank::from_key("1"), None);
        assert_eq!(Suit::from_key("Hearts"), Some(Suit::Hearts));
    }

    #[test]
    fn catalog_reports_missing_cards() {
        let def = CardDef {
            title: "t".to_string(),
            description: "d".to_string(),
            token_delta: 0,
            block_pulls: 0,
        };
        let catalog = CardCatalog::from_entries(
            CardId::all()
                .filter(|id| *id != CardId::new(Suit::Clubs, Rank::Two))
                .map(|id| (id, def.clone())),
        );
        assert_eq!(catalog.len(), 51);
        assert_eq!(catalog.missing(), vec![CardId::new(Suit::Clubs, Rank::Two)]);
        assert!(!catalog.is_complete());
    }
}
