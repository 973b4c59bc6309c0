//! Solitaire journaling engine. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod conditions;
pub mod config;
pub mod deck;
pub mod events;
pub mod game;
pub mod history;
pub mod journal;
pub mod ledger;
pub mod rng;
pub mod session;
pub mod signature;
pub mod snapshot;
pub mod tower;
pub mod turn;

pub use cards::*;
pub use conditions::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use game::*;
pub use history::*;
pub use journal::*;
pub use ledger::*;
pub use rng::*;
pub use session::*;
pub use signature::*;
pub use snapshot::*;
pub use tower::*;
pub use turn::*;
