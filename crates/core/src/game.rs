use crate::tower::{self, RiskBand};
use crate::{
    content_signature, evaluate, CardCatalog, CardDef, CardHistory, CardId, Change, Deck, Event,
    EventBus, GameConfig, GameStatus, Ledger, RandomSource, Snapshot, StoreError, TurnDice,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("the deck is empty")]
    EmptyDeck,
    #[error("a card is already waiting to be applied")]
    DrawWhilePending,
    #[error("no card is waiting to be applied")]
    NoPendingCard,
    #[error("the game is over ({0:?})")]
    GameOver(GameStatus),
    #[error("card {0} is missing from the catalog")]
    UnknownCard(CardId),
    #[error("the turn still has {0} card(s) to play")]
    TurnInProgress(u8),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    CardRevealed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCard {
    pub card: CardId,
    pub tokens: Change<i64>,
    pub stability: Change<u32>,
    pub status: GameStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct PendingCard<'a> {
    pub id: CardId,
    pub def: &'a CardDef,
}

/// One solitaire game: deck, ledger, the card in flight and the outcome.
///
/// Every mutating action either completes or returns an error having changed
/// nothing. Once the status is terminal only `new_game` and the journal are
/// writable.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    catalog: CardCatalog,
    rng: Box<dyn RandomSource>,
    deck: Deck,
    ledger: Ledger,
    history: CardHistory,
    pending: Option<CardId>,
    status: GameStatus,
    journal: String,
    turn: Option<TurnDice>,
    signature: String,
}

impl Game {
    pub fn new(config: GameConfig, catalog: CardCatalog, mut rng: Box<dyn RandomSource>) -> Self {
        let deck = Deck::shuffled(rng.as_mut());
        let ledger = initial_ledger(&config);
        let signature = content_signature(&config, &catalog);
        Self {
            config,
            catalog,
            rng,
            deck,
            ledger,
            history: CardHistory::default(),
            pending: None,
            status: GameStatus::Active,
            journal: String::new(),
            turn: None,
            signature,
        }
    }

    /// Rebuilds a game from a save. The save must match this content and
    /// pass `Snapshot::validate`; a saved `Active` status is re-evaluated
    /// against the saved ledger and deck.
    pub fn restore(
        config: GameConfig,
        catalog: CardCatalog,
        snapshot: Snapshot,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, StoreError> {
        let signature = content_signature(&config, &catalog);
        if !snapshot.content_signature.is_empty() && snapshot.content_signature != signature {
            return Err(StoreError::ContentMismatch {
                saved: snapshot.content_signature,
                current: signature,
            });
        }
        snapshot.validate()?;
        let mut game = Self {
            config,
            catalog,
            rng,
            deck: Deck::from_order(snapshot.deck),
            ledger: Ledger::new(snapshot.tokens, snapshot.stability),
            history: snapshot.history,
            pending: snapshot.pending,
            status: snapshot.status,
            journal: snapshot.journal,
            turn: snapshot.turn,
            signature,
        };
        if !game.status.is_terminal() {
            game.status = game.evaluate_status();
            if game.status.is_terminal() {
                tracing::warn!(
                    target: "wretched::game",
                    status = ?game.status,
                    "restore.status_corrected"
                );
            }
        }
        Ok(game)
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new(
            self.ledger,
            self.deck.order().to_vec(),
            self.history.clone(),
            self.pending,
            self.status,
            self.journal.clone(),
        );
        snapshot.turn = self.turn;
        snapshot.content_signature = self.signature.clone();
        snapshot
    }

    /// Throws the current game away and deals a fresh one.
    pub fn new_game(&mut self, events: &mut EventBus) {
        self.deck.initialize(self.rng.as_mut());
        self.ledger = initial_ledger(&self.config);
        self.history = CardHistory::default();
        self.pending = None;
        self.status = GameStatus::Active;
        self.journal.clear();
        self.turn = None;
        tracing::info!(
            target: "wretched::game",
            tokens = self.ledger.tokens(),
            stability = self.ledger.stability(),
            "game.started"
        );
        events.push(Event::GameStarted {
            deck: self.deck.remaining(),
        });
    }

    /// Rolls the turn die. Only between turns and with no card in hand.
    pub fn roll_turn(&mut self, events: &mut EventBus) -> Result<TurnDice, GameError> {
        self.ensure_active()?;
        if self.pending.is_some() {
            return Err(GameError::DrawWhilePending);
        }
        if let Some(turn) = self.turn.filter(TurnDice::in_progress) {
            return Err(GameError::TurnInProgress(turn.remaining));
        }
        let number = self.turn.map_or(1, |turn| turn.number + 1);
        let turn = TurnDice::roll(number, self.rng.as_mut());
        self.turn = Some(turn);
        tracing::info!(target: "wretched::game", number, roll = turn.rolled, "turn.rolled");
        events.push(Event::TurnRolled {
            number,
            roll: turn.rolled,
        });
        Ok(turn)
    }

    pub fn request_draw(&mut self, events: &mut EventBus) -> Result<CardId, GameError> {
        self.ensure_active()?;
        if self.pending.is_some() {
            tracing::warn!(target: "wretched::game", "draw.rejected.pending");
            return Err(GameError::DrawWhilePending);
        }
        let draw = self.deck.draw(self.config.reshuffle(), self.rng.as_mut())?;
        if draw.reshuffled {
            tracing::info!(target: "wretched::game", "deck.reshuffled");
            events.push(Event::Reshuffled {
                deck: self.deck.remaining() + 1,
            });
        }
        self.pending = Some(draw.card);
        tracing::info!(
            target: "wretched::game",
            card = %draw.card,
            remaining = self.deck.remaining(),
            "card.drawn"
        );
        events.push(Event::CardDrawn {
            card: draw.card,
            remaining: self.deck.remaining(),
        });
        Ok(draw.card)
    }

    /// Resolves the pending card: history, tokens, tower pulls, then the end
    /// check.
    pub fn confirm_apply(&mut self, events: &mut EventBus) -> Result<AppliedCard, GameError> {
        self.ensure_active()?;
        let card = self.pending.ok_or(GameError::NoPendingCard)?;
        let (token_delta, blocks) = self
            .catalog
            .get(card)
            .map(|def| (def.token_delta, def.block_pulls))
            .ok_or(GameError::UnknownCard(card))?;

        self.pending = None;
        self.history.push(card);
        events.push(Event::CardApplied {
            card,
            token_delta,
            blocks,
        });
        if let Some(turn) = self.turn.as_mut() {
            if turn.card_applied() {
                events.push(Event::TurnEnded {
                    number: turn.number,
                });
            }
        }

        let tokens = self.ledger.apply_token_delta(token_delta);
        if tokens.changed() {
            events.push(Event::TokensChanged {
                from: tokens.from,
                to: tokens.to,
            });
        }
        let stability_before = self.ledger.stability();
        tower::pull_blocks(
            &mut self.ledger,
            self.config.thresholds(),
            blocks,
            self.rng.as_mut(),
            events,
        );
        let stability = Change {
            from: stability_before,
            to: self.ledger.stability(),
        };
        tracing::info!(
            target: "wretched::game",
            card = %card,
            tokens = tokens.to,
            stability = stability.to,
            "card.applied"
        );

        let status = self.check_end(events);
        Ok(AppliedCard {
            card,
            tokens,
            stability,
            status,
        })
    }

    /// Direct correction by the player, outside the draw/confirm cycle.
    pub fn adjust_tokens(
        &mut self,
        delta: i64,
        events: &mut EventBus,
    ) -> Result<Change<i64>, GameError> {
        self.ensure_active()?;
        let change = self.ledger.apply_token_delta(delta);
        if change.changed() {
            events.push(Event::TokensChanged {
                from: change.from,
                to: change.to,
            });
        }
        tracing::info!(target: "wretched::game", delta, tokens = change.to, "tokens.adjusted");
        self.check_end(events);
        Ok(change)
    }

    pub fn set_journal(&mut self, text: impl Into<String>) {
        self.journal = text.into();
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if self.status.is_terminal() {
            tracing::warn!(target: "wretched::game", status = ?self.status, "action.rejected.game_over");
            return Err(GameError::GameOver(self.status));
        }
        Ok(())
    }

    fn evaluate_status(&self) -> GameStatus {
        // a card still in hand counts as unresolved deck
        let unresolved = self.deck.remaining() + usize::from(self.pending.is_some());
        evaluate(&self.ledger, unresolved, !self.config.reshuffle())
    }

    fn check_end(&mut self, events: &mut EventBus) -> GameStatus {
        let status = self.evaluate_status();
        if status.is_terminal() && !self.status.is_terminal() {
            self.status = status;
            tracing::info!(target: "wretched::game", status = ?status, "game.ended");
            events.push(Event::GameEnded { status });
        }
        self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn history(&self) -> &CardHistory {
        &self.history
    }

    pub fn pending(&self) -> Option<PendingCard<'_>> {
        let id = self.pending?;
        self.catalog.get(id).map(|def| PendingCard { id, def })
    }

    pub fn phase(&self) -> TurnPhase {
        if self.pending.is_some() {
            TurnPhase::CardRevealed
        } else {
            TurnPhase::Idle
        }
    }

    pub fn turn(&self) -> Option<TurnDice> {
        self.turn
    }

    pub fn content_signature(&self) -> &str {
        &self.signature
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Configured text for the current terminal status, or a stock line.
    pub fn status_message(&self) -> &str {
        self.config
            .message_for(self.status)
            .unwrap_or_else(|| self.status.default_message())
    }

    pub fn risk_band(&self) -> RiskBand {
        RiskBand::for_stability(self.ledger.stability(), self.config.thresholds())
    }

    pub fn journal(&self) -> &str {
        &self.journal
    }

    pub fn view(&self) -> GameView {
        let card_view = |id: CardId| CardView {
            id,
            title: self
                .catalog
                .get(id)
                .map(|def| def.title.clone())
                .unwrap_or_default(),
        };
        GameView {
            tokens_name: self.config.mechanics.tokens.name.clone(),
            tokens: self.ledger.tokens(),
            stability_name: self.config.mechanics.stability.name.clone(),
            stability: self.ledger.stability(),
            stability_initial: self.config.mechanics.stability.initial,
            risk: self.risk_band(),
            deck_remaining: self.deck.remaining(),
            phase: self.phase(),
            turn: self.turn,
            pending: self.pending().map(|pending| PendingView {
                id: pending.id,
                title: pending.def.title.clone(),
                description: pending.def.description.clone(),
                token_delta: pending.def.token_delta,
                blocks: pending.def.block_pulls,
            }),
            history: self.history.iter().copied().map(card_view).collect(),
            status: self.status,
            message: self
                .status
                .is_terminal()
                .then(|| self.status_message().to_string()),
        }
    }
}

fn initial_ledger(config: &GameConfig) -> Ledger {
    Ledger::new(
        config.mechanics.tokens.initial,
        config.mechanics.stability.initial,
    )
}

/// Read-only picture of the game for the presentation layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GameView {
    pub tokens_name: String,
    pub tokens: i64,
    pub stability_name: String,
    pub stability: u32,
    pub stability_initial: u32,
    pub risk: RiskBand,
    pub deck_remaining: usize,
    pub phase: TurnPhase,
    pub turn: Option<TurnDice>,
    pub pending: Option<PendingView>,
    pub history: Vec<CardView>,
    pub status: GameStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PendingView {
    pub id: CardId,
    pub title: String,
    pub description: String,
    pub token_delta: i64,
    pub blocks: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardView {
    pub id: CardId,
    pub title: String,
}
