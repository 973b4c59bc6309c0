use crate::{
    AppliedCard, CardCatalog, CardId, Change, Event, EventBus, Game, GameConfig, GameError,
    JournalAutosave, RandomSource, SaveStore, StoreError, TurnDice,
};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("save failed: {0}")]
    Store(#[from] StoreError),
}

/// A game bound to its save slot. Every successful mutating action is
/// written through before it returns; rejected actions write nothing.
#[derive(Debug)]
pub struct Session<S: SaveStore> {
    game: Game,
    store: S,
    autosave: JournalAutosave,
}

impl<S: SaveStore> Session<S> {
    /// Resumes the saved game if the slot holds one, otherwise deals a new
    /// game and saves it. A save that fails validation or was made for other
    /// content is an error; the slot is left untouched for the caller to
    /// clear.
    pub fn open(
        config: GameConfig,
        catalog: CardCatalog,
        mut store: S,
        rng: Box<dyn RandomSource>,
        events: &mut EventBus,
    ) -> Result<Self, SessionError> {
        let game = match store.load()? {
            Some(snapshot) => {
                let game = Game::restore(config, catalog, snapshot, rng)?;
                tracing::info!(
                    target: "wretched::session",
                    deck = game.deck_remaining(),
                    status = ?game.status(),
                    "session.restored"
                );
                events.push(Event::GameRestored {
                    deck: game.deck_remaining(),
                    status: game.status(),
                });
                game
            }
            None => {
                let game = Game::new(config, catalog, rng);
                store.save(&game.snapshot())?;
                events.push(Event::GameStarted {
                    deck: game.deck_remaining(),
                });
                game
            }
        };
        Ok(Self {
            game,
            store,
            autosave: JournalAutosave::default(),
        })
    }

    pub fn with_autosave(mut self, autosave: JournalAutosave) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn roll_turn(&mut self, events: &mut EventBus) -> Result<TurnDice, SessionError> {
        let turn = self.game.roll_turn(events)?;
        self.persist()?;
        Ok(turn)
    }

    pub fn draw(&mut self, events: &mut EventBus) -> Result<CardId, SessionError> {
        let card = self.game.request_draw(events)?;
        self.persist()?;
        Ok(card)
    }

    pub fn apply(&mut self, events: &mut EventBus) -> Result<AppliedCard, SessionError> {
        let applied = self.game.confirm_apply(events)?;
        self.persist()?;
        Ok(applied)
    }

    pub fn adjust_tokens(
        &mut self,
        delta: i64,
        events: &mut EventBus,
    ) -> Result<Change<i64>, SessionError> {
        let change = self.game.adjust_tokens(delta, events)?;
        self.persist()?;
        Ok(change)
    }

    /// Discards the slot and starts over.
    pub fn new_game(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        self.store.clear()?;
        self.game.new_game(events);
        self.persist()
    }

    /// Replaces the journal text; the save happens on a later `flush_journal`.
    pub fn edit_journal(&mut self, text: impl Into<String>, now: Instant) {
        self.game.set_journal(text);
        self.autosave.note_edit(now);
    }

    /// Saves pending journal edits once the debounce interval has passed.
    pub fn flush_journal(
        &mut self,
        now: Instant,
        events: &mut EventBus,
    ) -> Result<bool, SessionError> {
        if !self.autosave.due(now) {
            return Ok(false);
        }
        self.save_journal(events)?;
        Ok(true)
    }

    /// Saves pending journal edits regardless of the interval.
    pub fn flush_journal_now(&mut self, events: &mut EventBus) -> Result<bool, SessionError> {
        if !self.autosave.is_dirty() {
            return Ok(false);
        }
        self.save_journal(events)?;
        Ok(true)
    }

    fn save_journal(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        self.persist()?;
        events.push(Event::JournalSaved {
            chars: self.game.journal().chars().count(),
        });
        Ok(())
    }

    fn persist(&mut self) -> Result<(), SessionError> {
        self.store.save(&self.game.snapshot())?;
        // the snapshot carries the journal, so pending edits are saved too
        self.autosave.mark_saved();
        tracing::debug!(target: "wretched::session", "save.written");
        Ok(())
    }

    pub fn into_parts(self) -> (Game, S) {
        (self.game, self.store)
    }
}
