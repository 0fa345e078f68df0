//! A play session: the word list provider plus the round controller.
//!
//! Loading a word list may suspend, so the controller is only borrowed after
//! the load resolves. Each load-then-start request takes a ticket; a request
//! that finishes after a newer one was issued is dropped so the most recent
//! click always decides what is on screen.

use std::cell::{Cell, Ref, RefCell};

use log::warn;

use crate::deck::CardId;
use crate::engine::SelectOutcome;
use crate::error::Result;
use crate::provider::{WordListProvider, WordSource};
use crate::round::{PendingRelease, RoundController};
use crate::words::Difficulty;

pub struct Session<S> {
    provider: WordListProvider<S>,
    controller: RefCell<RoundController>,
    requests: Cell<u64>,
}

impl<S: WordSource> Session<S> {
    pub fn new(provider: WordListProvider<S>, controller: RoundController) -> Self {
        Self {
            provider,
            controller: RefCell::new(controller),
            requests: Cell::new(0),
        }
    }

    pub fn provider(&self) -> &WordListProvider<S> {
        &self.provider
    }

    pub fn controller(&self) -> Ref<'_, RoundController> {
        self.controller.borrow()
    }

    fn next_ticket(&self) -> u64 {
        let ticket = self.requests.get() + 1;
        self.requests.set(ticket);
        ticket
    }

    /// Load (or reuse) the word list and start `set_index` of it.
    ///
    /// Returns `Ok(false)` when a newer request superseded this one. On error
    /// the running round is left as it was.
    pub async fn start_round(&self, difficulty: Difficulty, set_index: usize) -> Result<bool> {
        let ticket = self.next_ticket();
        let list = self.provider.load(difficulty).await?;
        if self.requests.get() != ticket {
            warn!("discarding superseded start of {difficulty} set {set_index}");
            return Ok(false);
        }
        self.controller
            .borrow_mut()
            .start_round(difficulty, list, set_index);
        Ok(true)
    }

    /// Restart at the first set of another (or the same) difficulty.
    pub async fn switch_difficulty(&self, difficulty: Difficulty) -> Result<bool> {
        self.start_round(difficulty, 0).await
    }

    pub fn advance(&self) -> bool {
        self.next_ticket();
        self.controller.borrow_mut().advance()
    }

    pub fn select(&self, card: CardId) -> Result<SelectOutcome> {
        self.controller.borrow_mut().select(card)
    }

    pub fn tick(&self) {
        self.controller.borrow_mut().tick();
    }

    pub fn release(&self, pending: PendingRelease) -> bool {
        self.controller.borrow_mut().release(pending)
    }
}
