//! Card matching state machine for a single round.
//!
//! The engine owns the round's deck and tracks per-card state, the current
//! selection, matched pairs and score. A mismatched pair is put into `Cooling`
//! so it stays locked until the caller releases it after the feedback delay;
//! the selection itself is cleared right away so other cards stay playable.

use log::debug;

use crate::config::GameConfig;
use crate::deck::{CardId, Deck};
use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState {
    Idle,
    Selected,
    /// Part of a mismatch, locked until released.
    Cooling,
    Matched,
}

/// What a single `select` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Ignored,
    /// First card of a pair; waiting for the second.
    Pending(CardId),
    Matched([CardId; 2]),
    Mismatched([CardId; 2]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectOutcome {
    pub selection: Selection,
    pub matched_count: usize,
    pub score: u32,
    /// True only on the selection that completes the round.
    pub round_complete: bool,
}

#[derive(Debug)]
pub struct MatchEngine {
    deck: Deck,
    states: Vec<CardState>,
    selected: Vec<CardId>,
    matched_count: usize,
    score: u32,
    reward: u32,
    penalty: u32,
}

impl MatchEngine {
    pub fn new(deck: Deck, config: &GameConfig) -> Self {
        let states = vec![CardState::Idle; deck.len()];
        Self {
            deck,
            states,
            selected: Vec::with_capacity(2),
            matched_count: 0,
            score: 0,
            reward: config.match_reward,
            penalty: config.mismatch_penalty,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn state(&self, id: CardId) -> Option<CardState> {
        self.states.get(id.0).copied()
    }

    pub fn selected(&self) -> &[CardId] {
        &self.selected
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_pairs(&self) -> usize {
        self.deck.pair_count()
    }

    pub fn remaining(&self) -> usize {
        self.total_pairs() - self.matched_count
    }

    pub fn is_complete(&self) -> bool {
        self.matched_count == self.total_pairs()
    }

    pub fn select(&mut self, id: CardId) -> Result<SelectOutcome> {
        let state = self.state(id).ok_or(GameError::InvalidSelection(id))?;
        if self.selected.len() >= 2 || state != CardState::Idle {
            return Ok(self.outcome(Selection::Ignored, false));
        }

        self.states[id.0] = CardState::Selected;
        self.selected.push(id);
        if self.selected.len() < 2 {
            return Ok(self.outcome(Selection::Pending(id), false));
        }

        let pair = [self.selected[0], self.selected[1]];
        self.selected.clear();
        let (a, b) = (&self.deck.cards()[pair[0].0], &self.deck.cards()[pair[1].0]);
        if a.pairs_with(b) {
            debug!("matched '{}' with '{}'", a.label, b.label);
            for card in pair {
                self.states[card.0] = CardState::Matched;
            }
            self.matched_count += 1;
            self.score = self.score.saturating_add(self.reward);
            let complete = self.is_complete();
            Ok(self.outcome(Selection::Matched(pair), complete))
        } else {
            debug!("mismatch '{}' / '{}'", a.label, b.label);
            for card in pair {
                self.states[card.0] = CardState::Cooling;
            }
            self.score = self.score.saturating_sub(self.penalty);
            Ok(self.outcome(Selection::Mismatched(pair), false))
        }
    }

    /// Return cooling cards to `Idle`; returns the ids that actually changed.
    pub fn release(&mut self, cards: &[CardId]) -> Vec<CardId> {
        let mut released = Vec::new();
        for &id in cards {
            if let Some(state) = self.states.get_mut(id.0) {
                if *state == CardState::Cooling {
                    *state = CardState::Idle;
                    released.push(id);
                }
            }
        }
        released
    }

    fn outcome(&self, selection: Selection, round_complete: bool) -> SelectOutcome {
        SelectOutcome {
            selection,
            matched_count: self.matched_count,
            score: self.score,
            round_complete,
        }
    }
}
