//! Round progression: timer, set indexing, completion and the collaborators
//! (UI, audio, timers) the controller drives.
//!
//! Every round start bumps a generation counter. Deferred work that belongs to
//! a round (mismatch releases) carries that generation and is dropped when it
//! arrives after the round was replaced.

use std::rc::Rc;

use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::deck::{CardId, Deck, Slot};
use crate::engine::{CardState, MatchEngine, SelectOutcome, Selection};
use crate::error::{GameError, Result};
use crate::words::{Difficulty, WordList};

/// Presentation surface for a round.
pub trait UiBinding {
    fn render_deck(&mut self, deck: &Deck, layout: &[Vec<Slot>]);
    fn set_card_state(&mut self, card: CardId, state: CardState);
    fn set_score(&mut self, score: u32);
    /// `elapsed` is already formatted as `MM:SS`.
    fn set_elapsed(&mut self, elapsed: &str);
    fn set_remaining(&mut self, remaining: usize);
    fn show_completion(&mut self, summary: &RoundSummary);
    fn hide_completion(&mut self);
    fn set_active_difficulty(&mut self, difficulty: Difficulty);
}

/// Fire-and-forget sound played when a round is completed.
pub trait AudioCue {
    fn play_completion_cue(&mut self) -> Result<()>;
}

/// The single periodic round timer. `start` replaces any running interval.
pub trait RoundTimer {
    fn start(&mut self, period_ms: u32);
    fn stop(&mut self);
}

/// Runs a mismatch release after a delay; the release is fed back through
/// `RoundController::release`.
pub trait Scheduler {
    fn schedule_release(&mut self, delay_ms: u32, pending: PendingRelease);
}

pub struct Collaborators {
    pub ui: Box<dyn UiBinding>,
    pub audio: Box<dyn AudioCue>,
    pub timer: Box<dyn RoundTimer>,
    pub scheduler: Box<dyn Scheduler>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Playing,
    RoundComplete,
}

/// Two mismatched cards waiting to become selectable again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRelease {
    pub generation: u64,
    pub cards: [CardId; 2],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundSummary {
    pub elapsed_seconds: u32,
    pub score: u32,
    pub matched_count: usize,
}

/// Zero-padded `MM:SS`. Minutes keep counting past 59.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub struct RoundController {
    config: GameConfig,
    collab: Collaborators,
    rng: StdRng,
    phase: RoundPhase,
    difficulty: Option<Difficulty>,
    word_list: Option<Rc<WordList>>,
    set_index: usize,
    engine: Option<MatchEngine>,
    elapsed_seconds: u32,
    generation: u64,
}

impl RoundController {
    pub fn new(config: GameConfig, collab: Collaborators, rng: StdRng) -> Self {
        Self {
            config,
            collab,
            rng,
            phase: RoundPhase::Idle,
            difficulty: None,
            word_list: None,
            set_index: 0,
            engine: None,
            elapsed_seconds: 0,
            generation: 0,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn set_index(&self) -> usize {
        self.set_index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn engine(&self) -> Option<&MatchEngine> {
        self.engine.as_ref()
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            elapsed_seconds: self.elapsed_seconds,
            score: self.engine.as_ref().map_or(0, MatchEngine::score),
            matched_count: self.engine.as_ref().map_or(0, MatchEngine::matched_count),
        }
    }

    /// Start playing group `set_index` of `list`; an out-of-range index wraps to 0.
    pub fn start_round(&mut self, difficulty: Difficulty, list: Rc<WordList>, set_index: usize) {
        let set_index = if set_index < list.len() { set_index } else { 0 };
        let deck = list
            .group(set_index)
            .map(|group| Deck::build(group, &mut self.rng))
            .unwrap_or_default();
        let engine = MatchEngine::new(deck, &self.config);

        self.collab.timer.stop();
        self.generation += 1;
        self.difficulty = Some(difficulty);
        self.word_list = Some(list);
        self.set_index = set_index;
        self.elapsed_seconds = 0;

        let ui = &mut self.collab.ui;
        ui.hide_completion();
        ui.set_active_difficulty(difficulty);
        ui.render_deck(engine.deck(), &engine.deck().layout(self.config.columns_per_block));
        ui.set_score(0);
        ui.set_elapsed(&format_time(0));
        ui.set_remaining(engine.remaining());
        debug!(
            "round {} started: {} set {} with {} pairs",
            self.generation,
            difficulty,
            set_index,
            engine.total_pairs()
        );

        self.engine = Some(engine);
        self.phase = RoundPhase::Playing;
        self.collab.timer.start(self.config.tick_ms);
    }

    /// Move to the next set of the current difficulty, wrapping past the last.
    /// Returns false when no round has been started yet.
    pub fn advance(&mut self) -> bool {
        let (Some(difficulty), Some(list)) = (self.difficulty, self.word_list.clone()) else {
            return false;
        };
        let next = if self.set_index + 1 >= list.len() { 0 } else { self.set_index + 1 };
        self.start_round(difficulty, list, next);
        true
    }

    pub fn select(&mut self, card: CardId) -> Result<SelectOutcome> {
        let engine = self.engine.as_mut().ok_or(GameError::InvalidSelection(card))?;
        let outcome = engine.select(card)?;
        let ui = &mut self.collab.ui;
        match outcome.selection {
            Selection::Ignored => {}
            Selection::Pending(id) => ui.set_card_state(id, CardState::Selected),
            Selection::Matched(pair) => {
                for id in pair {
                    ui.set_card_state(id, CardState::Matched);
                }
            }
            Selection::Mismatched(pair) => {
                for id in pair {
                    ui.set_card_state(id, CardState::Cooling);
                }
                self.collab.scheduler.schedule_release(
                    self.config.mismatch_delay_ms,
                    PendingRelease {
                        generation: self.generation,
                        cards: pair,
                    },
                );
            }
        }
        ui.set_score(outcome.score);
        ui.set_elapsed(&format_time(self.elapsed_seconds));
        ui.set_remaining(engine.remaining());

        if outcome.round_complete {
            self.complete();
        }
        Ok(outcome)
    }

    /// One timer period elapsed.
    pub fn tick(&mut self) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        self.elapsed_seconds += 1;
        self.collab.ui.set_elapsed(&format_time(self.elapsed_seconds));
    }

    /// Unlock mismatched cards. Releases from a replaced round are ignored.
    pub fn release(&mut self, pending: PendingRelease) -> bool {
        if pending.generation != self.generation {
            debug!("dropping stale release from round {}", pending.generation);
            return false;
        }
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        let released = engine.release(&pending.cards);
        for id in &released {
            self.collab.ui.set_card_state(*id, CardState::Idle);
        }
        !released.is_empty()
    }

    fn complete(&mut self) {
        self.collab.timer.stop();
        self.phase = RoundPhase::RoundComplete;
        if let Err(e) = self.collab.audio.play_completion_cue() {
            warn!("completion cue failed: {e}");
        }
        let summary = self.summary();
        info!(
            "round {} complete in {}: score {}, {} pairs",
            self.generation,
            format_time(summary.elapsed_seconds),
            summary.score,
            summary.matched_count
        );
        self.collab.ui.show_completion(&summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::CardKind;
    use crate::words::{WordGroup, WordPair};
    use rand::SeedableRng;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        scores: Vec<u32>,
        elapsed: Vec<String>,
        completions: Vec<RoundSummary>,
        renders: usize,
        timer_running: bool,
        timer_starts: usize,
        releases: Vec<PendingRelease>,
        card_states: Vec<(CardId, CardState)>,
    }

    type Shared = Rc<RefCell<Recorder>>;

    struct Ui(Shared);
    struct Audio(bool);
    struct Timer(Shared);
    struct Sched(Shared);

    impl UiBinding for Ui {
        fn render_deck(&mut self, _deck: &Deck, _layout: &[Vec<Slot>]) {
            self.0.borrow_mut().renders += 1;
        }
        fn set_card_state(&mut self, card: CardId, state: CardState) {
            self.0.borrow_mut().card_states.push((card, state));
        }
        fn set_score(&mut self, score: u32) {
            self.0.borrow_mut().scores.push(score);
        }
        fn set_elapsed(&mut self, elapsed: &str) {
            self.0.borrow_mut().elapsed.push(elapsed.to_string());
        }
        fn set_remaining(&mut self, _remaining: usize) {}
        fn show_completion(&mut self, summary: &RoundSummary) {
            self.0.borrow_mut().completions.push(*summary);
        }
        fn hide_completion(&mut self) {}
        fn set_active_difficulty(&mut self, _difficulty: Difficulty) {}
    }

    impl AudioCue for Audio {
        fn play_completion_cue(&mut self) -> Result<()> {
            if self.0 {
                Ok(())
            } else {
                Err(GameError::Audio("NotAllowedError".into()))
            }
        }
    }

    impl RoundTimer for Timer {
        fn start(&mut self, _period_ms: u32) {
            let mut r = self.0.borrow_mut();
            assert!(!r.timer_running, "timer started twice");
            r.timer_running = true;
            r.timer_starts += 1;
        }
        fn stop(&mut self) {
            self.0.borrow_mut().timer_running = false;
        }
    }

    impl Scheduler for Sched {
        fn schedule_release(&mut self, _delay_ms: u32, pending: PendingRelease) {
            self.0.borrow_mut().releases.push(pending);
        }
    }

    fn controller(audio_ok: bool) -> (RoundController, Shared) {
        let rec: Shared = Rc::default();
        let collab = Collaborators {
            ui: Box::new(Ui(rec.clone())),
            audio: Box::new(Audio(audio_ok)),
            timer: Box::new(Timer(rec.clone())),
            scheduler: Box::new(Sched(rec.clone())),
        };
        let c = RoundController::new(GameConfig::default(), collab, StdRng::seed_from_u64(1));
        (c, rec)
    }

    fn list() -> Rc<WordList> {
        Rc::new(WordList::new(vec![
            WordGroup::new(vec![WordPair::new("cat", "猫"), WordPair::new("dog", "狗")]),
            WordGroup::new(vec![WordPair::new("sun", "太阳")]),
        ]))
    }

    fn card(c: &RoundController, key: &str, kind: CardKind) -> CardId {
        let deck = c.engine().unwrap().deck();
        deck.ids()
            .find(|&id| {
                let card = deck.card(id).unwrap();
                card.pair_key == key && card.kind == kind
            })
            .unwrap()
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn test_start_round_resets_and_starts_timer() {
        let (mut c, rec) = controller(true);
        assert_eq!(c.phase(), RoundPhase::Idle);
        c.start_round(Difficulty::Easy, list(), 0);
        assert_eq!(c.phase(), RoundPhase::Playing);
        assert_eq!(c.engine().unwrap().deck().len(), 4);
        assert!(rec.borrow().timer_running);
        c.tick();
        c.tick();
        assert_eq!(c.elapsed_seconds(), 2);
        assert_eq!(rec.borrow().elapsed.last().unwrap(), "00:02");

        c.start_round(Difficulty::Easy, list(), 7);
        assert_eq!(c.set_index(), 0);
        assert_eq!(c.elapsed_seconds(), 0);
        assert_eq!(rec.borrow().timer_starts, 2);
    }

    #[test]
    fn test_completion_stops_timer_even_if_audio_fails() {
        let (mut c, rec) = controller(false);
        c.start_round(Difficulty::Easy, list(), 1);
        c.tick();
        let sun_t = card(&c, "sun", CardKind::Term);
        let sun_z = card(&c, "sun", CardKind::Translation);
        c.select(sun_t).unwrap();
        let out = c.select(sun_z).unwrap();
        assert!(out.round_complete);
        assert_eq!(c.phase(), RoundPhase::RoundComplete);
        assert_eq!(rec.borrow().scores.last(), Some(&10));
        assert!(!rec.borrow().timer_running);
        assert_eq!(
            rec.borrow().completions,
            vec![RoundSummary { elapsed_seconds: 1, score: 10, matched_count: 1 }]
        );
        c.tick();
        assert_eq!(c.elapsed_seconds(), 1);
    }

    #[test]
    fn test_ignored_select_still_republishes() {
        let (mut c, rec) = controller(true);
        c.start_round(Difficulty::Easy, list(), 0);
        let cat_t = card(&c, "cat", CardKind::Term);
        c.select(cat_t).unwrap();
        c.tick();
        let (scores, elapsed) = (rec.borrow().scores.len(), rec.borrow().elapsed.len());

        let out = c.select(cat_t).unwrap();
        assert_eq!(out.selection, Selection::Ignored);
        assert_eq!(rec.borrow().scores.len(), scores + 1);
        assert_eq!(rec.borrow().elapsed.len(), elapsed + 1);
        assert_eq!(rec.borrow().elapsed.last().unwrap(), "00:01");
    }

    #[test]
    fn test_advance_wraps_to_first_group() {
        let (mut c, _rec) = controller(true);
        assert!(!c.advance());
        c.start_round(Difficulty::Medium, list(), 1);
        assert!(c.advance());
        assert_eq!(c.set_index(), 0);
        assert_eq!(c.difficulty(), Some(Difficulty::Medium));
        assert!(c.advance());
        assert_eq!(c.set_index(), 1);
    }

    #[test]
    fn test_mismatch_release_and_stale_generation() {
        let (mut c, rec) = controller(true);
        c.start_round(Difficulty::Easy, list(), 0);
        let cat_t = card(&c, "cat", CardKind::Term);
        let dog_z = card(&c, "dog", CardKind::Translation);
        c.select(cat_t).unwrap();
        c.select(dog_z).unwrap();
        assert!(rec.borrow().card_states.contains(&(cat_t, CardState::Cooling)));
        let pending = rec.borrow().releases[0];
        assert_eq!(pending.generation, c.generation());
        assert!(c.release(pending));
        assert_eq!(c.engine().unwrap().state(cat_t), Some(CardState::Idle));
        assert!(!c.release(pending));

        c.select(cat_t).unwrap();
        c.select(dog_z).unwrap();
        let stale = rec.borrow().releases[1];
        c.advance();
        c.start_round(Difficulty::Easy, list(), 0);
        assert!(!c.release(stale));
    }

    #[test]
    fn test_select_before_start_is_invalid() {
        let (mut c, _rec) = controller(true);
        assert!(matches!(c.select(CardId(0)), Err(GameError::InvalidSelection(_))));
    }

    #[test]
    fn test_empty_word_list_plays_empty_round() {
        let (mut c, rec) = controller(true);
        c.start_round(Difficulty::Hard, Rc::new(WordList::default()), 0);
        assert_eq!(c.phase(), RoundPhase::Playing);
        assert!(c.engine().unwrap().deck().is_empty());
        assert_eq!(rec.borrow().renders, 1);
        assert!(c.advance());
        assert_eq!(c.set_index(), 0);
    }
}
