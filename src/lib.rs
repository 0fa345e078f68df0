//! Word Match core crate.
//!
//! A card matching game for vocabulary practice: each round deals the term and
//! translation cards of one word group, and the player pairs them up against
//! the clock. The game logic (`deck`, `engine`, `round`, `session`) is plain
//! Rust and runs natively under `cargo test`; `web` binds it to the browser.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod provider;
pub mod round;
pub mod session;
pub mod web;
pub mod words;

pub use config::GameConfig;
pub use deck::{Card, CardId, CardKind, Deck};
pub use engine::{CardState, MatchEngine, SelectOutcome, Selection};
pub use error::{GameError, Result};
pub use provider::{EmbeddedSource, WordListProvider, WordListStore, WordSource};
pub use round::{
    AudioCue, Collaborators, PendingRelease, RoundController, RoundPhase, RoundSummary,
    RoundTimer, Scheduler, UiBinding, format_time,
};
pub use session::Session;
pub use words::{Difficulty, WordGroup, WordList, WordPair, parse_word_list};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
}
