//! Browser entry points and DOM wiring.
//!
//! The live session sits in a thread-local slot. Event callbacks clone the
//! `Rc` out of the slot and never hold the slot borrowed while game code runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::error;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent, window};

use crate::config::GameConfig;
use crate::deck::CardId;
use crate::error::GameError;
use crate::provider::WordListProvider;
use crate::round::{Collaborators, RoundController};
use crate::session::Session;
use crate::words::Difficulty;

pub mod audio;
pub mod dom;
pub mod fetch;
pub mod timer;

use audio::HtmlAudio;
use dom::DomUi;
use fetch::FetchSource;
use timer::{IntervalTimer, TimeoutScheduler};

pub type GameSession = Session<FetchSource>;

thread_local! {
    static SESSION: RefCell<Option<Rc<GameSession>>> = const { RefCell::new(None) };
    static CONTROLS_WIRED: Cell<bool> = const { Cell::new(false) };
}

pub(crate) fn current_session() -> Option<Rc<GameSession>> {
    SESSION.with(|s| s.borrow().clone())
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub(crate) fn document() -> Result<Document, GameError> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| GameError::Dom("no document".into()))
}

/// Build a session against the page's DOM and start the easy word list.
///
/// `config_json` may override any field of [`GameConfig`].
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(text) => GameConfig::from_json(&text)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?,
        None => GameConfig::default(),
    };
    let doc = document()?;
    let collab = Collaborators {
        ui: Box::new(DomUi::new(&doc)?),
        audio: Box::new(HtmlAudio::new(&config.completion_sound)),
        timer: Box::new(IntervalTimer::default()),
        scheduler: Box::new(TimeoutScheduler),
    };
    let source = FetchSource::new(&config);
    let controller = RoundController::new(config, collab, StdRng::from_entropy());
    let session = Rc::new(Session::new(WordListProvider::new(source), controller));
    SESSION.with(|s| s.replace(Some(session)));

    if !CONTROLS_WIRED.with(Cell::get) {
        wire_controls(&doc)?;
        CONTROLS_WIRED.with(|w| w.set(true));
    }
    select_difficulty(Difficulty::Easy.name())
}

/// Switch to `name` ("easy", "medium" or "hard") and restart at its first set.
#[wasm_bindgen]
pub fn select_difficulty(name: &str) -> Result<(), JsValue> {
    let difficulty: Difficulty = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let session = current_session().ok_or_else(|| JsValue::from_str("game not started"))?;
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = session.switch_difficulty(difficulty).await {
            error!("{e}");
            if let Ok(doc) = document() {
                dom::show_error(&doc, &e);
            }
        }
    });
    Ok(())
}

/// Skip to the next set of the current difficulty.
#[wasm_bindgen]
pub fn next_set() -> Result<(), JsValue> {
    let session = current_session().ok_or_else(|| JsValue::from_str("game not started"))?;
    session.advance();
    Ok(())
}

fn on_click(target: &Element, handler: impl FnMut(MouseEvent) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_controls(doc: &Document) -> Result<(), JsValue> {
    for difficulty in Difficulty::ALL {
        if let Some(btn) = doc.get_element_by_id(&format!("{}Btn", difficulty.name())) {
            on_click(&btn, move |_| {
                if let Err(e) = select_difficulty(difficulty.name()) {
                    error!("{}", describe(&e));
                }
            })?;
        }
    }
    for id in ["nextSetBtn", "messageBtn"] {
        if let Some(btn) = doc.get_element_by_id(id) {
            on_click(&btn, |_| {
                if let Err(e) = next_set() {
                    error!("{}", describe(&e));
                }
            })?;
        }
    }

    // One delegated listener; card elements are replaced every round.
    let container = doc
        .get_element_by_id(dom::CARD_CONTAINER)
        .ok_or_else(|| GameError::Dom(format!("missing #{}", dom::CARD_CONTAINER)))?;
    on_click(&container, |evt| {
        let (Some(card), Some(session)) = (clicked_card(&evt), current_session()) else {
            return;
        };
        if let Err(e) = session.select(card) {
            wasm_bindgen::throw_str(&e.to_string());
        }
    })
}

fn clicked_card(evt: &MouseEvent) -> Option<CardId> {
    let target: Element = evt.target()?.dyn_into().ok()?;
    let card = target.closest("[data-card]").ok()??;
    card.get_attribute("data-card")?.parse().ok().map(CardId)
}
