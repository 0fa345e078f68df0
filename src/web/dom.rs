//! `UiBinding` over the game page's DOM.

use log::{error, warn};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::deck::{Card, CardId, CardKind, Deck, Slot};
use crate::engine::CardState;
use crate::error::GameError;
use crate::round::{RoundSummary, UiBinding, format_time};
use crate::words::Difficulty;

use super::describe;

pub const CARD_CONTAINER: &str = "cardContainer";

const CARD_CLASS: &str = "card cursor-pointer rounded-lg shadow-md p-1 flex items-center justify-center";

pub struct DomUi {
    doc: Document,
    container: Element,
    score: Option<Element>,
    remaining: Option<Element>,
    timer: Option<Element>,
    message: Option<Element>,
    message_title: Option<Element>,
    message_text: Option<Element>,
    buttons: Vec<(Difficulty, Element)>,
    cards: Vec<Option<Element>>,
}

impl DomUi {
    pub fn new(doc: &Document) -> Result<Self, GameError> {
        let container = doc
            .get_element_by_id(CARD_CONTAINER)
            .ok_or_else(|| GameError::Dom(format!("missing #{CARD_CONTAINER}")))?;
        let buttons = Difficulty::ALL
            .into_iter()
            .filter_map(|d| {
                let btn = doc.get_element_by_id(&format!("{}Btn", d.name()))?;
                btn.set_text_content(Some(d.label()));
                Some((d, btn))
            })
            .collect();
        Ok(Self {
            doc: doc.clone(),
            container,
            score: doc.get_element_by_id("score"),
            remaining: doc.get_element_by_id("remaining"),
            timer: doc.get_element_by_id("timer"),
            message: doc.get_element_by_id("message"),
            message_title: doc.get_element_by_id("messageTitle"),
            message_text: doc.get_element_by_id("messageText"),
            buttons,
            cards: Vec::new(),
        })
    }

    fn card_element(&self, id: CardId, card: &Card) -> Result<Element, JsValue> {
        let div = self.doc.create_element("div")?;
        let (palette, kind) = match card.kind {
            CardKind::Term => ("bg-blue-100 text-blue-800", "term"),
            CardKind::Translation => ("bg-red-100 text-red-800", "translation"),
        };
        div.set_class_name(&format!("{CARD_CLASS} {palette}"));
        div.set_attribute("data-card", &id.0.to_string())?;
        div.set_attribute("data-type", kind)?;
        div.set_text_content(Some(&card.label));
        Ok(div)
    }

    fn fill_grid(&mut self, deck: &Deck, layout: &[Vec<Slot>]) -> Result<(), JsValue> {
        let columns = layout.first().map_or(4, Vec::len);
        self.container
            .set_class_name(&format!("grid grid-cols-{columns} gap-4 w-full"));
        for slot in layout.iter().flatten() {
            let el = match (*slot).and_then(|id| deck.card(id).map(|card| (id, card))) {
                Some((id, card)) => {
                    let el = self.card_element(id, card)?;
                    self.cards[id.0] = Some(el.clone());
                    el
                }
                None => {
                    let pad = self.doc.create_element("div")?;
                    pad.set_class_name("invisible");
                    pad
                }
            };
            self.container.append_child(&el)?;
        }
        Ok(())
    }
}

fn set_text(el: &Option<Element>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

fn toggle(el: &Element, class: &str, on: bool) {
    let classes = el.class_list();
    let res = if on { classes.add_1(class) } else { classes.remove_1(class) };
    if let Err(e) = res {
        warn!("class update failed: {}", describe(&e));
    }
}

impl UiBinding for DomUi {
    fn render_deck(&mut self, deck: &Deck, layout: &[Vec<Slot>]) {
        self.container.set_inner_html("");
        self.cards = vec![None; deck.len()];
        if let Err(e) = self.fill_grid(deck, layout) {
            error!("could not render cards: {}", describe(&e));
        }
    }

    fn set_card_state(&mut self, card: CardId, state: CardState) {
        let Some(Some(el)) = self.cards.get(card.0) else {
            return;
        };
        toggle(el, "selected", state != CardState::Idle);
        toggle(el, "mismatch", state == CardState::Cooling);
        toggle(el, "matched", state == CardState::Matched);
    }

    fn set_score(&mut self, score: u32) {
        set_text(&self.score, &score.to_string());
    }

    fn set_elapsed(&mut self, elapsed: &str) {
        set_text(&self.timer, elapsed);
    }

    fn set_remaining(&mut self, remaining: usize) {
        set_text(&self.remaining, &remaining.to_string());
    }

    fn show_completion(&mut self, summary: &RoundSummary) {
        set_text(&self.message_title, "Congratulations!");
        if let Some(text) = &self.message_text {
            text.set_inner_html(&format!(
                "Time Taken: {}<br>Score: {}<br>Correct Matches: {}",
                format_time(summary.elapsed_seconds),
                summary.score,
                summary.matched_count
            ));
        }
        if let Some(message) = &self.message {
            toggle(message, "hidden", false);
        }
    }

    fn hide_completion(&mut self) {
        if let Some(message) = &self.message {
            toggle(message, "hidden", true);
        }
    }

    fn set_active_difficulty(&mut self, difficulty: Difficulty) {
        for (d, btn) in &self.buttons {
            toggle(btn, "active", *d == difficulty);
        }
    }
}

/// Put a load failure into the message panel.
pub fn show_error(doc: &Document, err: &GameError) {
    if let Some(title) = doc.get_element_by_id("messageTitle") {
        title.set_text_content(Some("Could not start round"));
    }
    if let Some(text) = doc.get_element_by_id("messageText") {
        text.set_text_content(Some(&err.to_string()));
    }
    if let Some(message) = doc.get_element_by_id("message") {
        toggle(&message, "hidden", false);
    }
}
