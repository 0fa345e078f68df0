//! `WordSource` backed by the browser's `fetch`.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, window};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::provider::WordSource;
use crate::words::Difficulty;

use super::describe;

/// Fetches `{data_path}/{difficulty}.json` relative to the page.
pub struct FetchSource {
    config: GameConfig,
}

impl FetchSource {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl WordSource for FetchSource {
    async fn fetch(&self, difficulty: Difficulty) -> Result<String> {
        let url = self.config.word_list_url(difficulty);
        let unavailable = |e: wasm_bindgen::JsValue| {
            GameError::unavailable(difficulty, format!("{url}: {}", describe(&e)))
        };
        let win = window().ok_or_else(|| GameError::Dom("no window".into()))?;
        let resp: Response = JsFuture::from(win.fetch_with_str(&url))
            .await
            .map_err(unavailable)?
            .dyn_into()
            .map_err(unavailable)?;
        if !resp.ok() {
            return Err(GameError::unavailable(
                difficulty,
                format!("{url}: HTTP {} {}", resp.status(), resp.status_text()),
            ));
        }
        let text = JsFuture::from(resp.text().map_err(unavailable)?)
            .await
            .map_err(unavailable)?;
        text.as_string()
            .ok_or_else(|| GameError::unavailable(difficulty, format!("{url}: body is not text")))
    }
}
