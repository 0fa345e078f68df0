//! Completion sound played through an `<audio>` element.

use log::warn;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::error::{GameError, Result};
use crate::round::AudioCue;

use super::describe;

pub struct HtmlAudio {
    src: String,
    element: Option<HtmlAudioElement>,
}

impl HtmlAudio {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            element: None,
        }
    }

    fn element(&mut self) -> Result<&HtmlAudioElement> {
        if self.element.is_none() {
            let audio = HtmlAudioElement::new_with_src(&self.src)
                .map_err(|e| GameError::Audio(describe(&e)))?;
            self.element = Some(audio);
        }
        self.element
            .as_ref()
            .ok_or_else(|| GameError::Audio("audio element missing".into()))
    }
}

impl AudioCue for HtmlAudio {
    fn play_completion_cue(&mut self) -> Result<()> {
        let audio = self.element()?;
        audio.set_current_time(0.0);
        let playing = audio.play().map_err(|e| GameError::Audio(describe(&e)))?;
        // Autoplay policies reject asynchronously.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(playing).await {
                warn!("completion cue rejected: {}", describe(&e));
            }
        });
        Ok(())
    }
}
