//! Tunable game constants. Defaults reproduce the classic rules; a JSON object
//! passed to `start_game` may override any subset of fields.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Points awarded per matched pair.
    pub match_reward: u32,
    /// Points removed per mismatch (score floors at zero).
    pub mismatch_penalty: u32,
    /// How long two mismatched cards stay locked before becoming selectable.
    pub mismatch_delay_ms: u32,
    /// Round timer period; every tick adds one second.
    pub tick_ms: u32,
    /// Columns per card kind in the rendered grid.
    pub columns_per_block: usize,
    /// Base path word lists are fetched from (`{data_path}/{difficulty}.json`).
    pub data_path: String,
    pub completion_sound: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            match_reward: 10,
            mismatch_penalty: 2,
            mismatch_delay_ms: 500,
            tick_ms: 1000,
            columns_per_block: 2,
            data_path: "static".to_string(),
            completion_sound: "static/success.wav".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse overrides from JSON; missing fields keep their defaults.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let mut config: GameConfig = serde_json::from_str(text)?;
        config.columns_per_block = config.columns_per_block.max(1);
        Ok(config)
    }

    pub fn word_list_url(&self, difficulty: crate::words::Difficulty) -> String {
        format!("{}/{}.json", self.data_path.trim_end_matches('/'), difficulty.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Difficulty;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"match_reward": 5, "data_path": "words/"}"#).unwrap();
        assert_eq!(cfg.match_reward, 5);
        assert_eq!(cfg.mismatch_penalty, 2);
        assert_eq!(cfg.mismatch_delay_ms, 500);
        assert_eq!(cfg.word_list_url(Difficulty::Medium), "words/medium.json");
    }

    #[test]
    fn test_zero_columns_clamped() {
        let cfg = GameConfig::from_json(r#"{"columns_per_block": 0}"#).unwrap();
        assert_eq!(cfg.columns_per_block, 1);
    }

    #[test]
    fn test_default_url() {
        assert_eq!(
            GameConfig::default().word_list_url(Difficulty::Easy),
            "static/easy.json"
        );
    }
}
