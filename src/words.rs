//! Word list data model: difficulties, word pairs and the groups ("sets") they
//! are played in.
//!
//! Word lists are JSON documents shaped as an array of groups, each group an
//! array of `{ "term": ..., "translation": ... }` records. The older
//! `english` / `chinese` field names are accepted as well.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{GameError, Result};

/// Difficulty tier selecting which word list is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Resource name of the tier (`easy.json` etc).
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Label shown on the difficulty buttons.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Simple",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty '{s}'"))
    }
}

/// A term and its translation. The term is the pair's identity within a group.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WordPair {
    #[serde(alias = "english")]
    pub term: String,
    #[serde(alias = "chinese")]
    pub translation: String,
}

impl WordPair {
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
        }
    }
}

/// One set of pairs played as a single round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct WordGroup {
    pairs: Vec<WordPair>,
}

impl WordGroup {
    pub fn new(pairs: Vec<WordPair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First term that appears more than once, if any.
    fn duplicate_term(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.pairs
            .iter()
            .map(|p| p.term.as_str())
            .find(|term| !seen.insert(*term))
    }
}

/// All groups of one difficulty, in play order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct WordList {
    groups: Vec<WordGroup>,
}

impl WordList {
    pub fn new(groups: Vec<WordGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[WordGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&WordGroup> {
        self.groups.get(index)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Parse and validate a word list document for `difficulty`.
pub fn parse_word_list(difficulty: Difficulty, text: &str) -> Result<WordList> {
    let list: WordList = serde_json::from_str(text)
        .map_err(|e| GameError::unavailable(difficulty, format!("malformed word list: {e}")))?;
    for (idx, group) in list.groups.iter().enumerate() {
        if let Some(term) = group.duplicate_term() {
            return Err(GameError::unavailable(
                difficulty,
                format!("group {idx} repeats term '{term}'"),
            ));
        }
    }
    Ok(list)
}
