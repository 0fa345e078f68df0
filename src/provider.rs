//! Word list loading and the per-session cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::Rc;

use futures::channel::oneshot;
use log::{debug, info};

use crate::error::Result;
use crate::words::{Difficulty, WordList, parse_word_list};

/// Where raw word list documents come from.
#[allow(async_fn_in_trait)]
pub trait WordSource {
    /// Fetch the raw JSON document for `difficulty`.
    async fn fetch(&self, difficulty: Difficulty) -> Result<String>;
}

/// Word lists compiled into the crate from `static/`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedSource;

impl EmbeddedSource {
    pub fn document(difficulty: Difficulty) -> &'static str {
        match difficulty {
            Difficulty::Easy => include_str!("../static/easy.json"),
            Difficulty::Medium => include_str!("../static/medium.json"),
            Difficulty::Hard => include_str!("../static/hard.json"),
        }
    }
}

impl WordSource for EmbeddedSource {
    async fn fetch(&self, difficulty: Difficulty) -> Result<String> {
        Ok(Self::document(difficulty).to_string())
    }
}

/// Session-scoped cache of loaded word lists, keyed by difficulty.
#[derive(Debug, Default)]
pub struct WordListStore {
    lists: HashMap<Difficulty, Rc<WordList>>,
}

impl WordListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, difficulty: Difficulty) -> Option<Rc<WordList>> {
        self.lists.get(&difficulty).cloned()
    }

    pub fn insert(&mut self, difficulty: Difficulty, list: WordList) -> Rc<WordList> {
        let list = Rc::new(list);
        self.lists.insert(difficulty, Rc::clone(&list));
        list
    }

    pub fn contains(&self, difficulty: Difficulty) -> bool {
        self.lists.contains_key(&difficulty)
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }
}

type Waiter = oneshot::Sender<Result<Rc<WordList>>>;
type InFlight = RefCell<HashMap<Difficulty, Vec<Waiter>>>;

/// Loads word lists from a source, fetching each difficulty at most once.
///
/// Loads of a difficulty that is already being fetched wait for that fetch
/// and share its result.
pub struct WordListProvider<S> {
    source: S,
    store: RefCell<WordListStore>,
    in_flight: InFlight,
}

/// Marks a difficulty as being fetched. Dropping it without landing (the
/// leading load was cancelled) drops the waiters, which then retry.
struct Flight<'a> {
    in_flight: &'a InFlight,
    difficulty: Difficulty,
}

impl Flight<'_> {
    fn land(self) -> Vec<Waiter> {
        let waiters = self.in_flight.borrow_mut().remove(&self.difficulty);
        waiters.unwrap_or_default()
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.in_flight.borrow_mut().remove(&self.difficulty);
    }
}

impl<S: WordSource> WordListProvider<S> {
    pub fn new(source: S) -> Self {
        Self::with_store(source, WordListStore::new())
    }

    pub fn with_store(source: S, store: WordListStore) -> Self {
        Self {
            source,
            store: RefCell::new(store),
            in_flight: RefCell::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_cached(&self, difficulty: Difficulty) -> bool {
        self.store.borrow().contains(difficulty)
    }

    /// Return the cached list, or fetch, parse and cache it.
    ///
    /// Neither the store nor the in-flight table is borrowed across an await,
    /// so loads of other difficulties may interleave freely. Failures are
    /// handed to every waiting caller and are not cached.
    pub async fn load(&self, difficulty: Difficulty) -> Result<Rc<WordList>> {
        loop {
            if let Some(list) = self.store.borrow().get(difficulty) {
                return Ok(list);
            }
            let waiting = match self.in_flight.borrow_mut().entry(difficulty) {
                Entry::Occupied(mut pending) => {
                    let (tx, rx) = oneshot::channel();
                    pending.get_mut().push(tx);
                    rx
                }
                Entry::Vacant(slot) => {
                    slot.insert(Vec::new());
                    break;
                }
            };
            debug!("waiting for the {difficulty} word list already in flight");
            if let Ok(result) = waiting.await {
                return result;
            }
        }

        let flight = Flight {
            in_flight: &self.in_flight,
            difficulty,
        };
        let result = self.fetch_and_parse(difficulty).await;
        for waiter in flight.land() {
            let _ = waiter.send(result.clone());
        }
        result
    }

    async fn fetch_and_parse(&self, difficulty: Difficulty) -> Result<Rc<WordList>> {
        let text = self.source.fetch(difficulty).await?;
        let list = parse_word_list(difficulty, &text)?;
        info!("loaded {} word groups for {}", list.len(), difficulty);
        Ok(self.store.borrow_mut().insert(difficulty, list))
    }
}
