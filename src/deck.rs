//! Deck construction: turns a word group into shuffled term and translation
//! cards, and lays them out on the card grid.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::words::WordGroup;

/// Which side of a word pair a card shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardKind {
    Term,
    Translation,
}

/// Position of a card within its deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub usize);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    /// Term of the originating pair; shared by exactly one term and one translation card.
    pub pair_key: String,
    pub kind: CardKind,
    pub label: String,
}

impl Card {
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.pair_key == other.pair_key && self.kind != other.kind
    }
}

/// Cards of one round: all term cards first, then all translation cards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    pair_count: usize,
}

/// One rendered grid slot: a card, or padding to keep the kind blocks aligned.
pub type Slot = Option<CardId>;

impl Deck {
    /// Shuffle the group's terms and translations independently (Fisher-Yates).
    pub fn build<R: Rng + ?Sized>(group: &WordGroup, rng: &mut R) -> Deck {
        let pair_count = group.len();
        let mut terms: Vec<Card> = group
            .pairs()
            .iter()
            .map(|p| Card {
                pair_key: p.term.clone(),
                kind: CardKind::Term,
                label: p.term.clone(),
            })
            .collect();
        let mut translations: Vec<Card> = group
            .pairs()
            .iter()
            .map(|p| Card {
                pair_key: p.term.clone(),
                kind: CardKind::Translation,
                label: p.translation.clone(),
            })
            .collect();
        terms.shuffle(rng);
        translations.shuffle(rng);

        let mut cards = terms;
        cards.append(&mut translations);
        Deck { cards, pair_count }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        (0..self.cards.len()).map(CardId)
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn terms(&self) -> &[Card] {
        &self.cards[..self.pair_count]
    }

    pub fn translations(&self) -> &[Card] {
        &self.cards[self.pair_count..]
    }

    /// Row-major grid: each row is `cols` term slots followed by `cols`
    /// translation slots, padded with `None` past the last pair.
    pub fn layout(&self, cols: usize) -> Vec<Vec<Slot>> {
        let cols = cols.max(1);
        let n = self.pair_count;
        let rows = n.div_ceil(cols);
        let mut grid = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut slots = Vec::with_capacity(cols * 2);
            // term block then translation block
            for base in [0, n] {
                for col in 0..cols {
                    let idx = row * cols + col;
                    slots.push((idx < n).then_some(CardId(base + idx)));
                }
            }
            grid.push(slots);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::WordPair;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn group(n: usize) -> WordGroup {
        WordGroup::new(
            (0..n)
                .map(|i| WordPair::new(format!("term{i}"), format!("译{i}")))
                .collect(),
        )
    }

    #[test]
    fn test_deck_has_one_card_per_kind_per_pair() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in [0, 1, 2, 5, 9] {
            let deck = Deck::build(&group(n), &mut rng);
            assert_eq!(deck.len(), 2 * n);
            assert_eq!(deck.pair_count(), n);
            let mut seen: HashMap<&str, (usize, usize)> = HashMap::new();
            for card in deck.cards() {
                let entry = seen.entry(card.pair_key.as_str()).or_default();
                match card.kind {
                    CardKind::Term => entry.0 += 1,
                    CardKind::Translation => entry.1 += 1,
                }
            }
            assert_eq!(seen.len(), n);
            assert!(seen.values().all(|&c| c == (1, 1)));
        }
    }

    #[test]
    fn test_terms_precede_translations() {
        let mut rng = StdRng::seed_from_u64(11);
        let deck = Deck::build(&group(4), &mut rng);
        assert!(deck.terms().iter().all(|c| c.kind == CardKind::Term));
        assert!(
            deck.translations()
                .iter()
                .all(|c| c.kind == CardKind::Translation)
        );
        let t = deck.translations().iter().find(|c| c.pair_key == "term2").unwrap();
        assert_eq!(t.label, "译2");
    }

    #[test]
    fn test_shuffle_covers_all_orderings() {
        // 3 pairs -> 6 orderings of the term block; all should show up.
        let mut rng = StdRng::seed_from_u64(99);
        let g = group(3);
        let mut orders = std::collections::HashSet::new();
        for _ in 0..600 {
            let deck = Deck::build(&g, &mut rng);
            let order: Vec<String> = deck.terms().iter().map(|c| c.pair_key.clone()).collect();
            orders.insert(order);
        }
        assert_eq!(orders.len(), 6);
    }

    #[test]
    fn test_layout_pads_partial_rows() {
        let mut rng = StdRng::seed_from_u64(5);
        let deck = Deck::build(&group(3), &mut rng);
        let grid = deck.layout(2);
        assert_eq!(grid.len(), 2);
        assert_eq!(
            grid[0],
            vec![Some(CardId(0)), Some(CardId(1)), Some(CardId(3)), Some(CardId(4))]
        );
        assert_eq!(grid[1], vec![Some(CardId(2)), None, Some(CardId(5)), None]);
    }

    #[test]
    fn test_empty_group_gives_empty_layout() {
        let mut rng = StdRng::seed_from_u64(1);
        let deck = Deck::build(&WordGroup::default(), &mut rng);
        assert!(deck.is_empty());
        assert!(deck.layout(2).is_empty());
    }

    #[test]
    fn test_pairs_with() {
        let a = Card { pair_key: "cat".into(), kind: CardKind::Term, label: "cat".into() };
        let b = Card { pair_key: "cat".into(), kind: CardKind::Translation, label: "猫".into() };
        let c = Card { pair_key: "cat".into(), kind: CardKind::Term, label: "cat".into() };
        assert!(a.pairs_with(&b));
        assert!(!a.pairs_with(&c));
    }
}
