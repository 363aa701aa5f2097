use rand::seq::SliceRandom;
use rand::Rng;

use super::{Category, VocabularyEntry};

/// Entries of one category in their current study order.
///
/// Lives only for one view session and is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    category: Category,
    entries: Vec<VocabularyEntry>,
}

impl Deck {
    pub fn new(category: Category, entries: Vec<VocabularyEntry>) -> Self {
        Self { category, entries }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&VocabularyEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reorder in place, keeping the same multiset of entries.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.entries.shuffle(rng);
    }
}
