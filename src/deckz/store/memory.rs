use super::OverlayStore;
use crate::error::{DeckzError, Result};
use crate::model::Snapshot;

/// In-memory overlay storage for testing and development.
/// Does NOT persist data.
///
/// The blob is kept serialized so reads go through the same JSON path as the
/// file store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    blob: Option<String>,
    fail_writes: bool,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an arbitrary raw blob, which need not be valid JSON.
    pub fn with_blob(raw: impl Into<String>) -> Self {
        Self {
            blob: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Makes every subsequent `save` fail, like a full storage quota.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn raw(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl OverlayStore for InMemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        match &self.blob {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_writes {
            return Err(DeckzError::Persistence("storage quota exceeded".to_string()));
        }
        self.blob = Some(serde_json::to_string(snapshot)?);
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.blob = None;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Card, Deck, Provenance};

    /// A deck with fixed ids: `{deck_id}` holding cards `{deck_id}-c1..n`.
    pub fn deck_with_cards(deck_id: &str, name: &str, count: usize) -> Deck {
        let cards = (1..=count)
            .map(|i| {
                let mut card = Card::new(format!("{} card {}", name, i))
                    .with_id(format!("{}-c{}", deck_id, i));
                card.rank = i - 1;
                card
            })
            .collect();
        Deck::new(name, None).with_id(deck_id).with_cards(cards)
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
        decks: Vec<Deck>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                decks: Vec::new(),
            }
        }

        pub fn with_deck(mut self, mut deck: Deck) -> Self {
            deck.mark_source(Provenance::Overlay);
            self.decks.push(deck);
            self
        }

        /// Writes the accumulated decks as the saved overlay.
        pub fn build(mut self) -> InMemoryStore {
            let snapshot = Snapshot {
                decks: std::mem::take(&mut self.decks),
                last_modified: chrono::Utc::now(),
                version: None,
            };
            self.store.save(&snapshot).unwrap();
            self.store.saves = 0;
            self.store
        }
    }
}
