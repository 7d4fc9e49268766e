//! # Command Layer
//!
//! Business logic for every operation, one module per concern. Commands take the
//! live [`Collection`] and the [`OverlayStore`](crate::store::OverlayStore)
//! explicitly and return a [`CmdResult`]; they never print.
//!
//! Mutating commands validate and resolve ids first, so a `Validation` or
//! not-found error always means nothing changed. After a successful mutation
//! they persist the whole snapshot through [`helpers::persist`].

use crate::config::DeckzConfig;
use crate::model::{Card, Collection, Deck, Layout};
use chrono::{DateTime, Utc};

pub mod backup;
pub mod cards;
pub mod config;
pub mod decks;
pub mod export;
pub mod filter;
pub mod helpers;
pub mod import;
pub mod move_cards;
pub mod ordering;
pub mod reset;
pub mod status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A card together with the deck that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct CardHit {
    pub deck_id: String,
    pub deck_name: String,
    pub card: Card,
}

impl CardHit {
    pub fn new(deck: &Deck, card: &Card) -> Self {
        Self {
            deck_id: deck.id.clone(),
            deck_name: deck.name.clone(),
            card: card.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub decks_created: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatus {
    pub decks: usize,
    pub cards: usize,
    pub baseline_decks: usize,
    pub baseline_cards: usize,
    pub overlay_decks: usize,
    pub overlay_cards: usize,
    pub last_saved: Option<DateTime<Utc>>,
    pub unsaved: bool,
}

/// Cosmetic origin indicator for a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOrigin {
    /// Identical to the shipped baseline version.
    Baseline,
    /// Present in the baseline but edited or moved locally.
    ModifiedLocally,
    /// Only exists locally.
    LocalOnly,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_decks: Vec<Deck>,
    pub affected_cards: Vec<Card>,
    pub listed_cards: Vec<CardHit>,
    pub labels: Vec<String>,
    /// Rendered artifact (CSV export, JSON backup).
    pub output: Option<String>,
    pub import: Option<ImportSummary>,
    pub status: Option<CollectionStatus>,
    pub origin: Option<CardOrigin>,
    pub config: Option<DeckzConfig>,
    /// `None` when the command did not write, otherwise whether the write succeeded.
    pub saved: Option<bool>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_decks(mut self, decks: Vec<Deck>) -> Self {
        self.affected_decks = decks;
        self
    }

    pub fn with_affected_cards(mut self, cards: Vec<Card>) -> Self {
        self.affected_cards = cards;
        self
    }

    pub fn with_listed_cards(mut self, cards: Vec<CardHit>) -> Self {
        self.listed_cards = cards;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_config(mut self, config: DeckzConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// What an empty collection is refilled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckDefaults {
    pub name: String,
    pub layout: Layout,
}

impl DeckDefaults {
    pub fn deck(&self) -> Deck {
        let mut deck = Deck::new(self.name.clone(), None);
        deck.layout = self.layout;
        deck
    }

    /// Guarantees the collection holds at least one deck.
    pub fn ensure_nonempty(&self, collection: &mut Collection) -> bool {
        if collection.decks.is_empty() {
            collection.decks.push(self.deck());
            true
        } else {
            false
        }
    }
}

impl Default for DeckDefaults {
    fn default() -> Self {
        Self::from(&DeckzConfig::default())
    }
}

impl From<&DeckzConfig> for DeckDefaults {
    fn from(config: &DeckzConfig) -> Self {
        Self {
            name: config.default_deck_name.clone(),
            layout: config.default_layout,
        }
    }
}
