use crate::commands::{CardHit, CmdResult};
use crate::model::{Card, Collection};
use crate::normalize::clean_hashtags;
use std::collections::BTreeSet;

/// Search criteria. Empty parts match everything.
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    /// Case-insensitive substring over title, description, notes and hashtags.
    pub query: String,
    /// Card category must be one of these (case-insensitive).
    pub categories: Vec<String>,
    /// Card must carry at least one of these hashtags.
    pub hashtags: Vec<String>,
}

impl CardFilter {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn matches(&self, card: &Card) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() && !card.search_text().contains(&query) {
            return false;
        }

        if !self.categories.is_empty() {
            let Some(category) = card.category.as_deref().map(str::to_lowercase) else {
                return false;
            };
            if !self
                .categories
                .iter()
                .any(|c| c.trim().to_lowercase() == category)
            {
                return false;
            }
        }

        if !self.hashtags.is_empty() {
            let wanted = clean_hashtags(&self.hashtags);
            if !wanted.iter().any(|tag| card.hashtags.contains(tag)) {
                return false;
            }
        }

        true
    }
}

pub fn run(collection: &Collection, filter: &CardFilter) -> CmdResult {
    let hits = collection
        .cards()
        .filter(|(_, card)| filter.matches(card))
        .map(|(deck, card)| CardHit::new(deck, card))
        .collect();
    CmdResult::default().with_listed_cards(hits)
}

/// Distinct lowercase categories across all cards, sorted.
pub fn categories(collection: &Collection) -> CmdResult {
    let set: BTreeSet<String> = collection
        .cards()
        .filter_map(|(_, card)| card.category.as_deref())
        .map(str::to_lowercase)
        .collect();
    CmdResult::default().with_labels(set.into_iter().collect())
}

/// Distinct hashtags across all cards, sorted.
pub fn hashtags(collection: &Collection) -> CmdResult {
    let set: BTreeSet<String> = collection
        .cards()
        .flat_map(|(_, card)| card.hashtags.iter())
        .map(|tag| tag.to_lowercase())
        .collect();
    CmdResult::default().with_labels(set.into_iter().collect())
}
