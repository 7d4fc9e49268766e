//! # Startup Loading
//!
//! Builds the initial collection from two sources:
//!
//! - the **baseline**: a read-only document shipped with the app (`vault.json`)
//! - the **overlay**: the locally saved snapshot of the user's edits
//!
//! Both are read concurrently and joined before [`merge`] runs. Neither read can
//! fail the startup: a missing or unreadable source is logged and treated as
//! empty, and an empty merge result gets one default deck.
//!
//! ## Merge rules
//!
//! Baseline decks come first, in baseline order. For an overlay deck whose id
//! is also in the baseline, its cards replace the baseline cards with the same
//! id and the rest are appended; its deck fields win when it is overlay
//! sourced. Overlay decks with no baseline counterpart are appended in overlay
//! order. A card the overlay places in one deck is removed from any other deck
//! the baseline had it in, so a card moved between decks stays moved.

use crate::error::{DeckzError, Result};
use crate::model::{Collection, Deck, Layout, Provenance};
use crate::normalize::clean_hashtags;
use crate::store::OverlayStore;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct BaselineDocument {
    #[serde(default)]
    decks: Vec<Deck>,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions<'a> {
    pub baseline_path: Option<&'a Path>,
    pub default_deck_name: &'a str,
    pub default_layout: Layout,
}

#[derive(Debug)]
pub struct LoadedCollection {
    pub collection: Collection,
    /// The baseline as read, kept for provenance comparisons.
    pub baseline: Vec<Deck>,
    /// Set when the default deck had to be created.
    pub created_default: bool,
}

/// Reads the baseline document. Any failure yields an empty baseline.
pub fn load_baseline(path: Option<&Path>) -> Vec<Deck> {
    let Some(path) = path else {
        debug!("no baseline configured");
        return Vec::new();
    };
    if !path.exists() {
        debug!(path = %path.display(), "no baseline document");
        return Vec::new();
    }
    match read_baseline(path) {
        Ok(decks) => {
            info!(path = %path.display(), decks = decks.len(), "baseline loaded");
            decks
        }
        Err(err) => {
            warn!(error = %err, "baseline unavailable, continuing without it");
            Vec::new()
        }
    }
}

fn read_baseline(path: &Path) -> Result<Vec<Deck>> {
    let content = fs::read_to_string(path)
        .map_err(|e| DeckzError::SourceLoad(format!("{}: {}", path.display(), e)))?;
    parse_baseline(&content)
}

/// Parses a baseline document and tags its contents as baseline.
pub fn parse_baseline(content: &str) -> Result<Vec<Deck>> {
    let doc: BaselineDocument = serde_json::from_str(content)
        .map_err(|e| DeckzError::SourceLoad(format!("invalid baseline document: {}", e)))?;
    Ok(prepare(doc.decks, Provenance::Baseline))
}

/// Reads the saved overlay. Missing or corrupt data yields an empty overlay.
pub fn load_overlay<S: OverlayStore>(store: &S) -> Vec<Deck> {
    match store.load() {
        Ok(Some(snapshot)) => {
            info!(
                decks = snapshot.decks.len(),
                last_modified = %snapshot.last_modified,
                "overlay loaded"
            );
            prepare(snapshot.decks, Provenance::Overlay)
        }
        Ok(None) => {
            debug!("no saved overlay");
            Vec::new()
        }
        Err(err) => {
            warn!(error = %err, "saved overlay unreadable, ignoring it");
            Vec::new()
        }
    }
}

fn prepare(mut decks: Vec<Deck>, source: Provenance) -> Vec<Deck> {
    for deck in &mut decks {
        deck.mark_source(source);
        for card in &mut deck.cards {
            card.hashtags = clean_hashtags(&card.hashtags);
        }
    }
    decks
}

/// Layers `overlay` on top of `baseline`.
pub fn merge(baseline: Vec<Deck>, overlay: Vec<Deck>) -> Vec<Deck> {
    let claimed: HashMap<String, String> = overlay
        .iter()
        .flat_map(|deck| {
            deck.cards
                .iter()
                .map(move |card| (card.id.clone(), deck.id.clone()))
        })
        .collect();

    let mut merged = baseline;
    for mut local in overlay {
        let Some(idx) = merged.iter().position(|d| d.id == local.id) else {
            merged.push(local);
            continue;
        };

        let existing = &mut merged[idx];
        for card in std::mem::take(&mut local.cards) {
            match existing.card_position(&card.id) {
                Some(pos) => existing.cards[pos] = card,
                None => existing.cards.push(card),
            }
        }

        if local.source == Provenance::Overlay {
            existing.name = local.name;
            existing.description = local.description;
            existing.layout = local.layout;
            existing.rank = local.rank;
            existing.created_at = local.created_at;
            existing.source = Provenance::Overlay;
        }
    }

    for deck in &mut merged {
        let deck_id = deck.id.clone();
        deck.cards
            .retain(|card| claimed.get(&card.id).map_or(true, |owner| *owner == deck_id));
    }

    merged
}

/// Loads both sources, merges them and guarantees at least one deck.
pub fn load_collection<S: OverlayStore>(
    store: &S,
    options: LoadOptions<'_>,
) -> LoadedCollection {
    let (baseline, overlay) = std::thread::scope(|scope| {
        let baseline_task = scope.spawn(|| load_baseline(options.baseline_path));
        let overlay = load_overlay(store);
        let baseline = baseline_task.join().unwrap_or_else(|_| {
            warn!("baseline loader panicked, continuing without it");
            Vec::new()
        });
        (baseline, overlay)
    });

    let mut decks = merge(baseline.clone(), overlay);
    let created_default = decks.is_empty();
    if created_default {
        info!(deck = options.default_deck_name, "collection empty, creating default deck");
        let mut deck = Deck::new(options.default_deck_name, None);
        deck.layout = options.default_layout;
        decks.push(deck);
    }

    info!(
        decks = decks.len(),
        cards = decks.iter().map(|d| d.cards.len()).sum::<usize>(),
        "collection ready"
    );

    LoadedCollection {
        collection: Collection::new(decks),
        baseline,
        created_default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, Snapshot};
    use crate::store::memory::fixtures::{deck_with_cards, StoreFixture};
    use crate::store::memory::InMemoryStore;
    use std::collections::HashSet;

    fn baseline_deck(id: &str, name: &str, cards: Vec<Card>) -> Deck {
        let mut deck = Deck::new(name, None).with_id(id).with_cards(cards);
        deck.mark_source(Provenance::Baseline);
        deck
    }

    fn overlay_deck(id: &str, name: &str, cards: Vec<Card>) -> Deck {
        let mut deck = Deck::new(name, None).with_id(id).with_cards(cards);
        deck.mark_source(Provenance::Overlay);
        deck
    }

    fn options(name: &str) -> LoadOptions<'_> {
        LoadOptions {
            baseline_path: None,
            default_deck_name: name,
            default_layout: Layout::Column,
        }
    }

    #[test]
    fn overlay_cards_replace_and_extend_baseline_deck() {
        let baseline = vec![baseline_deck("d1", "Ideas", vec![Card::new("A").with_id("c1")])];
        let overlay = vec![overlay_deck(
            "d1",
            "Ideas",
            vec![
                Card::new("A-edited").with_id("c1"),
                Card::new("B").with_id("c2"),
            ],
        )];

        let merged = merge(baseline, overlay);
        assert_eq!(merged.len(), 1);
        let titles: Vec<_> = merged[0].cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A-edited", "B"]);
        assert_eq!(merged[0].cards[0].id, "c1");
        assert_eq!(merged[0].cards[1].id, "c2");
    }

    #[test]
    fn ordering_is_baseline_then_overlay_only() {
        let baseline = vec![
            baseline_deck("b1", "First", vec![]),
            baseline_deck("b2", "Second", vec![]),
        ];
        let overlay = vec![
            overlay_deck("o1", "Mine", vec![]),
            overlay_deck("b2", "Second renamed", vec![]),
            overlay_deck("o2", "Mine too", vec![]),
        ];

        let merged = merge(baseline, overlay);
        let ids: Vec<_> = merged.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2", "o1", "o2"]);
        assert_eq!(merged[1].name, "Second renamed");
        assert_eq!(merged[1].source, Provenance::Overlay);
        assert_eq!(merged[0].source, Provenance::Baseline);
    }

    #[test]
    fn baseline_card_order_kept_with_new_cards_last() {
        let baseline = vec![baseline_deck(
            "d1",
            "Ideas",
            vec![
                Card::new("1").with_id("c1"),
                Card::new("2").with_id("c2"),
                Card::new("3").with_id("c3"),
            ],
        )];
        let overlay = vec![overlay_deck(
            "d1",
            "Ideas",
            vec![Card::new("new").with_id("c9"), Card::new("2*").with_id("c2")],
        )];

        let merged = merge(baseline, overlay);
        let ids: Vec<_> = merged[0].cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3", "c9"]);
        assert_eq!(merged[0].cards[1].title, "2*");
    }

    #[test]
    fn baseline_sourced_overlay_deck_keeps_baseline_fields() {
        let baseline = vec![baseline_deck("d1", "Original", vec![])];
        let overlay = vec![baseline_deck("d1", "Stale copy", vec![])];

        let merged = merge(baseline, overlay);
        assert_eq!(merged[0].name, "Original");
    }

    #[test]
    fn moved_card_is_not_duplicated() {
        let baseline = vec![
            baseline_deck("d1", "From", vec![Card::new("A").with_id("c1")]),
            baseline_deck("d2", "To", vec![]),
        ];
        let overlay = vec![
            overlay_deck("d1", "From", vec![]),
            overlay_deck("d2", "To", vec![Card::new("A").with_id("c1")]),
        ];

        let merged = merge(baseline, overlay);
        assert!(merged[0].cards.is_empty());
        assert_eq!(merged[1].cards.len(), 1);
    }

    #[test]
    fn merge_is_stable_once_overlay_holds_everything() {
        let baseline = vec![
            baseline_deck(
                "d1",
                "Ideas",
                vec![Card::new("A").with_id("c1"), Card::new("B").with_id("c2")],
            ),
            baseline_deck("d2", "Later", vec![Card::new("C").with_id("c3")]),
        ];
        let overlay = vec![
            overlay_deck("d1", "Ideas", vec![Card::new("A-edited").with_id("c1")]),
            overlay_deck("d3", "Mine", vec![Card::new("D").with_id("c4")]),
        ];

        let first = merge(baseline.clone(), overlay);
        // Persist and reload, as the app does after any mutation.
        let persisted = prepare(first.clone(), Provenance::Overlay);
        let second = merge(baseline, persisted);

        let card_set = |decks: &[Deck]| -> HashSet<(String, String, String)> {
            decks
                .iter()
                .flat_map(|d| {
                    d.cards
                        .iter()
                        .map(|c| (d.id.clone(), c.id.clone(), c.title.clone()))
                })
                .collect()
        };
        assert_eq!(card_set(&first), card_set(&second));
        assert_eq!(
            second.iter().map(|d| d.cards.len()).sum::<usize>(),
            first.iter().map(|d| d.cards.len()).sum::<usize>()
        );
    }

    #[test]
    fn baseline_parse_tags_and_normalizes() {
        let doc = r##"{"decks":[{"id":"d1","name":"Vault","cards":[
            {"id":"c1","title":"T","hashtags":["#Web","web","API"]}]}]}"##;
        let decks = parse_baseline(doc).unwrap();
        assert_eq!(decks[0].source, Provenance::Baseline);
        assert_eq!(decks[0].cards[0].source, Provenance::Baseline);
        assert_eq!(decks[0].cards[0].hashtags, vec!["web", "api"]);
    }

    #[test]
    fn missing_baseline_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let decks = load_baseline(Some(dir.path().join("vault.json").as_path()));
        assert!(decks.is_empty());
    }

    #[test]
    fn garbage_baseline_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        std::fs::write(&path, "<html>404</html>").unwrap();
        assert!(load_baseline(Some(path.as_path())).is_empty());
    }

    #[test]
    fn corrupt_overlay_is_empty() {
        let store = InMemoryStore::with_blob("{\"decks\": 12");
        assert!(load_overlay(&store).is_empty());
    }

    #[test]
    fn overlay_contents_are_tagged_overlay() {
        let mut deck = deck_with_cards("d1", "Ideas", 2);
        deck.mark_source(Provenance::Baseline);
        let store = StoreFixture::new().with_deck(deck).build();
        let decks = load_overlay(&store);
        assert!(decks
            .iter()
            .flat_map(|d| d.cards.iter())
            .all(|c| c.source == Provenance::Overlay));
    }

    #[test]
    fn empty_sources_yield_default_deck() {
        let store = InMemoryStore::new();
        let loaded = load_collection(&store, options("General"));
        assert!(loaded.created_default);
        assert_eq!(loaded.collection.decks.len(), 1);
        assert_eq!(loaded.collection.decks[0].name, "General");
        assert!(loaded.collection.decks[0].cards.is_empty());
    }

    #[test]
    fn both_sources_are_joined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        let vault = Snapshot {
            decks: vec![baseline_deck("d1", "Vault", vec![Card::new("A").with_id("c1")])],
            last_modified: chrono::Utc::now(),
            version: None,
        };
        std::fs::write(&path, serde_json::to_string(&vault).unwrap()).unwrap();
        let store = StoreFixture::new()
            .with_deck(deck_with_cards("d2", "Local", 1))
            .build();

        let loaded = load_collection(
            &store,
            LoadOptions {
                baseline_path: Some(path.as_path()),
                ..options("General")
            },
        );
        assert!(!loaded.created_default);
        let ids: Vec<_> = loaded.collection.decks.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
        assert_eq!(loaded.baseline.len(), 1);
    }

    /// A saved document as the earlier browser app wrote it: `_source` tags,
    /// `order` ranks, a `landscape` layout, and a card imported from CSV and
    /// later edited, so it carries both `images` and `galleryImages`.
    const SAVED_BY_BROWSER_APP: &str = r##"{
        "decks": [
            {
                "id": "lx2k9f0abc",
                "name": "Ideas Generales",
                "description": "Deck principal para ideas y proyectos",
                "cards": [
                    {
                        "id": "lx2kaa1def",
                        "title": "Portfolio site",
                        "category": "Web",
                        "description": "Rebuild it",
                        "notes": "",
                        "hashtags": ["web", "design"],
                        "coverImage": "",
                        "galleryImages": [],
                        "createdAt": "2024-03-15T09:30:00.000Z",
                        "order": 0,
                        "_source": "localStorage"
                    },
                    {
                        "id": "lx2kbb2ghi",
                        "title": "Imported idea",
                        "category": "Misc",
                        "description": "",
                        "notes": "",
                        "hashtags": ["csv"],
                        "images": ["a.png", "b.png"],
                        "coverImage": null,
                        "galleryImages": ["b.png"],
                        "order": 1,
                        "createdAt": "15/03/2024 10:00",
                        "updatedAt": "2024-03-16T08:00:00.000Z",
                        "_source": "vault"
                    }
                ],
                "order": 0,
                "layout": "landscape",
                "createdAt": "2024-03-01T00:00:00.000Z",
                "_source": "vault"
            },
            {
                "id": "lx2kcc3jkl",
                "name": "Backlog",
                "description": "Deck importado - 15/3/2024",
                "cards": [],
                "createdAt": "2024-03-15T10:00:00.000Z",
                "_source": "localStorage"
            }
        ],
        "lastModified": "2024-03-16T08:00:00.000Z"
    }"##;

    fn assert_browser_app_document(decks: &[Deck], source: Provenance) {
        assert_eq!(decks.len(), 2);
        let ideas = &decks[0];
        assert_eq!(ideas.name, "Ideas Generales");
        assert_eq!(ideas.layout, Layout::Row);
        assert_eq!(ideas.rank, 0);
        assert_eq!(ideas.source, source);
        assert_eq!(ideas.cards.len(), 2);

        let first = &ideas.cards[0];
        assert_eq!(first.hashtags, vec!["web", "design"]);
        assert_eq!(first.cover_image, None);
        assert!(first.gallery_images.is_empty());

        let imported = &ideas.cards[1];
        assert_eq!(imported.rank, 1);
        assert_eq!(imported.gallery_images, vec!["b.png"]);
        assert_eq!(imported.cover_image, None);
        assert!(imported.updated_at.is_some());
        assert_eq!(imported.source, source);

        assert_eq!(decks[1].layout, Layout::Column);
        assert!(decks[1].cards.is_empty());
    }

    #[test]
    fn default_deck_written_by_browser_app_loads() {
        let decks = parse_baseline(
            r#"{"decks":[{"id":"x1","name":"Ideas Generales","description":"Deck principal para ideas y proyectos","cards":[{"id":"c1","title":"A"}],"order":0,"layout":"landscape","createdAt":"2024-03-01T00:00:00.000Z"}]}"#,
        )
        .unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].layout, Layout::Row);
        assert_eq!(decks[0].cards[0].title, "A");
    }

    #[test]
    fn browser_app_document_loads_as_baseline() {
        let decks = parse_baseline(SAVED_BY_BROWSER_APP).unwrap();
        assert_browser_app_document(&decks, Provenance::Baseline);
    }

    #[test]
    fn browser_app_document_loads_as_overlay() {
        let store = InMemoryStore::with_blob(SAVED_BY_BROWSER_APP);
        let decks = load_overlay(&store);
        assert_browser_app_document(&decks, Provenance::Overlay);

        let loaded = load_collection(&store, options("General"));
        assert!(!loaded.created_default);
        assert_eq!(loaded.collection.card_count(), 2);
    }
}
