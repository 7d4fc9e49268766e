use crate::commands::{CardOrigin, CmdResult, CollectionStatus};
use crate::error::{DeckzError, Result};
use crate::model::{Collection, Deck, Provenance};
use crate::store::OverlayStore;
use tracing::debug;

use super::helpers::find_deck;

/// Counts and save state for the whole collection.
pub fn run<S: OverlayStore>(collection: &Collection, store: &S, unsaved: bool) -> CmdResult {
    let last_saved = match store.load() {
        Ok(snapshot) => snapshot.map(|s| s.last_modified),
        Err(err) => {
            debug!(error = %err, "overlay unreadable while gathering status");
            None
        }
    };

    let baseline_decks = collection
        .decks
        .iter()
        .filter(|d| d.source == Provenance::Baseline)
        .count();
    let baseline_cards = collection
        .cards()
        .filter(|(_, c)| c.source == Provenance::Baseline)
        .count();

    let status = CollectionStatus {
        decks: collection.decks.len(),
        cards: collection.card_count(),
        baseline_decks,
        baseline_cards,
        overlay_decks: collection.decks.len() - baseline_decks,
        overlay_cards: collection.card_count() - baseline_cards,
        last_saved,
        unsaved,
    };

    CmdResult {
        status: Some(status),
        ..Default::default()
    }
}

/// Where a card's current version comes from, compared with the baseline as
/// loaded.
///
/// A card counts as unchanged only if the baseline has it in the same deck
/// with the same content.
pub fn card_status(
    collection: &Collection,
    baseline: &[Deck],
    deck_id: &str,
    card_id: &str,
) -> Result<CmdResult> {
    let card = find_deck(collection, deck_id)?
        .card(card_id)
        .ok_or_else(|| DeckzError::card_not_found(deck_id, card_id))?;

    let original = baseline
        .iter()
        .find_map(|deck| deck.card(card_id).map(|c| (deck.id.as_str(), c)));
    let origin = match original {
        None => CardOrigin::LocalOnly,
        Some((home, original)) if home == deck_id && original.same_content(card) => {
            CardOrigin::Baseline
        }
        Some(_) => CardOrigin::ModifiedLocally,
    };

    let mut result = CmdResult::default().with_affected_cards(vec![card.clone()]);
    result.origin = Some(origin);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{cards, move_cards};
    use crate::model::CardFields;
    use crate::store::memory::fixtures::deck_with_cards;
    use crate::store::memory::InMemoryStore;

    fn baseline() -> Vec<Deck> {
        let mut decks = vec![deck_with_cards("d1", "Ideas", 2), deck_with_cards("d2", "Later", 0)];
        for deck in &mut decks {
            deck.mark_source(Provenance::Baseline);
        }
        decks
    }

    fn origin(collection: &Collection, baseline: &[Deck], deck: &str, card: &str) -> CardOrigin {
        card_status(collection, baseline, deck, card)
            .unwrap()
            .origin
            .unwrap()
    }

    #[test]
    fn untouched_edited_moved_and_new_cards() {
        let baseline = baseline();
        let mut collection = Collection::new(baseline.clone());
        let mut store = InMemoryStore::new();

        assert_eq!(origin(&collection, &baseline, "d1", "d1-c1"), CardOrigin::Baseline);

        cards::edit(
            &mut collection,
            &mut store,
            "d1",
            "d1-c1",
            &CardFields::titled("Renamed"),
        )
        .unwrap();
        assert_eq!(
            origin(&collection, &baseline, "d1", "d1-c1"),
            CardOrigin::ModifiedLocally
        );

        move_cards::run(&mut collection, &mut store, "d1-c2", "d1", "d2").unwrap();
        assert_eq!(
            origin(&collection, &baseline, "d2", "d1-c2"),
            CardOrigin::ModifiedLocally
        );

        let created = cards::create(&mut collection, &mut store, "d2", &CardFields::titled("New"))
            .unwrap()
            .affected_cards
            .remove(0);
        assert_eq!(
            origin(&collection, &baseline, "d2", &created.id),
            CardOrigin::LocalOnly
        );
    }

    #[test]
    fn edit_back_to_original_counts_as_baseline() {
        let baseline = baseline();
        let mut collection = Collection::new(baseline.clone());
        let mut store = InMemoryStore::new();
        let title = collection.decks[0].cards[0].title.clone();

        cards::edit(&mut collection, &mut store, "d1", "d1-c1", &CardFields::titled("x")).unwrap();
        cards::edit(&mut collection, &mut store, "d1", "d1-c1", &CardFields::titled(title)).unwrap();
        assert_eq!(origin(&collection, &baseline, "d1", "d1-c1"), CardOrigin::Baseline);
    }

    #[test]
    fn card_status_unknown_ids() {
        let collection = Collection::new(baseline());
        assert!(card_status(&collection, &[], "d9", "x").unwrap_err().is_not_found());
        assert!(card_status(&collection, &[], "d1", "x").unwrap_err().is_not_found());
    }

    #[test]
    fn status_counts_provenance() {
        let mut collection = Collection::new(baseline());
        let mut store = InMemoryStore::new();
        let before = run(&collection, &store, false).status.unwrap();
        assert_eq!(before.decks, 2);
        assert_eq!(before.baseline_cards, 2);
        assert_eq!(before.overlay_cards, 0);
        assert_eq!(before.last_saved, None);

        cards::create(&mut collection, &mut store, "d2", &CardFields::titled("New")).unwrap();
        let after = run(&collection, &store, true).status.unwrap();
        assert_eq!(after.cards, 3);
        assert_eq!(after.overlay_cards, 1);
        assert!(after.last_saved.is_some());
        assert!(after.unsaved);
    }
}
