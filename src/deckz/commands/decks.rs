use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DeckzError, Result};
use crate::model::{Collection, Deck, Layout, Provenance};
use crate::normalize::non_blank;
use crate::store::OverlayStore;
use tracing::info;

use super::helpers::{find_deck_mut, persist, required};

pub fn create<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    name: &str,
    description: &str,
    layout: Layout,
) -> Result<CmdResult> {
    let name = required(name, "Deck name")?;

    let mut deck = Deck::new(name, non_blank(description));
    deck.layout = layout;
    deck.rank = collection.decks.len();
    collection.decks.push(deck.clone());
    info!(deck = %deck.id, "deck created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deck created: {}", deck.name)));
    result.affected_decks.push(deck);
    persist(store, collection, &mut result);
    Ok(result)
}

pub fn edit<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    deck_id: &str,
    name: &str,
    description: &str,
) -> Result<CmdResult> {
    let deck = find_deck_mut(collection, deck_id)?;
    let name = required(name, "Deck name")?;

    deck.name = name;
    deck.description = non_blank(description);
    deck.source = Provenance::Overlay;
    let deck = deck.clone();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deck updated: {}", deck.name)));
    result.affected_decks.push(deck);
    persist(store, collection, &mut result);
    Ok(result)
}

/// Removes a deck and every card in it. There is no undo at this layer.
pub fn delete<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    deck_id: &str,
) -> Result<CmdResult> {
    let pos = collection
        .deck_position(deck_id)
        .ok_or_else(|| DeckzError::DeckNotFound(deck_id.to_string()))?;
    let deck = collection.decks.remove(pos);
    info!(deck = %deck.id, cards = deck.cards.len(), "deck deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deck deleted: {} ({} cards)",
        deck.name,
        deck.cards.len()
    )));
    result.affected_decks.push(deck);
    persist(store, collection, &mut result);
    Ok(result)
}

pub fn toggle_layout<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    deck_id: &str,
) -> Result<CmdResult> {
    let deck = find_deck_mut(collection, deck_id)?;
    deck.layout = deck.layout.toggled();
    deck.source = Provenance::Overlay;
    let deck = deck.clone();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deck {} now uses {} layout",
        deck.name,
        deck.layout.as_str()
    )));
    result.affected_decks.push(deck);
    persist(store, collection, &mut result);
    Ok(result)
}

pub fn list(collection: &Collection) -> CmdResult {
    CmdResult::default().with_affected_decks(collection.decks.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::deck_with_cards;
    use crate::store::memory::InMemoryStore;

    fn setup() -> (Collection, InMemoryStore) {
        let collection = Collection::new(vec![
            deck_with_cards("d1", "Ideas", 2),
            deck_with_cards("d2", "Later", 3),
        ]);
        (collection, InMemoryStore::new())
    }

    #[test]
    fn create_appends_empty_deck() {
        let (mut collection, mut store) = setup();
        for (i, name) in ["A", "B b", "  C  "].iter().enumerate() {
            let before = collection.decks.len();
            let result = create(&mut collection, &mut store, name, "", Layout::Column).unwrap();
            assert_eq!(collection.decks.len(), before + 1);
            let deck = &result.affected_decks[0];
            assert!(deck.cards.is_empty());
            assert_eq!(deck.rank, before);
            assert_eq!(deck.layout, Layout::Column);
            assert_eq!(deck.name, name.trim());
            assert_eq!(store.saves(), i + 1);
        }
        assert_eq!(collection.decks.last().unwrap().name, "C");
    }

    #[test]
    fn create_rejects_blank_name() {
        let (mut collection, mut store) = setup();
        let err = create(&mut collection, &mut store, "   ", "desc", Layout::Column).unwrap_err();
        assert!(matches!(err, DeckzError::Validation(_)));
        assert_eq!(collection.decks.len(), 2);
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn edit_updates_in_place() {
        let (mut collection, mut store) = setup();
        edit(&mut collection, &mut store, "d2", "Someday", "  maybe ").unwrap();
        let deck = collection.deck("d2").unwrap();
        assert_eq!(deck.name, "Someday");
        assert_eq!(deck.description.as_deref(), Some("maybe"));
        assert_eq!(deck.cards.len(), 3);
        assert_eq!(collection.deck_position("d2"), Some(1));
    }

    #[test]
    fn edit_checks_existence_before_name() {
        let (mut collection, mut store) = setup();
        assert!(matches!(
            edit(&mut collection, &mut store, "nope", "", ""),
            Err(DeckzError::DeckNotFound(_))
        ));
        assert!(matches!(
            edit(&mut collection, &mut store, "d1", "", ""),
            Err(DeckzError::Validation(_))
        ));
        assert_eq!(collection.deck("d1").unwrap().name, "Ideas");
    }

    #[test]
    fn delete_removes_exactly_that_decks_cards() {
        let (mut collection, mut store) = setup();
        let other_cards: Vec<_> = collection.deck("d1").unwrap().cards.clone();

        delete(&mut collection, &mut store, "d2").unwrap();
        assert_eq!(collection.card_count(), 2);
        assert!(collection.deck("d2").is_none());
        assert_eq!(collection.deck("d1").unwrap().cards, other_cards);

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.decks.len(), 1);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let (mut collection, mut store) = setup();
        let err = delete(&mut collection, &mut store, "zzz").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(collection.decks.len(), 2);
    }

    #[test]
    fn toggle_flips_layout() {
        let (mut collection, mut store) = setup();
        toggle_layout(&mut collection, &mut store, "d1").unwrap();
        assert_eq!(collection.deck("d1").unwrap().layout, Layout::Row);
        toggle_layout(&mut collection, &mut store, "d1").unwrap();
        assert_eq!(collection.deck("d1").unwrap().layout, Layout::Column);
        assert!(toggle_layout(&mut collection, &mut store, "x").is_err());
    }
}
