//! Explicit reordering of decks and of the cards inside a deck.
//!
//! The id list is the complete new order: every existing id exactly once.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DeckzError, Result};
use crate::model::Collection;
use crate::store::OverlayStore;
use std::collections::HashSet;

use super::helpers::{find_deck_mut, persist};

pub fn reorder_cards<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    deck_id: &str,
    ordered_ids: &[String],
) -> Result<CmdResult> {
    let deck = find_deck_mut(collection, deck_id)?;
    if let Some(unknown) = ordered_ids.iter().find(|id| deck.card(id).is_none()) {
        return Err(DeckzError::card_not_found(deck_id, unknown));
    }
    check_complete(ordered_ids, deck.cards.len(), "card")?;

    let mut remaining = std::mem::take(&mut deck.cards);
    for (rank, id) in ordered_ids.iter().enumerate() {
        if let Some(pos) = remaining.iter().position(|c| &c.id == id) {
            let mut card = remaining.swap_remove(pos);
            card.rank = rank;
            deck.cards.push(card);
        }
    }
    let deck = deck.clone();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Reordered {} cards in {}",
        deck.cards.len(),
        deck.name
    )));
    result.affected_decks.push(deck);
    persist(store, collection, &mut result);
    Ok(result)
}

pub fn reorder_decks<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    ordered_ids: &[String],
) -> Result<CmdResult> {
    if let Some(unknown) = ordered_ids.iter().find(|id| collection.deck(id).is_none()) {
        return Err(DeckzError::DeckNotFound(unknown.clone()));
    }
    check_complete(ordered_ids, collection.decks.len(), "deck")?;

    let mut remaining = std::mem::take(&mut collection.decks);
    for (rank, id) in ordered_ids.iter().enumerate() {
        if let Some(pos) = remaining.iter().position(|d| &d.id == id) {
            let mut deck = remaining.swap_remove(pos);
            deck.rank = rank;
            collection.decks.push(deck);
        }
    }

    let mut result = CmdResult::default().with_affected_decks(collection.decks.clone());
    result.add_message(CmdMessage::success(format!(
        "Reordered {} decks",
        collection.decks.len()
    )));
    persist(store, collection, &mut result);
    Ok(result)
}

/// All ids known (checked by the caller); here: no repeats and none left out.
fn check_complete(ordered_ids: &[String], expected: usize, what: &str) -> Result<()> {
    let unique: HashSet<&String> = ordered_ids.iter().collect();
    if unique.len() != ordered_ids.len() {
        return Err(DeckzError::Validation(format!(
            "{} order lists the same id twice",
            what
        )));
    }
    if unique.len() != expected {
        return Err(DeckzError::Validation(format!(
            "{} order must list all {} {}s, got {}",
            what,
            expected,
            what,
            unique.len()
        )));
    }
    Ok(())
}
