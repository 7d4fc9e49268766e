use crate::commands::{CardHit, CmdMessage, CmdResult};
use crate::error::{DeckzError, Result};
use crate::model::{Card, CardFields, Collection};
use crate::store::OverlayStore;
use tracing::info;

use super::helpers::{find_deck, find_deck_mut, persist, required};

pub fn create<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    deck_id: &str,
    fields: &CardFields,
) -> Result<CmdResult> {
    let deck = find_deck_mut(collection, deck_id)?;
    required(&fields.title, "Card title")?;

    let card = Card::from_fields(fields, deck.cards.len());
    deck.cards.push(card.clone());
    info!(deck = %deck.id, card = %card.id, "card created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Card created: {}", card.title)));
    result.affected_cards.push(card);
    persist(store, collection, &mut result);
    Ok(result)
}

pub fn edit<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    deck_id: &str,
    card_id: &str,
    fields: &CardFields,
) -> Result<CmdResult> {
    let deck = find_deck_mut(collection, deck_id)?;
    let card = deck
        .card_mut(card_id)
        .ok_or_else(|| DeckzError::card_not_found(deck_id, card_id))?;
    required(&fields.title, "Card title")?;

    card.apply_fields(fields);
    let card = card.clone();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Card updated: {}", card.title)));
    result.affected_cards.push(card);
    persist(store, collection, &mut result);
    Ok(result)
}

pub fn delete<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    deck_id: &str,
    card_id: &str,
) -> Result<CmdResult> {
    let deck = find_deck_mut(collection, deck_id)?;
    let pos = deck
        .card_position(card_id)
        .ok_or_else(|| DeckzError::card_not_found(deck_id, card_id))?;
    let card = deck.cards.remove(pos);
    info!(deck = %deck_id, card = %card.id, "card deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Card deleted: {}", card.title)));
    result.affected_cards.push(card);
    persist(store, collection, &mut result);
    Ok(result)
}

pub fn show(collection: &Collection, deck_id: &str, card_id: &str) -> Result<CmdResult> {
    let deck = find_deck(collection, deck_id)?;
    let card = deck
        .card(card_id)
        .ok_or_else(|| DeckzError::card_not_found(deck_id, card_id))?;
    Ok(CmdResult::default().with_listed_cards(vec![CardHit::new(deck, card)]))
}

/// Looks a card up by id alone, wherever it lives.
pub fn find(collection: &Collection, card_id: &str) -> Result<CmdResult> {
    collection
        .cards()
        .find(|(_, card)| card.id == card_id)
        .map(|(deck, card)| CmdResult::default().with_listed_cards(vec![CardHit::new(deck, card)]))
        .ok_or_else(|| DeckzError::card_not_found("*", card_id))
}
