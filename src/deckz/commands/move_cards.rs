use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DeckzError, Result};
use crate::model::Collection;
use crate::store::OverlayStore;
use tracing::{debug, info};

use super::helpers::{find_deck, persist};

/// Moves a card to the end of another deck, leaving its fields untouched.
///
/// Moving within the same deck is a no-op and does not write.
pub fn run<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    card_id: &str,
    from_deck_id: &str,
    to_deck_id: &str,
) -> Result<CmdResult> {
    if from_deck_id == to_deck_id {
        debug!(card = card_id, "move within the same deck ignored");
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("Card is already in that deck."));
        return Ok(result);
    }
    relocate(collection, store, card_id, from_deck_id, to_deck_id, Placement::End)
}

/// Moves a card to `position` in the target deck (clamped to its end).
///
/// Target ranks are reassigned to match the new order. When source and target
/// are the same deck the card is repositioned in place.
pub fn to_position<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    card_id: &str,
    from_deck_id: &str,
    to_deck_id: &str,
    position: usize,
) -> Result<CmdResult> {
    relocate(
        collection,
        store,
        card_id,
        from_deck_id,
        to_deck_id,
        Placement::At(position),
    )
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    End,
    At(usize),
}

fn relocate<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    card_id: &str,
    from_deck_id: &str,
    to_deck_id: &str,
    placement: Placement,
) -> Result<CmdResult> {
    let from_idx = collection
        .deck_position(from_deck_id)
        .ok_or_else(|| DeckzError::DeckNotFound(from_deck_id.to_string()))?;
    let to_idx = collection
        .deck_position(to_deck_id)
        .ok_or_else(|| DeckzError::DeckNotFound(to_deck_id.to_string()))?;
    let card_idx = find_deck(collection, from_deck_id)?
        .card_position(card_id)
        .ok_or_else(|| DeckzError::card_not_found(from_deck_id, card_id))?;

    let card = collection.decks[from_idx].cards.remove(card_idx);
    let target = &mut collection.decks[to_idx];
    match placement {
        Placement::End => target.cards.push(card.clone()),
        Placement::At(position) => {
            let position = position.min(target.cards.len());
            target.cards.insert(position, card.clone());
            for (rank, c) in target.cards.iter_mut().enumerate() {
                c.rank = rank;
            }
        }
    }
    info!(card = %card.id, from = from_deck_id, to = to_deck_id, "card moved");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Card moved: {} -> {}",
        card.title, collection.decks[to_idx].name
    )));
    if let Some(moved) = collection.decks[to_idx].card(card_id) {
        result.affected_cards.push(moved.clone());
    }
    result.affected_decks.push(collection.decks[from_idx].clone());
    if to_idx != from_idx {
        result.affected_decks.push(collection.decks[to_idx].clone());
    }
    persist(store, collection, &mut result);
    Ok(result)
}
