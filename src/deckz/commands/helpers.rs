use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DeckzError, Result};
use crate::model::{Collection, Deck};
use crate::store::OverlayStore;
use tracing::{debug, warn};

pub fn find_deck<'a>(collection: &'a Collection, deck_id: &str) -> Result<&'a Deck> {
    collection
        .deck(deck_id)
        .ok_or_else(|| DeckzError::DeckNotFound(deck_id.to_string()))
}

pub fn find_deck_mut<'a>(collection: &'a mut Collection, deck_id: &str) -> Result<&'a mut Deck> {
    collection
        .deck_mut(deck_id)
        .ok_or_else(|| DeckzError::DeckNotFound(deck_id.to_string()))
}

/// Trimmed required text, or a validation error naming `field`.
pub fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DeckzError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(value.to_string())
}

/// Writes the full snapshot to the overlay.
///
/// A failed write does not undo the in-memory change: the result is marked
/// unsaved and carries a warning for the caller to surface.
pub fn persist<S: OverlayStore>(store: &mut S, collection: &Collection, result: &mut CmdResult) {
    let snapshot = collection.snapshot(None);
    match store.save(&snapshot) {
        Ok(()) => {
            debug!(decks = snapshot.decks.len(), "snapshot persisted");
            result.saved = Some(true);
        }
        Err(err) => {
            warn!(error = %err, "snapshot not persisted, keeping changes in memory");
            result.saved = Some(false);
            result.add_message(CmdMessage::warning(format!(
                "Changes kept in memory but not saved: {}",
                err
            )));
        }
    }
}
