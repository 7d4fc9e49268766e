//! Full-state backup and restore.
//!
//! A backup is the overlay blob with a schema `version` added. Restore accepts
//! either a backup or a plain overlay blob and replaces the whole collection.

use crate::commands::{CmdMessage, CmdResult, DeckDefaults};
use crate::error::{DeckzError, Result};
use crate::model::{Collection, Provenance, Snapshot, BACKUP_VERSION};
use crate::normalize::clean_hashtags;
use crate::store::OverlayStore;
use std::collections::HashSet;
use tracing::info;

use super::helpers::persist;

pub fn backup(collection: &Collection) -> Result<CmdResult> {
    let snapshot = collection.snapshot(Some(BACKUP_VERSION));
    let json = serde_json::to_string_pretty(&snapshot)?;
    let mut result = CmdResult::default().with_output(json);
    result.add_message(CmdMessage::success(format!(
        "Backed up {} decks, {} cards",
        collection.decks.len(),
        collection.card_count()
    )));
    Ok(result)
}

pub fn restore<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    json: &str,
    defaults: &DeckDefaults,
) -> Result<CmdResult> {
    let snapshot: Snapshot = serde_json::from_str(json)
        .map_err(|e| DeckzError::Validation(format!("not a deckz backup: {}", e)))?;
    check_ids(&snapshot)?;

    if let Some(version) = &snapshot.version {
        if version != BACKUP_VERSION {
            info!(version = %version, "restoring backup from another schema version");
        }
    }

    let mut decks = snapshot.decks;
    for deck in &mut decks {
        deck.mark_source(Provenance::Overlay);
        for card in &mut deck.cards {
            card.hashtags = clean_hashtags(&card.hashtags);
        }
    }
    collection.decks = decks;
    defaults.ensure_nonempty(collection);
    info!(
        decks = collection.decks.len(),
        cards = collection.card_count(),
        "collection restored"
    );

    let mut result = CmdResult::default().with_affected_decks(collection.decks.clone());
    result.add_message(CmdMessage::success(format!(
        "Restored {} decks, {} cards",
        collection.decks.len(),
        collection.card_count()
    )));
    persist(store, collection, &mut result);
    Ok(result)
}

fn check_ids(snapshot: &Snapshot) -> Result<()> {
    let mut deck_ids = HashSet::new();
    for deck in &snapshot.decks {
        if !deck_ids.insert(deck.id.as_str()) {
            return Err(DeckzError::Validation(format!(
                "backup lists deck {} twice",
                deck.id
            )));
        }
        let mut card_ids = HashSet::new();
        if let Some(card) = deck.cards.iter().find(|c| !card_ids.insert(c.id.as_str())) {
            return Err(DeckzError::Validation(format!(
                "deck {} lists card {} twice",
                deck.id, card.id
            )));
        }
    }
    Ok(())
}
