use crate::commands::{CmdMessage, CmdResult, DeckDefaults};
use crate::error::Result;
use crate::model::Collection;
use crate::store::OverlayStore;
use tracing::info;

use super::helpers::persist;

/// Drops every local change and starts over with just the default deck.
///
/// The baseline is not consulted; it comes back on the next load.
pub fn run<S: OverlayStore>(
    collection: &mut Collection,
    store: &mut S,
    defaults: &DeckDefaults,
) -> Result<CmdResult> {
    store.clear()?;
    let removed = collection.decks.len();
    collection.decks.clear();
    defaults.ensure_nonempty(collection);
    info!(removed, "collection reset");

    let mut result = CmdResult::default().with_affected_decks(collection.decks.clone());
    result.add_message(CmdMessage::success("All data cleared"));
    persist(store, collection, &mut result);
    Ok(result)
}
