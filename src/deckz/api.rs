//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for all deckz operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! `DeckzApi` is the explicit collection instance. It owns:
//! - the live [`Collection`]
//! - the overlay store it persists to
//! - the baseline as it was loaded, for provenance lookups
//! - the defaults used whenever the collection would become empty
//!
//! Each method dispatches to a command function and records whether the last
//! write reached the store. Business logic stays in `commands/*.rs`; nothing
//! here prints or touches the terminal.
//!
//! ## Generic Over OverlayStore
//!
//! - Production: `DeckzApi<FileStore>`
//! - Testing: `DeckzApi<InMemoryStore>`

use crate::commands::{self, CmdResult, DeckDefaults};
use crate::config::DeckzConfig;
use crate::error::Result;
use crate::loader::{self, LoadOptions, LoadedCollection};
use crate::model::{CardFields, Collection, Deck};
use crate::store::OverlayStore;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct DeckzApi<S: OverlayStore> {
    store: S,
    collection: Collection,
    baseline: Vec<Deck>,
    defaults: DeckDefaults,
    data_dir: PathBuf,
    unsaved: bool,
}

impl<S: OverlayStore> DeckzApi<S> {
    /// Loads baseline and overlay and builds the live collection.
    ///
    /// Never fails: unreadable sources are skipped and an empty result gets the
    /// default deck, which is persisted right away.
    pub fn open(store: S, data_dir: impl Into<PathBuf>, config: &DeckzConfig) -> Self {
        let data_dir = data_dir.into();
        let baseline_path = config.resolve_baseline_path(&data_dir);
        let loaded = loader::load_collection(
            &store,
            LoadOptions {
                baseline_path: Some(baseline_path.as_path()),
                default_deck_name: &config.default_deck_name,
                default_layout: config.default_layout,
            },
        );
        Self::from_loaded(store, loaded, data_dir, DeckDefaults::from(config))
    }

    pub fn from_loaded(
        store: S,
        loaded: LoadedCollection,
        data_dir: PathBuf,
        defaults: DeckDefaults,
    ) -> Self {
        let mut api = Self {
            store,
            collection: loaded.collection,
            baseline: loaded.baseline,
            defaults,
            data_dir,
            unsaved: false,
        };
        if loaded.created_default {
            let mut result = CmdResult::default();
            commands::helpers::persist(&mut api.store, &api.collection, &mut result);
            api.track(result);
        }
        api
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// True when the last write to the overlay failed.
    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    /// Writes the current collection again, e.g. after a failed save.
    pub fn save(&mut self) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        commands::helpers::persist(&mut self.store, &self.collection, &mut result);
        if result.saved == Some(true) {
            result.add_message(commands::CmdMessage::success("Collection saved"));
        }
        Ok(self.track(result))
    }

    // --- decks ---

    pub fn create_deck(&mut self, name: &str, description: &str) -> Result<CmdResult> {
        let layout = self.defaults.layout;
        let result =
            commands::decks::create(&mut self.collection, &mut self.store, name, description, layout)?;
        Ok(self.track(result))
    }

    pub fn edit_deck(&mut self, deck_id: &str, name: &str, description: &str) -> Result<CmdResult> {
        let result =
            commands::decks::edit(&mut self.collection, &mut self.store, deck_id, name, description)?;
        Ok(self.track(result))
    }

    pub fn delete_deck(&mut self, deck_id: &str) -> Result<CmdResult> {
        let result = commands::decks::delete(&mut self.collection, &mut self.store, deck_id)?;
        Ok(self.track(result))
    }

    pub fn toggle_deck_layout(&mut self, deck_id: &str) -> Result<CmdResult> {
        let result = commands::decks::toggle_layout(&mut self.collection, &mut self.store, deck_id)?;
        Ok(self.track(result))
    }

    pub fn reorder_decks<I: AsRef<str>>(&mut self, ordered_ids: &[I]) -> Result<CmdResult> {
        let ids = owned_ids(ordered_ids);
        let result = commands::ordering::reorder_decks(&mut self.collection, &mut self.store, &ids)?;
        Ok(self.track(result))
    }

    pub fn list_decks(&self) -> CmdResult {
        commands::decks::list(&self.collection)
    }

    // --- cards ---

    pub fn create_card(&mut self, deck_id: &str, fields: &CardFields) -> Result<CmdResult> {
        let result = commands::cards::create(&mut self.collection, &mut self.store, deck_id, fields)?;
        Ok(self.track(result))
    }

    pub fn edit_card(
        &mut self,
        deck_id: &str,
        card_id: &str,
        fields: &CardFields,
    ) -> Result<CmdResult> {
        let result =
            commands::cards::edit(&mut self.collection, &mut self.store, deck_id, card_id, fields)?;
        Ok(self.track(result))
    }

    pub fn delete_card(&mut self, deck_id: &str, card_id: &str) -> Result<CmdResult> {
        let result =
            commands::cards::delete(&mut self.collection, &mut self.store, deck_id, card_id)?;
        Ok(self.track(result))
    }

    pub fn move_card(&mut self, card_id: &str, from_deck: &str, to_deck: &str) -> Result<CmdResult> {
        let result = commands::move_cards::run(
            &mut self.collection,
            &mut self.store,
            card_id,
            from_deck,
            to_deck,
        )?;
        Ok(self.track(result))
    }

    pub fn move_card_to_position(
        &mut self,
        card_id: &str,
        from_deck: &str,
        to_deck: &str,
        position: usize,
    ) -> Result<CmdResult> {
        let result = commands::move_cards::to_position(
            &mut self.collection,
            &mut self.store,
            card_id,
            from_deck,
            to_deck,
            position,
        )?;
        Ok(self.track(result))
    }

    pub fn reorder_cards<I: AsRef<str>>(
        &mut self,
        deck_id: &str,
        ordered_ids: &[I],
    ) -> Result<CmdResult> {
        let ids = owned_ids(ordered_ids);
        let result =
            commands::ordering::reorder_cards(&mut self.collection, &mut self.store, deck_id, &ids)?;
        Ok(self.track(result))
    }

    pub fn show_card(&self, deck_id: &str, card_id: &str) -> Result<CmdResult> {
        commands::cards::show(&self.collection, deck_id, card_id)
    }

    pub fn find_card(&self, card_id: &str) -> Result<CmdResult> {
        commands::cards::find(&self.collection, card_id)
    }

    pub fn card_status(&self, deck_id: &str, card_id: &str) -> Result<CmdResult> {
        commands::status::card_status(&self.collection, &self.baseline, deck_id, card_id)
    }

    // --- queries ---

    pub fn filter_cards(&self, filter: &CardFilter) -> CmdResult {
        commands::filter::run(&self.collection, filter)
    }

    pub fn list_categories(&self) -> CmdResult {
        commands::filter::categories(&self.collection)
    }

    pub fn list_hashtags(&self) -> CmdResult {
        commands::filter::hashtags(&self.collection)
    }

    pub fn status(&self) -> CmdResult {
        commands::status::run(&self.collection, &self.store, self.unsaved)
    }

    // --- whole collection ---

    pub fn export_csv(&self) -> Result<CmdResult> {
        commands::export::run(&self.collection)
    }

    pub fn import_csv<R: Read>(&mut self, input: R) -> Result<CmdResult> {
        let layout = self.defaults.layout;
        let result =
            commands::import::run(&mut self.collection, &mut self.store, input, layout)?;
        Ok(self.track(result))
    }

    pub fn backup(&self) -> Result<CmdResult> {
        commands::backup::backup(&self.collection)
    }

    pub fn restore_backup(&mut self, json: &str) -> Result<CmdResult> {
        let result =
            commands::backup::restore(&mut self.collection, &mut self.store, json, &self.defaults)?;
        Ok(self.track(result))
    }

    pub fn reset(&mut self) -> Result<CmdResult> {
        let result = commands::reset::run(&mut self.collection, &mut self.store, &self.defaults)?;
        Ok(self.track(result))
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    fn track(&mut self, result: CmdResult) -> CmdResult {
        if let Some(saved) = result.saved {
            if self.unsaved != !saved {
                debug!(unsaved = !saved, "save state changed");
            }
            self.unsaved = !saved;
        }
        result
    }
}

fn owned_ids<I: AsRef<str>>(ids: &[I]) -> Vec<String> {
    ids.iter().map(|id| id.as_ref().to_string()).collect()
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::filter::CardFilter;
pub use crate::commands::{CardOrigin, CmdMessage, MessageLevel};
