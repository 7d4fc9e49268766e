//! # Storage Layer
//!
//! The overlay is the user's locally persisted layer over the read-only
//! baseline. It is a single JSON blob (`{ decks, lastModified }`) kept under one
//! fixed key, read once at startup and fully rewritten after every mutation.
//! The [`OverlayStore`] trait hides where that blob lives.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage
//!   - The blob is `overlay.json` in the data directory
//!   - Writes go to a temp file first and are renamed into place
//!
//! - [`memory::InMemoryStore`]: for tests
//!   - Keeps the serialized blob in memory
//!   - Can be told to reject writes, to exercise persistence failures
//!
//! ## Storage Format
//!
//! ```text
//! $DECKZ_HOME/
//! ├── overlay.json   # Full collection snapshot (local edits)
//! ├── vault.json     # Baseline dataset (read-only, optional)
//! └── config.json    # Configuration
//! ```

use crate::error::Result;
use crate::model::Snapshot;

pub mod fs;
pub mod memory;

/// Fixed key (file name) of the overlay blob.
pub const OVERLAY_KEY: &str = "overlay.json";

/// Abstract interface over the overlay blob.
pub trait OverlayStore {
    /// Read the saved overlay; `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the saved overlay with `snapshot`.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Remove the saved overlay entirely.
    fn clear(&mut self) -> Result<()>;
}
