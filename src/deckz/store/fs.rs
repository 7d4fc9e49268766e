use super::{OverlayStore, OVERLAY_KEY};
use crate::error::{DeckzError, Result};
use crate::model::Snapshot;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn overlay_path(&self) -> PathBuf {
        self.root.join(OVERLAY_KEY)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(DeckzError::Io)?;
        }
        Ok(())
    }
}

impl OverlayStore for FileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let path = self.overlay_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(DeckzError::Io)?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(DeckzError::Serialization)?;
        debug!(path = %path.display(), decks = snapshot.decks.len(), "overlay read");
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_dir()?;
        let path = self.overlay_path();
        let content =
            serde_json::to_string_pretty(snapshot).map_err(DeckzError::Serialization)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(DeckzError::Io)?;
        fs::rename(&tmp_path, &path).map_err(DeckzError::Io)?;
        debug!(path = %path.display(), "overlay written");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let path = self.overlay_path();
        if path.exists() {
            fs::remove_file(path).map_err(DeckzError::Io)?;
        }
        Ok(())
    }
}
