use crate::commands::{CmdMessage, CmdResult};
use crate::config::DeckzConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Reads or updates `config.json` in `data_dir`. Takes effect on the next open.
pub fn run(data_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = DeckzConfig::load(data_dir)?;
    let mut result = CmdResult::default();
    match action {
        ConfigAction::ShowAll => Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => {
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                result.add_message(CmdMessage::error(e));
                return Ok(result);
            }
            config.save(data_dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result.with_config(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::Layout;

    #[test]
    fn set_then_show_key() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("default-layout".into(), "ROW".into()),
        )
        .unwrap();
        assert_eq!(result.config.unwrap().default_layout, Layout::Row);
        assert_eq!(result.messages[0].content, "default-layout set to row");

        let result = run(dir.path(), ConfigAction::ShowKey("default-layout".into())).unwrap();
        assert_eq!(result.messages[0].content, "row");
    }

    #[test]
    fn show_all_returns_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(DeckzConfig::default()));
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn bad_input_is_reported_as_message() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowKey("colour".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);

        let result = run(
            dir.path(),
            ConfigAction::Set("default-layout".into(), "grid".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.config.is_none());
    }
}
