use crate::commands::{CmdMessage, CmdResult};
use crate::config::CodedropConfig;
use crate::error::{CodedropError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    // An invalid file is what startup ignores too; `set` writes a valid one back.
    let mut config = match CodedropConfig::load(config_dir) {
        Ok(config) => config,
        Err(CodedropError::Config(reason)) => {
            result.add_message(CmdMessage::warning(format!(
                "Ignoring invalid configuration ({}); showing defaults.",
                reason
            )));
            CodedropConfig::default()
        }
        Err(e) => return Err(e),
    };

    match action {
        ConfigAction::ShowAll => {}
        ConfigAction::ShowKey(key) => {
            let value = config.get(&key)?;
            result.add_message(CmdMessage::info(format!("{} = {}", key, value)));
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(config_dir)?;
            result.add_message(CmdMessage::success(format!("{} set to {}", key, value)));
            if key == "mapping-file" {
                result.add_message(CmdMessage::info(
                    "The new mapping file is written on next start; codes are rebuilt from the upload directory.",
                ));
            }
        }
    }

    Ok(result.with_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn set_then_show() {
        let dir = tempdir().unwrap();
        run(
            dir.path(),
            ConfigAction::Set("mapping-file".into(), "codes.json".into()),
        )
        .unwrap();

        let result = run(dir.path(), ConfigAction::ShowKey("mapping-file".into())).unwrap();
        assert_eq!(result.messages[0].content, "mapping-file = codes.json");
        assert_eq!(result.config.unwrap().mapping_file, "codes.json");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            run(dir.path(), ConfigAction::ShowKey("nope".into())),
            Err(CodedropError::Config(_))
        ));
    }

    #[test]
    fn show_all_returns_defaults() {
        let dir = tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config.unwrap(), CodedropConfig::default());
    }

    #[test]
    fn set_rejects_upload_names() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            run(
                dir.path(),
                ConfigAction::Set("mapping-file".into(), "4641.pdf".into()),
            ),
            Err(CodedropError::Config(_))
        ));
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn invalid_stored_value_can_be_repaired() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"mapping-file": "../outside.json"}"#,
        )
        .unwrap();

        let shown = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(shown.messages[0].level, MessageLevel::Warning);
        assert_eq!(shown.config.unwrap(), CodedropConfig::default());

        run(
            dir.path(),
            ConfigAction::Set("mapping-file".into(), "codes.json".into()),
        )
        .unwrap();
        assert_eq!(
            CodedropConfig::load(dir.path()).unwrap().mapping_file,
            "codes.json"
        );
    }
}
