// ============================================================
// Layer 6 — Config Store
// ============================================================
// Reads and writes QaConfig as pretty-printed JSON:
//
//   {
//     "max_seq_len": 384,
//     "vocab_path": "models/vocab.txt",
//     "max_answer_tokens": 30
//   }
//
// Every field is optional in the file. A config that would make
// encoding impossible (max_seq_len below 3) is rejected here, at
// startup, rather than on the first question.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::ask_use_case::QaConfig;

/// Default file name for the `config` subcommand.
pub const CONFIG_FILE: &str = "qa_config.json";

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and validate the config file.
    pub fn load(&self) -> Result<QaConfig> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read config '{}'", self.path.display()))?;
        let config: QaConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config JSON in '{}'", self.path.display()))?;
        config
            .validate()
            .with_context(|| format!("Rejected config '{}'", self.path.display()))?;

        tracing::info!("Loaded config from '{}'", self.path.display());
        Ok(config)
    }

    /// `load` when `path` is given, the defaults otherwise.
    pub fn load_or_default(path: Option<&std::path::Path>) -> Result<QaConfig> {
        match path {
            Some(p) => Self::new(p).load(),
            None    => Ok(QaConfig::default()),
        }
    }

    /// Write `config` as pretty JSON, creating parent directories.
    pub fn save(&self, config: &QaConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config '{}'", self.path.display()))?;

        tracing::info!("Saved config to '{}'", self.path.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join(CONFIG_FILE));
        let config = QaConfig {
            max_seq_len:       128,
            vocab_path:        Some("vocab.txt".into()),
            max_answer_tokens: Some(30),
        };

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "max_answer_tokens": 12 }"#).unwrap();

        let config = ConfigStore::new(&path).load().unwrap();
        assert_eq!(config.max_seq_len, QaConfig::default().max_seq_len);
        assert_eq!(config.vocab_path, None);
        assert_eq!(config.max_answer_tokens, Some(12));
    }

    #[test]
    fn test_too_short_sequence_is_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "max_seq_len": 2 }"#).unwrap();

        let err = ConfigStore::new(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains("Rejected config"), "{err:#}");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not json").unwrap();

        let err = ConfigStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid config JSON"));
    }

    #[test]
    fn test_no_path_gives_defaults() {
        assert_eq!(ConfigStore::load_or_default(None).unwrap(), QaConfig::default());
    }
}
