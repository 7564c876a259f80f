// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Loads and saves vocabularies in the BERT `vocab.txt` layout:
// one token per line, line order is id order.
//
// The special tokens always keep ids 0..=4 ([PAD], [UNK], [CLS],
// [SEP], [MASK]), so a downloaded vocab.txt whose specials sit
// elsewhere is renumbered on load. Blank lines at the end of the
// file are ignored; blank lines in the middle are not tokens
// either and are skipped.
//
// A stock BERT vocab.txt puts [PAD] at 0 and [UNK], [CLS], [SEP],
// [MASK] at 100..=103. Renumbering moves those four and every
// [unusedN] row between them, so the loaded ids no longer line up
// with the embedding table of a model trained on that file. Rows
// after [MASK] keep their line number.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::vocabulary::Vocabulary;

pub struct VocabStore {
    path: PathBuf,
}

impl VocabStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read a vocab.txt. Ids follow line order except that the
    /// specials are forced to 0..=4, which breaks alignment with
    /// pretrained weights when the file places them elsewhere.
    pub fn load(&self) -> Result<Vocabulary> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read vocabulary '{}'", self.path.display()))?;

        let vocab = Vocabulary::from_tokens(
            raw.lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| !line.trim().is_empty()),
        );

        tracing::info!("Loaded vocabulary from '{}' ({} tokens)", self.path.display(), vocab.len());
        Ok(vocab)
    }

    /// Write one token per line in id order.
    pub fn save(&self, vocab: &Vocabulary) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let mut out = String::new();
        for (_, token) in vocab.iter() {
            out.push_str(token);
            out.push('\n');
        }
        fs::write(&self.path, out)
            .with_context(|| format!("Cannot write vocabulary '{}'", self.path.display()))?;

        tracing::info!("Saved {} tokens to '{}'", vocab.len(), self.path.display());
        Ok(())
    }

    /// The vocabulary at `path`, or the built-in demo vocabulary.
    pub fn load_or_demo(path: Option<&Path>) -> Result<Vocabulary> {
        match path {
            Some(p) => Self::new(p).load(),
            None => {
                let vocab = Vocabulary::demo();
                tracing::info!("Using built-in demo vocabulary ({} tokens)", vocab.len());
                Ok(vocab)
            }
        }
    }
}
