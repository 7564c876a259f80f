// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and their flags:
//
//   ask      — answer one question against a context
//   samples  — list the sample passages
//   demo     — answer every suggested sample question
//   encode   — show the model input tensors for a pair
//   config   — write a default config file
//   vocab    — export the active vocabulary as vocab.txt
//
// The engine flags (--config, --vocab, --max-seq-len) are shared
// by every command that builds an encoder; flags override the
// values read from the config file.
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::ask_use_case::QaConfig;
use crate::infra::config_store::{ConfigStore, CONFIG_FILE};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a question about a passage of text
    Ask(AskArgs),

    /// List the sample passages and their suggested questions
    Samples(SamplesArgs),

    /// Answer every suggested question of the samples
    Demo(DemoArgs),

    /// Print the encoded model input for a question/context pair
    Encode(EncodeArgs),

    /// Write the default configuration as JSON
    Config(ConfigArgs),

    /// Export the active vocabulary as vocab.txt
    Vocab(VocabArgs),
}

/// Flags that shape the encoder and decoder.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// JSON config file (see the `config` command)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// BERT-style vocab.txt; the built-in demo vocabulary otherwise
    #[arg(long)]
    pub vocab: Option<PathBuf>,

    /// Encoded length: [CLS] question [SEP] context [SEP] + padding
    #[arg(long)]
    pub max_seq_len: Option<usize>,
}

impl EngineArgs {
    /// Config file values with the command line flags applied on top.
    pub fn resolve(&self) -> Result<QaConfig> {
        let mut config = ConfigStore::load_or_default(self.config.as_deref())?;
        if let Some(vocab) = &self.vocab {
            config.vocab_path = Some(vocab.clone());
        }
        if let Some(len) = self.max_seq_len {
            config.max_seq_len = len;
        }
        config.validate().context("Invalid --max-seq-len")?;
        Ok(config)
    }
}

/// Exactly one source for the passage
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ContextSource {
    /// The passage itself
    #[arg(long)]
    pub context: Option<String>,

    /// Read the passage from a text file
    #[arg(long)]
    pub context_file: Option<PathBuf>,

    /// Use a built-in sample, by number (1-based) or title
    #[arg(long)]
    pub sample: Option<String>,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The natural language question to answer
    #[arg(long)]
    pub question: String,

    #[command(flatten)]
    pub source: ContextSource,

    /// Also print the question category and how the answer was found
    #[arg(long)]
    pub explain: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args, Debug)]
pub struct SamplesArgs {
    /// Print the samples as JSON instead of a list
    #[arg(long)]
    pub json: bool,

    /// Read samples from a JSON file instead of the built-in set
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Only this sample, by number (1-based) or title
    #[arg(long, conflicts_with = "random")]
    pub sample: Option<String>,

    /// One randomly chosen sample
    #[arg(long)]
    pub random: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[arg(long)]
    pub question: String,

    #[arg(long)]
    pub context: String,

    /// Print the tensors as JSON (wordIDs / wordTypes / wordMask)
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, default_value = CONFIG_FILE)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct VocabArgs {
    #[arg(long, default_value = "vocab.txt")]
    pub output: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}
