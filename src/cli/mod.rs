// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// Every command builds what it needs from the lower layers,
// runs it, and prints the result. No answering logic lives
// here.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::{fs, sync::Arc};
use tokio::sync::oneshot;

use commands::{AskArgs, Commands, ConfigArgs, ContextSource, DemoArgs, EncodeArgs, SamplesArgs, VocabArgs};

use crate::application::{
    ask_use_case::{AskUseCase, EngineMode, QaConfig},
    demo_use_case::DemoUseCase,
};
use crate::data::{
    samples::{builtin_samples, find_sample, random_sample, BuiltinSamples, JsonSampleFile},
    tokenizer::{tokenize_with_offsets, Tokenizer},
};
use crate::domain::{sample::SampleQa, traits::SampleSource, vocabulary::Vocabulary};
use crate::infra::{config_store::ConfigStore, vocab_store::VocabStore};
use crate::ml::{extractor::HeuristicExtractor, model::ModelInput};

#[derive(Parser, Debug)]
#[command(
    name = "bert_squad_qa",
    version = "0.1.0",
    about = "Extractive question answering over a passage, with a BERT-style encoder and a heuristic demo mode."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the subcommand.
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Ask(args)     => run_ask(args).await,
            Commands::Samples(args) => run_samples(args),
            Commands::Demo(args)    => run_demo(args).await,
            Commands::Encode(args)  => run_encode(args),
            Commands::Config(args)  => run_config(args),
            Commands::Vocab(args)   => run_vocab(args),
        }
    }
}

fn load_vocab(config: &QaConfig) -> Result<Arc<Vocabulary>> {
    Ok(Arc::new(VocabStore::load_or_demo(config.vocab_path.as_deref())?))
}

/// Build the engine and announce which mode it runs in.
fn build_engine(config: &QaConfig) -> Result<AskUseCase> {
    let engine = AskUseCase::new(load_vocab(config)?, config)?;
    if engine.mode() == EngineMode::Demo {
        tracing::warn!("Running in DEMO MODE: no QA model configured, answers come from heuristic extraction");
    }
    println!("{}", engine.status_line());
    Ok(engine)
}

fn read_context(source: &ContextSource) -> Result<String> {
    if let Some(context) = &source.context {
        return Ok(context.clone());
    }
    if let Some(path) = &source.context_file {
        return fs::read_to_string(path)
            .with_context(|| format!("Cannot read context file '{}'", path.display()));
    }
    let key = source.sample.as_deref().unwrap_or_default();
    find_sample(builtin_samples(), key)
        .map(|s| s.context.clone())
        .ok_or_else(|| anyhow!("No sample named '{key}' (see the `samples` command)"))
}

async fn run_ask(args: AskArgs) -> Result<()> {
    let config  = args.engine.resolve()?;
    let engine  = build_engine(&config)?;
    let context = read_context(&args.source)?;

    if args.explain {
        let x = HeuristicExtractor::new().explain(&args.question, &context);
        println!("Category: {}", x.category);
        if engine.mode() == EngineMode::Demo {
            println!("Strategy: {:?}", x.strategy);
        }
    }

    let mut status = engine.subscribe();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let s = status.borrow_and_update().clone();
            tracing::debug!("Engine status: processing={}, last_error={:?}", s.processing, s.last_error);
        }
    });

    let (tx, rx) = oneshot::channel();
    engine.answer_with(args.question, context, move |result| {
        let _ = tx.send(result);
    });
    let answer = rx.await.context("Answer task ended without a result")??;
    println!("\nAnswer: {answer}");
    Ok(())
}

fn run_samples(args: SamplesArgs) -> Result<()> {
    let source: Box<dyn SampleSource> = match &args.file {
        Some(path) => Box::new(JsonSampleFile::new(path)),
        None       => Box::new(BuiltinSamples),
    };
    let samples = source.load_all()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }
    for (i, sample) in samples.iter().enumerate() {
        println!("{}. {}", i + 1, sample.title);
        for question in &sample.sample_questions {
            println!("     - {question}");
        }
    }
    Ok(())
}

async fn run_demo(args: DemoArgs) -> Result<()> {
    let config = args.engine.resolve()?;
    let engine = build_engine(&config)?;

    let chosen: Vec<SampleQa> = if args.random {
        vec![random_sample().clone()]
    } else if let Some(key) = &args.sample {
        let sample = find_sample(builtin_samples(), key)
            .ok_or_else(|| anyhow!("No sample named '{key}' (see the `samples` command)"))?;
        vec![sample.clone()]
    } else {
        builtin_samples().to_vec()
    };

    let rows = DemoUseCase::new(engine).run(&chosen).await;
    let mut title = "";
    for row in &rows {
        if row.title != title {
            title = &row.title;
            println!("\n== {title} ==");
        }
        println!("Q: {}", row.question);
        match &row.answer {
            Ok(answer) => println!("A: {answer}"),
            Err(e)     => println!("Error: {e}"),
        }
    }
    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let config    = args.engine.resolve()?;
    let tokenizer = Tokenizer::with_max_length(load_vocab(&config)?, config.max_seq_len)?;
    let encoded   = tokenizer.encode_pair(&args.question, &args.context, config.max_seq_len)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ModelInput::from(&encoded))?);
        return Ok(());
    }

    let real   = encoded.real_len();
    let tokens = tokenizer.vocab().ids_to_tokens(&encoded.token_ids[..real]);
    println!("Tokens ({real} of {}): {}", encoded.len(), tokens.join(" "));
    println!("wordIDs:   {:?}", &encoded.token_ids[..real]);
    println!("wordTypes: {:?}", &encoded.segment_ids[..real]);
    println!("wordMask:  {:?}", &encoded.attention_mask[..real]);
    println!("Context starts at position {}", encoded.context_start);

    let kept = encoded.context_offsets.len();
    for token in tokenize_with_offsets(&args.context).iter().take(kept) {
        println!("  {:<16} [{}..{}]", token.text, token.start, token.end);
    }
    Ok(())
}

fn run_config(args: ConfigArgs) -> Result<()> {
    ConfigStore::new(&args.output).save(&QaConfig::default())?;
    println!("Default config written to {}", args.output.display());
    Ok(())
}

fn run_vocab(args: VocabArgs) -> Result<()> {
    let config = args.engine.resolve()?;
    let vocab  = load_vocab(&config)?;
    VocabStore::new(&args.output).save(&vocab)?;
    println!("{} tokens written to {}", vocab.len(), args.output.display());
    Ok(())
}
