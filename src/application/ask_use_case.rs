// ============================================================
// Layer 2 — Ask Use Case
// ============================================================
// The inference orchestrator. One `answer` call:
//
//   1. Rejects an empty question or context straight away
//   2. Publishes "processing" on the status channel
//   3. Moves the work onto a blocking worker thread:
//        model mode → encode, predict, decode the span
//        demo mode  → heuristic extractor
//   4. Publishes "idle" (plus the error, if any)
//   5. Hands the typed result back to the caller
//
// Whether a model is used is decided once, when the use case is
// built. A failing model call is reported as an error; it never
// quietly switches to the heuristic answerer.

use std::{fmt, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::data::tokenizer::{validate_max_length, Tokenizer, DEFAULT_MAX_SEQ_LEN};
use crate::domain::{
    error::{DecodeError, EncodeError, InferenceStage, QaError, QaResult},
    traits::ContextAnswerer,
    vocabulary::Vocabulary,
};
use crate::ml::{
    decoder::SpanDecoder,
    extractor::HeuristicExtractor,
    model::{ModelInput, SpanModel},
};

// ─── Configuration ───────────────────────────────────────────────────────────
// Saved as JSON by infra::config_store, overridable from the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Encoded sequence length handed to the model
    pub max_seq_len:       usize,
    /// BERT-style vocab.txt; the demo vocabulary is used when unset
    pub vocab_path:        Option<PathBuf>,
    /// Longest decoded answer in tokens; unbounded when unset
    pub max_answer_tokens: Option<usize>,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            max_seq_len:       DEFAULT_MAX_SEQ_LEN,
            vocab_path:        None,
            max_answer_tokens: None,
        }
    }
}

impl QaConfig {
    /// A sequence too short for the structural tokens is a
    /// configuration bug and is refused at startup.
    pub fn validate(&self) -> Result<(), EncodeError> {
        validate_max_length(self.max_seq_len)
    }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Observable engine state. Overlapping calls share it, last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStatus {
    pub processing: bool,
    pub last_error: Option<QaError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// Heuristic extraction, no model configured
    Demo,
    /// A SpanModel answers every question
    Model,
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineMode::Demo  => f.write_str("demo"),
            EngineMode::Model => f.write_str("model"),
        }
    }
}

// ─── AskUseCase ──────────────────────────────────────────────────────────────

/// Cheap to clone: every clone shares the same model and status.
#[derive(Clone)]
pub struct AskUseCase {
    tokenizer:   Tokenizer,
    max_seq_len: usize,
    decoder:     SpanDecoder,
    model:       Option<Arc<dyn SpanModel>>,
    answerer:    Arc<dyn ContextAnswerer>,
    status:      Arc<watch::Sender<EngineStatus>>,
}

impl AskUseCase {
    /// Build a demo-mode use case. Fails if the configured sequence
    /// length cannot hold the structural tokens.
    pub fn new(vocab: Arc<Vocabulary>, config: &QaConfig) -> QaResult<Self> {
        config.validate()?;
        let (status, _) = watch::channel(EngineStatus::default());

        tracing::debug!("Question answering ready, max_seq_len={}", config.max_seq_len);

        Ok(Self {
            tokenizer:   Tokenizer::with_max_length(vocab, config.max_seq_len)?,
            max_seq_len: config.max_seq_len,
            decoder:     SpanDecoder::new(config.max_answer_tokens),
            model:       None,
            answerer:    Arc::new(HeuristicExtractor::new()),
            status:      Arc::new(status),
        })
    }

    /// Switch to model mode. Model runtimes plug in here; none is
    /// bundled with the binary.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_model(mut self, model: Arc<dyn SpanModel>) -> Self {
        tracing::info!("QA model '{}' loaded, max_seq_len={}", model.name(), self.max_seq_len);
        self.model = Some(model);
        self
    }

    /// Replace the demo-mode answerer.
    #[cfg(test)]
    pub fn with_answerer(mut self, answerer: Arc<dyn ContextAnswerer>) -> Self {
        self.answerer = answerer;
        self
    }

    pub fn mode(&self) -> EngineMode {
        if self.model.is_some() { EngineMode::Model } else { EngineMode::Demo }
    }

    /// One-line description for display.
    pub fn status_line(&self) -> String {
        match &self.model {
            Some(model) => format!("Model Active ({})", model.name()),
            None        => "Demo Mode (Smart Extraction)".to_string(),
        }
    }

    /// Watch processing / last-error transitions.
    pub fn subscribe(&self) -> watch::Receiver<EngineStatus> {
        self.status.subscribe()
    }

    #[cfg(test)]
    pub fn current_status(&self) -> EngineStatus {
        self.status.borrow().clone()
    }

    /// Answer `question` from `context`.
    ///
    /// Empty input is rejected before anything else happens; text
    /// made only of whitespace is not empty and is answered. The
    /// rest of the work runs on a blocking worker so the caller's
    /// executor is never stalled by model inference.
    pub async fn answer(&self, question: &str, context: &str) -> QaResult<String> {
        if question.is_empty() || context.is_empty() {
            return Err(QaError::EmptyInput);
        }

        self.status.send_replace(EngineStatus { processing: true, last_error: None });

        let job      = self.clone();
        let question = question.to_owned();
        let context  = context.to_owned();
        let result = tokio::task::spawn_blocking(move || job.run(&question, &context))
            .await
            .unwrap_or_else(|e| Err(QaError::inference(InferenceStage::Execution, e)));

        if let Err(e) = &result {
            tracing::warn!("Question answering failed: {e}");
        }
        self.status.send_replace(EngineStatus {
            processing: false,
            last_error: result.as_ref().err().cloned(),
        });
        result
    }

    /// Callback form of [`answer`](Self::answer). Must be called from
    /// within a Tokio runtime.
    pub fn answer_with<F>(
        &self,
        question:    impl Into<String>,
        context:     impl Into<String>,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(QaResult<String>) + Send + 'static,
    {
        let this     = self.clone();
        let question = question.into();
        let context  = context.into();
        tokio::spawn(async move {
            let result = this.answer(&question, &context).await;
            on_complete(result);
        })
    }

    fn run(&self, question: &str, context: &str) -> QaResult<String> {
        match &self.model {
            Some(model) => self.infer(model.as_ref(), question, context),
            None        => Ok(self.answerer.extract(question, context)),
        }
    }

    fn infer(&self, model: &dyn SpanModel, question: &str, context: &str) -> QaResult<String> {
        let encoded = self
            .tokenizer
            .encode_pair(question, context, self.max_seq_len)
            .map_err(|e| QaError::inference(InferenceStage::Tokenization, e))?;

        let input = ModelInput::from(&encoded);
        tracing::debug!("Invoking model '{}' on {} positions", model.name(), input.seq_len());
        let output = model
            .predict(&input)
            .map_err(|e| QaError::inference(InferenceStage::Invocation, format!("{e:#}")))?;

        let (span, text) = self
            .decoder
            .decode_text(&output, &encoded, context)
            .map_err(|e| match e {
                DecodeError::NoAnswerFound => QaError::NoAnswerFound,
                other => QaError::inference(InferenceStage::Decoding, other),
            })?;

        let text = text.trim();
        if text.is_empty() {
            return Err(QaError::NoAnswerFound);
        }
        tracing::debug!(
            "Model span [{},{}] ({} tokens) score={:.4} answer='{}'",
            span.start, span.end, span.len(), span.score, text,
        );
        Ok(text.to_string())
    }
}
