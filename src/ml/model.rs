// ============================================================
// Layer 5 — Model Tensor Contract
// ============================================================
// The boundary to an extractive QA model. The model itself is
// an external collaborator; this build only fixes the shapes
// and field names on both sides of the call:
//
//   input:   wordIDs    [L]  token ids
//            wordTypes  [L]  segment ids (0 question, 1 context)
//            wordMask   [L]  attention mask (1 real, 0 padding)
//
//   output:  startLogits [L]
//            endLogits   [L]
//
// Any runtime that satisfies `SpanModel` can be plugged into
// AskUseCase; without one the application runs in demo mode.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::tokenizer::EncodedSequence;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInput {
    #[serde(rename = "wordIDs")]
    pub word_ids: Vec<u32>,

    #[serde(rename = "wordTypes")]
    pub word_types: Vec<u32>,

    #[serde(rename = "wordMask")]
    pub word_mask: Vec<u32>,
}

impl ModelInput {
    pub fn seq_len(&self) -> usize {
        self.word_ids.len()
    }
}

impl From<&EncodedSequence> for ModelInput {
    fn from(encoded: &EncodedSequence) -> Self {
        Self {
            word_ids:   encoded.token_ids.clone(),
            word_types: encoded.segment_ids.clone(),
            word_mask:  encoded.attention_mask.clone(),
        }
    }
}

/// Built by a model runtime, never by this crate outside tests.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    #[serde(rename = "startLogits")]
    pub start_logits: Vec<f32>,

    #[serde(rename = "endLogits")]
    pub end_logits: Vec<f32>,
}

/// An extractive QA model: one score per position for being the
/// answer start, and one for being the answer end.
///
/// `predict` may be slow; the orchestrator only ever calls it
/// from a blocking worker thread.
pub trait SpanModel: Send + Sync {
    /// Human-readable name, shown in the engine status.
    fn name(&self) -> &str;

    fn predict(&self, input: &ModelInput) -> Result<ModelOutput>;
}
