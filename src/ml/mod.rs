// ============================================================
// Layer 5 — ML Layer
// ============================================================
// Everything that produces an answer from prepared input.
//
//   model.rs     — The tensor contract for a real QA model:
//                  ModelInput (wordIDs / wordTypes / wordMask),
//                  ModelOutput (startLogits / endLogits), and
//                  the SpanModel trait a runtime must implement.
//
//   decoder.rs   — Picks the best (start, end) context span
//                  from the model's logits and maps it back to
//                  the original context text.
//
//   extractor.rs — The rule-based answerer used in demo mode
//                  when no model is configured.
//
// No model ships with this build; the model path is exercised
// by tests with small fake models.

/// Tensor contract and the SpanModel trait
pub mod model;

/// Start/end logits → context span
pub mod decoder;

/// Keyword and pattern based fallback answerer
pub mod extractor;
