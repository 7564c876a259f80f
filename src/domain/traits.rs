// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to these traits, so the
// concrete answerer and sample source can be swapped in tests:
//   - HeuristicExtractor implements ContextAnswerer
//   - BuiltinSamples and JsonSampleFile implement SampleSource
//
// The model boundary (SpanModel) lives in the ML layer because
// it is defined in terms of tensors.

use anyhow::Result;

use crate::domain::sample::SampleQa;

// ─── ContextAnswerer ──────────────────────────────────────────────────────────
/// Anything that can pick an answer out of a context without a model.
///
/// Implementations must always return a non-empty string; "nothing
/// found" is expressed as a literal message, never as an error.
pub trait ContextAnswerer: Send + Sync {
    fn extract(&self, question: &str, context: &str) -> String;
}

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can provide sample contexts and questions.
///
/// Implementations:
///   - BuiltinSamples → the fixed list compiled into the binary
///   - JsonSampleFile → a JSON array of samples on disk
pub trait SampleSource {
    fn load_all(&self) -> Result<Vec<SampleQa>>;
}
