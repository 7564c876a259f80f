// ============================================================
// Layer 3 — AnswerSpan Domain Type
// ============================================================
// Extractive QA never generates text: the model points at a
// contiguous run of context tokens and the answer is whatever
// text those tokens cover.
//
// Example:
//   [CLS] where is apple headquartered ? [SEP] apple inc . is headquartered in cupertino ...
//     0     1    2    3         4        5   6    7    8  9  10   11          12  13
//   start = 13, end = 13 → "Cupertino"
//
// A span lives for one inference call: the decoder produces it,
// the orchestrator turns it into text, and it is dropped.

/// Token positions (inclusive) into the encoded
/// `[CLS] question [SEP] context [SEP]` sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerSpan {
    pub start: usize,
    pub end:   usize,
    /// `start_logit[start] + end_logit[end]`
    pub score: f32,
}

impl AnswerSpan {
    pub fn new(start: usize, end: usize, score: f32) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end, score }
    }

    /// Number of tokens covered by the span
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}
