// ============================================================
// Layer 4 — Sentence Segmenter
// ============================================================
// Cuts a context passage into sentences for the heuristic
// extractor. The rule is deliberately naive: every `.`, `!` and
// `?` ends a sentence, so "Apple Inc. is in Cupertino." yields
// two sentences, "Apple Inc" and "is in Cupertino". Decimal
// points split too: "2.3 billion" becomes "2" and "3 billion".

/// Sentence terminators
const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split `context` into trimmed, non-empty sentences in source order.
pub fn split_sentences(context: &str) -> Vec<&str> {
    context
        .split(TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
