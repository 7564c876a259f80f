// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw text and model-ready arrays:
//
//   context text ──► split_sentences ──► heuristic extractor
//
//   (question, context) ──► tokenize ──► Tokenizer::encode_pair
//                                           │
//                                           ▼
//                                    EncodedSequence
//                                    (ids, segments, mask)
//
// plus the read-only sample passages used by the CLI.

/// Word/punctuation tokenizer and fixed-length pair encoder
pub mod tokenizer;

/// Splits a context into sentences
pub mod sentences;

/// Built-in and JSON-file sample passages
pub mod samples;
