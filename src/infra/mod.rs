// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File persistence that does not belong to any business layer:
//
//   config_store.rs — QaConfig as JSON. Validated on load so a
//                     broken sequence length stops the program
//                     at startup.
//
//   vocab_store.rs  — Vocabularies as BERT-style vocab.txt, with
//                     the built-in demo vocabulary as fallback.
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// QaConfig loading and saving
pub mod config_store;

/// vocab.txt loading and saving
pub mod vocab_store;
