// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits that define the core
// concepts of the system: what a vocabulary is, what kind of
// question was asked, what an answer span looks like, and
// which errors a caller can receive.
//
// Rules for this layer:
//   - NO file I/O
//   - NO async runtime types
//   - NO regex or model code
//
// Everything here is cheap to construct in a unit test.

// Token <-> id mapping with the five reserved special tokens
pub mod vocabulary;

// Question categories (what / when / where / ...) and the classifier
pub mod question;

// Token-level answer span produced by the output decoder
pub mod answer;

// Sample (title, context, suggested questions) records
pub mod sample;

// Typed error taxonomy returned across the async boundary
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
