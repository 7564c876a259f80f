// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to answer questions.
//
// Rules for this layer:
//   - No span search or extraction rules here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
//   ask_use_case.rs  — One question against one context, either
//                      through a configured model or the
//                      heuristic extractor, with a busy/error
//                      status observers can subscribe to.
//
//   demo_use_case.rs — Runs every suggested question of a set
//                      of samples through the ask workflow.

/// Question answering workflow and engine status
pub mod ask_use_case;

/// Batch run over the sample questions
pub mod demo_use_case;
