// ============================================================
// Layer 3 — Sample Domain Type
// ============================================================
// A ready-made context passage with a few questions that work
// well against it. Samples are read-only: loaded once at
// startup and only ever borrowed afterwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleQa {
    /// Short display name, e.g. "Apple Inc."
    pub title: String,

    /// The passage questions are answered against
    pub context: String,

    /// Suggested questions, in display order
    #[serde(default)]
    pub sample_questions: Vec<String>,
}

impl SampleQa {
    pub fn new(
        title:            impl Into<String>,
        context:          impl Into<String>,
        sample_questions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title:            title.into(),
            context:          context.into(),
            sample_questions: sample_questions.into_iter().map(Into::into).collect(),
        }
    }
}
