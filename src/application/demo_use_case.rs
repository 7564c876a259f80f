// ============================================================
// Layer 2 — Demo Use Case
// ============================================================
// Runs every suggested question of the chosen samples through
// an AskUseCase, one after the other, and collects the results
// in display order. Failures are kept per row so one bad
// question does not hide the rest.

use crate::application::ask_use_case::AskUseCase;
use crate::domain::{error::QaResult, sample::SampleQa};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoRow {
    pub title:    String,
    pub question: String,
    pub answer:   QaResult<String>,
}

pub struct DemoUseCase {
    engine: AskUseCase,
}

impl DemoUseCase {
    pub fn new(engine: AskUseCase) -> Self {
        Self { engine }
    }

    pub async fn run(&self, samples: &[SampleQa]) -> Vec<DemoRow> {
        let mut rows = Vec::new();
        for sample in samples {
            tracing::info!("Sample '{}': {} questions", sample.title, sample.sample_questions.len());
            for question in &sample.sample_questions {
                let answer = self.engine.answer(question, &sample.context).await;
                rows.push(DemoRow {
                    title:    sample.title.clone(),
                    question: question.clone(),
                    answer,
                });
            }
        }
        rows
    }
}
