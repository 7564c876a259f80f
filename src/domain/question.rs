// ============================================================
// Layer 3 — Question Category
// ============================================================
// Every question is routed to one extraction strategy by its
// leading word. The category is never stored; it is recomputed
// from the raw question on each request.
//
//   "How many iPhones have been sold?"  → HowMany
//   "Where is Apple headquartered?"     → Where
//   "Is Swift open-source?"             → Generic
//
// Matching is a plain prefix test on the lower-cased question,
// so "whatever" is a What question and "whom" is a Who question.
// Leading whitespace is not skipped: "  where" is Generic.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionCategory {
    What,
    When,
    Where,
    Who,
    HowMany,
    Which,
    Generic,
}

impl QuestionCategory {
    /// Every category, in classification priority order.
    #[cfg(test)]
    pub const ALL: [QuestionCategory; 7] = [
        QuestionCategory::HowMany,
        QuestionCategory::What,
        QuestionCategory::When,
        QuestionCategory::Where,
        QuestionCategory::Who,
        QuestionCategory::Which,
        QuestionCategory::Generic,
    ];

    /// Classify a question by its leading word(s).
    pub fn classify(question: &str) -> Self {
        let q = question.to_lowercase();

        if q.starts_with("how many") || q.starts_with("how much") {
            return QuestionCategory::HowMany;
        }

        const LEADING: [(&str, QuestionCategory); 5] = [
            ("what",  QuestionCategory::What),
            ("when",  QuestionCategory::When),
            ("where", QuestionCategory::Where),
            ("who",   QuestionCategory::Who),
            ("which", QuestionCategory::Which),
        ];

        LEADING
            .iter()
            .find(|(prefix, _)| q.starts_with(prefix))
            .map(|&(_, category)| category)
            .unwrap_or(QuestionCategory::Generic)
    }

    /// Literal returned when the context has no sentences at all.
    pub fn not_found_message(self) -> &'static str {
        match self {
            QuestionCategory::When    => "Date not found in context",
            QuestionCategory::Where   => "Location not found in context",
            QuestionCategory::Who     => "Person not found in context",
            QuestionCategory::HowMany => "Number not found in context",
            QuestionCategory::What
            | QuestionCategory::Which
            | QuestionCategory::Generic => "Answer not found in context",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionCategory::What    => "what",
            QuestionCategory::When    => "when",
            QuestionCategory::Where   => "where",
            QuestionCategory::Who     => "who",
            QuestionCategory::HowMany => "how-many",
            QuestionCategory::Which   => "which",
            QuestionCategory::Generic => "generic",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_sample_questions() {
        assert_eq!(QuestionCategory::classify("Where is Apple headquartered?"), QuestionCategory::Where);
        assert_eq!(QuestionCategory::classify("When was Apple founded?"), QuestionCategory::When);
        assert_eq!(QuestionCategory::classify("How many iPhones have been sold?"), QuestionCategory::HowMany);
    }

    #[test]
    fn test_classifies_every_leading_word() {
        let cases = [
            ("What is Core ML?", QuestionCategory::What),
            ("WHO founded Apple?", QuestionCategory::Who),
            ("Which Apple products use Core ML?", QuestionCategory::Which),
            ("how much revenue did Apple make?", QuestionCategory::HowMany),
            ("Is Swift open-source?", QuestionCategory::Generic),
            ("How does BERT work?", QuestionCategory::Generic),
            ("", QuestionCategory::Generic),
        ];
        for (question, expected) in cases {
            assert_eq!(QuestionCategory::classify(question), expected, "{question}");
        }
    }

    #[test]
    fn test_how_many_takes_priority_over_leading_words() {
        // "how" alone is generic, "how many" is not
        assert_eq!(QuestionCategory::classify("how many"), QuestionCategory::HowMany);
        assert_eq!(QuestionCategory::classify("how"), QuestionCategory::Generic);
    }

    #[test]
    fn test_prefix_match_is_not_word_aware() {
        assert_eq!(QuestionCategory::classify("Whatever happened?"), QuestionCategory::What);
        assert_eq!(QuestionCategory::classify("Whom did they hire?"), QuestionCategory::Who);
    }

    #[test]
    fn test_leading_whitespace_is_not_skipped() {
        assert_eq!(QuestionCategory::classify("  Where is it?"), QuestionCategory::Generic);
        assert_eq!(QuestionCategory::classify("\tHow many?"), QuestionCategory::Generic);
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(QuestionCategory::When.not_found_message(), "Date not found in context");
        assert_eq!(QuestionCategory::Which.not_found_message(), "Answer not found in context");
        for category in QuestionCategory::ALL {
            assert!(!category.not_found_message().is_empty());
        }
    }
}
