// ============================================================
// Layer 5 — Heuristic Extractor
// ============================================================
// Rule-based answerer used in demo mode, when no QA model is
// configured. It never fails: if nothing matches, it falls back
// to the start of the first sentence, and if the context has no
// sentences at all it returns a fixed "not found" message.
//
// Pipeline:
//   1. Classify the question by its leading word
//   2. Split the context into sentences
//   3. Run the strategy for that category:
//        what / generic → sentence with the most question keywords
//        when           → first date, with a few words around it
//        where          → words after a location keyword
//        who            → first run of capitalised words
//        how many       → first number, with an optional scale word
//        which          → first sentence (no dedicated strategy)
//   4. Fall back to the first sentence when the strategy finds
//      nothing
//
// All patterns are compiled once per process.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::{sentences::split_sentences, tokenizer::is_punctuation};
use crate::domain::{question::QuestionCategory, traits::ContextAnswerer};

/// Longest answer produced from a whole sentence, in words
const SHORT_PHRASE_WORDS: usize = 15;

/// Words kept on each side of a matched date
const DATE_WINDOW: usize = 3;

/// Words kept after a location keyword
const LOCATION_WORDS: usize = 5;

const STOP_WORDS: [&str; 21] = [
    "what", "when", "where", "who", "which", "how", "is", "are", "was", "were",
    "the", "a", "an", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Checked in order; the first keyword found in a sentence wins.
const LOCATION_KEYWORDS: [&str; 6] = ["in ", "at ", "from ", "headquartered", "located", "based"];

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d{4}\b|\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b|\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
    )
    .expect("date pattern is valid")
});

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").expect("name pattern is valid")
});

static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:,\d{3})*(?:\.\d+)?\s*(?:million|billion|thousand|hundred)?\b")
        .expect("quantity pattern is valid")
});

static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    LOCATION_KEYWORDS
        .iter()
        .map(|kw| {
            Regex::new(&format!("(?i){}", regex::escape(kw)))
                .expect("escaped keyword is a valid pattern")
        })
        .collect()
});

/// How an answer was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The category's own strategy found the answer.
    Matched,
    /// Nothing matched; the first sentence (or a not-found
    /// message) was returned instead.
    Fallback,
}

/// An answer together with how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub category: QuestionCategory,
    pub strategy: Strategy,
    pub answer:   String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract an answer and report which rule produced it.
    pub fn explain(&self, question: &str, context: &str) -> Extraction {
        let category  = QuestionCategory::classify(question);
        let sentences = split_sentences(context);

        let matched = match category {
            QuestionCategory::What | QuestionCategory::Generic => {
                best_keyword_sentence(question, &sentences).map(short_phrase)
            }
            QuestionCategory::When    => find_date(&sentences),
            QuestionCategory::Where   => find_location(&sentences),
            QuestionCategory::Who     => find_pattern(&NAME_PATTERN, &sentences),
            QuestionCategory::HowMany => find_pattern(&QUANTITY_PATTERN, &sentences),
            QuestionCategory::Which   => None,
        }
        // an empty cut (e.g. "based" at the end of a sentence) is no match
        .filter(|answer| !answer.trim().is_empty());

        let extraction = match matched {
            Some(answer) => Extraction { category, strategy: Strategy::Matched, answer },
            None => Extraction {
                category,
                strategy: Strategy::Fallback,
                answer: sentences
                    .first()
                    .map(|s| short_phrase(s))
                    .unwrap_or_else(|| category.not_found_message().to_string()),
            },
        };

        tracing::debug!(
            "Heuristic answer: category={} strategy={:?} answer='{}'",
            extraction.category,
            extraction.strategy,
            extraction.answer,
        );
        extraction
    }
}

impl ContextAnswerer for HeuristicExtractor {
    fn extract(&self, question: &str, context: &str) -> String {
        self.explain(question, context).answer
    }
}

// ─── Strategies ───────────────────────────────────────────────────────────────

/// Question words worth searching for: lower-cased, edge punctuation
/// trimmed, stop words and words of two characters or fewer dropped.
fn keywords(question: &str) -> Vec<String> {
    question
        .split_whitespace()
        .map(|w| w.trim_matches(is_punctuation).to_lowercase())
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Sentence containing the most keywords as substrings. Ties keep
/// the earlier sentence; `None` when no sentence contains any.
fn best_keyword_sentence<'a>(question: &str, sentences: &[&'a str]) -> Option<&'a str> {
    let keywords = keywords(question);
    let mut best: Option<&str> = None;
    let mut best_score = 0usize;

    for &sentence in sentences {
        let lower = sentence.to_lowercase();
        let score = keywords.iter().filter(|k| lower.contains(k.as_str())).count();
        if score > best_score {
            best_score = score;
            best = Some(sentence);
        }
    }
    best
}

/// First date in the context, widened to the surrounding words of
/// its sentence when the date sits inside a single word.
fn find_date(sentences: &[&str]) -> Option<String> {
    sentences.iter().find_map(|sentence| {
        let date  = DATE_PATTERN.find(sentence)?.as_str();
        let needle = date.to_lowercase();
        let words: Vec<&str> = sentence.split_whitespace().collect();

        let window = words
            .iter()
            .position(|w| w.to_lowercase().contains(&needle))
            .map(|i| {
                let start = i.saturating_sub(DATE_WINDOW);
                let end   = (i + DATE_WINDOW + 1).min(words.len());
                words[start..end].join(" ")
            });
        Some(window.unwrap_or_else(|| date.to_string()))
    })
}

/// A few words following the first location keyword, cut at the
/// first `.`, `,`, `;` or `:`.
fn find_location(sentences: &[&str]) -> Option<String> {
    sentences.iter().find_map(|sentence| {
        let hit = LOCATION_PATTERNS.iter().find_map(|re| re.find(sentence))?;
        let after = &sentence[hit.end()..];
        let location = after
            .split_whitespace()
            .take(LOCATION_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
        let cut = location
            .split(['.', ',', ';', ':'])
            .next()
            .unwrap_or_default();
        Some(cut.to_string())
    })
}

/// First match of `pattern` in any sentence. The optional scale
/// word in the quantity pattern can leave trailing whitespace
/// behind ("1,250,000 dollars"), so the match is trimmed.
fn find_pattern(pattern: &Regex, sentences: &[&str]) -> Option<String> {
    sentences
        .iter()
        .find_map(|sentence| pattern.find(sentence))
        .map(|m| m.as_str().trim().to_string())
}

/// At most the first fifteen words, single-spaced.
fn short_phrase(text: &str) -> String {
    text.split_whitespace()
        .take(SHORT_PHRASE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}
