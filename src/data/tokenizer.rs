// ============================================================
// Layer 4 — Tokenizer and Pair Encoder
// ============================================================
// Wraps a HuggingFace `tokenizers` pipeline built over the
// shared Vocabulary:
//
//   normalizer     Lowercase
//   pre-tokenizer  BertPreTokenizer (whitespace splits and is
//                  dropped, each punctuation char is a token)
//   model          WordLevel, unknown words → [UNK]
//   post-process   [CLS] $A [SEP] $B:1 [SEP]:1
//   truncation     OnlySecond (the question is never cut)
//   padding        Fixed(max_length) with [PAD]
//
// which lays a (question, context) pair out as the three
// fixed-length arrays a BERT-style QA model expects:
//
//   position:   0     1..q     q+1    q+2..      last   ..max
//   token:     [CLS]  q-toks  [SEP]   c-toks    [SEP]   [PAD]...
//   segment:    0      0       0       1          1       0
//   mask:       1      1       1       1          1       0
//
// There is no WordPiece subword splitting: every delimited word
// is looked up whole.

use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;
use tokenizers::utils::padding::{PaddingDirection, PaddingParams, PaddingStrategy};
use tokenizers::utils::truncation::{TruncationDirection, TruncationParams, TruncationStrategy};
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;

use crate::domain::error::EncodeError;
use crate::domain::vocabulary::{
    Vocabulary, CLS_ID, CLS_TOKEN, PAD_ID, PAD_TOKEN, SEP_ID, SEP_TOKEN, UNK_TOKEN,
};

/// BERT-SQuAD input length.
pub const DEFAULT_MAX_SEQ_LEN: usize = 384;

/// `[CLS]` + `[SEP]` + `[SEP]`
pub const STRUCTURAL_TOKENS: usize = 3;

/// A token and the byte range of the original text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text:  String,
    pub start: usize,
    pub end:   usize,
}

/// Punctuation trimmed off question keywords by the extractor.
/// ASCII symbols such as `$` and `%` count too.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' // curly quotes
                | '\u{2013}' | '\u{2014}'                    // en / em dash
                | '\u{2026}'                                 // ellipsis
                | '\u{00A1}' | '\u{00BF}'                    // inverted ! ?
                | '\u{00AB}' | '\u{00BB}'                    // guillemets
        )
}

/// Split `text` into lower-cased tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with_offsets(text)
        .into_iter()
        .map(|t| t.text)
        .collect()
}

/// Like [`tokenize`], keeping each token's byte range in `text`.
/// Uses the same BertPreTokenizer as the pair encoder.
pub fn tokenize_with_offsets(text: &str) -> Vec<Token> {
    let mut pre = PreTokenizedString::from(text);
    if let Err(e) = BertPreTokenizer.pre_tokenize(&mut pre) {
        tracing::warn!("Pre-tokenization failed: {e}");
        return Vec::new();
    }
    pre.get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(piece, (start, end), _)| Token { text: piece.to_lowercase(), start, end })
        .collect()
}

/// Reject lengths that cannot hold the structural tokens.
pub fn validate_max_length(max_length: usize) -> Result<(), EncodeError> {
    if max_length < STRUCTURAL_TOKENS {
        return Err(EncodeError::SequenceTooShort { max_length });
    }
    Ok(())
}

/// Model input for one (question, context) pair.
///
/// All three arrays have exactly the requested length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedSequence {
    pub token_ids:      Vec<u32>,
    pub segment_ids:    Vec<u32>,
    pub attention_mask: Vec<u32>,

    /// Position of the first context token.
    pub context_start: usize,

    /// Byte ranges in the original context, one per context token
    /// that survived truncation.
    pub context_offsets: Vec<(usize, usize)>,
}

impl EncodedSequence {
    pub fn len(&self) -> usize {
        self.token_ids.len()
    }

    /// Number of non-padding positions.
    pub fn real_len(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }

    /// Positions holding context tokens (excludes the final `[SEP]`).
    pub fn context_positions(&self) -> Range<usize> {
        self.context_start..self.context_start + self.context_offsets.len()
    }

    /// Byte range of the context token at `position`, if it is one.
    pub fn offset_at(&self, position: usize) -> Option<(usize, usize)> {
        position
            .checked_sub(self.context_start)
            .and_then(|i| self.context_offsets.get(i))
            .copied()
    }
}

/// Tokenizer JSON in the HuggingFace format, over `vocab`.
/// Ids come straight from the Vocabulary, so [CLS]/[SEP] in the
/// template always match the fixed special ids.
fn pipeline_json(vocab: &Vocabulary) -> serde_json::Value {
    let ids: serde_json::Map<String, serde_json::Value> = vocab
        .iter()
        .map(|(id, token)| (token.to_string(), serde_json::json!(id)))
        .collect();

    let special = |token: &str, type_id: u32| serde_json::json!({ "SpecialToken": { "id": token, "type_id": type_id } });
    let sequence = |id: &str, type_id: u32| serde_json::json!({ "Sequence": { "id": id, "type_id": type_id } });

    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": { "type": "Lowercase" },
        "pre_tokenizer": { "type": "BertPreTokenizer" },
        "post_processor": {
            "type": "TemplateProcessing",
            "single": [special(CLS_TOKEN, 0), sequence("A", 0), special(SEP_TOKEN, 0)],
            "pair": [
                special(CLS_TOKEN, 0), sequence("A", 0), special(SEP_TOKEN, 0),
                sequence("B", 1), special(SEP_TOKEN, 1),
            ],
            "special_tokens": {
                CLS_TOKEN: { "id": CLS_TOKEN, "ids": [CLS_ID], "tokens": [CLS_TOKEN] },
                SEP_TOKEN: { "id": SEP_TOKEN, "ids": [SEP_ID], "tokens": [SEP_TOKEN] },
            },
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": ids,
            "unk_token": UNK_TOKEN,
        },
    })
}

fn backend(e: impl std::fmt::Display) -> EncodeError {
    EncodeError::Backend(e.to_string())
}

/// Set truncation and padding so every encoding is exactly `max_length`.
fn configure(hf: &mut tokenizers::Tokenizer, max_length: usize) -> Result<(), EncodeError> {
    hf.with_truncation(Some(TruncationParams {
        max_length,
        strategy:  TruncationStrategy::OnlySecond,
        stride:    0,
        direction: TruncationDirection::Right,
    }))
    .map_err(backend)?;
    hf.with_padding(Some(PaddingParams {
        strategy:           PaddingStrategy::Fixed(max_length),
        direction:          PaddingDirection::Right,
        pad_to_multiple_of: None,
        pad_id:             PAD_ID,
        pad_type_id:        0,
        pad_token:          PAD_TOKEN.to_string(),
    }));
    Ok(())
}

/// Encodes text against a shared vocabulary.
///
/// The pipeline is configured for one sequence length up front;
/// asking for another length encodes with a reconfigured copy.
#[derive(Clone)]
pub struct Tokenizer {
    vocab:      Arc<Vocabulary>,
    hf:         Arc<tokenizers::Tokenizer>,
    max_length: usize,
}

impl Tokenizer {
    /// Pipeline for the default BERT-SQuAD length.
    pub fn new(vocab: Arc<Vocabulary>) -> Result<Self, EncodeError> {
        Self::with_max_length(vocab, DEFAULT_MAX_SEQ_LEN)
    }

    pub fn with_max_length(vocab: Arc<Vocabulary>, max_length: usize) -> Result<Self, EncodeError> {
        validate_max_length(max_length)?;
        let json = serde_json::to_vec(&pipeline_json(&vocab)).map_err(backend)?;
        let mut hf = tokenizers::Tokenizer::from_bytes(json).map_err(backend)?;
        configure(&mut hf, max_length)?;

        tracing::debug!("Tokenizer ready: {} tokens, max_length={}", vocab.len(), max_length);
        Ok(Self { vocab, hf: Arc::new(hf), max_length })
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Build `[CLS] question [SEP] context [SEP]`, truncate the
    /// context to fit, and right-pad everything to `max_length`.
    pub fn encode_pair(
        &self,
        question:   &str,
        context:    &str,
        max_length: usize,
    ) -> Result<EncodedSequence, EncodeError> {
        validate_max_length(max_length)?;

        // OnlySecond truncation cannot shorten the question, so a
        // question that leaves no room is refused before encoding.
        let question_tokens = tokenize(question).len();
        if question_tokens + STRUCTURAL_TOKENS > max_length {
            return Err(EncodeError::QuestionTooLong { question_tokens, max_length });
        }

        // truncation never cuts a sequence down to nothing, so a
        // question that fills the budget exactly gets an empty context
        let context = if question_tokens + STRUCTURAL_TOKENS == max_length { "" } else { context };

        let encoding = if max_length == self.max_length {
            self.hf.encode((question, context), true)
        } else {
            let mut hf = (*self.hf).clone();
            configure(&mut hf, max_length)?;
            hf.encode((question, context), true)
        }
        .map_err(backend)?;

        let sequence_ids = encoding.get_sequence_ids();
        let context_positions: Vec<usize> = sequence_ids
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Some(1))
            .map(|(i, _)| i)
            .collect();
        // [CLS] + question + [SEP]
        let context_start = context_positions.first().copied().unwrap_or(question_tokens + 2);
        let offsets = encoding.get_offsets();
        let context_offsets: Vec<(usize, usize)> =
            context_positions.iter().map(|&i| offsets[i]).collect();

        let sequence = EncodedSequence {
            token_ids:      encoding.get_ids().to_vec(),
            segment_ids:    encoding.get_type_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
            context_start,
            context_offsets,
        };

        tracing::debug!(
            "Encoded pair: {} question tokens, {} context tokens, {} padding",
            question_tokens,
            sequence.context_offsets.len(),
            max_length - sequence.real_len(),
        );
        Ok(sequence)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::UNK_ID;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(Arc::new(Vocabulary::demo())).unwrap()
    }

    #[test]
    fn test_splits_words_and_punctuation() {
        assert_eq!(
            tokenize("Apple Inc. is in Cupertino, California!"),
            vec!["apple", "inc", ".", "is", "in", "cupertino", ",", "california", "!"]
        );
    }

    #[test]
    fn test_whitespace_only_gives_no_tokens() {
        assert!(tokenize("  \t\n ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_symbols_are_split_off() {
        assert_eq!(tokenize("$394.3"), vec!["$", "394", ".", "3"]);
        assert_eq!(tokenize("Wozniak's"), vec!["wozniak", "'", "s"]);
    }

    #[test]
    fn test_offsets_point_into_original_text() {
        let text   = "Steve  Jobs, 1976";
        let tokens = tokenize_with_offsets(text);
        let spans: Vec<&str> = tokens.iter().map(|t| &text[t.start..t.end]).collect();
        assert_eq!(spans, vec!["Steve", "Jobs", ",", "1976"]);
        assert_eq!(tokens[0].text, "steve");
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let texts = [
            "Where is Apple headquartered?",
            "BERT was published in 2018 by researchers at Google AI Language.",
            "Über-cool “quotes” — and… more!",
        ];
        for text in texts {
            let once  = tokenize(text);
            let twice = tokenize(&once.join(" "));
            assert_eq!(once, twice, "{text}");
        }
    }

    #[test]
    fn test_encode_pair_layout() {
        let t   = tokenizer();
        let enc = t.encode_pair("who is he?", "He is one.", 16).unwrap();

        assert_eq!(enc.len(), 16);
        assert_eq!(enc.segment_ids.len(), 16);
        assert_eq!(enc.attention_mask.len(), 16);

        // [CLS] who is he ? [SEP] he is one . [SEP]
        let v = t.vocab();
        let tokens = v.ids_to_tokens(&enc.token_ids[..11]);
        assert_eq!(tokens, vec!["[CLS]", "who", "is", "he", "?", "[SEP]", "he", "is", "one", ".", "[SEP]"]);
        assert_eq!(&enc.segment_ids[..11], &[0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
        assert_eq!(&enc.token_ids[11..], &[PAD_ID; 5]);
        assert_eq!(&enc.segment_ids[11..], &[0; 5]);
        assert_eq!(&enc.attention_mask[11..], &[0; 5]);
        assert_eq!(enc.context_start, 6);
        assert_eq!(enc.context_positions(), 6..10);
    }

    #[test]
    fn test_context_offsets_are_bytes_of_the_context() {
        let context = "Café “Über” opens.";
        let enc = tokenizer().encode_pair("where?", context, 32).unwrap();
        let pieces: Vec<&str> = enc.context_offsets.iter().map(|&(a, b)| &context[a..b]).collect();
        assert_eq!(pieces, vec!["Café", "“", "Über", "”", "opens", "."]);
    }

    #[test]
    fn test_unknown_words_encode_as_unk() {
        let enc = tokenizer().encode_pair("where?", "Cupertino", 8).unwrap();
        assert_eq!(enc.token_ids[4], UNK_ID);
    }

    #[test]
    fn test_context_is_truncated_question_is_not() {
        let t       = tokenizer();
        let context = "one two ".repeat(50);
        let enc     = t.encode_pair("what is it", &context, 12).unwrap();

        assert_eq!(enc.len(), 12);
        // 3 question + 3 structural leaves 6 context tokens
        assert_eq!(enc.context_offsets.len(), 6);
        assert_eq!(enc.real_len(), 12);
        assert_eq!(enc.token_ids[11], SEP_ID);
        assert_eq!(t.vocab().ids_to_tokens(&enc.token_ids[1..4]), vec!["what", "is", "it"]);
    }

    #[test]
    fn test_mask_sum_matches_natural_length() {
        let t = tokenizer();
        for max_length in [6, 8, 20, DEFAULT_MAX_SEQ_LEN] {
            let q   = "how many ?";
            let c   = "There are 340 million parameters.";
            let enc = t.encode_pair(q, c, max_length).unwrap();
            let natural = tokenize(q).len() + tokenize(c).len() + STRUCTURAL_TOKENS;
            assert_eq!(enc.len(), max_length);
            assert_eq!(enc.real_len(), natural.min(max_length));
        }
    }

    #[test]
    fn test_configured_and_other_lengths_agree() {
        let short = Tokenizer::with_max_length(Arc::new(Vocabulary::demo()), 20).unwrap();
        let a = short.encode_pair("who is he?", "He is one.", 20).unwrap();
        let b = tokenizer().encode_pair("who is he?", "He is one.", 20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_length_below_structural_tokens_fails() {
        let t = tokenizer();
        for max_length in 0..STRUCTURAL_TOKENS {
            assert_eq!(
                t.encode_pair("q", "c", max_length),
                Err(EncodeError::SequenceTooShort { max_length })
            );
            assert!(Tokenizer::with_max_length(Arc::new(Vocabulary::demo()), max_length).is_err());
        }
        // exactly three structural tokens is allowed with an empty question
        let enc = t.encode_pair("", "context", 3).unwrap();
        assert_eq!(enc.token_ids, vec![CLS_ID, SEP_ID, SEP_ID]);
        assert_eq!(enc.segment_ids, vec![0, 0, 1]);
    }

    #[test]
    fn test_question_that_does_not_fit_fails() {
        let err = tokenizer().encode_pair("a b c d e", "ctx", 6).unwrap_err();
        assert_eq!(err, EncodeError::QuestionTooLong { question_tokens: 5, max_length: 6 });
    }
}
