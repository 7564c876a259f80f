// ============================================================
// Layer 5 — Model Output Decoder
// ============================================================
// Turns start/end logits back into a piece of the context.
//
// Strategy:
//   1. Only positions holding context tokens are candidates:
//      segment 1, mask 1, and mapped to a context offset (so
//      the trailing [SEP] is never part of an answer).
//   2. Pick (start, end) with start <= end maximising
//      start_logit[start] + end_logit[end]. The first maximum
//      found wins; NaN scores never win.
//   3. Map the two tokens back through their byte offsets and
//      slice the original context between them.

use crate::data::tokenizer::EncodedSequence;
use crate::domain::{answer::AnswerSpan, error::DecodeError};
use crate::ml::model::ModelOutput;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpanDecoder {
    /// Longest answer in tokens; `None` searches every pair.
    max_answer_tokens: Option<usize>,
}

impl SpanDecoder {
    pub fn new(max_answer_tokens: Option<usize>) -> Self {
        Self { max_answer_tokens }
    }

    /// Find the best-scoring context span.
    pub fn decode(
        &self,
        output:  &ModelOutput,
        encoded: &EncodedSequence,
    ) -> Result<AnswerSpan, DecodeError> {
        let (start_logits, end_logits) = (&output.start_logits, &output.end_logits);
        if start_logits.len() != encoded.len() || end_logits.len() != encoded.len() {
            return Err(DecodeError::LengthMismatch {
                start:    start_logits.len(),
                end:      end_logits.len(),
                sequence: encoded.len(),
            });
        }

        let valid = |p: usize| encoded.segment_ids[p] == 1 && encoded.attention_mask[p] == 1;
        let positions = encoded.context_positions();
        let max_len   = self.max_answer_tokens.unwrap_or(usize::MAX).max(1);

        let mut best: Option<AnswerSpan> = None;
        for s in positions.clone().filter(|&p| valid(p)) {
            let last = positions.end.min(s.saturating_add(max_len));
            for e in (s..last).filter(|&p| valid(p)) {
                let score = start_logits[s] + end_logits[e];
                if best.map_or(!score.is_nan(), |b| score > b.score) {
                    best = Some(AnswerSpan::new(s, e, score));
                }
            }
        }

        let span = best.ok_or(DecodeError::NoAnswerFound)?;
        tracing::debug!("Span [{},{}] score={:.4}", span.start, span.end, span.score);
        Ok(span)
    }

    /// Slice of `context` covered by `span`.
    pub fn span_text<'c>(
        &self,
        span:    &AnswerSpan,
        encoded: &EncodedSequence,
        context: &'c str,
    ) -> Result<&'c str, DecodeError> {
        let (from, _) = encoded.offset_at(span.start).ok_or(DecodeError::NoAnswerFound)?;
        let (_, to)   = encoded.offset_at(span.end).ok_or(DecodeError::NoAnswerFound)?;
        context
            .get(from..to)
            .ok_or(DecodeError::OffsetOutOfRange { from, to })
    }

    /// `decode` followed by `span_text`.
    pub fn decode_text<'c>(
        &self,
        output:  &ModelOutput,
        encoded: &EncodedSequence,
        context: &'c str,
    ) -> Result<(AnswerSpan, &'c str), DecodeError> {
        let span = self.decode(output, encoded)?;
        let text = self.span_text(&span, encoded, context)?;
        Ok((span, text))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::Tokenizer;
    use crate::domain::vocabulary::Vocabulary;
    use std::sync::Arc;

    const QUESTION: &str = "Where is Apple headquartered?";
    const CONTEXT:  &str = "Apple Inc. is headquartered in Cupertino, California.";

    fn encode(max_length: usize) -> EncodedSequence {
        Tokenizer::new(Arc::new(Vocabulary::demo()))
            .unwrap()
            .encode_pair(QUESTION, CONTEXT, max_length)
            .unwrap()
    }

    /// Logits that are zero everywhere except the given peaks.
    fn peaks(len: usize, start: (usize, f32), end: (usize, f32)) -> ModelOutput {
        let mut output = ModelOutput { start_logits: vec![0.0; len], end_logits: vec![0.0; len] };
        output.start_logits[start.0] = start.1;
        output.end_logits[end.0]     = end.1;
        output
    }

    #[test]
    fn test_picks_highest_scoring_span() {
        let enc = encode(32);
        // [CLS] where is apple headquartered ? [SEP] apple inc . is headquartered in cupertino , california . [SEP]
        //   0     1    2   3         4        5   6    7    8  9 10       11       12     13    14     15     16  17
        let out = peaks(32, (13, 5.0), (15, 4.0));
        let (span, text) = SpanDecoder::default().decode_text(&out, &enc, CONTEXT).unwrap();
        assert_eq!((span.start, span.end), (13, 15));
        assert_eq!(span.score, 9.0);
        assert_eq!(text, "Cupertino, California");
    }

    #[test]
    fn test_end_before_start_is_never_chosen() {
        let enc = encode(32);
        // the best end sits before the best start, so the span collapses
        let out = peaks(32, (13, 5.0), (8, 9.0));
        let span = SpanDecoder::default().decode(&out, &enc).unwrap();
        assert!(span.start <= span.end);
        assert!(span.start >= enc.context_start);
    }

    #[test]
    fn test_question_and_padding_positions_are_ignored() {
        let enc = encode(32);
        // huge logits on [CLS], a question token, the final [SEP], and padding
        let mut out = peaks(32, (0, 100.0), (3, 100.0));
        out.start_logits[17] = 100.0;
        out.end_logits[25]   = 100.0;
        out.start_logits[13] = 1.0;
        out.end_logits[13]   = 1.0;
        let (span, text) = SpanDecoder::default().decode_text(&out, &enc, CONTEXT).unwrap();
        assert_eq!((span.start, span.end), (13, 13));
        assert_eq!(text, "Cupertino");
    }

    #[test]
    fn test_span_text_slices_multibyte_context() {
        let context = "Café in Zürich, Schweiz.";
        let enc = Tokenizer::new(Arc::new(Vocabulary::demo()))
            .unwrap()
            .encode_pair("Where?", context, 16)
            .unwrap();
        // [CLS] where ? [SEP] café in zürich , schweiz . [SEP]
        //   0     1   2   3    4   5    6    7    8     9   10
        let decoder = SpanDecoder::default();

        let (_, text) = decoder.decode_text(&peaks(16, (6, 5.0), (6, 5.0)), &enc, context).unwrap();
        assert_eq!(text, "Zürich");

        let (_, text) = decoder.decode_text(&peaks(16, (4, 5.0), (6, 5.0)), &enc, context).unwrap();
        assert_eq!(text, "Café in Zürich");
    }

    #[test]
    fn test_max_answer_tokens_caps_span() {
        let enc = encode(32);
        let out = peaks(32, (7, 5.0), (16, 5.0));
        let span = SpanDecoder::new(Some(3)).decode(&out, &enc).unwrap();
        assert!(span.len() <= 3);
    }

    #[test]
    fn test_no_context_tokens_is_no_answer() {
        // room for the question only: the context is truncated away
        let enc = encode(8);
        assert!(enc.context_offsets.is_empty());
        let out = peaks(8, (6, 1.0), (6, 1.0));
        assert_eq!(SpanDecoder::default().decode(&out, &enc), Err(DecodeError::NoAnswerFound));
    }

    #[test]
    fn test_nan_logits_never_win() {
        let enc = encode(32);
        let out = ModelOutput { start_logits: vec![f32::NAN; 32], end_logits: vec![f32::NAN; 32] };
        assert_eq!(SpanDecoder::default().decode(&out, &enc), Err(DecodeError::NoAnswerFound));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let enc = encode(32);
        let out = ModelOutput { start_logits: vec![0.0; 32], end_logits: vec![0.0; 31] };
        assert_eq!(
            SpanDecoder::default().decode(&out, &enc),
            Err(DecodeError::LengthMismatch { start: 32, end: 31, sequence: 32 })
        );
    }

    #[test]
    fn test_offsets_from_another_context_are_rejected() {
        let enc  = encode(32);
        let span = AnswerSpan::new(15, 15, 0.0);
        let err  = SpanDecoder::default().span_text(&span, &enc, "short").unwrap_err();
        assert!(matches!(err, DecodeError::OffsetOutOfRange { .. }));
    }
}
