//! Error types for question answering.
//!
//! Every failure reaches the caller as a typed `Result`; nothing
//! panics across the async boundary. The heuristic path has no
//! error type at all because it always produces an answer.

use std::fmt;

use thiserror::Error;

/// Failure to lay a (question, context) pair out as model input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The sequence cannot even hold `[CLS]`, `[SEP]`, `[SEP]`.
    #[error("max length {max_length} is smaller than the 3 structural tokens")]
    SequenceTooShort { max_length: usize },

    /// Question tokens are never truncated, so they must fit.
    #[error("question has {question_tokens} tokens and does not fit in max length {max_length}")]
    QuestionTooLong { question_tokens: usize, max_length: usize },

    /// The tokenizer pipeline itself refused to build or encode.
    #[error("tokenizer error: {0}")]
    Backend(String),
}

/// Failure to turn start/end logits into a context span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("logit length mismatch: start={start}, end={end}, sequence={sequence}")]
    LengthMismatch { start: usize, end: usize, sequence: usize },

    #[error("span offsets {from}..{to} do not fall inside the context")]
    OffsetOutOfRange { from: usize, to: usize },

    #[error("no valid answer span in the context segment")]
    NoAnswerFound,
}

/// Which step of the model path failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceStage {
    Tokenization,
    Invocation,
    Decoding,
    /// The background worker itself died.
    Execution,
}

impl fmt::Display for InferenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InferenceStage::Tokenization => "tokenization",
            InferenceStage::Invocation   => "model invocation",
            InferenceStage::Decoding     => "decoding",
            InferenceStage::Execution    => "execution",
        };
        f.write_str(name)
    }
}

/// Top-level error returned by `AskUseCase::answer`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QaError {
    #[error("Question and context cannot be empty")]
    EmptyInput,

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodeError),

    #[error("Inference failed during {stage}: {message}")]
    Inference { stage: InferenceStage, message: String },

    #[error("No answer found in context")]
    NoAnswerFound,
}

impl QaError {
    pub fn inference(stage: InferenceStage, cause: impl fmt::Display) -> Self {
        QaError::Inference { stage, message: cause.to_string() }
    }
}

/// Result type alias for question-answering operations.
pub type QaResult<T> = Result<T, QaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_error_names_stage() {
        let err = QaError::inference(InferenceStage::Invocation, "runtime unavailable");
        assert_eq!(err.to_string(), "Inference failed during model invocation: runtime unavailable");
    }

    #[test]
    fn test_encode_error_converts() {
        let err: QaError = EncodeError::SequenceTooShort { max_length: 2 }.into();
        assert!(err.to_string().contains("max length 2"));
    }
}
