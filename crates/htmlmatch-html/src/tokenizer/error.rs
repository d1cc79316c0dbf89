use thiserror::Error;

/// The reason a token stream stopped.
///
/// Every stream ends with exactly one of these. [`TokenizeError::EndOfInput`]
/// is the normal terminator; the others mean the input could not be read to
/// the end. Once returned, the same error is returned by every later call to
/// [`super::HTMLTokenizer::next_token`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// All input has been consumed.
    #[error("end of input")]
    EndOfInput,

    /// The input bytes are not valid UTF-8 from `valid_up_to` onwards.
    #[error("invalid UTF-8 sequence at byte {valid_up_to}")]
    InvalidUtf8 {
        /// Length of the valid prefix that was tokenized.
        valid_up_to: usize,
    },

    /// A single token grew past the configured buffer limit.
    #[error("token starting at byte {start} exceeds the {limit}-byte buffer limit")]
    BufferExceeded {
        /// Byte offset where the oversized token began.
        start: usize,
        /// The configured [`super::TokenizerOptions::max_buffer`].
        limit: usize,
    },
}

impl TokenizeError {
    /// Returns true for the expected end-of-stream signal.
    #[must_use]
    pub const fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }
}
