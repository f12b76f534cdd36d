//! Error types.

use crate::types::{Link, Token};

/// Errors from training and extraction.
#[derive(Debug, thiserror::Error)]
pub enum Ibm1Error {
    /// The two corpora do not pair up sentence by sentence.
    #[error("sentence count mismatch: source has {n_source}, target has {n_target}")]
    CorpusLengthMismatch { n_source: usize, n_target: usize },

    /// Input that cannot be trained on or extracted from.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An alignment point outside the sentence pair it was given with.
    #[error("alignment point {link:?} out of bounds (target length {target_len}, source length {source_len})")]
    LinkOutOfBounds {
        link: Link,
        target_len: usize,
        source_len: usize,
    },

    /// Malformed model or alignment document.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Ibm1Result<T> = Result<T, Ibm1Error>;

/// A sentence pair whose normalization mass for some target word is zero.
///
/// Reported by the E-step instead of failing: the sentence contributes no
/// counts to that iteration and training continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("sentence {sentence}: target token {target} has no probability mass")]
pub struct DegenerateAlignment {
    /// 0-based sentence index in the corpus.
    pub sentence: usize,
    pub target: Token,
}
