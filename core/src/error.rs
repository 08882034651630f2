use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced by the core library.
///
/// Encoding rejects bad input outright; decoding distinguishes truncated
/// streams from malformed values so callers can decide whether to treat a
/// term as absent or fail a load.
#[derive(Debug, Error)]
pub enum Error {
    /// Input that would corrupt the index: unsorted postings, zero
    /// frequencies, or a VByte value that does not fit in 32 bits.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A byte stream ended before a complete record was read.
    #[error("truncated data: {0}")]
    Truncated(String),

    /// The lemma dictionary is absent or empty; initialization cannot proceed.
    #[error("dictionary missing or empty: {0}")]
    MissingDictionary(PathBuf),

    /// The persisted index is absent or malformed.
    #[error("failed to load index: {0}")]
    LoadFailure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
