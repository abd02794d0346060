//! Error types surfaced by the comparison engine.

use thiserror::Error;

/// Failure to resolve a link or image reference against a document's base URI.
///
/// Never fatal to a run: callers treat an unresolved reference as non-matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The reference could not be parsed as a URL or joined onto the base.
    #[error("invalid url reference '{reference}': {source}")]
    Invalid {
        /// Raw attribute value that failed to resolve.
        reference: String,
        /// Parser failure reported by the `url` crate.
        #[source]
        source: url::ParseError,
    },
}

/// Errors that stop a comparison run before any record is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// The source snapshot had no markup to index.
    #[error("source snapshot is empty")]
    EmptyMarkup,
}
