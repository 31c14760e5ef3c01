//! Error types for filter activation.

use thiserror::Error;

/// Error raised while building a filter from its configuration.
///
/// All variants are activation-time failures: a filter that returns one of
/// these must not start processing requests. Predicate evaluation itself is
/// total and never errors on request variability.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A path pattern is not valid regular expression syntax.
    #[error("invalid path pattern {pattern:?}")]
    InvalidPattern {
        /// The offending pattern as configured.
        pattern: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The configured max-age is not strictly positive.
    #[error("max-age must be greater than 0 but is {0}")]
    NonPositiveMaxAge(u64),

    /// A provider produced a value that is not a legal header value.
    #[error("invalid header value")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}
