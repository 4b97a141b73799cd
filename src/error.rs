use thiserror::Error;

use crate::source_of_record::SourceError;

/// Errors surfaced by cache population and lookup.
///
/// All of these are synchronous and non-retryable from inside the cache: the
/// backing source is read once at construction and never again, so a missing
/// identifier stays missing until the process restarts.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The requested identifier is absent from the populated mapping. The
    /// identifier genuinely does not exist; falling back to a store lookup
    /// would find nothing either.
    #[error("{type_name} with id={id} not found in cache")]
    NotFound { type_name: &'static str, id: String },

    /// A bulk lookup normalized down to zero usable identifiers. Indicates a
    /// defect at the call site, not an empty result.
    #[error("bulk lookup for {type_name} supplied no identifiers")]
    NoIdentifiers { type_name: &'static str },

    /// The one-shot bulk read from the source of record failed. The cache was
    /// not constructed; the caller may retry construction.
    #[error("failed to populate {type_name} cache from its source of record")]
    PopulationFailed {
        type_name: &'static str,
        #[source]
        source: SourceError,
    },
}
