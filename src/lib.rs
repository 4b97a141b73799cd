//! A read-only, eagerly populated identity-map cache for small, slowly
//! changing record sets.
//!
//! A [`RecordCache`] drains its [`SourceOfRecord`] exactly once at
//! construction, indexes every record by its identifier, and answers all
//! key-based lookups from memory for the rest of the process lifetime. There
//! is no invalidation, eviction, refresh, or write path; restarting the
//! process is the only way to observe fresh data. That trade-off is the
//! precondition for using this crate at all: only cache record sets a human
//! operator is willing to treat as constant for a deployment's lifetime.
//!
//! ```
//! use record_cache::{InMemorySource, KeyedRecord, RecordCache};
//!
//! #[derive(Clone)]
//! struct Currency {
//!     code: String,
//!     minor_units: u32,
//! }
//!
//! impl KeyedRecord for Currency {
//!     type Key = String;
//!
//!     fn primary_key(&self) -> String {
//!         self.code.clone()
//!     }
//! }
//!
//! let source = InMemorySource::new(vec![
//!     Currency { code: "EUR".to_string(), minor_units: 2 },
//!     Currency { code: "JPY".to_string(), minor_units: 0 },
//! ]);
//!
//! let cache = RecordCache::populate_keyed(&source)?;
//! assert_eq!(cache.get(&"JPY".to_string())?.minor_units, 0);
//! assert_eq!(cache.get_many(vec!["EUR".to_string(), "JPY".to_string()].into())?.into_vec().len(), 2);
//! # Ok::<(), record_cache::CacheError>(())
//! ```
//!
//! [`CacheRegistry`] holds one cache per record type behind a per-entry
//! one-time-initialization guard, for integrations that dispatch a generic
//! find-by-id call to the cache when one is registered and to the backing
//! store otherwise.

pub mod cache;
pub mod error;
pub mod registry;
pub mod source_of_record;

pub use cache::{FetchResult, KeyQuery, RecordCache};
pub use error::CacheError;
pub use registry::CacheRegistry;
pub use source_of_record::discrete_files::{DiscreteFileSourceBincode, DiscreteFileSourceJson};
pub use source_of_record::memory::InMemorySource;
pub use source_of_record::{KeyedRecord, SourceError, SourceOfRecord};
