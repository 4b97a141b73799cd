pub mod discrete_files;
pub mod memory;

use std::fmt::Display;
use std::hash::Hash;

/// Any error a backing source can raise from its bulk read.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// A system of record that can enumerate every record of one type.
///
/// The bulk read must be exhaustive: any record it leaves out is permanently
/// invisible to a cache populated from it. It is invoked exactly once per
/// cache construction and never again for the life of that cache.
pub trait SourceOfRecord<Value> {
    fn retrieve_all(&self) -> Result<Vec<Value>, SourceError>;
}

/// Declares which field of a record is its cache key.
///
/// Implementing this trait is how a record type opts into caching: the
/// `primary_key` impl names the identifying field (usually one called `id`).
pub trait KeyedRecord {
    type Key: Clone + Eq + Hash + Display;

    /// The unique identifier this record is indexed under. Must be a pure,
    /// stable function of the record; identifiers must not change after load.
    fn primary_key(&self) -> Self::Key;
}
