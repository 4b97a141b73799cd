use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use tracing::debug;

use crate::error::CacheError;
use crate::source_of_record::{KeyedRecord, SourceOfRecord};

/// The identifier argument accepted by [`RecordCache::get_many`].
///
/// Generic finder call conventions hand over identifiers in three shapes, and
/// the shape decides whether the result comes back bare or as a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQuery<Key> {
    /// A bare identifier. The caller expects the bare record back.
    Single(Key),

    /// A flat identifier list, possibly with absent entries. The caller
    /// expects a list back.
    List(Vec<Option<Key>>),

    /// A list wrapping identifier lists, as produced by bulk-association call
    /// sites. The caller expects a list back.
    Nested(Vec<Vec<Option<Key>>>),
}

impl<Key> KeyQuery<Key> {
    /// True when the caller handed over a list of any nesting, so the result
    /// must come back as a list even if only one identifier survives
    /// normalization.
    pub fn expects_list(&self) -> bool {
        !matches!(self, KeyQuery::Single(_))
    }

    /// A bulk-association call that resolved zero identifiers hands over
    /// exactly one empty inner list. That is a legitimate empty lookup, not a
    /// caller defect.
    fn is_empty_id_group(&self) -> bool {
        matches!(self, KeyQuery::Nested(groups) if groups.len() == 1 && groups[0].is_empty())
    }
}

impl<Key: Eq + Hash + Clone> KeyQuery<Key> {
    /// Flatten one level of nesting, drop absent entries, and dedup while
    /// preserving first-occurrence order.
    fn normalize(self) -> Vec<Key> {
        let flat: Vec<Option<Key>> = match self {
            KeyQuery::Single(key) => vec![Some(key)],
            KeyQuery::List(keys) => keys,
            KeyQuery::Nested(groups) => groups.into_iter().flatten().collect(),
        };

        let mut seen = HashSet::with_capacity(flat.len());
        flat.into_iter()
            .flatten()
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }
}

impl<Key> From<Key> for KeyQuery<Key> {
    fn from(key: Key) -> Self {
        KeyQuery::Single(key)
    }
}

impl<Key> From<Vec<Key>> for KeyQuery<Key> {
    fn from(keys: Vec<Key>) -> Self {
        KeyQuery::List(keys.into_iter().map(Some).collect())
    }
}

/// A bulk lookup result, shaped to match what the caller supplied.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchResult<Value> {
    One(Value),
    Many(Vec<Value>),
}

impl<Value> FetchResult<Value> {
    /// Collapse into a plain vector regardless of the shape the caller asked
    /// for.
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            FetchResult::One(value) => vec![value],
            FetchResult::Many(values) => values,
        }
    }
}

/// An identity map over one record type, populated exactly once.
///
/// The mapping is fixed at construction: no insert, refresh, eviction, or
/// write-back, and the backing source is never consulted again. The only way
/// to observe fresh data is to rebuild the cache, which in practice means
/// restarting the process. Only put a record set behind this if a human
/// operator is willing to treat it as constant for a deployment's lifetime.
///
/// Records come back by shared reference, so the cache stays the sole owner
/// and callers cannot mutate or write back what they fetched. Because nothing
/// is mutated after construction, concurrent reads need no locking.
#[derive(Debug)]
pub struct RecordCache<Key, Value> {
    records: HashMap<Key, Value>,
}

impl<Key, Value> RecordCache<Key, Value>
where
    Key: Clone + Eq + Hash + Display,
{
    /// Drain the source of record exactly once and index every record by its
    /// extracted identifier. Last write wins if the source ever yields a
    /// duplicate identifier.
    ///
    /// A bulk-read failure aborts construction; no partially populated cache
    /// is ever handed out.
    pub fn populate<S>(
        source: &S,
        extract_key: impl Fn(&Value) -> Key,
    ) -> Result<Self, CacheError>
    where
        S: SourceOfRecord<Value> + ?Sized,
    {
        let rows = source
            .retrieve_all()
            .map_err(|source| CacheError::PopulationFailed {
                type_name: type_name::<Value>(),
                source,
            })?;

        let mut records = HashMap::with_capacity(rows.len());
        for record in rows {
            records.insert(extract_key(&record), record);
        }

        let value_type = type_name::<Value>();
        debug!(
            "populated {} cache with {} records",
            value_type,
            records.len()
        );

        Ok(RecordCache { records })
    }

    /// Fetch the record for a single identifier.
    pub fn get(&self, key: &Key) -> Result<&Value, CacheError> {
        self.records.get(key).ok_or_else(|| CacheError::NotFound {
            type_name: type_name::<Value>(),
            id: key.to_string(),
        })
    }

    /// Fetch the records for a normalized identifier query.
    ///
    /// Any identifier that is not cached aborts the whole call with
    /// [`CacheError::NotFound`]; no partial list is returned. Results come
    /// back in normalized identifier order.
    pub fn get_many(&self, query: KeyQuery<Key>) -> Result<FetchResult<&Value>, CacheError> {
        if query.is_empty_id_group() {
            return Ok(FetchResult::Many(Vec::new()));
        }

        let expects_list = query.expects_list();
        let keys = query.normalize();

        if keys.is_empty() {
            return Err(CacheError::NoIdentifiers {
                type_name: type_name::<Value>(),
            });
        }

        if let [key] = keys.as_slice() {
            let record = self.get(key)?;
            return Ok(if expects_list {
                FetchResult::Many(vec![record])
            } else {
                FetchResult::One(record)
            });
        }

        keys.iter()
            .map(|key| self.get(key))
            .collect::<Result<Vec<_>, _>>()
            .map(FetchResult::Many)
    }

    /// Every cached record, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &Value> {
        self.records.values()
    }

    /// Every cached identifier, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.records.keys()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<Value> RecordCache<Value::Key, Value>
where
    Value: KeyedRecord,
{
    /// Populate using the key the record type declares for itself.
    pub fn populate_keyed<S>(source: &S) -> Result<Self, CacheError>
    where
        S: SourceOfRecord<Value> + ?Sized,
    {
        Self::populate(source, Value::primary_key)
    }
}
