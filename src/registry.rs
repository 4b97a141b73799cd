use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::cache::RecordCache;
use crate::error::CacheError;
use crate::source_of_record::{KeyedRecord, SourceOfRecord};

type ErasedCache = Arc<dyn Any + Send + Sync>;

/// Process-wide home for "construct once, reuse forever" caches, one per
/// record type.
///
/// Each entry has its own one-time-initialization guard: under concurrent
/// first access the bulk read runs exactly once, losers of the race block
/// until the winner finishes, and nobody ever observes a partially populated
/// cache. The registry itself is explicit state owned by whoever declares the
/// cached record types; wrap one in `once_cell::sync::Lazy` at the
/// declaration site to give it process lifetime.
#[derive(Default)]
pub struct CacheRegistry {
    entries: RwLock<HashMap<TypeId, Arc<OnceCell<ErasedCache>>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the cache for `Value`, populating it from `source` on first use.
    ///
    /// A population failure installs nothing; the failing caller gets the
    /// error and a later call may retry against the same source or another
    /// one.
    pub fn get_or_populate<Value, S>(
        &self,
        source: &S,
    ) -> Result<Arc<RecordCache<Value::Key, Value>>, CacheError>
    where
        Value: KeyedRecord + Send + Sync + 'static,
        Value::Key: Send + Sync + 'static,
        S: SourceOfRecord<Value> + ?Sized,
    {
        let cell = self.entry_cell(TypeId::of::<Value>());

        let erased = cell.get_or_try_init(|| {
            let cache = RecordCache::populate_keyed(source)?;
            let value_type = type_name::<Value>();
            debug!("registered read-only cache for {}", value_type);
            Ok::<ErasedCache, CacheError>(Arc::new(cache))
        })?;

        Ok(downcast_entry::<Value>(Arc::clone(erased)))
    }

    /// The capability check for finder dispatch: the populated cache for
    /// `Value` if one is registered, `None` if the caller should fall through
    /// to the normal store path.
    pub fn lookup<Value>(&self) -> Option<Arc<RecordCache<Value::Key, Value>>>
    where
        Value: KeyedRecord + Send + Sync + 'static,
        Value::Key: Send + Sync + 'static,
    {
        let cell = {
            let entries = self.entries.read().unwrap();
            entries.get(&TypeId::of::<Value>()).cloned()
        }?;

        let erased = cell.get()?;
        Some(downcast_entry::<Value>(Arc::clone(erased)))
    }

    pub fn is_cached<Value>(&self) -> bool
    where
        Value: KeyedRecord + Send + Sync + 'static,
        Value::Key: Send + Sync + 'static,
    {
        self.lookup::<Value>().is_some()
    }

    fn entry_cell(&self, type_id: TypeId) -> Arc<OnceCell<ErasedCache>> {
        if let Some(cell) = self.entries.read().unwrap().get(&type_id) {
            return Arc::clone(cell);
        }

        let mut entries = self.entries.write().unwrap();
        Arc::clone(entries.entry(type_id).or_default())
    }
}

fn downcast_entry<Value>(erased: ErasedCache) -> Arc<RecordCache<Value::Key, Value>>
where
    Value: KeyedRecord + Send + Sync + 'static,
    Value::Key: Send + Sync + 'static,
{
    let Ok(cache) = erased.downcast::<RecordCache<Value::Key, Value>>() else {
        unreachable!("registry entries are keyed by TypeId");
    };

    cache
}
