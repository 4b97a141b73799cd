//! Exercises the declaration pattern end to end: a process-wide registry,
//! record types opted into caching via `KeyedRecord`, and finder dispatch
//! that falls through to the backing store for uncached types.

use once_cell::sync::Lazy;
use record_cache::{CacheRegistry, InMemorySource, KeyQuery, KeyedRecord};

static REGISTRY: Lazy<CacheRegistry> = Lazy::new(CacheRegistry::new);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Currency {
    code: String,
    minor_units: u32,
}

impl KeyedRecord for Currency {
    type Key = String;

    fn primary_key(&self) -> String {
        self.code.clone()
    }
}

#[derive(Debug, Clone)]
struct AuditEntry {
    id: u64,
}

impl KeyedRecord for AuditEntry {
    type Key = u64;

    fn primary_key(&self) -> u64 {
        self.id
    }
}

fn currency_source() -> InMemorySource<Currency> {
    InMemorySource::new(vec![
        Currency {
            code: "EUR".to_string(),
            minor_units: 2,
        },
        Currency {
            code: "JPY".to_string(),
            minor_units: 0,
        },
        Currency {
            code: "USD".to_string(),
            minor_units: 2,
        },
    ])
}

#[test]
fn cached_type_answers_key_lookups_from_the_registry() {
    let cache = REGISTRY.get_or_populate(&currency_source()).unwrap();

    assert!(REGISTRY.is_cached::<Currency>());
    assert_eq!(cache.get(&"EUR".to_string()).unwrap().minor_units, 2);

    let pair = cache
        .get_many(KeyQuery::List(vec![
            Some("USD".to_string()),
            Some("JPY".to_string()),
        ]))
        .unwrap()
        .into_vec();
    let codes: Vec<&str> = pair.iter().map(|currency| currency.code.as_str()).collect();

    assert_eq!(codes, vec!["USD", "JPY"]);
}

#[test]
fn registry_hands_out_the_same_cache_on_every_use() {
    let first = REGISTRY.get_or_populate(&currency_source()).unwrap();
    let second = REGISTRY.get_or_populate(&currency_source()).unwrap();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn uncached_type_falls_through_to_the_store_path() {
    // No declaration ran for AuditEntry, so a finder would take the normal
    // store-backed path.
    assert!(!REGISTRY.is_cached::<AuditEntry>());
    assert!(REGISTRY.lookup::<AuditEntry>().is_none());
}
