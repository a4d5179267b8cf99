//! Choosing the alias a newly resolved stop is cached under.

use crate::domain::{Place, collapse_whitespace, normalize};
use crate::store::{CacheStore, Snapshot};

/// Pick the alias to cache `place` under after resolving `free_text`.
///
/// Tried in order, first usable one wins:
/// 1. the query text, lower-cased with whitespace collapsed
/// 2. the place name, lower-cased
/// 3. the place name followed by the stop id in parentheses
///
/// A candidate is usable if no cached alias matches it, or if the one that
/// does already points at the same stop (that alias is then reused).
/// Deterministic for a given cache and input.
pub fn derive_alias<S: Snapshot>(store: &CacheStore<S>, free_text: &str, place: &Place) -> String {
    let name = collapse_whitespace(&place.name.to_lowercase());
    let candidates = [
        collapse_whitespace(&free_text.to_lowercase()),
        name.clone(),
        format!("{name} ({})", place.stop_id),
    ];

    for alias in candidates {
        if normalize(&alias).is_empty() {
            continue;
        }
        match store.lookup(&alias) {
            None => return alias,
            Some(existing) if existing.stop_id == place.stop_id => return existing.alias.clone(),
            Some(_) => {}
        }
    }

    // Stop ids are unique in the directory
    place.stop_id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;
    use crate::store::MemorySnapshot;

    fn place(name: &str, id: &str) -> Place {
        Place {
            stop_id: StopId::parse(id).unwrap(),
            name: name.to_string(),
            label: name.to_string(),
            county: "Oslo".to_string(),
            layer: "venue".to_string(),
            latitude: None,
            longitude: None,
            modes: Vec::new(),
        }
    }

    fn store_with(entries: &[(&str, &str, &str)]) -> CacheStore<MemorySnapshot> {
        let records = entries
            .iter()
            .map(|(alias, name, id)| place(name, id).into_record(*alias))
            .collect();
        CacheStore::open(MemorySnapshot::with_entries(records)).unwrap()
    }

    #[test]
    fn uses_query_text() {
        let store = store_with(&[]);
        let p = place("Jernbanetorget", "NSR:StopPlace:4000");
        assert_eq!(derive_alias(&store, "  Jernbanetorget ", &p), "jernbanetorget");
        assert_eq!(derive_alias(&store, "Oslo   S", &p), "oslo s");
    }

    #[test]
    fn reuses_alias_of_same_stop() {
        let store = store_with(&[("Oslo S", "Oslo S", "NSR:StopPlace:337")]);
        let p = place("Oslo S", "NSR:StopPlace:337");
        assert_eq!(derive_alias(&store, "oslo s", &p), "Oslo S");
    }

    #[test]
    fn falls_back_to_name_on_collision() {
        let store = store_with(&[("oslo s", "Oslo bussterminal", "NSR:StopPlace:1")]);
        let p = place("Oslo S", "NSR:StopPlace:337");
        // "oslo s" is taken by another stop and so is the name
        assert_eq!(derive_alias(&store, "oslo s", &p), "oslo s (NSR:StopPlace:337)");

        let p = place("Oslo sentralstasjon", "NSR:StopPlace:337");
        assert_eq!(derive_alias(&store, "oslo s", &p), "oslo sentralstasjon");
    }

    #[test]
    fn blank_query_uses_name() {
        let store = store_with(&[]);
        let p = place("Tøyen", "NSR:StopPlace:2");
        assert_eq!(derive_alias(&store, " - ", &p), "tøyen");
    }
}
