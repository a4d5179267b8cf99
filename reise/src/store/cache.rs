//! The alias → stop mapping.

use tracing::debug;

use crate::domain::{StopRecord, normalize};

use super::error::StoreError;
use super::snapshot::Snapshot;

/// Ordered cache of stops keyed by alias.
///
/// Holds the current entries in memory and writes the whole list through
/// its [`Snapshot`] after every change. A change only becomes visible in
/// memory once the snapshot accepted it, so a failed write leaves both
/// sides as they were.
#[derive(Debug)]
pub struct CacheStore<S: Snapshot> {
    snapshot: S,
    entries: Vec<StopRecord>,
}

impl<S: Snapshot> CacheStore<S> {
    /// Load the cache from `snapshot`.
    ///
    /// Fails with [`StoreError::CorruptCache`] if the snapshot is unreadable
    /// or lists two aliases that are equal after normalization.
    pub fn open(snapshot: S) -> Result<Self, StoreError> {
        let entries = snapshot.load()?;

        let keys: Vec<String> = entries.iter().map(|e| normalize(&e.alias)).collect();
        for (i, entry) in entries.iter().enumerate() {
            if keys[..i].contains(&keys[i]) {
                return Err(StoreError::CorruptCache {
                    path: snapshot.location(),
                    message: format!("alias '{}' appears more than once", entry.alias),
                });
            }
        }

        Ok(Self { snapshot, entries })
    }

    /// Write the current entries through the snapshot.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.snapshot.save(&self.entries)
    }

    /// The backing snapshot.
    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }

    /// Get a stop by its exact alias.
    pub fn get(&self, alias: &str) -> Option<&StopRecord> {
        self.entries.iter().find(|e| e.alias == alias)
    }

    /// Check whether an exact alias is cached.
    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    /// Find a stop whose alias matches `text` after normalization.
    ///
    /// The first match in insertion order wins.
    pub fn lookup(&self, text: &str) -> Option<&StopRecord> {
        let wanted = normalize(text);
        self.entries.iter().find(|e| normalize(&e.alias) == wanted)
    }

    /// Find the alias that `text` refers to: an exact alias if one exists,
    /// otherwise the first normalized match.
    pub fn resolve_alias(&self, text: &str) -> Option<&str> {
        self.position(text).map(|i| self.entries[i].alias.as_str())
    }

    /// Iterate over cached stops in insertion order.
    pub fn list(&self) -> std::slice::Iter<'_, StopRecord> {
        self.entries.iter()
    }

    /// Number of cached stops.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a stop, overwriting the stop whose alias matches after
    /// normalization.
    ///
    /// An overwritten entry keeps its position and takes the new alias
    /// spelling; a new one is appended.
    pub fn put(&mut self, record: StopRecord) -> Result<(), StoreError> {
        validate_alias(&record.alias)?;

        let key = normalize(&record.alias);
        let mut next = self.entries.clone();
        match next.iter().position(|e| normalize(&e.alias) == key) {
            Some(i) => next[i] = record,
            None => next.push(record),
        }
        self.commit(next)
    }

    /// Insert a stop under an alias no other entry uses.
    ///
    /// Fails with [`StoreError::DuplicateAlias`] if an existing alias
    /// matches after normalization.
    pub fn insert_new(&mut self, record: StopRecord) -> Result<(), StoreError> {
        if self.lookup(&record.alias).is_some() {
            return Err(StoreError::DuplicateAlias(record.alias));
        }
        self.put(record)
    }

    /// Give a cached stop a new alias.
    ///
    /// The stop id is unchanged and the entry moves to the end. Returns the
    /// alias it had before. Fails without touching anything if `old` is not
    /// cached or another entry already answers to `new`.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<String, StoreError> {
        let new = new.trim();
        validate_alias(new)?;

        let idx = self
            .position(old)
            .ok_or_else(|| StoreError::NotFound(old.to_string()))?;

        if !self.colliding(new, idx).is_empty() {
            return Err(StoreError::DuplicateAlias(new.to_string()));
        }

        self.move_to_alias(idx, new, &[])
    }

    /// Like [`rename`](Self::rename), but drops any entries that already
    /// answer to `new` instead of failing.
    pub fn rename_replacing(&mut self, old: &str, new: &str) -> Result<String, StoreError> {
        let new = new.trim();
        validate_alias(new)?;

        let idx = self
            .position(old)
            .ok_or_else(|| StoreError::NotFound(old.to_string()))?;

        let replaced = self.colliding(new, idx);
        self.move_to_alias(idx, new, &replaced)
    }

    /// Remove a cached stop and return it.
    pub fn delete(&mut self, alias: &str) -> Result<StopRecord, StoreError> {
        let idx = self
            .position(alias)
            .ok_or_else(|| StoreError::NotFound(alias.to_string()))?;

        let mut next = self.entries.clone();
        let removed = next.remove(idx);
        self.commit(next)?;

        debug!(alias = %removed.alias, "deleted stop");
        Ok(removed)
    }

    /// Remove every cached stop. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        let count = self.entries.len();
        self.commit(Vec::new())?;
        Ok(count)
    }

    /// Index of the entry `text` refers to, preferring an exact alias.
    fn position(&self, text: &str) -> Option<usize> {
        if let Some(i) = self.entries.iter().position(|e| e.alias == text) {
            return Some(i);
        }
        let wanted = normalize(text);
        self.entries.iter().position(|e| normalize(&e.alias) == wanted)
    }

    /// Indices of entries other than `except` whose alias matches `alias`.
    fn colliding(&self, alias: &str, except: usize) -> Vec<usize> {
        let wanted = normalize(alias);
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, e)| *i != except && normalize(&e.alias) == wanted)
            .map(|(i, _)| i)
            .collect()
    }

    fn move_to_alias(
        &mut self,
        idx: usize,
        new: &str,
        drop: &[usize],
    ) -> Result<String, StoreError> {
        let old_alias = self.entries[idx].alias.clone();
        let moved = self.entries[idx].with_alias(new);

        let mut next: Vec<StopRecord> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx && !drop.contains(i))
            .map(|(_, e)| e.clone())
            .collect();
        next.push(moved);
        self.commit(next)?;

        debug!(from = %old_alias, to = %new, replaced = drop.len(), "renamed stop");
        Ok(old_alias)
    }

    fn commit(&mut self, next: Vec<StopRecord>) -> Result<(), StoreError> {
        self.snapshot.save(&next)?;
        self.entries = next;
        Ok(())
    }
}

fn validate_alias(alias: &str) -> Result<(), StoreError> {
    if normalize(alias).is_empty() {
        return Err(StoreError::InvalidAlias("must contain a letter or digit"));
    }
    Ok(())
}
