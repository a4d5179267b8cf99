//! Cache-first resolution with interactive disambiguation.

use tracing::{debug, info};

use crate::domain::{Place, Query, StopRecord};
use crate::prompt::Chooser;
use crate::store::{CacheStore, Snapshot};

use super::alias::derive_alias;
use super::{Candidates, MAX_SUGGESTIONS, ResolveError, StopDirectory};

/// Where a resolved stop came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Found in the local cache, no network used.
    Cache,
    /// Found via the directory. `saved` tells whether it was written
    /// through to the cache (never for bypass searches).
    Directory { saved: bool },
}

/// A stop the query resolved to.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub record: StopRecord,
    pub source: ResolutionSource,
}

/// Resolves free text to one stop.
///
/// Performs no ranking of its own: candidates are shown in directory order,
/// and a pick is only made silently when exactly one stop came back.
pub struct Resolver<'a, D: StopDirectory> {
    directory: &'a D,
}

impl<'a, D: StopDirectory> Resolver<'a, D> {
    /// Create a resolver backed by `directory`.
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Resolve `query` to a single stop.
    ///
    /// The cache is only changed when a stop is newly resolved through the
    /// directory and the query does not bypass the cache. Errors leave the
    /// cache untouched.
    pub fn resolve<S: Snapshot, C: Chooser>(
        &self,
        store: &mut CacheStore<S>,
        chooser: &mut C,
        query: &Query,
    ) -> Result<Resolution, ResolveError> {
        let text = query.free_text.trim();

        if !query.bypass_cache
            && let Some(record) = store.lookup(text)
        {
            debug!(query = text, alias = %record.alias, "cache hit");
            return Ok(Resolution {
                record: record.clone(),
                source: ResolutionSource::Cache,
            });
        }

        let Candidates { mut stops, others } = self.directory.search(text)?;

        debug!(
            query = text,
            stops = stops.len(),
            others = others.len(),
            bypass = query.bypass_cache,
            "directory search"
        );

        if stops.is_empty() {
            return Err(ResolveError::NoMatch {
                query: text.to_string(),
                suggestions: others.into_iter().take(MAX_SUGGESTIONS).collect(),
            });
        }

        let chosen = if stops.len() == 1 && !query.bypass_cache {
            stops.remove(0)
        } else {
            let options: Vec<String> = stops.iter().map(Place::choice_label).collect();
            let title = format!("Matches for '{text}'");
            let idx = chooser
                .choose(&title, &options)
                .filter(|i| *i < stops.len())
                .ok_or(ResolveError::UserAborted)?;
            stops.swap_remove(idx)
        };

        if query.bypass_cache {
            return Ok(Resolution {
                record: chosen.into_record(text),
                source: ResolutionSource::Directory { saved: false },
            });
        }

        let alias = derive_alias(store, text, &chosen);
        let record = chosen.into_record(alias);
        store.put(record.clone())?;

        info!(alias = %record.alias, stop = %record.stop_id, "saved stop");
        Ok(Resolution {
            record,
            source: ResolutionSource::Directory { saved: true },
        })
    }
}
