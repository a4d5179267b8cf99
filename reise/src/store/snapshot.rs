//! Whole-file persistence for the stop cache.
//!
//! The cache is always written as one JSON document. Writes go to a
//! temporary file next to the target which is then renamed over it, so a
//! crash mid-write leaves the previous snapshot in place.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::domain::{ModeTag, StopId, StopRecord};

use super::error::StoreError;

/// Current on-disk format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// File name used when no path is configured.
const DEFAULT_FILE_NAME: &str = "stops.json";

/// Backend that loads and stores the full list of cached stops.
pub trait Snapshot {
    /// Read every cached stop, in insertion order.
    fn load(&self) -> Result<Vec<StopRecord>, StoreError>;

    /// Replace the stored snapshot with `entries`.
    ///
    /// On error the previously stored snapshot must still be readable.
    fn save(&mut self, entries: &[StopRecord]) -> Result<(), StoreError>;

    /// Where the snapshot lives, for messages.
    fn location(&self) -> PathBuf;
}

/// Versioned snapshot document.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    version: u32,
    stops: Vec<StopRecord>,
}

/// Entry in the version-less format: a top-level object keyed by alias.
#[derive(Debug, Deserialize)]
struct LegacyEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    county: String,
    /// The raw Geocoder feature, kept by older versions.
    #[serde(default)]
    raw: Option<Value>,
}

impl LegacyEntry {
    fn into_record(self, alias: String) -> Result<StopRecord, String> {
        let stop_id = StopId::parse(&self.id).map_err(|e| format!("entry '{alias}': {e}"))?;
        let raw = self.raw.unwrap_or(Value::Null);

        let coordinates = raw
            .pointer("/geometry/coordinates")
            .and_then(Value::as_array)
            .map(|c| (c.first().and_then(Value::as_f64), c.get(1).and_then(Value::as_f64)));
        let (longitude, latitude) = coordinates.unwrap_or((None, None));

        let mut modes_available: Vec<ModeTag> = Vec::new();
        if let Some(categories) = raw.pointer("/properties/category").and_then(Value::as_array) {
            for mode in categories
                .iter()
                .filter_map(Value::as_str)
                .map(ModeTag::from_stop_category)
            {
                if !modes_available.contains(&mode) {
                    modes_available.push(mode);
                }
            }
        }

        Ok(StopRecord {
            alias,
            canonical_name: self.name,
            stop_id,
            label: self.label,
            county: self.county,
            latitude,
            longitude,
            modes_available,
        })
    }
}

/// Decode a snapshot document, accepting the current and the legacy format.
pub(crate) fn decode(contents: &str) -> Result<Vec<StopRecord>, String> {
    let value: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;

    let Value::Object(map) = value else {
        return Err("expected a JSON object at the top level".to_string());
    };

    match map.get("version") {
        Some(Value::Number(n)) => {
            let version = n.as_u64().ok_or("version must be a positive integer")?;
            if version > u64::from(SNAPSHOT_VERSION) {
                return Err(format!(
                    "written by a newer version (format {version}, supported {SNAPSHOT_VERSION})"
                ));
            }
            let doc: SnapshotDocument =
                serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())?;
            Ok(doc.stops)
        }
        _ => {
            // Version-less: alias -> entry, in file order.
            let mut stops = Vec::with_capacity(map.len());
            for (alias, entry) in map {
                let entry: LegacyEntry = serde_json::from_value(entry)
                    .map_err(|e| format!("entry '{alias}': {e}"))?;
                stops.push(entry.into_record(alias)?);
            }
            Ok(stops)
        }
    }
}

/// Encode entries as the current snapshot format.
pub(crate) fn encode(entries: &[StopRecord]) -> Result<String, serde_json::Error> {
    let doc = SnapshotDocument {
        version: SNAPSHOT_VERSION,
        stops: entries.to_vec(),
    };
    serde_json::to_string_pretty(&doc)
}

/// Configuration for the cache file.
#[derive(Debug, Clone)]
pub struct CacheFileConfig {
    /// Path to the cache file.
    pub path: PathBuf,
}

impl CacheFileConfig {
    /// Create a config for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for CacheFileConfig {
    fn default() -> Self {
        // Platform data dir (e.g. ~/.local/share/reise), else the current directory
        let path = dirs::data_dir()
            .map(|dir| dir.join("reise").join(DEFAULT_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
        Self::new(path)
    }
}

/// Cache snapshot stored in a JSON file.
#[derive(Debug, Clone)]
pub struct CacheFile {
    config: CacheFileConfig,
}

impl CacheFile {
    /// Create a file backend with the given config.
    pub fn new(config: CacheFileConfig) -> Self {
        Self { config }
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn io_error(&self, what: &str, e: impl std::fmt::Display) -> StoreError {
        StoreError::Io {
            path: self.config.path.clone(),
            message: format!("{what}: {e}"),
        }
    }
}

impl Snapshot for CacheFile {
    /// A missing file is an empty cache. Anything unreadable is an error,
    /// never silently treated as empty.
    fn load(&self) -> Result<Vec<StopRecord>, StoreError> {
        let contents = match std::fs::read_to_string(&self.config.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.config.path.display(), "no cache file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::CorruptCache {
                    path: self.config.path.clone(),
                    message: format!("cannot read: {e}"),
                });
            }
        };

        let stops = decode(&contents).map_err(|message| StoreError::CorruptCache {
            path: self.config.path.clone(),
            message,
        })?;

        debug!(path = %self.config.path.display(), count = stops.len(), "loaded cache");
        Ok(stops)
    }

    /// Creates parent directories if they don't exist.
    fn save(&mut self, entries: &[StopRecord]) -> Result<(), StoreError> {
        let dir = match self.config.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| self.io_error("failed to create cache directory", e))?;
        }

        let json = encode(entries).map_err(|e| self.io_error("failed to serialize cache", e))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| self.io_error("failed to create temporary file", e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| self.io_error("failed to write temporary file", e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.io_error("failed to flush temporary file", e))?;
        tmp.persist(&self.config.path)
            .map_err(|e| self.io_error("failed to replace cache file", e.error))?;

        info!(path = %self.config.path.display(), count = entries.len(), "saved cache");
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.config.path.clone()
    }
}

/// Cache snapshot held in memory.
///
/// Stands in for [`CacheFile`] where nothing should touch the disk. Can be
/// told to fail the next save to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    entries: Vec<StopRecord>,
    saves: usize,
    fail_next_save: bool,
}

impl MemorySnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot that already holds `entries`.
    pub fn with_entries(entries: Vec<StopRecord>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// What was last saved.
    pub fn entries(&self) -> &[StopRecord] {
        &self.entries
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Make the next `save` fail without changing anything.
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }
}

impl Snapshot for MemorySnapshot {
    fn load(&self) -> Result<Vec<StopRecord>, StoreError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[StopRecord]) -> Result<(), StoreError> {
        if self.fail_next_save {
            self.fail_next_save = false;
            return Err(StoreError::Io {
                path: self.location(),
                message: "simulated write failure".to_string(),
            });
        }
        self.entries = entries.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }
}
