//! Cache store error types.

use std::path::PathBuf;

/// Errors from the local stop cache.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No cached stop has this alias
    #[error("'{0}' not found in cache")]
    NotFound(String),

    /// Another cached stop already uses this alias
    #[error("'{0}' already exists in cache")]
    DuplicateAlias(String),

    /// Alias is unusable (e.g. empty)
    #[error("invalid alias: {0}")]
    InvalidAlias(&'static str),

    /// The cache file exists but cannot be understood
    #[error("cache file {} is corrupt: {message}", .path.display())]
    CorruptCache { path: PathBuf, message: String },

    /// Writing the cache file failed
    #[error("cannot write cache file {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::NotFound("jb".into());
        assert_eq!(err.to_string(), "'jb' not found in cache");

        let err = StoreError::DuplicateAlias("jernbanetorget".into());
        assert_eq!(err.to_string(), "'jernbanetorget' already exists in cache");

        let err = StoreError::CorruptCache {
            path: PathBuf::from("/tmp/stops.json"),
            message: "expected value at line 1 column 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "cache file /tmp/stops.json is corrupt: expected value at line 1 column 1"
        );

        let err = StoreError::InvalidAlias("must not be empty");
        assert_eq!(err.to_string(), "invalid alias: must not be empty");
    }
}
