//! Crate-level error type.

use std::process::ExitCode;

use crate::domain::StopId;
use crate::entur::EnturError;
use crate::resolve::ResolveError;
use crate::store::StoreError;

/// Everything a command can fail with.
///
/// Core errors are carried unchanged; only the binary turns them into a
/// message and an exit code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The departure board could not be fetched
    #[error("cannot fetch departures for {stop_id}: {source}")]
    DepartureFetch {
        stop_id: StopId,
        source: EnturError,
    },

    /// Bad command-line usage
    #[error("{0}")]
    Usage(String),

    /// Bad environment configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing to the terminal failed
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::Usage(_) | Error::Config(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }

    /// Extra guidance printed after the error message, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            Error::Store(StoreError::CorruptCache { path, .. }) => Some(format!(
                "Inspect or delete {} to continue; it is never overwritten automatically.",
                path.display()
            )),
            Error::Store(StoreError::DuplicateAlias(alias)) => Some(format!(
                "Use --force to replace the existing '{alias}', or pick another name."
            )),
            Error::Resolve(ResolveError::NoMatch { suggestions, .. })
                if !suggestions.is_empty() =>
            {
                let mut hint = String::from("Other places matching that name:");
                for s in suggestions {
                    hint.push_str("\n  ");
                    hint.push_str(s);
                }
                Some(hint)
            }
            Error::Resolve(ResolveError::Store(StoreError::CorruptCache { path, .. })) => Some(
                format!("Inspect or delete {} to continue.", path.display()),
            ),
            _ => None,
        }
    }
}
