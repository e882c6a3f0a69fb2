//! Error types for library loading and entry point resolution.

use std::error::Error as StdError;
use std::ffi::{c_int, OsStr};

use thiserror::Error;

use crate::{COULD_NOT_FIND_FUNCTION, FAILED_TO_LOAD_DLL};

/// The OS loader refused to open a library.
///
/// Covers a missing file, an architecture mismatch, or missing OS-level
/// dependencies of the library itself.
#[derive(Debug, Error)]
#[error("failed to load {library}: {source}")]
pub struct LoadError {
    /// Library name as it was requested.
    pub library: String,
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl LoadError {
    /// Wrap a loader-specific error for `library`.
    pub fn new<E>(library: &OsStr, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self {
            library: library.to_string_lossy().into_owned(),
            source: source.into(),
        }
    }
}

/// Failure of the one-time load-and-resolve step.
#[derive(Debug, Error)]
pub enum BindError {
    /// The library itself could not be loaded.
    #[error(transparent)]
    LibraryLoad(#[from] LoadError),

    /// The library loaded but lacks an entry point; the library was released.
    #[error("{library} does not export `{symbol}`")]
    SymbolNotFound {
        /// Library name as it was requested.
        library: String,
        /// First export that could not be resolved.
        symbol: String,
    },
}

impl BindError {
    /// Sentinel return code for this failure.
    pub fn code(&self) -> c_int {
        match self {
            BindError::LibraryLoad(_) => FAILED_TO_LOAD_DLL,
            BindError::SymbolNotFound { .. } => COULD_NOT_FIND_FUNCTION,
        }
    }

    /// Map a sentinel return code back to a description, if it is one.
    pub fn describe_code(code: c_int) -> Option<&'static str> {
        match code {
            FAILED_TO_LOAD_DLL => Some("vendor library could not be loaded"),
            COULD_NOT_FIND_FUNCTION => Some("vendor library is missing an entry point"),
            _ => None,
        }
    }
}
