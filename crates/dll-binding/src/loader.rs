//! Library loading seam.

use std::ffi::{c_void, CStr, OsStr};
use std::ptr::NonNull;

use crate::error::LoadError;

/// Something exports can be looked up in.
pub trait SymbolSource {
    /// Address of the export `symbol`, or `None` when it is absent.
    fn address(&self, symbol: &CStr) -> Option<NonNull<c_void>>;
}

/// Opens libraries by name.
///
/// Dropping the returned library releases it.
pub trait LibraryLoader: Send + Sync {
    /// Handle type for an opened library.
    type Library: SymbolSource + Send;

    /// Open `name` through this loader.
    fn load(&self, name: &OsStr) -> Result<Self::Library, LoadError>;
}

/// Loader backed by the OS dynamic linker (`LoadLibrary` / `dlopen`).
///
/// Bare file names are searched on the platform's default library path.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoader;

impl LibraryLoader for SystemLoader {
    type Library = libloading::Library;

    fn load(&self, name: &OsStr) -> Result<Self::Library, LoadError> {
        // SAFETY: vendor DLLs run their initialisers on load; we load only the
        // fixed library names the bindings are written against.
        unsafe { libloading::Library::new(name) }.map_err(|err| LoadError::new(name, err))
    }
}

impl SymbolSource for libloading::Library {
    fn address(&self, symbol: &CStr) -> Option<NonNull<c_void>> {
        // SAFETY: the export is read as an address only; callers cast it to
        // the signature declared in their entry point table.
        let raw = unsafe { self.get::<*mut c_void>(symbol.to_bytes_with_nul()) }.ok()?;
        NonNull::new(*raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_loader_reports_missing_library() {
        let err = SystemLoader
            .load(OsStr::new("definitely-not-a-vendor-library-7f3a.dll"))
            .expect_err("library should not exist");
        assert_eq!(err.library, "definitely-not-a-vendor-library-7f3a.dll");
    }
}
