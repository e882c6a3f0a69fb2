//! Load-on-first-use binding with all-or-nothing resolution.

use std::ffi::{CStr, OsStr, OsString};
use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::BindError;
use crate::loader::{LibraryLoader, SymbolSource};

/// The first export a table could not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingSymbol(pub &'static CStr);

/// A fixed table of typed entry points, resolved as one unit.
///
/// Implemented by [`entry_points!`](crate::entry_points); hand-written
/// implementations must honour the same contract.
pub trait EntryPoints: Copy + Send + Sync + 'static {
    /// Export names in resolution order.
    const SYMBOLS: &'static [&'static CStr];

    /// Resolve every row of the table from `source`.
    ///
    /// Rows are looked up in [`Self::SYMBOLS`] order and resolution stops at
    /// the first missing export.
    fn resolve<S: SymbolSource + ?Sized>(source: &S) -> Result<Self, MissingSymbol>;
}

struct Loaded<Lib, T> {
    table: T,
    // Keeps the addresses in `table` valid; never released while loaded.
    _library: Lib,
}

/// A vendor library that is opened and resolved on first use.
///
/// The state is either "not loaded" or "every entry point resolved"; a
/// partially resolved table is never stored. The check-load-resolve sequence
/// runs under a single lock, so concurrent first calls load the library
/// exactly once. The lock is released before any forwarded call is made.
pub struct LazyBinding<L: LibraryLoader, T: EntryPoints> {
    loader: L,
    library: OsString,
    state: Mutex<Option<Loaded<L::Library, T>>>,
}

impl<L: LibraryLoader, T: EntryPoints> LazyBinding<L, T> {
    /// Create an unloaded binding for `library` using `loader`.
    pub fn new(loader: L, library: impl Into<OsString>) -> Self {
        Self {
            loader,
            library: library.into(),
            state: Mutex::new(None),
        }
    }

    /// Library name passed to the loader.
    pub fn library_name(&self) -> &OsStr {
        &self.library
    }

    /// The injected loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Export names this binding requires, in resolution order.
    pub fn symbols(&self) -> &'static [&'static CStr] {
        T::SYMBOLS
    }

    /// Whether the library is currently loaded and fully resolved.
    pub fn is_loaded(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Load and resolve the library if needed, returning the resolved table.
    ///
    /// Once loaded, this is a lock and a copy. On failure the binding is left
    /// unloaded and the next call starts over from scratch.
    pub fn ensure_loaded(&self) -> Result<T, BindError> {
        let mut state = self.state.lock();
        if let Some(loaded) = state.as_ref() {
            return Ok(loaded.table);
        }

        let name = self.library.to_string_lossy();
        debug!(library = %name, entry_points = T::SYMBOLS.len(), "loading vendor library");

        let library = self.loader.load(&self.library).map_err(|err| {
            warn!(library = %name, error = %err, "vendor library failed to load");
            err
        })?;

        match T::resolve(&library) {
            Ok(table) => {
                info!(library = %name, entry_points = T::SYMBOLS.len(), "vendor library bound");
                *state = Some(Loaded {
                    table,
                    _library: library,
                });
                Ok(table)
            }
            Err(MissingSymbol(symbol)) => {
                drop(library);
                let symbol = symbol.to_string_lossy().into_owned();
                warn!(library = %name, %symbol, "entry point missing, library released");
                Err(BindError::SymbolNotFound {
                    library: name.into_owned(),
                    symbol,
                })
            }
        }
    }
}

impl<L: LibraryLoader, T: EntryPoints> fmt::Debug for LazyBinding<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyBinding")
            .field("library", &self.library)
            .field("entry_points", &T::SYMBOLS.len())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
