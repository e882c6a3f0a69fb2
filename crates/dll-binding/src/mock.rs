//! In-process loader for tests.
//!
//! [`MockLoader`] hands out [`MockLibrary`] handles whose exports are plain
//! Rust `extern "system" fn`s registered by the test. Clones share state, so a
//! test can keep a handle to flip failures on and off after the loader has
//! been moved into a binding.

use std::collections::HashMap;
use std::ffi::{c_void, CStr, OsStr};
use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::LoadError;
use crate::loader::{LibraryLoader, SymbolSource};

/// Counters shared by a loader and every library it produced.
#[derive(Debug, Default)]
pub struct LoadStats {
    loads: AtomicUsize,
    releases: AtomicUsize,
    lookups: Mutex<Vec<String>>,
}

impl LoadStats {
    /// Number of load attempts, failed ones included.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of library handles dropped.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Every export looked up so far, in request order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }

    /// Forget recorded lookups.
    pub fn clear_lookups(&self) {
        self.lookups.lock().clear();
    }
}

/// Loader that serves registered function pointers instead of a real DLL.
#[derive(Clone, Default)]
pub struct MockLoader {
    symbols: Arc<Mutex<HashMap<String, usize>>>,
    fail_load: Arc<AtomicBool>,
    stats: Arc<LoadStats>,
}

impl MockLoader {
    /// Empty loader: loads succeed, every lookup fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` at `address`.
    pub fn with_symbol(self, name: &str, address: *const ()) -> Self {
        self.insert_symbol(name, address);
        self
    }

    /// Register every name in `names` at the same `address`.
    pub fn with_symbols(self, names: &[&CStr], address: *const ()) -> Self {
        for name in names {
            self.insert_symbol(&name.to_string_lossy(), address);
        }
        self
    }

    /// Unregister `name`.
    pub fn without_symbol(self, name: &str) -> Self {
        self.remove_symbol(name);
        self
    }

    /// Make every load attempt fail.
    pub fn failing(self) -> Self {
        self.set_load_failure(true);
        self
    }

    /// Register `name` at `address`; affects libraries loaded afterwards.
    pub fn insert_symbol(&self, name: &str, address: *const ()) {
        self.symbols.lock().insert(name.to_owned(), address as usize);
    }

    /// Unregister `name`; affects libraries loaded afterwards.
    pub fn remove_symbol(&self, name: &str) {
        self.symbols.lock().remove(name);
    }

    /// Toggle load failure.
    pub fn set_load_failure(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    /// Shared counters.
    pub fn stats(&self) -> Arc<LoadStats> {
        Arc::clone(&self.stats)
    }
}

impl fmt::Debug for MockLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockLoader")
            .field("symbols", &self.symbols.lock().len())
            .field("fail_load", &self.fail_load.load(Ordering::SeqCst))
            .field("stats", &self.stats)
            .finish()
    }
}

impl LibraryLoader for MockLoader {
    type Library = MockLibrary;

    fn load(&self, name: &OsStr) -> Result<MockLibrary, LoadError> {
        self.stats.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(LoadError::new(name, "mock loader configured to fail"));
        }
        Ok(MockLibrary {
            symbols: self.symbols.lock().clone(),
            stats: Arc::clone(&self.stats),
        })
    }
}

/// Snapshot of the loader's exports taken at load time.
#[derive(Debug)]
pub struct MockLibrary {
    symbols: HashMap<String, usize>,
    stats: Arc<LoadStats>,
}

impl SymbolSource for MockLibrary {
    fn address(&self, symbol: &CStr) -> Option<NonNull<c_void>> {
        let name = symbol.to_string_lossy();
        self.stats.lookups.lock().push(name.to_string());
        self.symbols
            .get(name.as_ref())
            .and_then(|&address| NonNull::new(address as *mut c_void))
    }
}

impl Drop for MockLibrary {
    fn drop(&mut self) {
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "system" fn noop() {}

    #[test]
    fn test_library_snapshots_symbols() {
        let loader = MockLoader::new().with_symbol("A", noop as *const ());
        let library = loader.load(OsStr::new("x.dll")).expect("load");
        loader.remove_symbol("A");

        assert!(library.address(c"A").is_some());
        assert!(library.address(c"B").is_none());
        assert_eq!(loader.stats().lookups(), vec!["A", "B"]);
    }

    #[test]
    fn test_release_counted_on_drop() {
        let loader = MockLoader::new();
        let stats = loader.stats();
        drop(loader.load(OsStr::new("x.dll")).expect("load"));
        assert_eq!(stats.loads(), 1);
        assert_eq!(stats.releases(), 1);
    }

    #[test]
    fn test_failing_loader() {
        let loader = MockLoader::new().failing();
        let err = loader.load(OsStr::new("x.dll")).expect_err("should fail");
        assert_eq!(err.library, "x.dll");
        assert_eq!(loader.stats().loads(), 1);
    }
}
