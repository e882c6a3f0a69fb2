//! Lazy binding of vendor DLL entry points.
//!
//! Hardware vendors ship closed-source DLLs (PI's `MMC410.DLL`, PicoQuant's
//! `th260lib64.dll`, ...) whose exports we call through typed function
//! pointers. This crate provides the small amount of machinery every such
//! binding needs:
//!
//! - [`LibraryLoader`] / [`SymbolSource`]: the seam between "open a library"
//!   and "look up an export". [`SystemLoader`] uses `libloading`; the `mock`
//!   feature adds [`mock::MockLoader`] for tests that must not touch the OS.
//! - [`EntryPoints`] + [`entry_points!`]: a declarative table of
//!   `(method, export name, signature)` rows resolved in one pass.
//! - [`LazyBinding`]: loads on first use, resolves every row, and rolls back
//!   completely if any export is missing. A failed attempt is never cached.
//!
//! # Failure Codes
//!
//! Forwarding methods generated by [`entry_points!`] return plain `c_int`
//! codes so they can sit behind a C ABI. Binding failures use two sentinels
//! that cannot collide with the vendor return values we wrap:
//!
//! | Failure | Code |
//! |---------|------|
//! | library could not be opened | [`FAILED_TO_LOAD_DLL`] (`i32::MIN`) |
//! | library opened, export missing | [`COULD_NOT_FIND_FUNCTION`] (`i32::MIN + 1`) |
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::ffi::c_int;
//! use dll_binding::{entry_points, LazyBinding, LibraryLoader, SystemLoader};
//!
//! pub struct Stage<L: LibraryLoader = SystemLoader> {
//!     binding: LazyBinding<L, StageEntryPoints>,
//! }
//!
//! entry_points! {
//!     pub struct StageEntryPoints for Stage {
//!         fn move_a(axis: c_int, position: c_int) -> c_int = c"MMC_moveA";
//!     }
//! }
//!
//! let stage = Stage { binding: LazyBinding::new(SystemLoader, "MMC410.DLL") };
//! let rc = unsafe { stage.move_a(3, 1000) };
//! ```

#![allow(unsafe_code)]

mod binding;
mod error;
mod loader;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod table;

pub use binding::{EntryPoints, LazyBinding, MissingSymbol};
pub use error::{BindError, LoadError};
pub use loader::{LibraryLoader, SymbolSource, SystemLoader};

use std::ffi::c_int;

/// Returned by forwarding methods when the vendor library cannot be opened.
pub const FAILED_TO_LOAD_DLL: c_int = i32::MIN;

/// Returned by forwarding methods when the library lacks a required export.
pub const COULD_NOT_FIND_FUNCTION: c_int = i32::MIN + 1;

#[doc(hidden)]
pub mod __private {
    pub use std::ffi::c_void;
    pub use std::mem::transmute;
}
