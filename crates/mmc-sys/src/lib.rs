//! Lazily bound entry points of PI's `MMC410.DLL`.
//!
//! `MMC410.DLL` drives Mercury DC/stepper controllers (and RED joystick
//! boxes) daisy-chained on one serial port. This crate does not interpret any
//! of its return values: each method on [`MmcLibrary`] forwards its arguments
//! to the export of the same name and hands the vendor's `int` back unchanged.
//!
//! The DLL is opened on the first call to any method. If it cannot be opened,
//! or if any of the 32 exports is missing, the call returns
//! [`FAILED_TO_LOAD_DLL`] or [`COULD_NOT_FIND_FUNCTION`] respectively and the
//! next call tries again.
//!
//! With the `c-exports` feature the `cdylib` also exports every entry point
//! under its vendor name, backed by one process-wide [`MmcLibrary`].

#![allow(unsafe_code)]

use std::ffi::{c_char, c_int};

use dll_binding::{entry_points, BindError, LazyBinding, LibraryLoader, SystemLoader};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

pub use dll_binding::{COULD_NOT_FIND_FUNCTION, FAILED_TO_LOAD_DLL};

#[cfg(feature = "mock")]
pub use dll_binding::mock;

#[cfg(feature = "c-exports")]
pub mod exports;

/// File name passed to the OS loader.
pub const LIBRARY_NAME: &str = "MMC410.DLL";

/// Handle to `MMC410.DLL`, loaded on first use.
pub struct MmcLibrary<L: LibraryLoader = SystemLoader> {
    binding: LazyBinding<L, MmcEntryPoints>,
    session: ReentrantMutex<()>,
}

impl MmcLibrary<SystemLoader> {
    /// Bind against the DLL on the system search path.
    pub fn new() -> Self {
        Self::with_loader(SystemLoader)
    }
}

impl Default for MmcLibrary<SystemLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LibraryLoader> MmcLibrary<L> {
    /// Bind through `loader` instead of the OS loader.
    pub fn with_loader(loader: L) -> Self {
        Self {
            binding: LazyBinding::new(loader, LIBRARY_NAME),
            session: ReentrantMutex::new(()),
        }
    }

    /// Load and resolve now instead of on the first call.
    pub fn ensure_loaded(&self) -> Result<(), BindError> {
        self.binding.ensure_loaded().map(|_| ())
    }

    /// Whether every entry point is currently resolved.
    pub fn is_loaded(&self) -> bool {
        self.binding.is_loaded()
    }

    /// Exclusive use of the DLL's device selection.
    ///
    /// The DLL keeps one "currently selected" device per process. Hold the
    /// guard across a select and the calls that depend on it. The lock is
    /// reentrant, so a holder may take it again on the same thread. Plain
    /// forwarded calls never take it.
    pub fn session(&self) -> ReentrantMutexGuard<'_, ()> {
        self.session.lock()
    }

    /// The underlying binding.
    pub fn binding(&self) -> &LazyBinding<L, MmcEntryPoints> {
        &self.binding
    }
}

impl<L: LibraryLoader> std::fmt::Debug for MmcLibrary<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MmcLibrary")
            .field("binding", &self.binding)
            .finish()
    }
}

entry_points! {
    /// Resolved exports of `MMC410.DLL`, in resolution order.
    pub struct MmcEntryPoints for MmcLibrary {
        /// `MMC_COM_open`: open `port_number` at `baudrate`.
        fn com_open(port_number: c_int, baudrate: c_int) -> c_int = c"MMC_COM_open";
        /// `MMC_COM_close`.
        fn com_close() -> c_int = c"MMC_COM_close";
        /// `MMC_COM_setBuffer`.
        fn com_set_buffer() -> c_int = c"MMC_COM_setBuffer";
        /// `MMC_COM_EOF`: bytes pending in the receive buffer.
        fn com_eof() -> c_int = c"MMC_COM_EOF";
        /// `MMC_COM_clear`: flush the receive buffer.
        fn com_clear() -> c_int = c"MMC_COM_clear";
        /// `MMC_getChar`: read one character into `character`.
        fn get_char(character: *mut c_char) -> c_int = c"MMC_getChar";
        /// `MMC_getDLLversion`.
        fn get_dll_version() -> c_int = c"MMC_getDLLversion";
        /// `MMC_getMacro`: read macro `macno` into `report`.
        fn get_macro(macno: c_int, report: *mut c_char) -> c_int = c"MMC_getMacro";
        /// `MMC_getPos`: position of the selected axis in counts.
        fn get_pos() -> c_int = c"MMC_getPos";
        /// `MDC_getPosErr`: following error of the selected DC axis.
        fn mdc_get_pos_err() -> c_int = c"MDC_getPosErr";
        /// `MMC_getReport`: send `command` and read the answer into `report`.
        fn get_report(command: *mut c_char, report: *mut c_char) -> c_int = c"MMC_getReport";
        /// `MMC_getSTB`: status byte `bytenumber`.
        fn get_stb(bytenumber: c_int) -> c_int = c"MMC_getSTB";
        /// `MMC_getString`: read `count` characters into `report`.
        fn get_string(report: *mut c_char, count: u16) -> c_int = c"MMC_getString";
        /// `MMC_getStringCR`: read up to a carriage return into `report`.
        fn get_string_cr(report: *mut c_char) -> c_int = c"MMC_getStringCR";
        /// `MMC_getVal`: numeric value for `command_id`.
        fn get_val(command_id: c_int) -> c_int = c"MMC_getVal";
        /// `MMC_initNetwork`: scan axes `1..=max_axis`, returns a bitmask.
        fn init_network(max_axis: c_int) -> c_int = c"MMC_initNetwork";
        /// `MMC_moveA`: absolute move of `axis` to `position` counts.
        fn move_a(axis: c_int, position: c_int) -> c_int = c"MMC_moveA";
        /// `MMC_moveR`: relative move of `axis` by `shift` counts.
        fn move_r(axis: c_int, shift: c_int) -> c_int = c"MMC_moveR";
        /// `MDC_moving`.
        fn mdc_moving() -> c_int = c"MDC_moving";
        /// `MST_moving`.
        fn mst_moving() -> c_int = c"MST_moving";
        /// `MMC_setDevice`: address subsequent commands to `axis`.
        fn set_device(axis: c_int) -> c_int = c"MMC_setDevice";
        /// `MMC_select`: select a registered `axis`.
        fn select(axis: c_int) -> c_int = c"MMC_select";
        /// `MMC_sendChar`.
        fn send_char(character: c_char) -> c_int = c"MMC_sendChar";
        /// `MMC_sendString`: send a raw string.
        fn send_string(send_string: *mut c_char) -> c_int = c"MMC_sendString";
        /// `MMC_sendCommand`: send a command to the selected axis.
        fn send_command(command: *mut c_char) -> c_int = c"MMC_sendCommand";
        /// `MDC_waitStop`: block until the DC axis stops.
        fn mdc_wait_stop() -> c_int = c"MDC_waitStop";
        /// `MST_waitStop`: block until the stepper axis stops.
        fn mst_wait_stop() -> c_int = c"MST_waitStop";
        /// `RED_getJoy`.
        fn red_get_joy(axis: c_int) -> c_int = c"RED_getJoy";
        /// `RED_getSCC`.
        fn red_get_scc(command_id: c_int) -> c_int = c"RED_getSCC";
        /// `RED_getReport`.
        fn red_get_report(axis: c_int, command_id: c_int, report: *mut c_char) -> c_int = c"RED_getReport";
        /// `RED_moving`.
        fn red_moving() -> c_int = c"RED_moving";
        /// `RED_waitStop`.
        fn red_wait_stop(axis: c_int) -> c_int = c"RED_waitStop";
    }
}

#[cfg(test)]
mod tests {
    use dll_binding::EntryPoints;

    use super::*;

    #[test]
    fn test_table_order() {
        let names: Vec<_> = MmcEntryPoints::SYMBOLS
            .iter()
            .map(|s| s.to_str().expect("ascii"))
            .collect();
        assert_eq!(names.len(), 32);
        assert_eq!(names.first(), Some(&"MMC_COM_open"));
        assert_eq!(names[9], "MDC_getPosErr");
        assert_eq!(names[12], "MMC_getString");
        assert_eq!(names.last(), Some(&"RED_waitStop"));
    }

    #[test]
    fn test_session_is_reentrant() {
        let library = MmcLibrary::with_loader(dll_binding::mock::MockLoader::new());
        let outer = library.session();
        let inner = library.session();
        drop(inner);
        drop(outer);
    }

    #[test]
    fn test_not_loaded_until_first_call() {
        let library = MmcLibrary::with_loader(dll_binding::mock::MockLoader::new());
        assert!(!library.is_loaded());
        assert_eq!(library.binding().library_name(), LIBRARY_NAME);
    }
}
