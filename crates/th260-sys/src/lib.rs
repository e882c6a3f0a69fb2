//! PicoQuant TH260Lib (TimeHarp 260 PICO / NANO) bindings.
//!
//! - [`consts`]: every definition of `th260defin.h`, value for value.
//! - [`errors`]: the library's negative return codes.
//! - [`Th260Library`]: the 44 functions of `th260lib.h`, bound lazily from
//!   the vendor library the first time any of them is called.
//!
//! Calls are pass-through: return codes are not interpreted here.

#![allow(unsafe_code)]

pub mod consts;
pub mod errors;

use std::ffi::{c_char, c_double, c_int, c_uint, OsString};

use dll_binding::{entry_points, BindError, LazyBinding, LibraryLoader, SystemLoader};

pub use dll_binding::{COULD_NOT_FIND_FUNCTION, FAILED_TO_LOAD_DLL};
pub use errors::Th260ErrorCode;

/// Default library file name for this target.
#[cfg(all(windows, target_pointer_width = "64"))]
pub const DEFAULT_LIBRARY_NAME: &str = "th260lib64.dll";
/// Default library file name for this target.
#[cfg(all(windows, not(target_pointer_width = "64")))]
pub const DEFAULT_LIBRARY_NAME: &str = "th260lib.dll";
/// Default library file name for this target.
#[cfg(not(windows))]
pub const DEFAULT_LIBRARY_NAME: &str = "libth260.so";

/// Handle to TH260Lib, loaded on first use.
pub struct Th260Library<L: LibraryLoader = SystemLoader> {
    binding: LazyBinding<L, Th260EntryPoints>,
}

impl Th260Library<SystemLoader> {
    /// Bind [`DEFAULT_LIBRARY_NAME`] through the OS loader.
    pub fn new() -> Self {
        Self::with_loader(SystemLoader)
    }
}

impl Default for Th260Library<SystemLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LibraryLoader> Th260Library<L> {
    /// Bind [`DEFAULT_LIBRARY_NAME`] through `loader`.
    pub fn with_loader(loader: L) -> Self {
        Self::with_loader_and_name(loader, DEFAULT_LIBRARY_NAME)
    }

    /// Bind an explicit file name or path through `loader`.
    pub fn with_loader_and_name(loader: L, library: impl Into<OsString>) -> Self {
        Self {
            binding: LazyBinding::new(loader, library),
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

    /// The underlying binding.
    pub fn binding(&self) -> &LazyBinding<L, Th260EntryPoints> {
        &self.binding
    }
}

impl<L: LibraryLoader> std::fmt::Debug for Th260Library<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Th260Library")
            .field("binding", &self.binding)
            .finish()
    }
}

entry_points! {
    /// Resolved exports of TH260Lib, in header order.
    pub struct Th260EntryPoints for Th260Library {
        /// `TH260_GetLibraryVersion`; `version` needs [`consts::MAXSTRLEN_LIBVER`] bytes.
        fn get_library_version(version: *mut c_char) -> c_int = c"TH260_GetLibraryVersion";
        /// `TH260_GetErrorString`; `errstring` needs [`consts::MAXSTRLEN_ERRSTR`] bytes.
        fn get_error_string(errstring: *mut c_char, errcode: c_int) -> c_int = c"TH260_GetErrorString";
        /// `TH260_OpenDevice`; `serial` needs [`consts::MAXSTRLEN_SERIAL`] bytes.
        fn open_device(devidx: c_int, serial: *mut c_char) -> c_int = c"TH260_OpenDevice";
        /// `TH260_CloseDevice`.
        fn close_device(devidx: c_int) -> c_int = c"TH260_CloseDevice";
        /// `TH260_Initialize`; `mode` is one of the `MODE_*` constants.
        fn initialize(devidx: c_int, mode: c_int) -> c_int = c"TH260_Initialize";
        /// `TH260_GetHardwareInfo`.
        fn get_hardware_info(devidx: c_int, model: *mut c_char, partno: *mut c_char, version: *mut c_char) -> c_int = c"TH260_GetHardwareInfo";
        /// `TH260_GetSerialNumber`.
        fn get_serial_number(devidx: c_int, serial: *mut c_char) -> c_int = c"TH260_GetSerialNumber";
        /// `TH260_GetFeatures`.
        fn get_features(devidx: c_int, features: *mut c_int) -> c_int = c"TH260_GetFeatures";
        /// `TH260_GetBaseResolution`.
        fn get_base_resolution(devidx: c_int, resolution: *mut c_double, binsteps: *mut c_int) -> c_int = c"TH260_GetBaseResolution";
        /// `TH260_GetNumOfInputChannels`.
        fn get_num_of_input_channels(devidx: c_int, nchannels: *mut c_int) -> c_int = c"TH260_GetNumOfInputChannels";
        /// `TH260_SetSyncDiv`.
        fn set_sync_div(devidx: c_int, div: c_int) -> c_int = c"TH260_SetSyncDiv";
        /// `TH260_SetSyncCFD` (PICO only).
        fn set_sync_cfd(devidx: c_int, level: c_int, zc: c_int) -> c_int = c"TH260_SetSyncCFD";
        /// `TH260_SetSyncEdgeTrg` (NANO only).
        fn set_sync_edge_trg(devidx: c_int, level: c_int, edge: c_int) -> c_int = c"TH260_SetSyncEdgeTrg";
        /// `TH260_SetSyncChannelOffset`.
        fn set_sync_channel_offset(devidx: c_int, value: c_int) -> c_int = c"TH260_SetSyncChannelOffset";
        /// `TH260_SetInputCFD` (PICO only).
        fn set_input_cfd(devidx: c_int, channel: c_int, level: c_int, zc: c_int) -> c_int = c"TH260_SetInputCFD";
        /// `TH260_SetInputEdgeTrg` (NANO only).
        fn set_input_edge_trg(devidx: c_int, channel: c_int, level: c_int, edge: c_int) -> c_int = c"TH260_SetInputEdgeTrg";
        /// `TH260_SetInputChannelOffset`.
        fn set_input_channel_offset(devidx: c_int, channel: c_int, value: c_int) -> c_int = c"TH260_SetInputChannelOffset";
        /// `TH260_SetInputChannelEnable`.
        fn set_input_channel_enable(devidx: c_int, channel: c_int, enable: c_int) -> c_int = c"TH260_SetInputChannelEnable";
        /// `TH260_SetInputDeadTime`.
        fn set_input_dead_time(devidx: c_int, channel: c_int, tdcode: c_int) -> c_int = c"TH260_SetInputDeadTime";
        /// `TH260_SetTimingMode` (PICO only).
        fn set_timing_mode(devidx: c_int, mode: c_int) -> c_int = c"TH260_SetTimingMode";
        /// `TH260_SetStopOverflow`.
        fn set_stop_overflow(devidx: c_int, stop_ovfl: c_int, stopcount: c_uint) -> c_int = c"TH260_SetStopOverflow";
        /// `TH260_SetBinning`.
        fn set_binning(devidx: c_int, binning: c_int) -> c_int = c"TH260_SetBinning";
        /// `TH260_SetOffset`.
        fn set_offset(devidx: c_int, offset: c_int) -> c_int = c"TH260_SetOffset";
        /// `TH260_SetHistoLen`.
        fn set_histo_len(devidx: c_int, lencode: c_int, actuallen: *mut c_int) -> c_int = c"TH260_SetHistoLen";
        /// `TH260_SetMeasControl`.
        fn set_meas_control(devidx: c_int, control: c_int, startedge: c_int, stopedge: c_int) -> c_int = c"TH260_SetMeasControl";
        /// `TH260_SetTriggerOutput`.
        fn set_trigger_output(devidx: c_int, period: c_int) -> c_int = c"TH260_SetTriggerOutput";
        /// `TH260_ClearHistMem`.
        fn clear_hist_mem(devidx: c_int) -> c_int = c"TH260_ClearHistMem";
        /// `TH260_StartMeas`.
        fn start_meas(devidx: c_int, tacq: c_int) -> c_int = c"TH260_StartMeas";
        /// `TH260_StopMeas`.
        fn stop_meas(devidx: c_int) -> c_int = c"TH260_StopMeas";
        /// `TH260_CTCStatus`.
        fn ctc_status(devidx: c_int, ctcstatus: *mut c_int) -> c_int = c"TH260_CTCStatus";
        /// `TH260_GetHistogram`; `chcount` needs room for the configured histogram length.
        fn get_histogram(devidx: c_int, chcount: *mut c_uint, channel: c_int, clear: c_int) -> c_int = c"TH260_GetHistogram";
        /// `TH260_GetResolution`.
        fn get_resolution(devidx: c_int, resolution: *mut c_double) -> c_int = c"TH260_GetResolution";
        /// `TH260_GetSyncRate`.
        fn get_sync_rate(devidx: c_int, syncrate: *mut c_int) -> c_int = c"TH260_GetSyncRate";
        /// `TH260_GetCountRate`.
        fn get_count_rate(devidx: c_int, channel: c_int, cntrate: *mut c_int) -> c_int = c"TH260_GetCountRate";
        /// `TH260_GetFlags`.
        fn get_flags(devidx: c_int, flags: *mut c_int) -> c_int = c"TH260_GetFlags";
        /// `TH260_GetElapsedMeasTime`.
        fn get_elapsed_meas_time(devidx: c_int, elapsed: *mut c_double) -> c_int = c"TH260_GetElapsedMeasTime";
        /// `TH260_GetSyncPeriod`.
        fn get_sync_period(devidx: c_int, period: *mut c_double) -> c_int = c"TH260_GetSyncPeriod";
        /// `TH260_GetWarnings`.
        fn get_warnings(devidx: c_int, warnings: *mut c_int) -> c_int = c"TH260_GetWarnings";
        /// `TH260_GetWarningsText`; `text` needs [`consts::MAXSTRLEN_WRNTXT`] bytes.
        fn get_warnings_text(devidx: c_int, text: *mut c_char, warnings: c_int) -> c_int = c"TH260_GetWarningsText";
        /// `TH260_GetHardwareDebugInfo`.
        fn get_hardware_debug_info(devidx: c_int, debuginfo: *mut c_char) -> c_int = c"TH260_GetHardwareDebugInfo";
        /// `TH260_SetMarkerEdges` (TTTR modes).
        fn set_marker_edges(devidx: c_int, me1: c_int, me2: c_int, me3: c_int, me4: c_int) -> c_int = c"TH260_SetMarkerEdges";
        /// `TH260_SetMarkerEnable` (TTTR modes).
        fn set_marker_enable(devidx: c_int, en1: c_int, en2: c_int, en3: c_int, en4: c_int) -> c_int = c"TH260_SetMarkerEnable";
        /// `TH260_SetMarkerHoldoffTime` (TTTR modes).
        fn set_marker_holdoff_time(devidx: c_int, holdofftime: c_int) -> c_int = c"TH260_SetMarkerHoldoffTime";
        /// `TH260_ReadFiFo`; `buffer` holds `count` records.
        fn read_fifo(devidx: c_int, buffer: *mut c_uint, count: c_int, nactual: *mut c_int) -> c_int = c"TH260_ReadFiFo";
    }
}
