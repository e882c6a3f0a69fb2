//! PicoQuant TimeHarp 260 driver on top of TH260Lib.
//!
//! A [`Th260Device`] owns one opened board (index 0..4). Dropping it closes the
//! board. The library handle is shared, so several boards can be driven from
//! one [`Th260Library`].
//!
//! Histogramming follows the vendor's sequence:
//!
//! 1. `open` + `initialize(mode)`
//! 2. input configuration (CFD on PICO boards, edge triggers on NANO boards)
//! 3. `set_histo_len`, `clear_hist_mem`, `start_meas`
//! 4. poll `ctc_status` until the acquisition time has elapsed
//! 5. `stop_meas`, then `histogram` per channel
//!
//! [`Th260Device::acquire_histograms`] runs steps 3 to 5.

#![allow(unsafe_code)]

use std::ffi::{c_char, c_double, c_int};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bitflags::bitflags;
use dll_binding::{LibraryLoader, SystemLoader};
use serde::{Deserialize, Serialize};
use th260_sys::{consts, Th260ErrorCode, Th260Library};
use tracing::{debug, info, warn};

use crate::config::TimeHarpConfig;
use crate::error::{AppResult, DaqError};

/// Acquisition mode passed to `TH260_Initialize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    /// On-board histogramming.
    #[default]
    #[serde(alias = "hist")]
    Histogram,
    /// TTTR mode T2.
    T2,
    /// TTTR mode T3.
    T3,
}

impl MeasurementMode {
    /// `MODE_*` value.
    pub fn code(self) -> c_int {
        match self {
            MeasurementMode::Histogram => consts::MODE_HIST,
            MeasurementMode::T2 => consts::MODE_T2,
            MeasurementMode::T3 => consts::MODE_T3,
        }
    }

    /// Whether records are read through the FIFO instead of histograms.
    pub fn is_tttr(self) -> bool {
        !matches!(self, MeasurementMode::Histogram)
    }
}

/// Trigger edge for NANO inputs and measurement control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerEdge {
    /// Rising edge.
    Rising,
    /// Falling edge.
    #[default]
    Falling,
}

impl TriggerEdge {
    /// `EDGE_*` value.
    pub fn code(self) -> c_int {
        match self {
            TriggerEdge::Rising => consts::EDGE_RISING,
            TriggerEdge::Falling => consts::EDGE_FALLING,
        }
    }
}

/// Board variant, from the model string of `TH260_GetHardwareInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Th260Model {
    /// TimeHarp 260 PICO, constant fraction discriminators.
    Pico,
    /// TimeHarp 260 NANO, edge triggers.
    Nano,
    /// Any other identification string.
    Unknown,
}

impl Th260Model {
    /// Classify a hardware model string.
    pub fn from_ident(model: &str) -> Self {
        if model.starts_with(consts::HWIDENT_PICO) {
            Th260Model::Pico
        } else if model.starts_with(consts::HWIDENT_NANO) {
            Th260Model::Nano
        } else {
            Th260Model::Unknown
        }
    }
}

bitflags! {
    /// Result of `TH260_GetFeatures`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Features: c_int {
        /// DLL license available.
        const DLL = consts::FEATURE_DLL;
        /// TTTR mode available.
        const TTTR = consts::FEATURE_TTTR;
        /// Markers available.
        const MARKERS = consts::FEATURE_MARKERS;
        /// Long range mode available.
        const LOWRES = consts::FEATURE_LOWRES;
        /// Trigger output available.
        const TRIGOUT = consts::FEATURE_TRIGOUT;
        /// Programmable dead time available.
        const PROG_TD = consts::FEATURE_PROG_TD;
    }
}

bitflags! {
    /// Result of `TH260_GetFlags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: c_int {
        /// Histogram mode only.
        const OVERFLOW = consts::FLAG_OVERFLOW;
        /// TTTR mode only.
        const FIFOFULL = consts::FLAG_FIFOFULL;
        /// Sync signal lost.
        const SYNC_LOST = consts::FLAG_SYNC_LOST;
        /// Events dropped.
        const EVTS_DROPPED = consts::FLAG_EVTS_DROPPED;
        /// Hardware error, must contact support.
        const SYSERROR = consts::FLAG_SYSERROR;
        /// Software error.
        const SOFTERROR = consts::FLAG_SOFTERROR;
    }
}

bitflags! {
    /// Result of `TH260_GetWarnings`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Warnings: c_int {
        #[allow(missing_docs)]
        const SYNC_RATE_ZERO = consts::WARNING_SYNC_RATE_ZERO;
        #[allow(missing_docs)]
        const SYNC_RATE_VERY_LOW = consts::WARNING_SYNC_RATE_VERY_LOW;
        #[allow(missing_docs)]
        const SYNC_RATE_TOO_HIGH = consts::WARNING_SYNC_RATE_TOO_HIGH;
        #[allow(missing_docs)]
        const INPT_RATE_ZERO = consts::WARNING_INPT_RATE_ZERO;
        #[allow(missing_docs)]
        const INPT_RATE_TOO_HIGH = consts::WARNING_INPT_RATE_TOO_HIGH;
        #[allow(missing_docs)]
        const INPT_RATE_RATIO = consts::WARNING_INPT_RATE_RATIO;
        #[allow(missing_docs)]
        const DIVIDER_GREATER_ONE = consts::WARNING_DIVIDER_GREATER_ONE;
        #[allow(missing_docs)]
        const TIME_SPAN_TOO_SMALL = consts::WARNING_TIME_SPAN_TOO_SMALL;
        #[allow(missing_docs)]
        const OFFSET_UNNECESSARY = consts::WARNING_OFFSET_UNNECESSARY;
        #[allow(missing_docs)]
        const DIVIDER_TOO_SMALL = consts::WARNING_DIVIDER_TOO_SMALL;
        #[allow(missing_docs)]
        const COUNTS_DROPPED = consts::WARNING_COUNTS_DROPPED;
    }
}

/// Identification strings of a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareInfo {
    /// e.g. "TimeHarp 260 P".
    pub model: String,
    /// Part number.
    pub part_number: String,
    /// Hardware version.
    pub version: String,
}

/// State of one device index as seen by [`discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// A board answered; it was closed again.
    Available {
        /// Serial number reported by `TH260_OpenDevice`.
        serial: String,
    },
    /// No board at this index.
    Empty,
    /// The open failed for another reason, e.g. the board is in use.
    Failed {
        /// TH260Lib error code.
        code: c_int,
    },
}

/// One device index and what was found there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSlot {
    /// Device index 0..MAXDEVNUM.
    pub index: c_int,
    /// Probe result.
    pub state: SlotState,
}

/// Result of [`Th260Device::acquire_histograms`].
#[derive(Debug, Clone)]
pub struct HistogramSet {
    /// One histogram per input channel.
    pub counts: Vec<Vec<u32>>,
    /// Flags read after the acquisition stopped.
    pub flags: Flags,
    /// Elapsed measurement time in ms.
    pub elapsed_ms: f64,
}

impl HistogramSet {
    /// Whether a histogram bin overflowed.
    pub fn overflowed(&self) -> bool {
        self.flags.contains(Flags::OVERFLOW)
    }

    /// Sum of all counts per channel.
    pub fn totals(&self) -> Vec<u64> {
        self.counts
            .iter()
            .map(|channel| channel.iter().map(|&c| u64::from(c)).sum())
            .collect()
    }
}

/// Histogram length selected by a length code (`1024 * 2^code`).
pub fn histogram_len_for_code(code: c_int) -> Option<usize> {
    (0..=consts::MAXLENCODE)
        .contains(&code)
        .then(|| 1024usize << code)
}

/// Version string of the library, e.g. "3.1".
pub fn library_version<L: LibraryLoader>(library: &Th260Library<L>) -> AppResult<String> {
    library.ensure_loaded()?;
    let mut buffer = [0u8; consts::MAXSTRLEN_LIBVER];
    let rc = unsafe { library.get_library_version(buffer.as_mut_ptr().cast::<c_char>()) };
    check("TH260_GetLibraryVersion", rc)?;
    Ok(c_string(&buffer))
}

/// Text the library associates with `code`.
pub fn error_string<L: LibraryLoader>(library: &Th260Library<L>, code: c_int) -> AppResult<String> {
    library.ensure_loaded()?;
    let mut buffer = [0u8; consts::MAXSTRLEN_ERRSTR];
    let rc = unsafe { library.get_error_string(buffer.as_mut_ptr().cast::<c_char>(), code) };
    check("TH260_GetErrorString", rc)?;
    Ok(c_string(&buffer))
}

/// Probe every device index.
///
/// Boards that answer are closed again, so this must not run while another
/// process holds them.
pub fn discover<L: LibraryLoader>(library: &Th260Library<L>) -> AppResult<Vec<DeviceSlot>> {
    library.ensure_loaded()?;
    let mut slots = Vec::with_capacity(consts::MAXDEVNUM as usize);
    for index in 0..consts::MAXDEVNUM {
        let mut serial = [0u8; consts::MAXSTRLEN_SERIAL];
        let rc = unsafe { library.open_device(index, serial.as_mut_ptr().cast::<c_char>()) };
        let state = if rc == 0 {
            let close = unsafe { library.close_device(index) };
            if close < 0 {
                warn!(index, code = close, "TH260_CloseDevice failed after probe");
            }
            SlotState::Available {
                serial: c_string(&serial),
            }
        } else if rc == Th260ErrorCode::DeviceOpenFail.code() {
            SlotState::Empty
        } else {
            SlotState::Failed { code: rc }
        };
        debug!(index, ?state, "TH260 device slot probed");
        slots.push(DeviceSlot { index, state });
    }
    Ok(slots)
}

/// One opened TimeHarp 260 board.
pub struct Th260Device<L: LibraryLoader = SystemLoader> {
    library: Arc<Th260Library<L>>,
    index: c_int,
    serial: String,
    mode: Option<MeasurementMode>,
    model: Option<Th260Model>,
    histogram_len: Option<usize>,
    open: bool,
}

impl Th260Device<SystemLoader> {
    /// Open and configure the board described by `config`.
    pub fn from_config(config: &TimeHarpConfig) -> AppResult<Self> {
        let library = match &config.library {
            Some(path) => Th260Library::with_loader_and_name(SystemLoader, path.as_os_str()),
            None => Th260Library::new(),
        };
        let mut device = Self::open(Arc::new(library), config.device_index)?;
        device.configure(config)?;
        Ok(device)
    }
}

impl<L: LibraryLoader> Th260Device<L> {
    /// Open board `index`.
    pub fn open(library: Arc<Th260Library<L>>, index: c_int) -> AppResult<Self> {
        in_range("device index", index, 0, consts::MAXDEVNUM - 1)?;
        library.ensure_loaded()?;
        let mut serial = [0u8; consts::MAXSTRLEN_SERIAL];
        let rc = unsafe { library.open_device(index, serial.as_mut_ptr().cast::<c_char>()) };
        check("TH260_OpenDevice", rc)?;
        let serial = c_string(&serial);
        info!(index, %serial, "TimeHarp 260 opened");
        Ok(Self {
            library,
            index,
            serial,
            mode: None,
            model: None,
            histogram_len: None,
            open: true,
        })
    }

    fn bound(&self) -> AppResult<&Th260Library<L>> {
        self.library.ensure_loaded()?;
        Ok(&self.library)
    }

    /// Device index.
    pub fn index(&self) -> c_int {
        self.index
    }

    /// Serial number reported when the board was opened.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Mode passed to the last successful `initialize`.
    pub fn mode(&self) -> Option<MeasurementMode> {
        self.mode
    }

    /// Board variant, known after `initialize`.
    pub fn model(&self) -> Option<Th260Model> {
        self.model
    }

    /// Histogram length set by the last `set_histo_len`.
    pub fn histogram_len(&self) -> Option<usize> {
        self.histogram_len
    }

    /// Close the board now instead of on drop.
    ///
    /// If the vendor call fails the board stays marked open and drop tries
    /// once more.
    pub fn close(mut self) -> AppResult<()> {
        let rc = unsafe { self.bound()?.close_device(self.index) };
        check("TH260_CloseDevice", rc)?;
        self.open = false;
        info!(index = self.index, "TimeHarp 260 closed");
        Ok(())
    }

    /// Initialize the board for `mode` and detect its model.
    pub fn initialize(&mut self, mode: MeasurementMode) -> AppResult<()> {
        let rc = unsafe { self.bound()?.initialize(self.index, mode.code()) };
        check("TH260_Initialize", rc)?;
        self.mode = Some(mode);
        self.histogram_len = None;
        let info = self.hardware_info()?;
        self.model = Some(Th260Model::from_ident(&info.model));
        info!(index = self.index, ?mode, model = %info.model, "TimeHarp 260 initialized");
        Ok(())
    }

    /// Model, part number and version strings.
    pub fn hardware_info(&self) -> AppResult<HardwareInfo> {
        let mut model = [0u8; consts::MAXSTRLEN_MODEL];
        let mut part = [0u8; consts::MAXSTRLEN_PART];
        let mut version = [0u8; consts::MAXSTRLEN_VERSION];
        let rc = unsafe {
            self.bound()?.get_hardware_info(
                self.index,
                model.as_mut_ptr().cast::<c_char>(),
                part.as_mut_ptr().cast::<c_char>(),
                version.as_mut_ptr().cast::<c_char>(),
            )
        };
        check("TH260_GetHardwareInfo", rc)?;
        Ok(HardwareInfo {
            model: c_string(&model),
            part_number: c_string(&part),
            version: c_string(&version),
        })
    }

    /// Serial number as currently reported.
    pub fn serial_number(&self) -> AppResult<String> {
        let mut serial = [0u8; consts::MAXSTRLEN_SERIAL];
        let rc = unsafe {
            self.bound()?
                .get_serial_number(self.index, serial.as_mut_ptr().cast::<c_char>())
        };
        check("TH260_GetSerialNumber", rc)?;
        Ok(c_string(&serial))
    }

    /// Licensed features.
    pub fn features(&self) -> AppResult<Features> {
        let mut bits: c_int = 0;
        let rc = unsafe { self.bound()?.get_features(self.index, &mut bits) };
        check("TH260_GetFeatures", rc)?;
        Ok(Features::from_bits_retain(bits))
    }

    /// Base resolution in ps and the number of binning steps.
    pub fn base_resolution(&self) -> AppResult<(f64, c_int)> {
        let mut resolution: c_double = 0.0;
        let mut binsteps: c_int = 0;
        let rc = unsafe {
            self.bound()?
                .get_base_resolution(self.index, &mut resolution, &mut binsteps)
        };
        check("TH260_GetBaseResolution", rc)?;
        Ok((resolution, binsteps))
    }

    /// Number of input channels (1 or 2).
    pub fn num_input_channels(&self) -> AppResult<c_int> {
        let mut channels: c_int = 0;
        let rc = unsafe {
            self.bound()?
                .get_num_of_input_channels(self.index, &mut channels)
        };
        check("TH260_GetNumOfInputChannels", rc)?;
        Ok(channels)
    }

    /// Sync divider, 1..=8.
    pub fn set_sync_div(&self, divider: c_int) -> AppResult<()> {
        in_range("sync divider", divider, consts::SYNCDIVMIN, consts::SYNCDIVMAX)?;
        let rc = unsafe { self.bound()?.set_sync_div(self.index, divider) };
        check("TH260_SetSyncDiv", rc)
    }

    /// Sync CFD in mV (PICO).
    pub fn set_sync_cfd(&self, level: c_int, zero_cross: c_int) -> AppResult<()> {
        in_range("CFD level", level, consts::CFDLVLMIN, consts::CFDLVLMAX)?;
        in_range("CFD zero cross", zero_cross, consts::CFDZCMIN, consts::CFDZCMAX)?;
        let rc = unsafe { self.bound()?.set_sync_cfd(self.index, level, zero_cross) };
        check("TH260_SetSyncCFD", rc)
    }

    /// Sync edge trigger in mV (NANO).
    pub fn set_sync_edge_trg(&self, level: c_int, edge: TriggerEdge) -> AppResult<()> {
        in_range("trigger level", level, consts::TRGLVLMIN, consts::TRGLVLMAX)?;
        let rc = unsafe { self.bound()?.set_sync_edge_trg(self.index, level, edge.code()) };
        check("TH260_SetSyncEdgeTrg", rc)
    }

    /// Sync channel offset in ps.
    pub fn set_sync_channel_offset(&self, offset: c_int) -> AppResult<()> {
        in_range("channel offset", offset, consts::CHANOFFSMIN, consts::CHANOFFSMAX)?;
        let rc = unsafe { self.bound()?.set_sync_channel_offset(self.index, offset) };
        check("TH260_SetSyncChannelOffset", rc)
    }

    /// Input CFD in mV (PICO).
    pub fn set_input_cfd(&self, channel: c_int, level: c_int, zero_cross: c_int) -> AppResult<()> {
        in_range("input channel", channel, 0, consts::MAXINPCHAN - 1)?;
        in_range("CFD level", level, consts::CFDLVLMIN, consts::CFDLVLMAX)?;
        in_range("CFD zero cross", zero_cross, consts::CFDZCMIN, consts::CFDZCMAX)?;
        let rc = unsafe {
            self.bound()?
                .set_input_cfd(self.index, channel, level, zero_cross)
        };
        check("TH260_SetInputCFD", rc)
    }

    /// Input edge trigger in mV (NANO).
    pub fn set_input_edge_trg(&self, channel: c_int, level: c_int, edge: TriggerEdge) -> AppResult<()> {
        in_range("input channel", channel, 0, consts::MAXINPCHAN - 1)?;
        in_range("trigger level", level, consts::TRGLVLMIN, consts::TRGLVLMAX)?;
        let rc = unsafe {
            self.bound()?
                .set_input_edge_trg(self.index, channel, level, edge.code())
        };
        check("TH260_SetInputEdgeTrg", rc)
    }

    /// Input channel offset in ps.
    pub fn set_input_channel_offset(&self, channel: c_int, offset: c_int) -> AppResult<()> {
        in_range("input channel", channel, 0, consts::MAXINPCHAN - 1)?;
        in_range("channel offset", offset, consts::CHANOFFSMIN, consts::CHANOFFSMAX)?;
        let rc = unsafe {
            self.bound()?
                .set_input_channel_offset(self.index, channel, offset)
        };
        check("TH260_SetInputChannelOffset", rc)
    }

    /// Enable or disable an input channel.
    pub fn set_input_channel_enable(&self, channel: c_int, enable: bool) -> AppResult<()> {
        in_range("input channel", channel, 0, consts::MAXINPCHAN - 1)?;
        let rc = unsafe {
            self.bound()?
                .set_input_channel_enable(self.index, channel, c_int::from(enable))
        };
        check("TH260_SetInputChannelEnable", rc)
    }

    /// Dead time code 0..=7 (boards with [`Features::PROG_TD`]).
    pub fn set_input_dead_time(&self, channel: c_int, code: c_int) -> AppResult<()> {
        in_range("input channel", channel, 0, consts::MAXINPCHAN - 1)?;
        in_range("dead time code", code, consts::TDCODEMIN, consts::TDCODEMAX)?;
        let rc = unsafe { self.bound()?.set_input_dead_time(self.index, channel, code) };
        check("TH260_SetInputDeadTime", rc)
    }

    /// Timing mode (PICO): `false` = high resolution, `true` = long range.
    pub fn set_timing_mode(&self, long_range: bool) -> AppResult<()> {
        let mode = if long_range {
            consts::TIMINGMODE_LORES
        } else {
            consts::TIMINGMODE_HIRES
        };
        let rc = unsafe { self.bound()?.set_timing_mode(self.index, mode) };
        check("TH260_SetTimingMode", rc)
    }

    /// Stop histogramming when a bin reaches `stop_count`.
    pub fn set_stop_overflow(&self, stop: bool, stop_count: u32) -> AppResult<()> {
        if !(consts::STOPCNTMIN..=consts::STOPCNTMAX).contains(&stop_count) {
            return Err(DaqError::InvalidArgument(format!(
                "stop count {stop_count} is outside {}..={}",
                consts::STOPCNTMIN,
                consts::STOPCNTMAX
            )));
        }
        let rc = unsafe {
            self.bound()?
                .set_stop_overflow(self.index, c_int::from(stop), stop_count)
        };
        check("TH260_SetStopOverflow", rc)
    }

    /// Binning code; bin width is `base_resolution * 2^binning`.
    pub fn set_binning(&self, binning: c_int) -> AppResult<()> {
        in_range("binning", binning, 0, consts::MAXBINSTEPS - 1)?;
        let rc = unsafe { self.bound()?.set_binning(self.index, binning) };
        check("TH260_SetBinning", rc)
    }

    /// Histogram time offset in ns.
    pub fn set_offset(&self, offset_ns: c_int) -> AppResult<()> {
        in_range("offset", offset_ns, consts::OFFSETMIN, consts::OFFSETMAX)?;
        let rc = unsafe { self.bound()?.set_offset(self.index, offset_ns) };
        check("TH260_SetOffset", rc)
    }

    /// Set the histogram length code and return the resulting length.
    pub fn set_histo_len(&mut self, code: c_int) -> AppResult<usize> {
        in_range("histogram length code", code, 0, consts::MAXLENCODE)?;
        let mut actual: c_int = 0;
        let rc = unsafe { self.bound()?.set_histo_len(self.index, code, &mut actual) };
        check("TH260_SetHistoLen", rc)?;
        let len = usize::try_from(actual).map_err(|_| {
            DaqError::Instrument(format!("TH260_SetHistoLen reported length {actual}"))
        })?;
        self.histogram_len = Some(len);
        debug!(index = self.index, code, len, "histogram length set");
        Ok(len)
    }

    /// Measurement control (`MEASCTRL_*`) with start and stop edges.
    pub fn set_meas_control(
        &self,
        control: c_int,
        start_edge: TriggerEdge,
        stop_edge: TriggerEdge,
    ) -> AppResult<()> {
        in_range(
            "measurement control",
            control,
            consts::MEASCTRL_SINGLESHOT_CTC,
            consts::MEASCTRL_C1_START_C2_STOP,
        )?;
        let rc = unsafe {
            self.bound()?
                .set_meas_control(self.index, control, start_edge.code(), stop_edge.code())
        };
        check("TH260_SetMeasControl", rc)
    }

    /// Trigger output period in units of 100 ns; 0 switches it off.
    pub fn set_trigger_output(&self, period: c_int) -> AppResult<()> {
        in_range("trigger output period", period, consts::TRIGOUTMIN, consts::TRIGOUTMAX)?;
        let rc = unsafe { self.bound()?.set_trigger_output(self.index, period) };
        check("TH260_SetTriggerOutput", rc)
    }

    /// Active edges of the four marker inputs.
    pub fn set_marker_edges(&self, edges: [TriggerEdge; 4]) -> AppResult<()> {
        let [me1, me2, me3, me4] = edges.map(TriggerEdge::code);
        let rc = unsafe { self.bound()?.set_marker_edges(self.index, me1, me2, me3, me4) };
        check("TH260_SetMarkerEdges", rc)
    }

    /// Enable the four marker inputs.
    pub fn set_marker_enable(&self, enable: [bool; 4]) -> AppResult<()> {
        let [en1, en2, en3, en4] = enable.map(c_int::from);
        let rc = unsafe { self.bound()?.set_marker_enable(self.index, en1, en2, en3, en4) };
        check("TH260_SetMarkerEnable", rc)
    }

    /// Marker holdoff time in ns.
    pub fn set_marker_holdoff_time(&self, holdoff_ns: c_int) -> AppResult<()> {
        in_range("marker holdoff", holdoff_ns, consts::HOLDOFFMIN, consts::HOLDOFFMAX)?;
        let rc = unsafe { self.bound()?.set_marker_holdoff_time(self.index, holdoff_ns) };
        check("TH260_SetMarkerHoldoffTime", rc)
    }

    /// Zero the histogram memory.
    pub fn clear_hist_mem(&self) -> AppResult<()> {
        let rc = unsafe { self.bound()?.clear_hist_mem(self.index) };
        check("TH260_ClearHistMem", rc)
    }

    /// Start a measurement of `tacq_ms` milliseconds.
    pub fn start_meas(&self, tacq_ms: c_int) -> AppResult<()> {
        in_range("acquisition time", tacq_ms, consts::ACQTMIN, consts::ACQTMAX)?;
        let rc = unsafe { self.bound()?.start_meas(self.index, tacq_ms) };
        check("TH260_StartMeas", rc)?;
        debug!(index = self.index, tacq_ms, "measurement started");
        Ok(())
    }

    /// Stop the running measurement.
    pub fn stop_meas(&self) -> AppResult<()> {
        let rc = unsafe { self.bound()?.stop_meas(self.index) };
        check("TH260_StopMeas", rc)
    }

    /// `true` once the acquisition time has elapsed.
    pub fn ctc_status(&self) -> AppResult<bool> {
        let mut status: c_int = 0;
        let rc = unsafe { self.bound()?.ctc_status(self.index, &mut status) };
        check("TH260_CTCStatus", rc)?;
        Ok(status != 0)
    }

    /// Read the histogram of `channel`, optionally clearing it.
    pub fn histogram(&self, channel: c_int, clear: bool) -> AppResult<Vec<u32>> {
        in_range("input channel", channel, 0, consts::MAXINPCHAN - 1)?;
        let len = self.required_histogram_len()?;
        let mut counts = vec![0u32; len];
        let rc = unsafe {
            self.bound()?
                .get_histogram(self.index, counts.as_mut_ptr(), channel, c_int::from(clear))
        };
        check("TH260_GetHistogram", rc)?;
        Ok(counts)
    }

    /// Current resolution in ps.
    pub fn resolution(&self) -> AppResult<f64> {
        let mut resolution: c_double = 0.0;
        let rc = unsafe { self.bound()?.get_resolution(self.index, &mut resolution) };
        check("TH260_GetResolution", rc)?;
        Ok(resolution)
    }

    /// Sync rate in Hz.
    pub fn sync_rate(&self) -> AppResult<c_int> {
        let mut rate: c_int = 0;
        let rc = unsafe { self.bound()?.get_sync_rate(self.index, &mut rate) };
        check("TH260_GetSyncRate", rc)?;
        Ok(rate)
    }

    /// Count rate of `channel` in Hz.
    pub fn count_rate(&self, channel: c_int) -> AppResult<c_int> {
        in_range("input channel", channel, 0, consts::MAXINPCHAN - 1)?;
        let mut rate: c_int = 0;
        let rc = unsafe { self.bound()?.get_count_rate(self.index, channel, &mut rate) };
        check("TH260_GetCountRate", rc)?;
        Ok(rate)
    }

    /// Status flags.
    pub fn flags(&self) -> AppResult<Flags> {
        let mut bits: c_int = 0;
        let rc = unsafe { self.bound()?.get_flags(self.index, &mut bits) };
        check("TH260_GetFlags", rc)?;
        Ok(Flags::from_bits_retain(bits))
    }

    /// Elapsed measurement time in ms.
    pub fn elapsed_meas_time(&self) -> AppResult<f64> {
        let mut elapsed: c_double = 0.0;
        let rc = unsafe { self.bound()?.get_elapsed_meas_time(self.index, &mut elapsed) };
        check("TH260_GetElapsedMeasTime", rc)?;
        Ok(elapsed)
    }

    /// Sync period in s.
    pub fn sync_period(&self) -> AppResult<f64> {
        let mut period: c_double = 0.0;
        let rc = unsafe { self.bound()?.get_sync_period(self.index, &mut period) };
        check("TH260_GetSyncPeriod", rc)?;
        Ok(period)
    }

    /// Warnings derived from the current rates. Read the rates first.
    pub fn warnings(&self) -> AppResult<Warnings> {
        let mut bits: c_int = 0;
        let rc = unsafe { self.bound()?.get_warnings(self.index, &mut bits) };
        check("TH260_GetWarnings", rc)?;
        Ok(Warnings::from_bits_retain(bits))
    }

    /// Human readable form of `warnings`.
    pub fn warnings_text(&self, warnings: Warnings) -> AppResult<String> {
        let mut text = vec![0u8; consts::MAXSTRLEN_WRNTXT];
        let rc = unsafe {
            self.bound()?.get_warnings_text(
                self.index,
                text.as_mut_ptr().cast::<c_char>(),
                warnings.bits(),
            )
        };
        check("TH260_GetWarningsText", rc)?;
        Ok(c_string(&text))
    }

    /// Debug information after a [`Flags::SYSERROR`].
    pub fn hardware_debug_info(&self) -> AppResult<String> {
        let mut text = vec![0u8; consts::MAXSTRLEN_WRNTXT];
        let rc = unsafe {
            self.bound()?
                .get_hardware_debug_info(self.index, text.as_mut_ptr().cast::<c_char>())
        };
        check("TH260_GetHardwareDebugInfo", rc)?;
        Ok(c_string(&text))
    }

    /// Read TTTR records into `buffer`, returns the number read.
    ///
    /// The request is capped at `TTREADMAX` and rounded down to a multiple of
    /// `TTREADMIN`.
    pub fn read_fifo(&self, buffer: &mut [u32]) -> AppResult<usize> {
        if !self.mode.is_some_and(MeasurementMode::is_tttr) {
            return Err(DaqError::InvalidArgument(
                "FIFO reads need the device initialized in T2 or T3 mode".to_string(),
            ));
        }
        let max = consts::TTREADMAX as usize;
        let step = consts::TTREADMIN as usize;
        let count = buffer.len().min(max) / step * step;
        if count == 0 {
            return Err(DaqError::InvalidArgument(format!(
                "FIFO buffer holds {} records, at least {step} required",
                buffer.len()
            )));
        }
        let mut actual: c_int = 0;
        let rc = unsafe {
            self.bound()?
                .read_fifo(self.index, buffer.as_mut_ptr(), count as c_int, &mut actual)
        };
        check("TH260_ReadFiFo", rc)?;
        Ok(usize::try_from(actual).unwrap_or(0).min(count))
    }

    /// Apply a `[timeharp]` configuration section.
    ///
    /// Initializes the board, then applies CFD settings on PICO boards or
    /// edge trigger settings otherwise. Histogram settings are applied in
    /// histogram mode only.
    pub fn configure(&mut self, config: &TimeHarpConfig) -> AppResult<()> {
        self.initialize(config.mode)?;
        let channels = self.num_input_channels()?;
        self.set_sync_div(config.sync_divider)?;

        if self.model == Some(Th260Model::Pico) {
            self.set_sync_cfd(config.sync_cfd_level_mv, config.sync_cfd_zero_cross_mv)?;
            for channel in 0..channels {
                self.set_input_cfd(
                    channel,
                    config.input_cfd_level_mv,
                    config.input_cfd_zero_cross_mv,
                )?;
            }
        } else {
            self.set_sync_edge_trg(config.sync_trigger_level_mv, config.sync_trigger_edge)?;
            for channel in 0..channels {
                self.set_input_edge_trg(
                    channel,
                    config.input_trigger_level_mv,
                    config.input_trigger_edge,
                )?;
            }
        }
        self.set_sync_channel_offset(0)?;
        for channel in 0..channels {
            self.set_input_channel_offset(channel, 0)?;
        }

        if config.mode == MeasurementMode::Histogram {
            self.set_binning(config.binning)?;
            self.set_offset(config.offset_ns)?;
            self.set_histo_len(config.histogram_length_code)?;
        }
        info!(
            index = self.index,
            channels,
            model = ?self.model,
            "TimeHarp 260 configured"
        );
        Ok(())
    }

    /// Clear, measure for `tacq_ms` and read every channel.
    ///
    /// Polls `ctc_status` every `poll`. Gives up after twice the acquisition
    /// time plus five seconds.
    pub fn acquire_histograms(&self, tacq_ms: c_int, poll: Duration) -> AppResult<HistogramSet> {
        if self.mode != Some(MeasurementMode::Histogram) {
            return Err(DaqError::InvalidArgument(
                "histogram acquisition needs the device initialized in histogram mode".to_string(),
            ));
        }
        self.required_histogram_len()?;
        let channels = self.num_input_channels()?;
        self.clear_hist_mem()?;
        self.start_meas(tacq_ms)?;

        // the measurement is stopped on every exit from here on
        let waited = self.wait_for_completion(tacq_ms, poll);
        let stopped = self.stop_meas();
        if let Err(e) = &stopped {
            if waited.is_err() {
                warn!(index = self.index, error = %e, "TH260_StopMeas failed after aborted acquisition");
            }
        }
        waited?;
        stopped?;

        let counts = (0..channels)
            .map(|channel| self.histogram(channel, false))
            .collect::<AppResult<Vec<_>>>()?;
        let flags = self.flags()?;
        if flags.contains(Flags::OVERFLOW) {
            warn!(index = self.index, "histogram overflow");
        }
        let elapsed_ms = self.elapsed_meas_time()?;
        Ok(HistogramSet {
            counts,
            flags,
            elapsed_ms,
        })
    }
}

impl<L: LibraryLoader> Th260Device<L> {
    fn required_histogram_len(&self) -> AppResult<usize> {
        self.histogram_len.ok_or_else(|| {
            DaqError::Instrument("histogram length not set, call set_histo_len first".to_string())
        })
    }

    fn wait_for_completion(&self, tacq_ms: c_int, poll: Duration) -> AppResult<()> {
        let limit = Duration::from_millis(u64::try_from(tacq_ms).unwrap_or(0) * 2 + 5000);
        let started = Instant::now();
        while !self.ctc_status()? {
            if started.elapsed() > limit {
                return Err(DaqError::Instrument(format!(
                    "acquisition of {tacq_ms} ms did not finish within {limit:?}"
                )));
            }
            std::thread::sleep(poll);
        }
        Ok(())
    }
}

impl<L: LibraryLoader> Drop for Th260Device<L> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        let rc = unsafe { self.library.close_device(self.index) };
        if rc < 0 {
            warn!(index = self.index, code = rc, "TH260_CloseDevice failed on drop");
        }
    }
}

impl<L: LibraryLoader> fmt::Debug for Th260Device<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Th260Device")
            .field("index", &self.index)
            .field("serial", &self.serial)
            .field("mode", &self.mode)
            .field("model", &self.model)
            .field("histogram_len", &self.histogram_len)
            .finish()
    }
}

fn check(function: &'static str, rc: c_int) -> AppResult<()> {
    if rc < 0 {
        Err(DaqError::Th260 { function, code: rc })
    } else {
        Ok(())
    }
}

fn in_range(what: &str, value: c_int, min: c_int, max: c_int) -> AppResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DaqError::InvalidArgument(format!(
            "{what} {value} is outside {min}..={max}"
        )))
    }
}

/// Decode a NUL-terminated vendor string; unterminated buffers are used whole.
fn c_string(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}
