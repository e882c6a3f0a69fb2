//! PI Mercury stage driver on top of `MMC410.DLL`.
//!
//! The DLL talks to one or more Mercury controllers daisy-chained on a serial
//! port. Each controller is addressed by its device number (1..=16, set by
//! front-panel DIP switches); device 0 means "currently selected".
//!
//! Return-code conventions of the DLL:
//!
//! | Call | Failure codes |
//! |------|---------------|
//! | `MMC_moveA` / `MMC_moveR` | 1 wrong axis, 2 not connected, 3 sendString error |
//! | `MMC_getPos` / `MMC_getVal` / `MDC_getPosErr` | `i32::MAX - 0..=3` |
//! | `MMC_setDevice` / `MMC_select` | 1 wrong axis, 2 not registered |
//! | `M?C_waitStop` | 1 query error, 2 user break |
//! | `MMC_sendCommand` | 114 write error, 116 length error |
//!
//! # Example Usage
//!
//! ```no_run
//! use vendor_daq::hardware::pi_mmc::MmcStage;
//! use vendor_daq::hardware::capabilities::Movable;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let stage = MmcStage::open_default("M521DG", 1, 1, 9600)?;
//!     stage.move_abs(12.5).await?;
//!     stage.wait_settled().await?;
//!     println!("Position: {:.4} mm", stage.position().await?);
//!     Ok(())
//! }
//! ```

#![allow(unsafe_code)]

use std::ffi::{c_char, c_int, CStr};
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use dll_binding::{LibraryLoader, SystemLoader};
use mmc_sys::MmcLibrary;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::MmcConfig;
use crate::error::{AppResult, DaqError};
use crate::hardware::capabilities::Movable;

/// Baud rates supported by the controllers.
pub const BAUD_RATES: [c_int; 2] = [9600, 19200];

/// Highest device number on a Mercury network.
pub const MAX_AXIS: c_int = 16;

/// Counts between target and reported position still considered "moving".
pub const DEFAULT_TARGET_TOLERANCE: c_int = 100;

const REPORT_BUFFER_LEN: usize = 128;

/// Failure reported by `MMC410.DLL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MmcError {
    /// Device number outside 1..=16.
    #[error("wrong axis")]
    WrongAxis,
    /// COM port not open.
    #[error("not connected")]
    NotConnected,
    /// Writing to the serial port failed.
    #[error("sendString error")]
    SendString,
    /// Reading from the serial port failed.
    #[error("getString error")]
    GetString,
    /// The controller's answer was malformed.
    #[error("wrong content")]
    Content,
    /// The answer could not be converted to a number.
    #[error("conversion error")]
    Conversion,
    /// The device was not found by `MMC_initNetwork`.
    #[error("axis not registered")]
    NotRegistered,
    /// Motion status query failed while waiting.
    #[error("query error")]
    Query,
    /// Wait interrupted by `MMC_globalBreak`.
    #[error("user break")]
    UserBreak,
    /// Command could not be written.
    #[error("write error")]
    Write,
    /// Command too long.
    #[error("command too long")]
    Length,
    /// Any other non-zero code.
    #[error("unexpected return code {0}")]
    Code(c_int),
}

impl MmcError {
    fn from_move_code(code: c_int) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(MmcError::WrongAxis),
            2 => Some(MmcError::NotConnected),
            3 => Some(MmcError::SendString),
            other => Some(MmcError::Code(other)),
        }
    }

    fn from_select_code(code: c_int) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(MmcError::WrongAxis),
            2 => Some(MmcError::NotRegistered),
            other => Some(MmcError::Code(other)),
        }
    }

    fn from_wait_code(code: c_int) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(MmcError::Query),
            2 => Some(MmcError::UserBreak),
            other => Some(MmcError::Code(other)),
        }
    }

    /// Split a value-returning call into value or sentinel error.
    pub fn check_value(value: c_int) -> Result<c_int, MmcError> {
        match value {
            c_int::MAX => Err(MmcError::Content),
            v if v == c_int::MAX - 1 => Err(MmcError::GetString),
            v if v == c_int::MAX - 2 => Err(MmcError::SendString),
            v if v == c_int::MAX - 3 => Err(MmcError::Conversion),
            v => Ok(v),
        }
    }
}

/// Motor technology, selects the `MDC_*` or `MST_*` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorKind {
    /// C-862 / C-863 DC motor controllers.
    Dc,
    /// C-663 Mercury-Step controllers.
    Stepper,
}

/// Mechanical parameters of a supported stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageModel {
    /// Catalogue name.
    pub name: &'static str,
    /// Counts per `counts_denominator` units.
    pub counts_numerator: u32,
    /// See `counts_numerator`.
    pub counts_denominator: u32,
    /// Physical unit of positions.
    pub units: &'static str,
    /// Controller family.
    pub motor: MotorKind,
}

const STAGES: &[StageModel] = &[StageModel {
    name: "M521DG",
    counts_numerator: 2_458_624,
    counts_denominator: 81,
    units: "mm",
    motor: MotorKind::Dc,
}];

impl StageModel {
    /// Find a stage by catalogue name.
    pub fn lookup(name: &str) -> Option<Self> {
        STAGES.iter().copied().find(|stage| stage.name == name)
    }

    /// Names accepted by [`StageModel::lookup`].
    pub fn known_names() -> Vec<&'static str> {
        STAGES.iter().map(|stage| stage.name).collect()
    }

    /// Encoder counts per unit.
    pub fn counts_per_unit(&self) -> f64 {
        f64::from(self.counts_numerator) / f64::from(self.counts_denominator)
    }

    /// Convert a count value to units.
    pub fn counts_to_units(&self, counts: c_int) -> f64 {
        f64::from(counts) / self.counts_per_unit()
    }

    /// Convert units to counts, truncating toward zero.
    pub fn units_to_counts(&self, units: f64) -> AppResult<c_int> {
        let counts = (units * self.counts_per_unit()).trunc();
        if !counts.is_finite() || counts < f64::from(c_int::MIN) || counts > f64::from(c_int::MAX) {
            return Err(DaqError::InvalidArgument(format!(
                "{units} {} is outside the range of stage {}",
                self.units, self.name
            )));
        }
        Ok(counts as c_int)
    }
}

/// Parameters readable through `MMC_getVal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ValueId {
    /// `TP`
    Position = 1,
    /// `TT`
    Target = 2,
    /// `TF`
    ProfileFollowingError = 3,
    /// `TE`
    DistanceToTarget = 4,
    /// `TY`
    Velocity = 5,
    /// `TL`
    Acceleration = 6,
    /// `GP`
    ProportionalTerm = 7,
    /// `GI`
    IntegralTerm = 8,
    /// `GD`
    DerivativeTerm = 9,
    /// `GL`
    IntegralLimit = 10,
}

impl ValueId {
    /// Controller command the DLL sends for this value.
    pub fn mnemonic(self) -> &'static str {
        match self {
            ValueId::Position => "TP",
            ValueId::Target => "TT",
            ValueId::ProfileFollowingError => "TF",
            ValueId::DistanceToTarget => "TE",
            ValueId::Velocity => "TY",
            ValueId::Acceleration => "TL",
            ValueId::ProportionalTerm => "GP",
            ValueId::IntegralTerm => "GI",
            ValueId::DerivativeTerm => "GD",
            ValueId::IntegralLimit => "GL",
        }
    }
}

/// Parse a `TE` report such as `E:+0000123` or `E:-45`.
pub fn parse_distance_report(report: &str) -> Option<c_int> {
    let (_, rest) = report.split_once("E:")?;
    let rest = rest.trim();
    let (negative, digits) = match rest.as_bytes().first()? {
        b'-' => (true, &rest[1..]),
        b'+' => (false, &rest[1..]),
        _ => return None,
    };
    let value: c_int = digits.trim_end().parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Decode the `MMC_initNetwork` bitmask into device numbers.
pub fn decode_network_mask(mask: c_int, max_axis: c_int) -> Vec<c_int> {
    (0..max_axis.clamp(0, 32))
        .filter(|bit| (mask >> bit) & 1 == 1)
        .map(|bit| bit + 1)
        .collect()
}

/// One axis of a Mercury network.
///
/// Several stages can share one [`MmcLibrary`]; the DLL itself keeps a single
/// COM port and a "currently selected" device. Calls that act on the selected
/// device first address [`MmcStage::axis`] under the library's session lock,
/// unless the axis is 0.
pub struct MmcStage<L: LibraryLoader = SystemLoader> {
    library: Arc<MmcLibrary<L>>,
    model: StageModel,
    axis: c_int,
}

impl MmcStage<SystemLoader> {
    /// Create a stage from configuration and open its COM port.
    pub fn connect(config: &MmcConfig) -> AppResult<Self> {
        Self::open_default(&config.stage, config.axis, config.com_port, config.baud_rate)
    }

    /// Create a stage on the system `MMC410.DLL` and open `port`.
    pub fn open_default(stage: &str, axis: c_int, port: c_int, baud_rate: c_int) -> AppResult<Self> {
        let stage = Self::with_library(Arc::new(MmcLibrary::new()), stage, axis)?;
        stage.open(port, baud_rate)?;
        Ok(stage)
    }
}

impl<L: LibraryLoader> MmcStage<L> {
    /// Create a stage on an existing library handle. Nothing is sent yet.
    pub fn with_library(library: Arc<MmcLibrary<L>>, stage: &str, axis: c_int) -> AppResult<Self> {
        let model = StageModel::lookup(stage).ok_or_else(|| {
            DaqError::InvalidArgument(format!(
                "unknown stage '{stage}', known stages: {}",
                StageModel::known_names().join(", ")
            ))
        })?;
        check_axis(axis, 0)?;
        Ok(Self {
            library,
            model,
            axis,
        })
    }

    /// Stage parameters.
    pub fn model(&self) -> StageModel {
        self.model
    }

    /// Device number this stage addresses.
    pub fn axis(&self) -> c_int {
        self.axis
    }

    /// Shared library handle.
    pub fn library(&self) -> &Arc<MmcLibrary<L>> {
        &self.library
    }

    fn bound(&self) -> AppResult<&MmcLibrary<L>> {
        self.library.ensure_loaded()?;
        Ok(&self.library)
    }

    /// Run `call` with this stage's device selected.
    fn on_axis<T>(&self, call: impl FnOnce(&MmcLibrary<L>) -> AppResult<T>) -> AppResult<T> {
        let library = self.bound()?;
        let _session = library.session();
        if self.axis != 0 {
            let rc = unsafe { library.set_device(self.axis) };
            mmc_result("MMC_setDevice", MmcError::from_select_code(rc))?;
        }
        call(library)
    }

    /// Open the COM port.
    pub fn open(&self, port: c_int, baud_rate: c_int) -> AppResult<()> {
        if port < 1 {
            return Err(DaqError::InvalidArgument(format!(
                "COM port {port} is invalid, ports are numbered from 1"
            )));
        }
        if !BAUD_RATES.contains(&baud_rate) {
            return Err(DaqError::InvalidArgument(format!(
                "baud rate {baud_rate} is invalid, must be one of {BAUD_RATES:?}"
            )));
        }
        let rc = unsafe { self.bound()?.com_open(port, baud_rate) };
        nonzero("MMC_COM_open", rc)?;
        info!(port, baud_rate, stage = self.model.name, axis = self.axis, "MMC COM port opened");
        Ok(())
    }

    /// Close the COM port.
    pub fn close(&self) -> AppResult<()> {
        let rc = unsafe { self.bound()?.com_close() };
        nonzero("MMC_COM_close", rc)?;
        info!(stage = self.model.name, "MMC COM port closed");
        Ok(())
    }

    /// Version number reported by the DLL.
    pub fn dll_version(&self) -> AppResult<c_int> {
        Ok(unsafe { self.bound()?.get_dll_version() })
    }

    /// Characters waiting in the COM input buffer.
    pub fn bytes_available(&self) -> AppResult<c_int> {
        Ok(unsafe { self.bound()?.com_eof() })
    }

    /// Discard the COM input buffer.
    pub fn clear_input(&self) -> AppResult<()> {
        let rc = unsafe { self.bound()?.com_clear() };
        nonzero("MMC_COM_clear", rc)
    }

    /// Absolute move in counts.
    pub fn move_abs_counts(&self, counts: c_int) -> AppResult<()> {
        debug!(axis = self.axis, counts, "MMC absolute move");
        let rc = unsafe { self.bound()?.move_a(self.axis, counts) };
        mmc_result("MMC_moveA", MmcError::from_move_code(rc))
    }

    /// Relative move in counts.
    pub fn move_rel_counts(&self, counts: c_int) -> AppResult<()> {
        debug!(axis = self.axis, counts, "MMC relative move");
        let rc = unsafe { self.bound()?.move_r(self.axis, counts) };
        mmc_result("MMC_moveR", MmcError::from_move_code(rc))
    }

    /// Absolute move in stage units.
    pub fn move_to(&self, position: f64) -> AppResult<()> {
        self.move_abs_counts(self.model.units_to_counts(position)?)
    }

    /// Relative move in stage units.
    pub fn move_by(&self, distance: f64) -> AppResult<()> {
        self.move_rel_counts(self.model.units_to_counts(distance)?)
    }

    /// Position in counts.
    pub fn position_counts(&self) -> AppResult<c_int> {
        let raw = self.on_axis(|library| Ok(unsafe { library.get_pos() }))?;
        MmcError::check_value(raw).map_err(|error| DaqError::Mmc {
            function: "MMC_getPos",
            error,
        })
    }

    /// Position in stage units.
    pub fn position_units(&self) -> AppResult<f64> {
        Ok(self.model.counts_to_units(self.position_counts()?))
    }

    /// Following error of a DC controller in counts.
    pub fn position_error(&self) -> AppResult<c_int> {
        let raw = self.on_axis(|library| Ok(unsafe { library.mdc_get_pos_err() }))?;
        MmcError::check_value(raw).map_err(|error| DaqError::Mmc {
            function: "MDC_getPosErr",
            error,
        })
    }

    /// Read one controller parameter.
    pub fn value(&self, id: ValueId) -> AppResult<c_int> {
        let raw = self.on_axis(|library| Ok(unsafe { library.get_val(id as c_int) }))?;
        MmcError::check_value(raw).map_err(|error| DaqError::Mmc {
            function: "MMC_getVal",
            error,
        })
    }

    /// Scan device numbers `max_axis` down to 1 and register what answers.
    ///
    /// Each address takes about half a second.
    pub fn init_network(&self, max_axis: c_int) -> AppResult<Vec<c_int>> {
        check_axis(max_axis, 1)?;
        let mask = unsafe { self.bound()?.init_network(max_axis) };
        if mask < 0 {
            return Err(DaqError::Mmc {
                function: "MMC_initNetwork",
                error: MmcError::Code(mask),
            });
        }
        let devices = decode_network_mask(mask, max_axis);
        info!(?devices, "Mercury network scanned");
        Ok(devices)
    }

    /// Address `axis` without checking registration.
    pub fn set_device(&self, axis: c_int) -> AppResult<()> {
        let rc = unsafe { self.bound()?.set_device(axis) };
        mmc_result("MMC_setDevice", MmcError::from_select_code(rc))
    }

    /// Select a device registered by [`MmcStage::init_network`].
    pub fn select(&self, axis: c_int) -> AppResult<()> {
        let rc = unsafe { self.bound()?.select(axis) };
        mmc_result("MMC_select", MmcError::from_select_code(rc))
    }

    /// Motion status of the controller.
    pub fn is_moving(&self) -> AppResult<bool> {
        let (function, rc) = self.on_axis(|library| {
            Ok(match self.model.motor {
                MotorKind::Dc => ("MDC_moving", unsafe { library.mdc_moving() }),
                MotorKind::Stepper => ("MST_moving", unsafe { library.mst_moving() }),
            })
        })?;
        if rc < 0 {
            return Err(DaqError::Mmc {
                function,
                error: MmcError::Code(rc),
            });
        }
        Ok(rc != 0)
    }

    /// Block until the current move terminates.
    ///
    /// Other stages on the same library wait for the session until then.
    pub fn wait_stop(&self) -> AppResult<()> {
        let (function, rc) = self.on_axis(|library| {
            Ok(match self.model.motor {
                MotorKind::Dc => ("MDC_waitStop", unsafe { library.mdc_wait_stop() }),
                MotorKind::Stepper => ("MST_waitStop", unsafe { library.mst_wait_stop() }),
            })
        })?;
        mmc_result(function, MmcError::from_wait_code(rc))
    }

    /// Send a raw controller command, e.g. `"FE1"`.
    pub fn send_command(&self, command: &str) -> AppResult<()> {
        let mut buffer = nul_terminated(command)?;
        let rc = self.on_axis(|library| {
            Ok(unsafe { library.send_command(buffer.as_mut_ptr().cast::<c_char>()) })
        })?;
        let error = match rc {
            114 => Some(MmcError::Write),
            116 => Some(MmcError::Length),
            _ => None,
        };
        debug!(command, rc, "MMC command sent");
        mmc_result("MMC_sendCommand", error)
    }

    /// Start the reference move.
    pub fn find_home(&self) -> AppResult<()> {
        self.send_command("FE1")
    }

    /// Read one carriage-return terminated answer.
    pub fn read_line(&self) -> AppResult<String> {
        let mut buffer = [0u8; REPORT_BUFFER_LEN];
        let rc = self.on_axis(|library| {
            Ok(unsafe { library.get_string_cr(buffer.as_mut_ptr().cast::<c_char>()) })
        })?;
        if rc == 0 {
            return Err(DaqError::Mmc {
                function: "MMC_getStringCR",
                error: MmcError::GetString,
            });
        }
        // force termination in case the DLL filled the whole buffer
        buffer[REPORT_BUFFER_LEN - 1] = 0;
        let text = CStr::from_bytes_until_nul(&buffer)
            .map_err(|e| DaqError::Instrument(format!("MMC_getStringCR: {e}")))?;
        Ok(text.to_string_lossy().trim_end().to_string())
    }

    /// Compare the target (`TT`) with the reported `TE` value.
    ///
    /// Returns `false` while they differ by more than `tolerance` counts.
    pub fn is_on_target(&self, tolerance: c_int) -> AppResult<bool> {
        // the TE answer must be read before another stage sends a command
        let _session = self.library.session();
        let target = self.value(ValueId::Target)?;
        self.send_command(ValueId::DistanceToTarget.mnemonic())?;
        let report = self.read_line()?;
        let reported = parse_distance_report(&report).ok_or_else(|| {
            warn!(%report, "unparseable TE report");
            DaqError::Mmc {
                function: "MMC_getStringCR",
                error: MmcError::Content,
            }
        })?;
        Ok((i64::from(target) - i64::from(reported)).abs() <= i64::from(tolerance))
    }
}

impl<L: LibraryLoader> Clone for MmcStage<L> {
    fn clone(&self) -> Self {
        Self {
            library: Arc::clone(&self.library),
            model: self.model,
            axis: self.axis,
        }
    }
}

impl<L: LibraryLoader> fmt::Debug for MmcStage<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MmcStage")
            .field("model", &self.model.name)
            .field("axis", &self.axis)
            .field("loaded", &self.library.is_loaded())
            .finish()
    }
}

#[async_trait]
impl<L: LibraryLoader + 'static> Movable for MmcStage<L> {
    async fn move_abs(&self, position: f64) -> Result<()> {
        let stage = self.clone();
        tokio::task::spawn_blocking(move || stage.move_to(position)).await??;
        Ok(())
    }

    async fn move_rel(&self, distance: f64) -> Result<()> {
        let stage = self.clone();
        tokio::task::spawn_blocking(move || stage.move_by(distance)).await??;
        Ok(())
    }

    async fn position(&self) -> Result<f64> {
        let stage = self.clone();
        Ok(tokio::task::spawn_blocking(move || stage.position_units()).await??)
    }

    async fn wait_settled(&self) -> Result<()> {
        let stage = self.clone();
        tokio::task::spawn_blocking(move || stage.wait_stop()).await??;
        Ok(())
    }
}

fn check_axis(axis: c_int, min: c_int) -> AppResult<()> {
    if (min..=MAX_AXIS).contains(&axis) {
        Ok(())
    } else {
        Err(DaqError::InvalidArgument(format!(
            "device number {axis} is invalid, must be {min}..={MAX_AXIS}"
        )))
    }
}

fn nonzero(function: &'static str, rc: c_int) -> AppResult<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(DaqError::Mmc {
            function,
            error: MmcError::Code(rc),
        })
    }
}

fn mmc_result(function: &'static str, error: Option<MmcError>) -> AppResult<()> {
    match error {
        None => Ok(()),
        Some(error) => Err(DaqError::Mmc { function, error }),
    }
}

fn nul_terminated(text: &str) -> AppResult<Vec<u8>> {
    if text.as_bytes().contains(&0) {
        return Err(DaqError::InvalidArgument(format!(
            "command {text:?} contains a NUL byte"
        )));
    }
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_conversion() {
        let stage = StageModel::lookup("M521DG").expect("known stage");
        let per_mm = 2_458_624.0 / 81.0;
        assert!((stage.counts_per_unit() - per_mm).abs() < 1e-9);
        assert_eq!(stage.units_to_counts(1.0).expect("in range"), 30353);
        assert_eq!(stage.units_to_counts(-1.0).expect("in range"), -30353);
        assert!((stage.counts_to_units(30353) - 30353.0 / per_mm).abs() < 1e-12);
        assert!(stage.units_to_counts(1e9).is_err());
        assert!(stage.units_to_counts(f64::NAN).is_err());
    }

    #[test]
    fn test_unknown_stage() {
        assert!(StageModel::lookup("M-521.DG").is_none());
        assert_eq!(StageModel::known_names(), vec!["M521DG"]);
    }

    #[test]
    fn test_value_sentinels() {
        assert_eq!(MmcError::check_value(1234), Ok(1234));
        assert_eq!(MmcError::check_value(-5), Ok(-5));
        assert_eq!(MmcError::check_value(i32::MAX), Err(MmcError::Content));
        assert_eq!(MmcError::check_value(i32::MAX - 1), Err(MmcError::GetString));
        assert_eq!(MmcError::check_value(i32::MAX - 2), Err(MmcError::SendString));
        assert_eq!(MmcError::check_value(i32::MAX - 3), Err(MmcError::Conversion));
        assert_eq!(MmcError::check_value(i32::MAX - 4), Ok(i32::MAX - 4));
    }

    #[test]
    fn test_return_codes() {
        assert_eq!(MmcError::from_move_code(0), None);
        assert_eq!(MmcError::from_move_code(2), Some(MmcError::NotConnected));
        assert_eq!(MmcError::from_select_code(2), Some(MmcError::NotRegistered));
        assert_eq!(MmcError::from_wait_code(2), Some(MmcError::UserBreak));
        assert_eq!(MmcError::from_wait_code(7), Some(MmcError::Code(7)));
    }

    #[test]
    fn test_parse_distance_report() {
        assert_eq!(parse_distance_report("E:+0000123"), Some(123));
        assert_eq!(parse_distance_report("E:-45\r\n"), Some(-45));
        assert_eq!(parse_distance_report("1E:+7"), Some(7));
        assert_eq!(parse_distance_report("E:12"), None);
        assert_eq!(parse_distance_report("P:+12"), None);
        assert_eq!(parse_distance_report("E:+"), None);
    }

    #[test]
    fn test_decode_network_mask() {
        assert_eq!(decode_network_mask(0, 16), Vec::<c_int>::new());
        assert_eq!(decode_network_mask(0b101, 16), vec![1, 3]);
        // bits above max_axis are ignored
        assert_eq!(decode_network_mask(0b1001, 3), vec![1]);
    }

    #[test]
    fn test_value_mnemonics() {
        assert_eq!(ValueId::Target as c_int, 2);
        assert_eq!(ValueId::Target.mnemonic(), "TT");
        assert_eq!(ValueId::IntegralLimit as c_int, 10);
        assert_eq!(ValueId::IntegralLimit.mnemonic(), "GL");
    }

    #[test]
    fn test_nul_terminated() {
        assert_eq!(nul_terminated("FE1").expect("valid"), b"FE1\0");
        assert!(nul_terminated("A\0B").is_err());
    }
}
