//! Values from `th260defin.h` (TH260Lib 3.1).
//!
//! Numeric values are part of the library's ABI and must not be changed.

#![allow(missing_docs)]

use std::ffi::c_int;

/// Library version this crate was written against.
pub const LIB_VERSION: &str = "3.1";

/// Buffer size for `TH260_GetLibraryVersion`.
pub const MAXSTRLEN_LIBVER: usize = 8;
/// Buffer size for `TH260_GetErrorString`.
pub const MAXSTRLEN_ERRSTR: usize = 40;
/// Buffer size for the serial in `TH260_OpenDevice` / `TH260_GetSerialNumber`.
pub const MAXSTRLEN_SERIAL: usize = 8;
/// Buffer size for the model in `TH260_GetHardwareInfo`.
pub const MAXSTRLEN_MODEL: usize = 16;
/// Buffer size for the part number in `TH260_GetHardwareInfo`.
pub const MAXSTRLEN_PART: usize = 8;
/// Buffer size for the version in `TH260_GetHardwareInfo`.
pub const MAXSTRLEN_VERSION: usize = 16;
/// Buffer size for `TH260_GetWarningsText`.
pub const MAXSTRLEN_WRNTXT: usize = 16384;

/// Model string reported by a TimeHarp 260 PICO.
pub const HWIDENT_PICO: &str = "TimeHarp 260 P";
/// Model string reported by a TimeHarp 260 NANO.
pub const HWIDENT_NANO: &str = "TimeHarp 260 N";

/// Maximum number of devices.
pub const MAXDEVNUM: c_int = 4;
/// Maximum number of detector input channels.
pub const MAXINPCHAN: c_int = 2;
/// Upper bound for binning steps; query the device for the actual number.
pub const MAXBINSTEPS: c_int = 22;
/// Maximum number of histogram bins.
pub const MAXHISTLEN: c_int = 32768;
/// Maximum histogram length code.
pub const MAXLENCODE: c_int = 5;

/// Most event records one `TH260_ReadFiFo` call returns.
pub const TTREADMAX: c_int = 131072;
/// Smallest buffer `TH260_ReadFiFo` accepts, in records.
pub const TTREADMIN: c_int = 128;

pub const MODE_HIST: c_int = 0;
pub const MODE_T2: c_int = 2;
pub const MODE_T3: c_int = 3;

pub const MEASCTRL_SINGLESHOT_CTC: c_int = 0;
pub const MEASCTRL_C1_GATE: c_int = 1;
pub const MEASCTRL_C1_START_CTC_STOP: c_int = 2;
pub const MEASCTRL_C1_START_C2_STOP: c_int = 3;

pub const EDGE_RISING: c_int = 1;
pub const EDGE_FALLING: c_int = 0;

pub const TIMINGMODE_HIRES: c_int = 0;
pub const TIMINGMODE_LORES: c_int = 1;

pub const FEATURE_DLL: c_int = 0x0001;
pub const FEATURE_TTTR: c_int = 0x0002;
pub const FEATURE_MARKERS: c_int = 0x0004;
pub const FEATURE_LOWRES: c_int = 0x0008;
pub const FEATURE_TRIGOUT: c_int = 0x0010;
pub const FEATURE_PROG_TD: c_int = 0x0020;

pub const FLAG_OVERFLOW: c_int = 0x0001;
pub const FLAG_FIFOFULL: c_int = 0x0002;
pub const FLAG_SYNC_LOST: c_int = 0x0004;
pub const FLAG_EVTS_DROPPED: c_int = 0x0008;
pub const FLAG_SYSERROR: c_int = 0x0010;
pub const FLAG_SOFTERROR: c_int = 0x0020;

pub const SYNCDIVMIN: c_int = 1;
pub const SYNCDIVMAX: c_int = 8;

/// mV, NANO only.
pub const TRGLVLMIN: c_int = -1200;
/// mV, NANO only.
pub const TRGLVLMAX: c_int = 1200;

/// mV, PICO only.
pub const CFDLVLMIN: c_int = -1200;
/// mV, PICO only.
pub const CFDLVLMAX: c_int = 0;
/// mV, PICO only.
pub const CFDZCMIN: c_int = -40;
/// mV, PICO only.
pub const CFDZCMAX: c_int = 0;

/// ps.
pub const CHANOFFSMIN: c_int = -99999;
/// ps.
pub const CHANOFFSMAX: c_int = 99999;

/// ns.
pub const OFFSETMIN: c_int = 0;
/// ns.
pub const OFFSETMAX: c_int = 100_000_000;

/// ms.
pub const ACQTMIN: c_int = 1;
/// ms (100 h).
pub const ACQTMAX: c_int = 360_000_000;

pub const STOPCNTMIN: u32 = 1;
pub const STOPCNTMAX: u32 = 4_294_967_295;

/// 0 disables the trigger output.
pub const TRIGOUTMIN: c_int = 0;
/// Units of 100 ns.
pub const TRIGOUTMAX: c_int = 16_777_215;

/// ns.
pub const HOLDOFFMIN: c_int = 0;
/// ns.
pub const HOLDOFFMAX: c_int = 25500;

pub const TDCODEMIN: c_int = 0;
pub const TDCODEMAX: c_int = 7;

pub const WARNING_SYNC_RATE_ZERO: c_int = 0x0001;
pub const WARNING_SYNC_RATE_VERY_LOW: c_int = 0x0002;
pub const WARNING_SYNC_RATE_TOO_HIGH: c_int = 0x0004;
pub const WARNING_INPT_RATE_ZERO: c_int = 0x0010;
pub const WARNING_INPT_RATE_TOO_HIGH: c_int = 0x0040;
pub const WARNING_INPT_RATE_RATIO: c_int = 0x0100;
pub const WARNING_DIVIDER_GREATER_ONE: c_int = 0x0200;
pub const WARNING_TIME_SPAN_TOO_SMALL: c_int = 0x0400;
pub const WARNING_OFFSET_UNNECESSARY: c_int = 0x0800;
pub const WARNING_DIVIDER_TOO_SMALL: c_int = 0x1000;
pub const WARNING_COUNTS_DROPPED: c_int = 0x2000;
