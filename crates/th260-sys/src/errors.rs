//! TH260Lib error codes.
//!
//! Every TH260Lib function returns `0` on success or one of these negative
//! codes. `TH260_GetErrorString` gives a human readable message; the names
//! here are stable identifiers for logs and matching.

use std::ffi::c_int;
use std::fmt;

macro_rules! error_codes {
    ($( $(#[$meta:meta])* $variant:ident = $code:literal => $name:literal, )*) => {
        /// Return code of a TH260Lib call.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        #[allow(missing_docs)]
        pub enum Th260ErrorCode {
            $( $(#[$meta])* $variant = $code, )*
        }

        impl Th260ErrorCode {
            /// Every known code, in ascending order of magnitude.
            pub const ALL: &'static [Th260ErrorCode] = &[$(Th260ErrorCode::$variant),*];

            /// Decode a vendor return value.
            pub fn from_code(code: c_int) -> Option<Self> {
                match code {
                    $( $code => Some(Th260ErrorCode::$variant), )*
                    _ => None,
                }
            }

            /// Vendor identifier, e.g. `TH260_ERROR_DEVICE_OPEN_FAIL`.
            pub fn name(self) -> &'static str {
                match self {
                    $( Th260ErrorCode::$variant => $name, )*
                }
            }
        }
    };
}

error_codes! {
    None = 0 => "TH260_ERROR_NONE",
    DeviceOpenFail = -1 => "TH260_ERROR_DEVICE_OPEN_FAIL",
    DeviceBusy = -2 => "TH260_ERROR_DEVICE_BUSY",
    DeviceHeventFail = -3 => "TH260_ERROR_DEVICE_HEVENT_FAIL",
    DeviceCallbsetFail = -4 => "TH260_ERROR_DEVICE_CALLBSET_FAIL",
    DeviceBarmapFail = -5 => "TH260_ERROR_DEVICE_BARMAP_FAIL",
    DeviceCloseFail = -6 => "TH260_ERROR_DEVICE_CLOSE_FAIL",
    DeviceResetFail = -7 => "TH260_ERROR_DEVICE_RESET_FAIL",
    DeviceGetversionFail = -8 => "TH260_ERROR_DEVICE_GETVERSION_FAIL",
    DeviceVersionMismatch = -9 => "TH260_ERROR_DEVICE_VERSION_MISMATCH",
    DeviceNotOpen = -10 => "TH260_ERROR_DEVICE_NOT_OPEN",
    DeviceLocked = -11 => "TH260_ERROR_DEVICE_LOCKED",
    DeviceDriververMismatch = -12 => "TH260_ERROR_DEVICE_DRIVERVER_MISMATCH",
    InstanceRunning = -16 => "TH260_ERROR_INSTANCE_RUNNING",
    InvalidArgument = -17 => "TH260_ERROR_INVALID_ARGUMENT",
    InvalidMode = -18 => "TH260_ERROR_INVALID_MODE",
    InvalidOption = -19 => "TH260_ERROR_INVALID_OPTION",
    InvalidMemory = -20 => "TH260_ERROR_INVALID_MEMORY",
    InvalidRdata = -21 => "TH260_ERROR_INVALID_RDATA",
    NotInitialized = -22 => "TH260_ERROR_NOT_INITIALIZED",
    NotCalibrated = -23 => "TH260_ERROR_NOT_CALIBRATED",
    DmaFail = -24 => "TH260_ERROR_DMA_FAIL",
    XtdeviceFail = -25 => "TH260_ERROR_XTDEVICE_FAIL",
    FpgaconfFail = -26 => "TH260_ERROR_FPGACONF_FAIL",
    IfconfFail = -27 => "TH260_ERROR_IFCONF_FAIL",
    FiforesetFail = -28 => "TH260_ERROR_FIFORESET_FAIL",
    ThreadstateFail = -29 => "TH260_ERROR_THREADSTATE_FAIL",
    ThreadlockFail = -30 => "TH260_ERROR_THREADLOCK_FAIL",
    UsbGetdriververFail = -32 => "TH260_ERROR_USB_GETDRIVERVER_FAIL",
    UsbDriververMismatch = -33 => "TH260_ERROR_USB_DRIVERVER_MISMATCH",
    UsbGetifinfoFail = -34 => "TH260_ERROR_USB_GETIFINFO_FAIL",
    UsbHispeedFail = -35 => "TH260_ERROR_USB_HISPEED_FAIL",
    UsbVcmdFail = -36 => "TH260_ERROR_USB_VCMD_FAIL",
    UsbBulkrdFail = -37 => "TH260_ERROR_USB_BULKRD_FAIL",
    LaneupTimeout = -40 => "TH260_ERROR_LANEUP_TIMEOUT",
    DoneallTimeout = -41 => "TH260_ERROR_DONEALL_TIMEOUT",
    MbAckTimeout = -42 => "TH260_ERROR_MB_ACK_TIMEOUT",
    MactiveTimeout = -43 => "TH260_ERROR_MACTIVE_TIMEOUT",
    MemclearFail = -44 => "TH260_ERROR_MEMCLEAR_FAIL",
    MemtestFail = -45 => "TH260_ERROR_MEMTEST_FAIL",
    CalibFail = -46 => "TH260_ERROR_CALIB_FAIL",
    RefselFail = -47 => "TH260_ERROR_REFSEL_FAIL",
    StatusFail = -48 => "TH260_ERROR_STATUS_FAIL",
    ModnumFail = -49 => "TH260_ERROR_MODNUM_FAIL",
    DigmuxFail = -50 => "TH260_ERROR_DIGMUX_FAIL",
    ModmuxFail = -51 => "TH260_ERROR_MODMUX_FAIL",
    ModfwpcbMismatch = -52 => "TH260_ERROR_MODFWPCB_MISMATCH",
    ModfwverMismatch = -53 => "TH260_ERROR_MODFWVER_MISMATCH",
    ModpropertyMismatch = -54 => "TH260_ERROR_MODPROPERTY_MISMATCH",
    InvalidMagic = -55 => "TH260_ERROR_INVALID_MAGIC",
    InvalidLength = -56 => "TH260_ERROR_INVALID_LENGTH",
    EepromF01 = -64 => "TH260_ERROR_EEPROM_F01",
    EepromF02 = -65 => "TH260_ERROR_EEPROM_F02",
    EepromF03 = -66 => "TH260_ERROR_EEPROM_F03",
    EepromF04 = -67 => "TH260_ERROR_EEPROM_F04",
    EepromF05 = -68 => "TH260_ERROR_EEPROM_F05",
    EepromF06 = -69 => "TH260_ERROR_EEPROM_F06",
    EepromF07 = -70 => "TH260_ERROR_EEPROM_F07",
    EepromF08 = -71 => "TH260_ERROR_EEPROM_F08",
    EepromF09 = -72 => "TH260_ERROR_EEPROM_F09",
    EepromF10 = -73 => "TH260_ERROR_EEPROM_F10",
    EepromF11 = -74 => "TH260_ERROR_EEPROM_F11",
    UnsupportedFunction = -80 => "TH260_ERROR_UNSUPPORTED_FUNCTION",
}

impl Th260ErrorCode {
    /// Raw vendor value.
    pub fn code(self) -> c_int {
        self as c_int
    }
}

impl fmt::Display for Th260ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
