//! Custom error types for the application.
//!
//! `DaqError` is the error type of every driver in this crate. The vendor
//! crates (`dll-binding`, `mmc-sys`, `th260-sys`) are pass-through and report
//! failures as raw integers; the drivers turn those into the variants below.
//!
//! ## Error Hierarchy
//!
//! - **`Config`**: loading or validating the figment configuration.
//! - **`Io`**: standard I/O errors.
//! - **`Binding`**: a vendor library could not be loaded, or lacks an export.
//! - **`Mmc`**: `MMC410.DLL` returned one of its documented failure codes.
//! - **`Th260`**: TH260Lib returned a negative error code.
//! - **`InvalidArgument`**: a value was rejected before reaching the vendor
//!   library (out of the documented range, wrong unit conversion, ...).
//! - **`Instrument`**: any other driver-level failure.

use std::ffi::c_int;

use thiserror::Error;

use crate::config::ConfigError;
use crate::hardware::pi_mmc::MmcError;

pub use dll_binding::BindError;
pub use th260_sys::Th260ErrorCode;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, DaqError>;

#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum DaqError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vendor library error: {0}")]
    Binding(#[from] BindError),

    #[error("{function} failed: {error}")]
    Mmc {
        function: &'static str,
        #[source]
        error: MmcError,
    },

    #[error("{function} failed: {}", th260_code_name(*code))]
    Th260 { function: &'static str, code: c_int },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Instrument error: {0}")]
    Instrument(String),

    #[error("Logging initialisation failed: {0}")]
    Logging(String),
}

impl DaqError {
    /// Decoded TH260Lib code, for `Th260` errors with a known code.
    pub fn th260_code(&self) -> Option<Th260ErrorCode> {
        match self {
            DaqError::Th260 { code, .. } => Th260ErrorCode::from_code(*code),
            _ => None,
        }
    }
}

fn th260_code_name(code: c_int) -> String {
    match Th260ErrorCode::from_code(code) {
        Some(known) => known.to_string(),
        None => format!("unknown error code {code}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DaqError::Instrument("stage not homed".to_string());
        assert_eq!(err.to_string(), "Instrument error: stage not homed");
    }

    #[test]
    fn test_th260_error_display() {
        let err = DaqError::Th260 {
            function: "TH260_OpenDevice",
            code: -1,
        };
        assert_eq!(
            err.to_string(),
            "TH260_OpenDevice failed: TH260_ERROR_DEVICE_OPEN_FAIL (-1)"
        );
        assert_eq!(err.th260_code(), Some(Th260ErrorCode::DeviceOpenFail));

        let unknown = DaqError::Th260 {
            function: "TH260_StartMeas",
            code: -99,
        };
        assert!(unknown.to_string().ends_with("unknown error code -99"));
        assert_eq!(unknown.th260_code(), None);
    }

    #[test]
    fn test_mmc_error_source() {
        use std::error::Error as _;

        let err = DaqError::Mmc {
            function: "MMC_moveA",
            error: MmcError::WrongAxis,
        };
        assert_eq!(err.to_string(), "MMC_moveA failed: wrong axis");
        assert!(err.source().is_some());
    }
}
