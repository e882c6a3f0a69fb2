//! The vendor-named C exports share one process-wide binding.
//!
//! `MMC410.DLL` is not present on CI hosts, so every export must report the
//! load failure and leave the binding unloaded.

use mmc_sys::exports::{self, MMC_COM_open, MMC_getPos, MMC_moveA};
use mmc_sys::FAILED_TO_LOAD_DLL;
use serial_test::serial;

#[test]
#[serial]
fn test_exports_report_missing_library() {
    unsafe {
        assert_eq!(MMC_COM_open(1, 9600), FAILED_TO_LOAD_DLL);
        assert_eq!(MMC_moveA(3, 1000), FAILED_TO_LOAD_DLL);
        assert_eq!(MMC_getPos(), FAILED_TO_LOAD_DLL);
    }
    assert!(!exports::library().is_loaded());
}

#[test]
#[serial]
fn test_exports_retry_after_failure() {
    let library = exports::library();
    let err = library.ensure_loaded().expect_err("library absent");
    assert_eq!(err.code(), FAILED_TO_LOAD_DLL);
    assert!(err.to_string().contains("MMC410.DLL"));

    // still not cached as loaded
    assert_eq!(unsafe { MMC_getPos() }, FAILED_TO_LOAD_DLL);
    assert!(!library.is_loaded());
}
