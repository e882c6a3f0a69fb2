//! Loading `vendor_daq.toml` through figment.

use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;
use vendor_daq::config::{ConfigError, VendorConfig};
use vendor_daq::hardware::timeharp::{MeasurementMode, TriggerEdge};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

const FULL: &str = r#"
[application]
name = "Lab 3"
log_level = "debug"

[mmc]
com_port = 4
baud_rate = 19200

[timeharp]
library = "/opt/picoquant/libth260.so"
mode = "t3"
acquisition_ms = 500
sync_trigger_edge = "rising"
"#;

#[test]
#[serial]
fn test_load_full_file_with_defaults() {
    let file = write_config(FULL);
    let config = VendorConfig::load_from(file.path()).expect("load");

    assert_eq!(config.application.name, "Lab 3");
    assert_eq!(config.application.log_level, "debug");

    let mmc = config.mmc.expect("mmc section");
    assert_eq!(mmc.com_port, 4);
    assert_eq!(mmc.baud_rate, 19200);
    assert_eq!(mmc.stage, "M521DG");
    assert_eq!(mmc.axis, 1);

    let th = config.timeharp.expect("timeharp section");
    assert_eq!(th.mode, MeasurementMode::T3);
    assert_eq!(th.acquisition_ms, 500);
    assert_eq!(th.sync_trigger_edge, TriggerEdge::Rising);
    assert_eq!(th.input_trigger_edge, TriggerEdge::Falling);
    assert_eq!(th.sync_divider, 1);
    assert_eq!(th.poll_interval_ms, 100);
    assert_eq!(
        th.library.as_deref(),
        Some(std::path::Path::new("/opt/picoquant/libth260.so"))
    );
}

#[test]
#[serial]
fn test_optional_sections() {
    let file = write_config("[application]\nname = \"bare\"\n");
    let config = VendorConfig::load_from(file.path()).expect("load");
    assert_eq!(config.application.log_level, "info");
    assert!(config.mmc.is_none());
    assert!(config.timeharp.is_none());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = write_config(FULL);
    std::env::set_var("VENDOR_DAQ_MMC__COM_PORT", "7");
    std::env::set_var("VENDOR_DAQ_TIMEHARP__ACQUISITION_MS", "2500");
    let result = VendorConfig::load_from(file.path());
    std::env::remove_var("VENDOR_DAQ_MMC__COM_PORT");
    std::env::remove_var("VENDOR_DAQ_TIMEHARP__ACQUISITION_MS");

    let config = result.expect("load");
    assert_eq!(config.mmc.expect("mmc").com_port, 7);
    assert_eq!(config.timeharp.expect("timeharp").acquisition_ms, 2500);
}

#[test]
#[serial]
fn test_validation_runs_after_load() {
    let file = write_config("[application]\nname = \"x\"\n[mmc]\ncom_port = 1\nbaud_rate = 115200\n");
    match VendorConfig::load_from(file.path()) {
        Err(ConfigError::ValidationError(message)) => assert!(message.contains("baud_rate")),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
#[serial]
fn test_malformed_file_is_load_error() {
    let file = write_config("[application\nname = ");
    assert!(matches!(
        VendorConfig::load_from(file.path()),
        Err(ConfigError::LoadError(_))
    ));

    let file = write_config("[application]\nname = \"x\"\n[timeharp]\nmode = \"t4\"\n");
    assert!(matches!(
        VendorConfig::load_from(file.path()),
        Err(ConfigError::LoadError(_))
    ));
}

#[test]
#[serial]
fn test_shipped_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/vendor_daq.toml");
    let config = VendorConfig::load_from(path).expect("shipped config");
    assert!(config.mmc.is_some());
    assert_eq!(
        config.timeharp.expect("timeharp").mode,
        MeasurementMode::Histogram
    );
}
