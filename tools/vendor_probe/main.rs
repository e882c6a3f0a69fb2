//! Report which vendor libraries load on this machine and what they see.
//!
//! ```text
//! vendor_probe                         # uses config/vendor_daq.toml if present
//! vendor_probe --config lab.toml --scan-mmc 4
//! vendor_probe --th260-library /opt/picoquant/libth260.so
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mmc_sys::MmcLibrary;
use th260_sys::Th260Library;
use vendor_daq::config::{ApplicationConfig, VendorConfig, DEFAULT_CONFIG_PATH};
use vendor_daq::hardware::pi_mmc::MmcStage;
use vendor_daq::hardware::timeharp::{self, SlotState};
use vendor_daq::logging;

/// Probe MMC410.DLL and TH260Lib.
///
/// Exits non-zero when a library cannot be bound.
#[derive(Parser, Debug)]
#[command(name = "vendor_probe")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// TH260Lib path, overrides `timeharp.library`
    #[arg(long)]
    th260_library: Option<PathBuf>,
    /// Scan the Mercury network up to this device number (needs `[mmc]`)
    #[arg(long, value_name = "MAX_AXIS")]
    scan_mmc: Option<i32>,
    /// Skip the MMC410.DLL probe
    #[arg(long)]
    skip_mmc: bool,
    /// Skip the TH260Lib probe
    #[arg(long)]
    skip_th260: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("vendor_probe: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = if cli.config.exists() {
        Some(VendorConfig::load_from(&cli.config)?)
    } else {
        None
    };
    let application = config
        .as_ref()
        .map(|c| c.application.clone())
        .unwrap_or_else(|| ApplicationConfig {
            name: "vendor_probe".to_string(),
            log_level: "info".to_string(),
        });
    logging::init_from_config(&application)?;
    if config.is_none() {
        tracing::warn!(path = %cli.config.display(), "no configuration file, probing with defaults");
    }

    // without a file every library is expected to bind
    let wants_mmc = config.as_ref().map_or(true, |c| c.mmc.is_some());
    let wants_th260 = config.as_ref().map_or(true, |c| c.timeharp.is_some());

    let mut ok = true;
    if !cli.skip_mmc {
        ok &= probe_mmc(config.as_ref(), cli.scan_mmc) || !wants_mmc;
    }
    if !cli.skip_th260 {
        let library = cli.th260_library.clone().or_else(|| {
            config
                .as_ref()
                .and_then(|c| c.timeharp.as_ref())
                .and_then(|t| t.library.clone())
        });
        ok &= probe_th260(library) || !wants_th260;
    }
    Ok(ok)
}

fn probe_mmc(config: Option<&VendorConfig>, scan: Option<i32>) -> bool {
    println!("== {} ==", mmc_sys::LIBRARY_NAME);
    let library = Arc::new(MmcLibrary::new());
    if let Err(e) = library.ensure_loaded() {
        println!("  not available: {e}");
        return false;
    }

    let mmc = config.and_then(|c| c.mmc.as_ref());
    let (stage, axis) = mmc
        .map(|m| (m.stage.as_str(), m.axis))
        .unwrap_or(("M521DG", 1));
    let stage = match MmcStage::with_library(Arc::clone(&library), stage, axis) {
        Ok(stage) => stage,
        Err(e) => {
            println!("  {e}");
            return false;
        }
    };
    match stage.dll_version() {
        Ok(version) => println!("  DLL version: {version}"),
        Err(e) => println!("  DLL version: {e}"),
    }

    let Some(mmc) = mmc else {
        println!("  no [mmc] section, serial port not opened");
        return true;
    };
    if let Err(e) = stage.open(mmc.com_port, mmc.baud_rate) {
        println!("  COM{}: {e}", mmc.com_port);
        return false;
    }
    if let Some(max_axis) = scan {
        match stage.init_network(max_axis) {
            Ok(devices) => println!("  devices on network: {devices:?}"),
            Err(e) => println!("  network scan: {e}"),
        }
    }
    match stage.position_units() {
        Ok(position) => println!(
            "  axis {} position: {position:.4} {}",
            stage.axis(),
            stage.model().units
        ),
        Err(e) => println!("  axis {} position: {e}", stage.axis()),
    }
    if let Err(e) = stage.close() {
        println!("  close: {e}");
    }
    true
}

fn probe_th260(path: Option<PathBuf>) -> bool {
    let library = match &path {
        Some(path) => Th260Library::with_loader_and_name(dll_binding::SystemLoader, path.as_os_str()),
        None => Th260Library::new(),
    };
    println!("== {} ==", library.binding().library_name().to_string_lossy());
    if let Err(e) = library.ensure_loaded() {
        println!("  not available: {e}");
        return false;
    }

    match timeharp::library_version(&library) {
        Ok(version) => println!("  library version: {version}"),
        Err(e) => println!("  library version: {e}"),
    }
    match timeharp::discover(&library) {
        Ok(slots) => {
            for slot in slots {
                match slot.state {
                    SlotState::Available { serial } => {
                        println!("  device {}: serial {serial}", slot.index)
                    }
                    SlotState::Empty => println!("  device {}: none", slot.index),
                    SlotState::Failed { code } => {
                        let text = timeharp::error_string(&library, code)
                            .unwrap_or_else(|_| format!("error {code}"));
                        println!("  device {}: {text}", slot.index)
                    }
                }
            }
            true
        }
        Err(e) => {
            println!("  discovery failed: {e}");
            false
        }
    }
}
