//! Drivers for instruments that are only reachable through vendor libraries.
//!
//! The vendor crates under `crates/` bind the libraries lazily and pass every
//! call through unchanged. This crate adds what a measurement needs on top:
//! typed errors, unit conversion, range checks, configuration and logging.
//!
//! - [`config`]: figment configuration (`config/vendor_daq.toml` + `VENDOR_DAQ_*`)
//! - [`hardware`]: the PI Mercury stage and TimeHarp 260 drivers
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: [`DaqError`] and [`AppResult`]

pub mod config;
pub mod error;
pub mod hardware;
pub mod logging;

pub use error::{AppResult, DaqError};
