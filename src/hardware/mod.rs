//! Drivers for the vendor-library instruments.
//!
//! - [`pi_mmc`]: PI Mercury stages through `MMC410.DLL`
//! - [`timeharp`]: PicoQuant TimeHarp 260 through TH260Lib
//!
//! Both drivers take the vendor library as an `Arc` so tests can hand in a
//! library built on `dll_binding::mock::MockLoader`.

pub mod capabilities;
pub mod pi_mmc;
pub mod timeharp;

pub use capabilities::Movable;
pub use pi_mmc::{MmcError, MmcStage, StageModel};
pub use timeharp::{MeasurementMode, Th260Device, TriggerEdge};
