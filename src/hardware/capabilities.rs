//! Capability traits implemented by the hardware drivers.

use anyhow::Result;
use async_trait::async_trait;

/// Capability for single-axis positioners.
///
/// Positions are in the stage's physical units (mm for linear stages).
/// Implementations backed by blocking vendor calls run them on the blocking
/// thread pool.
#[async_trait]
pub trait Movable: Send + Sync {
    /// Move to an absolute position.
    async fn move_abs(&self, position: f64) -> Result<()>;
    /// Move relative to the current position.
    async fn move_rel(&self, distance: f64) -> Result<()>;
    /// Current position.
    async fn position(&self) -> Result<f64>;
    /// Wait until the current move has finished.
    async fn wait_settled(&self) -> Result<()>;
}
