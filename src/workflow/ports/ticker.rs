//! Progress tick scheduling port.

use async_trait::async_trait;

/// Source of progress ticks for simulated task runs.
///
/// The engine awaits one tick before each progress increment, so the
/// ticker alone decides how much time a simulated run takes. Production
/// code waits on a fixed interval; tests resolve ticks immediately.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressTicker: Send + Sync {
    /// Resolves when the next progress increment is due.
    async fn tick(&self);
}
