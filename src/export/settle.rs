//! Waiting for the host to reflect a document mutation.
//!
//! Switching a component variant makes the design tool rebuild the
//! instance's subtree on its next render pass. Geometry read before that
//! pass is stale, so the walker awaits a settle signal after every switch.

use std::time::Duration;

use async_trait::async_trait;

/// Settle signal awaited after a variant switch.
#[async_trait(?Send)]
pub trait Settle {
    async fn settle(&self);
}

/// Settles after a fixed delay on the tokio timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettle {
    pub delay: Duration,
}

impl TimerSettle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

#[async_trait(?Send)]
impl Settle for TimerSettle {
    async fn settle(&self) {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Settles immediately. For documents that apply mutations synchronously,
/// such as the in-memory [`DesignTree`](crate::document::DesignTree).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettle;

#[async_trait(?Send)]
impl Settle for NoSettle {
    async fn settle(&self) {}
}
