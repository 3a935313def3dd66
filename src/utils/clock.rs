// file: src/utils/clock.rs
// version: 1.0.0
// guid: 3b276cbb-0d14-4cfb-883f-e868ef5e7651

//! Sleep capability used by the warm-up delay and lease polling

use std::time::Duration;

/// Suspends the current task for a fixed duration
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
