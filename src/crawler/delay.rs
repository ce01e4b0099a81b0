//! Politeness delay between requests

use async_trait::async_trait;
use std::time::Duration;

/// Wait inserted after every fetch attempt
#[async_trait]
pub trait Politeness: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a fixed duration
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Politeness for FixedDelay {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// No waiting at all; for tests and local fixtures
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Politeness for NoDelay {
    async fn pause(&self) {}
}
