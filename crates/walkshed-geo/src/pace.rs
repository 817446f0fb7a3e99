//! Fixed-delay pacing for outbound provider calls.

use std::time::Duration;

/// Minimum-delay pacing policy applied before every provider request.
///
/// Both live providers are shared public services; skipping the delay risks
/// bans that would poison the rest of the batch. Injected into the clients
/// so tests run with [`Pacer::zero`].
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    #[must_use]
    pub fn from_millis(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// No-op pacer for tests and the offline provider.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Sleep for the configured delay.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
