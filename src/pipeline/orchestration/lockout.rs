use std::time::Duration;
use tokio::time::Instant;

/// Blocks new analyses for a while after the remote service rate-limited us.
/// Owned by one analyzer; instances never share it.
#[derive(Debug, Clone, Default)]
pub struct LockoutState {
    until: Option<Instant>,
}

impl LockoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before analyses are allowed again, if locked.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.until
            .filter(|until| *until > now)
            .map(|until| until - now)
    }

    pub fn engage(&mut self, now: Instant, duration: Duration) {
        self.until = Some(now + duration);
    }

    pub fn clear(&mut self) {
        self.until = None;
    }

    pub fn locked_until(&self) -> Option<Instant> {
        self.until
    }
}
