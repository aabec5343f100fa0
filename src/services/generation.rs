use std::sync::atomic::{AtomicU64, Ordering};

/// Token handed to one outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationToken(u64);

/// Monotonic counter deciding which in-flight response is still wanted
///
/// Every new request of a kind calls [`Generation::begin`]; when its response
/// arrives it is applied only if [`Generation::is_current`] still holds.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation; every earlier token becomes stale
    pub fn begin(&self) -> GenerationToken {
        GenerationToken(self.0.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.0.load(Ordering::Acquire) == token.0
    }
}
