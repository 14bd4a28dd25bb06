//! Cached model listing with a TTL.
//!
//! The listing changes rarely and the upstream call is slow, so the handler
//! reads through this cache. Explicit `{value, fetched_at}` state with an
//! injected clock instead of module-level mutable globals, so expiry is
//! testable without sleeping.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{LlmClient, LlmError, ModelInfo};

/// Injected time source. Production uses `SystemClock`; tests advance a
/// manual clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheSlot {
    value: Vec<ModelInfo>,
    fetched_at: Instant,
}

pub struct ModelCache {
    slot: Mutex<Option<CacheSlot>>,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl ModelCache {
    pub fn new(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
            clock,
        }
    }

    /// Returns the cached listing when fresh, otherwise refetches through the
    /// client and replaces the slot.
    pub async fn get(&self, llm: &LlmClient) -> Result<Vec<ModelInfo>, LlmError> {
        if let Some(cached) = self.fresh() {
            return Ok(cached);
        }

        let value = llm.list_models().await?;
        self.store(value.clone());
        Ok(value)
    }

    fn fresh(&self) -> Option<Vec<ModelInfo>> {
        let slot = self.slot.lock().expect("model cache lock poisoned");
        slot.as_ref().and_then(|s| {
            (self.clock.now().duration_since(s.fetched_at) < self.ttl).then(|| s.value.clone())
        })
    }

    fn store(&self, value: Vec<ModelInfo>) {
        let mut slot = self.slot.lock().expect("model cache lock poisoned");
        *slot = Some(CacheSlot {
            value,
            fetched_at: self.clock.now(),
        });
    }
}
