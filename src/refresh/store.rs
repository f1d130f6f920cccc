use std::future::Future;
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Consumer-provided persistence for the scheduler's next due time.
///
/// A single value survives process restarts, so a remounted scheduler
/// resumes the running cadence instead of starting a fresh one. The backing
/// store is whatever the consumer has at hand (a cookie, a small file, a
/// browser-storage bridge); [`MemoryScheduleStore`] covers tests and
/// single-process setups.
///
/// # Example
///
/// ```rust,ignore
/// impl ScheduleStore for MyCookieStore {
///     async fn load(&self) -> Result<Option<OffsetDateTime>, ...> {
///         self.read_cookie("next_refresh_at").map(parse_timestamp).transpose()
///     }
///
///     async fn save(&self, due: OffsetDateTime) -> Result<(), ...> {
///         self.write_cookie("next_refresh_at", due.unix_timestamp().to_string())
///     }
/// }
/// ```
pub trait ScheduleStore: Send + Sync + 'static {
    /// Load the persisted due time, if any.
    fn load(
        &self,
    ) -> impl Future<
        Output = Result<Option<OffsetDateTime>, Box<dyn std::error::Error + Send + Sync>>,
    > + Send;

    /// Persist the next due time, replacing any previous value.
    fn save(
        &self,
        due: OffsetDateTime,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send;
}

impl<S: ScheduleStore> ScheduleStore for Arc<S> {
    fn load(
        &self,
    ) -> impl Future<
        Output = Result<Option<OffsetDateTime>, Box<dyn std::error::Error + Send + Sync>>,
    > + Send {
        S::load(self)
    }

    fn save(
        &self,
        due: OffsetDateTime,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send {
        S::save(self, due)
    }
}

/// In-memory schedule store.
///
/// Clones share the same slot, so a test (or a single-process consumer) can
/// keep a handle while the scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    slot: Arc<Mutex<Option<OffsetDateTime>>>,
}

impl MemoryScheduleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleStore for MemoryScheduleStore {
    async fn load(
        &self,
    ) -> Result<Option<OffsetDateTime>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(*self.slot.lock().await)
    }

    async fn save(
        &self,
        due: OffsetDateTime,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        *self.slot.lock().await = Some(due);
        Ok(())
    }
}
