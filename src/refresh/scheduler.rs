use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use time::OffsetDateTime;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::store::ScheduleStore;

/// Default cadence between refresh calls.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Rotated token pair returned by a refresh operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Bearer token for API calls.
    pub access_token: String,
    /// Next refresh token, when the backend rotates it.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Injected refresh operation.
///
/// Must be idempotent and safe to call repeatedly: the scheduler invokes it
/// on a fixed cadence and ignores the outcome. Failure handling (logging,
/// surfacing to the user) belongs to the implementation, not the scheduler.
pub trait TokenRefresher: Send + Sync + 'static {
    fn refresh(
        &self,
    ) -> impl Future<Output = Result<TokenPair, Box<dyn std::error::Error + Send + Sync>>> + Send;
}

impl<T: TokenRefresher> TokenRefresher for Arc<T> {
    fn refresh(
        &self,
    ) -> impl Future<Output = Result<TokenPair, Box<dyn std::error::Error + Send + Sync>>> + Send
    {
        T::refresh(self)
    }
}

/// Keeps a session's bearer token alive by refreshing it on a fixed cadence.
///
/// One spawned worker owns one timer. The due time is persisted through the
/// [`ScheduleStore`] so a restart resumes the running cycle: an absent value
/// starts a fresh one, an overdue value fires immediately, a future value is
/// waited out so the first fire lands on the original schedule.
///
/// At most one refresh is in flight at a time. The worker awaits the call
/// before listening for the next tick, and ticks that land in the meantime
/// are dropped, not queued, so a slow refresh stretches the effective period
/// instead of piling up calls. The cadence never backs off, whatever the
/// refresh outcome.
///
/// Scheduler instances sharing one store (several tabs over one cookie) are
/// not coordinated; each overwrites the persisted due time independently.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval: Duration,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshScheduler {
    /// Scheduler with the default cadence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Override the cadence.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the refresh worker. Must be called within a tokio runtime.
    ///
    /// The returned handle tears the worker down when shut down or dropped.
    #[must_use]
    pub fn spawn<R, S>(self, refresher: R, store: S) -> RefreshHandle
    where
        R: TokenRefresher,
        S: ScheduleStore,
    {
        let shutdown = Arc::new(Notify::new());
        debug!(interval_secs = self.interval.as_secs(), "refresh scheduler armed");
        let task = tokio::spawn(run(self.interval, refresher, store, Arc::clone(&shutdown)));
        RefreshHandle { shutdown, task }
    }
}

/// Handle for a spawned refresh worker.
///
/// Dropping the handle tears the worker down the same way
/// [`shutdown()`](RefreshHandle::shutdown) does.
#[derive(Debug)]
pub struct RefreshHandle {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop scheduling.
    ///
    /// The armed timer is cancelled immediately; no further refresh calls
    /// occur. A refresh already in flight runs to completion and its result
    /// is ignored.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Whether the worker has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown.notify_one();
    }
}

async fn run<R, S>(interval: Duration, refresher: R, store: S, shutdown: Arc<Notify>)
where
    R: TokenRefresher,
    S: ScheduleStore,
{
    // Resume the persisted cadence. A load failure is treated as an absent
    // value: better a fresh cycle than no cycle.
    let first_delay = match store.load().await {
        Ok(Some(due)) => {
            let now = OffsetDateTime::now_utc();
            if due <= now {
                Duration::ZERO
            } else {
                (due - now).unsigned_abs()
            }
        }
        Ok(None) => {
            persist_next(&store, interval).await;
            interval
        }
        Err(error) => {
            warn!(error = %error, "schedule load failed; starting a fresh cycle");
            persist_next(&store, interval).await;
            interval
        }
    };

    if !first_delay.is_zero() {
        tokio::select! {
            biased;
            () = shutdown.notified() => return,
            () = tokio::time::sleep(first_delay) => {}
        }
    }
    fire(&refresher, &store, interval).await;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of a fresh interval resolves immediately; consume it so
    // the loop waits a full period after the fire above.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            () = shutdown.notified() => return,
            _ = ticker.tick() => fire(&refresher, &store, interval).await,
        }
    }
}

/// One fire: advance the persisted due time, then invoke the refresh.
async fn fire<R, S>(refresher: &R, store: &S, interval: Duration)
where
    R: TokenRefresher,
    S: ScheduleStore,
{
    persist_next(store, interval).await;
    if let Err(error) = refresher.refresh().await {
        // Fixed cadence: the next tick is the retry.
        debug!(error = %error, "token refresh failed");
    }
}

async fn persist_next<S: ScheduleStore>(store: &S, interval: Duration) {
    let due = OffsetDateTime::now_utc() + interval;
    if let Err(error) = store.save(due).await {
        warn!(error = %error, "schedule save failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::store::MemoryScheduleStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INTERVAL: Duration = Duration::from_secs(100);

    #[derive(Clone, Default)]
    struct CountingRefresher {
        calls: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl CountingRefresher {
        fn slow(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TokenRefresher for CountingRefresher {
        fn refresh(
            &self,
        ) -> impl Future<Output = Result<TokenPair, Box<dyn std::error::Error + Send + Sync>>> + Send
        {
            let calls = Arc::clone(&self.calls);
            let in_flight = Arc::clone(&self.in_flight);
            let max_in_flight = Arc::clone(&self.max_in_flight);
            let delay = self.delay;
            async move {
                let live = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_in_flight.fetch_max(live, Ordering::SeqCst);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                in_flight.fetch_sub(1, Ordering::SeqCst);
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(TokenPair {
                    access_token: "rotated".into(),
                    refresh_token: None,
                })
            }
        }
    }

    /// Store whose operations always fail.
    struct BrokenStore;

    impl ScheduleStore for BrokenStore {
        async fn load(
            &self,
        ) -> Result<Option<OffsetDateTime>, Box<dyn std::error::Error + Send + Sync>> {
            Err("store unavailable".into())
        }

        async fn save(
            &self,
            _due: OffsetDateTime,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("store unavailable".into())
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_start_persists_due_on_arm() {
        let store = MemoryScheduleStore::new();
        let refresher = CountingRefresher::default();
        let _handle = RefreshScheduler::new()
            .with_interval(INTERVAL)
            .spawn(refresher.clone(), store.clone());
        settle().await;

        let due = store.load().await.unwrap().expect("due time persisted on arm");
        let lead = due - OffsetDateTime::now_utc();
        assert!(lead > time::Duration::seconds(99), "lead {lead}");
        assert!(lead <= time::Duration::seconds(101), "lead {lead}");
        assert_eq!(refresher.calls(), 0, "no fire before the interval elapses");
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_start_fires_once_per_interval() {
        let refresher = CountingRefresher::default();
        let _handle = RefreshScheduler::new()
            .with_interval(INTERVAL)
            .spawn(refresher.clone(), MemoryScheduleStore::new());

        tokio::time::sleep(Duration::from_secs(99)).await;
        assert_eq!(refresher.calls(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(refresher.calls(), 1);

        tokio::time::sleep(Duration::from_secs(98)).await;
        assert_eq!(refresher.calls(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(refresher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn overdue_resume_fires_immediately() {
        let store = MemoryScheduleStore::new();
        store
            .save(OffsetDateTime::now_utc() - Duration::from_secs(5))
            .await
            .unwrap();

        let refresher = CountingRefresher::default();
        let _handle = RefreshScheduler::new()
            .with_interval(INTERVAL)
            .spawn(refresher.clone(), store.clone());
        settle().await;

        assert_eq!(refresher.calls(), 1, "overdue fire is not delayed");
        let due = store.load().await.unwrap().unwrap();
        assert!(due > OffsetDateTime::now_utc(), "a new cycle is persisted");
    }

    #[tokio::test(start_paused = true)]
    async fn future_due_resume_waits_out_the_stored_delay() {
        let store = MemoryScheduleStore::new();
        store
            .save(OffsetDateTime::now_utc() + Duration::from_secs(40))
            .await
            .unwrap();

        let refresher = CountingRefresher::default();
        let _handle = RefreshScheduler::new()
            .with_interval(INTERVAL)
            .spawn(refresher.clone(), store);

        tokio::time::sleep(Duration::from_secs(39)).await;
        assert_eq!(refresher.calls(), 0, "stored schedule is honored");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(refresher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_refresh_never_overlaps() {
        // Refresh takes 2.5 periods: ticks landing mid-flight must be
        // dropped, not queued.
        let refresher = CountingRefresher::slow(Duration::from_secs(250));
        let _handle = RefreshScheduler::new()
            .with_interval(INTERVAL)
            .spawn(refresher.clone(), MemoryScheduleStore::new());

        tokio::time::sleep(Duration::from_secs(1000)).await;

        assert_eq!(
            refresher.max_in_flight.load(Ordering::SeqCst),
            1,
            "no concurrent refresh calls"
        );
        let calls = refresher.calls();
        assert!((2..=4).contains(&calls), "period stretched, calls {calls}");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_future_fires() {
        let refresher = CountingRefresher::default();
        let handle = RefreshScheduler::new()
            .with_interval(INTERVAL)
            .spawn(refresher.clone(), MemoryScheduleStore::new());

        tokio::time::sleep(Duration::from_secs(150)).await;
        assert_eq!(refresher.calls(), 1);

        handle.shutdown();
        settle().await;
        assert!(handle.is_finished());

        tokio::time::sleep(Duration::from_secs(1000)).await;
        assert_eq!(refresher.calls(), 1, "no fires after teardown");
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_armed_timer() {
        let refresher = CountingRefresher::default();
        {
            let _handle = RefreshScheduler::new()
                .with_interval(INTERVAL)
                .spawn(refresher.clone(), MemoryScheduleStore::new());
            tokio::time::sleep(Duration::from_secs(50)).await;
        }

        tokio::time::sleep(Duration::from_secs(500)).await;
        assert_eq!(refresher.calls(), 0, "dropped before the first fire");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_lets_the_in_flight_refresh_finish() {
        let refresher = CountingRefresher::slow(Duration::from_secs(200));
        let handle = RefreshScheduler::new()
            .with_interval(INTERVAL)
            .spawn(refresher.clone(), MemoryScheduleStore::new());

        // Fire starts at t=100 and runs until t=300; shut down mid-flight.
        tokio::time::sleep(Duration::from_secs(150)).await;
        handle.shutdown();

        tokio::time::sleep(Duration::from_secs(200)).await;
        assert_eq!(refresher.calls(), 1, "in-flight refresh ran to completion");
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn broken_store_does_not_stop_the_cadence() {
        let refresher = CountingRefresher::default();
        let _handle = RefreshScheduler::new()
            .with_interval(INTERVAL)
            .spawn(refresher.clone(), BrokenStore);

        tokio::time::sleep(Duration::from_secs(201)).await;
        assert_eq!(refresher.calls(), 2, "fires despite store failures");
    }
}
