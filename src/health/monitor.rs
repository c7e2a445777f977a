use chrono::Utc;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::snapshot::{build_snapshot, FeedStatus, HealthSnapshot, StatusReport};
use super::warmup::{TimerAction, WarmupPhase};

const EVENT_CHANNEL_CAPACITY: usize = 32;

struct MonitorState {
    ledger: Vec<StatusReport>,
    snapshot: HealthSnapshot,
    phase: WarmupPhase,
    grace_timer: Option<JoinHandle<()>>,
}

/// Process-wide feed health ledger. Cheap to clone; all clones share the
/// same ledger, cached snapshot and subscriber channel. Tests construct a
/// fresh instance per case instead of sharing a global.
#[derive(Clone)]
pub struct HealthMonitor {
    state: Arc<RwLock<MonitorState>>,
    events: broadcast::Sender<HealthSnapshot>,
    grace: Duration,
}

impl HealthMonitor {
    pub fn new(grace: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(MonitorState {
                ledger: Vec::new(),
                snapshot: HealthSnapshot::initial(),
                phase: WarmupPhase::Cold,
                grace_timer: None,
            })),
            events,
            grace,
        }
    }

    /// Record the latest status for one feed, rebuild the aggregate and
    /// notify every subscriber. The whole unit runs under one write lock
    /// with no await points, so readers never observe a torn snapshot.
    pub fn report(&self, feed: &str, status: FeedStatus) {
        let snapshot = {
            let mut state = self.state.write().expect("health lock poisoned");
            let now = Utc::now();

            match state.ledger.iter_mut().find(|r| r.feed == feed) {
                Some(existing) => {
                    existing.status = status;
                    existing.at = now;
                }
                None => state.ledger.push(StatusReport {
                    feed: feed.to_string(),
                    status,
                    at: now,
                }),
            }

            let draft = build_snapshot(&state.ledger, false);
            let (phase, action) = state.phase.on_report(draft.overall);
            state.phase = phase;

            match action {
                TimerAction::Arm => {
                    if let Some(timer) = state.grace_timer.take() {
                        timer.abort();
                    }
                    state.grace_timer = Some(self.spawn_grace_timer());
                    tracing::debug!("grace window opened ({:?})", self.grace);
                }
                TimerAction::Cancel => {
                    if let Some(timer) = state.grace_timer.take() {
                        timer.abort();
                    }
                    tracing::debug!("aggregate live before grace expiry, window closed");
                }
                TimerAction::None => {}
            }

            state.snapshot = HealthSnapshot {
                warming: state.phase.is_warming(),
                ..draft
            };
            state.snapshot.clone()
        };

        // Subscribers may lag or not exist yet; neither is an error here.
        let _ = self.events.send(snapshot);
    }

    /// Most recently cached snapshot. No recompute; callable per render.
    pub fn snapshot(&self) -> HealthSnapshot {
        self.state
            .read()
            .expect("health lock poisoned")
            .snapshot
            .clone()
    }

    /// Register a listener. Notifications arrive in registration order after
    /// every report; dropping the receiver deregisters it.
    pub fn subscribe(&self) -> broadcast::Receiver<HealthSnapshot> {
        self.events.subscribe()
    }

    /// Cancel the grace timer when the owning session is torn down.
    pub fn shutdown(&self) {
        let mut state = self.state.write().expect("health lock poisoned");
        if let Some(timer) = state.grace_timer.take() {
            timer.abort();
        }
    }

    fn spawn_grace_timer(&self) -> JoinHandle<()> {
        let monitor = self.clone();
        let grace = self.grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            monitor.grace_elapsed();
        })
    }

    /// The grace window ran out. Feeds that reported fallback are now a
    /// confirmed degradation; feeds that never reported stay absent from the
    /// counts until their first poll lands.
    fn grace_elapsed(&self) {
        let forced = {
            let mut state = self.state.write().expect("health lock poisoned");
            let (phase, force) = state.phase.on_grace_elapsed();
            state.phase = phase;
            if force {
                state.grace_timer = None;
                state.snapshot = build_snapshot(&state.ledger, false);
                Some(state.snapshot.clone())
            } else {
                None
            }
        };

        if let Some(snapshot) = forced {
            tracing::warn!(
                "⚠️  grace window elapsed with {} feed(s) degraded: {:?}",
                snapshot.fallback_count,
                snapshot.fallback_feeds
            );
            let _ = self.events.send(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::snapshot::Overall;
    use tokio::sync::broadcast::error::TryRecvError;

    const GRACE: Duration = Duration::from_secs(21);

    #[tokio::test]
    async fn subscribers_see_every_report_in_order() {
        let monitor = HealthMonitor::new(GRACE);
        let mut rx = monitor.subscribe();

        monitor.report("quotes", FeedStatus::Live);
        monitor.report("events", FeedStatus::Fallback);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.overall, Overall::Live);
        assert_eq!(first.live_count, 1);

        let second = rx.try_recv().unwrap();
        assert_eq!(second.overall, Overall::Fallback);
        assert_eq!(second.fallback_feeds, vec!["events"]);

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn snapshot_is_cached_and_matches_last_notification() {
        let monitor = HealthMonitor::new(GRACE);
        assert_eq!(monitor.snapshot(), HealthSnapshot::initial());

        let mut rx = monitor.subscribe();
        monitor.report("overview", FeedStatus::Fallback);

        let notified = rx.recv().await.unwrap();
        assert_eq!(monitor.snapshot(), notified);
        assert_eq!(monitor.snapshot(), monitor.snapshot());
    }

    #[tokio::test]
    async fn rereporting_a_feed_overwrites_not_appends() {
        let monitor = HealthMonitor::new(GRACE);
        monitor.report("quotes", FeedStatus::Fallback);
        monitor.report("quotes", FeedStatus::Fallback);
        monitor.report("quotes", FeedStatus::Live);

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.live_count + snapshot.fallback_count, 1);
        assert_eq!(snapshot.overall, Overall::Live);
    }

    #[tokio::test]
    async fn monotonic_recovery_clears_stale_fallback_names() {
        let monitor = HealthMonitor::new(GRACE);
        monitor.report("quotes", FeedStatus::Fallback);
        monitor.report("events", FeedStatus::Fallback);
        monitor.report("overview", FeedStatus::Live);

        monitor.report("quotes", FeedStatus::Live);
        monitor.report("events", FeedStatus::Live);

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.overall, Overall::Live);
        assert_eq!(snapshot.fallback_count, 0);
        assert!(snapshot.fallback_feeds.is_empty());
        assert_eq!(snapshot.live_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn grace_expiry_forces_one_notification_and_settles() {
        let monitor = HealthMonitor::new(GRACE);
        monitor.report("quotes", FeedStatus::Fallback);
        assert!(monitor.snapshot().warming);

        let mut rx = monitor.subscribe();
        tokio::time::sleep(GRACE + Duration::from_secs(1)).await;

        let forced = rx.recv().await.unwrap();
        assert!(!forced.warming);
        assert_eq!(forced.overall, Overall::Fallback);
        // Feeds that never reported are absent, not counted as fallback.
        assert_eq!(forced.live_count + forced.fallback_count, 1);
        assert_eq!(forced.fallback_feeds, vec!["quotes"]);

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn going_live_inside_the_window_cancels_the_forced_rebuild() {
        let monitor = HealthMonitor::new(GRACE);
        monitor.report("quotes", FeedStatus::Fallback);
        monitor.report("events", FeedStatus::Live);
        monitor.report("quotes", FeedStatus::Live);
        assert_eq!(monitor.snapshot().overall, Overall::Live);
        assert!(!monitor.snapshot().warming);

        let mut rx = monitor.subscribe();
        tokio::time::sleep(GRACE * 2).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn degrading_after_recovery_reopens_the_window_once() {
        let monitor = HealthMonitor::new(GRACE);
        monitor.report("quotes", FeedStatus::Live);
        assert!(!monitor.snapshot().warming);

        monitor.report("events", FeedStatus::Fallback);
        assert!(monitor.snapshot().warming);

        // A second fallback while degraded must not push the expiry out.
        tokio::time::sleep(GRACE / 2).await;
        monitor.report("sectors", FeedStatus::Fallback);

        tokio::time::sleep(GRACE / 2 + Duration::from_secs(1)).await;
        assert!(!monitor.snapshot().warming);

        // Still degraded after expiry: settled, no new window.
        monitor.report("scanner", FeedStatus::Fallback);
        assert!(!monitor.snapshot().warming);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_a_pending_grace_timer() {
        let monitor = HealthMonitor::new(GRACE);
        monitor.report("quotes", FeedStatus::Fallback);

        let mut rx = monitor.subscribe();
        monitor.shutdown();

        tokio::time::sleep(GRACE * 2).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        // Phase is stuck in warming but nothing fires; snapshot unchanged.
        assert!(monitor.snapshot().warming);
    }
}
