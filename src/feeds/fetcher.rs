use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::api::FetchError;
use crate::health::{FeedStatus, HealthMonitor};

/// Fixed per-path confidence. Coarse signals, not computed statistics.
pub const LIVE_CONFIDENCE: f32 = 0.9;
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Upstream,
    Synthetic,
}

/// What every feed operation hands back: the payload plus where it came
/// from. Callers never see an error — degradation is expressed through
/// `sources`/`confidence` and the health ledger.
#[derive(Debug, Clone, Serialize)]
pub struct CrossValidated<T> {
    pub value: T,
    pub sources: Vec<SourceId>,
    pub confidence: f32,
}

/// Attempt the live operation under `deadline`; on any failure substitute
/// `fallback`. Reports the outcome for `feed` exactly once. When the
/// deadline fires the in-flight future is dropped, so a response arriving
/// late is discarded rather than double-reported.
pub async fn fetch_with_fallback<T, Fut>(
    monitor: &HealthMonitor,
    feed: &str,
    deadline: Duration,
    live: Fut,
    fallback: T,
) -> CrossValidated<T>
where
    Fut: Future<Output = Result<T, FetchError>>,
{
    let outcome = match tokio::time::timeout(deadline, live).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::DeadlineExceeded(deadline)),
    };

    match outcome {
        Ok(value) => {
            monitor.report(feed, FeedStatus::Live);
            CrossValidated {
                value,
                sources: vec![SourceId::Upstream],
                confidence: LIVE_CONFIDENCE,
            }
        }
        Err(err) => {
            tracing::warn!("feed '{}' degraded to synthetic data: {}", feed, err);
            monitor.report(feed, FeedStatus::Fallback);
            CrossValidated {
                value: fallback,
                sources: vec![SourceId::Synthetic],
                confidence: FALLBACK_CONFIDENCE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Overall;
    use tokio::sync::broadcast::error::TryRecvError;

    const DEADLINE: Duration = Duration::from_secs(12);

    fn monitor() -> HealthMonitor {
        HealthMonitor::new(Duration::from_secs(21))
    }

    #[tokio::test]
    async fn success_is_tagged_upstream_and_reported_live() {
        let monitor = monitor();
        let result =
            fetch_with_fallback(&monitor, "quotes", DEADLINE, async { Ok(vec![1, 2, 3]) }, vec![])
                .await;

        assert_eq!(result.value, vec![1, 2, 3]);
        assert_eq!(result.sources, vec![SourceId::Upstream]);
        assert_eq!(result.confidence, LIVE_CONFIDENCE);
        assert_eq!(monitor.snapshot().overall, Overall::Live);
    }

    #[tokio::test]
    async fn failure_substitutes_the_fallback() {
        let monitor = monitor();
        let result = fetch_with_fallback(
            &monitor,
            "events",
            DEADLINE,
            async { Err(FetchError::Upstream("data source unavailable".into())) },
            vec![7u32],
        )
        .await;

        assert_eq!(result.value, vec![7]);
        assert_eq!(result.sources, vec![SourceId::Synthetic]);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(monitor.snapshot().fallback_feeds, vec!["events"]);
    }

    #[tokio::test]
    async fn empty_collections_are_live_results() {
        let monitor = monitor();
        let result = fetch_with_fallback(
            &monitor,
            "strategy",
            DEADLINE,
            async { Ok(Vec::<u32>::new()) },
            vec![1, 2],
        )
        .await;

        assert!(result.value.is_empty());
        assert_eq!(result.sources, vec![SourceId::Upstream]);
        assert_eq!(monitor.snapshot().overall, Overall::Live);
    }

    #[tokio::test(start_paused = true)]
    async fn a_hung_live_call_falls_back_at_the_deadline() {
        let monitor = monitor();
        let result = fetch_with_fallback(
            &monitor,
            "overview",
            DEADLINE,
            async {
                futures::future::pending::<()>().await;
                unreachable!()
            },
            42u32,
        )
        .await;

        assert_eq!(result.value, 42);
        assert_eq!(result.sources, vec![SourceId::Synthetic]);
        assert_eq!(monitor.snapshot().fallback_feeds, vec!["overview"]);
    }

    #[tokio::test(start_paused = true)]
    async fn a_late_response_is_discarded_not_double_reported() {
        let monitor = monitor();
        let mut rx = monitor.subscribe();

        let result = fetch_with_fallback(
            &monitor,
            "kline",
            DEADLINE,
            async {
                tokio::time::sleep(DEADLINE * 2).await;
                Ok(1u32)
            },
            0u32,
        )
        .await;
        assert_eq!(result.value, 0);

        // Exactly one report reached the ledger, tagged fallback.
        let only = rx.try_recv().unwrap();
        assert_eq!(only.fallback_count, 1);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        // Let the would-be late completion time pass; still nothing new.
        tokio::time::sleep(DEADLINE * 3).await;
        assert_eq!(monitor.snapshot().fallback_feeds, vec!["kline"]);
    }

    #[test]
    fn constants_are_the_fixed_coarse_signals() {
        tokio_test::block_on(async {
            let monitor = monitor();
            let live =
                fetch_with_fallback(&monitor, "a", DEADLINE, async { Ok(()) }, ()).await;
            let degraded = fetch_with_fallback(
                &monitor,
                "b",
                DEADLINE,
                async { Err(FetchError::Upstream("down".into())) },
                (),
            )
            .await;
            assert_eq!(live.confidence, 0.9);
            assert_eq!(degraded.confidence, 0.3);
        });
    }
}
