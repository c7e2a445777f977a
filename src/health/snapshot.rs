use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a feed's most recent value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Live,
    Fallback,
}

/// Aggregate verdict across every feed that has reported so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overall {
    Unknown,
    Live,
    Fallback,
}

impl Overall {
    pub fn as_str(&self) -> &'static str {
        match self {
            Overall::Unknown => "unknown",
            Overall::Live => "live",
            Overall::Fallback => "fallback",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Overall::Live)
    }
}

/// Latest status for one feed. Last write wins; no history is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub feed: String,
    pub status: FeedStatus,
    pub at: DateTime<Utc>,
}

/// Derived view of the ledger handed to subscribers and the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub overall: Overall,
    pub live_count: usize,
    pub fallback_count: usize,
    pub fallback_feeds: Vec<String>,
    pub warming: bool,
    pub last_update: Option<DateTime<Utc>>,
}

impl HealthSnapshot {
    /// Sentinel handed out before any report has landed, so consumers that
    /// resolve state ahead of the first poll never see a half-built view.
    pub fn initial() -> Self {
        Self {
            overall: Overall::Unknown,
            live_count: 0,
            fallback_count: 0,
            fallback_feeds: Vec::new(),
            warming: false,
            last_update: None,
        }
    }
}

/// Recompute the aggregate from the ledger. Pure: the same ledger contents
/// always produce the same snapshot, and `fallback_feeds` keeps the ledger's
/// first-report order rather than being re-sorted.
pub fn build_snapshot(ledger: &[StatusReport], warming: bool) -> HealthSnapshot {
    let mut live_count = 0;
    let mut fallback_feeds = Vec::new();
    let mut last_update = None;

    for report in ledger {
        match report.status {
            FeedStatus::Live => live_count += 1,
            FeedStatus::Fallback => fallback_feeds.push(report.feed.clone()),
        }
        if last_update.map_or(true, |seen| report.at > seen) {
            last_update = Some(report.at);
        }
    }

    let fallback_count = fallback_feeds.len();
    let overall = if ledger.is_empty() {
        Overall::Unknown
    } else if fallback_count == 0 {
        Overall::Live
    } else {
        Overall::Fallback
    };

    HealthSnapshot {
        overall,
        live_count,
        fallback_count,
        fallback_feeds,
        warming,
        last_update,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(feed: &str, status: FeedStatus) -> StatusReport {
        StatusReport {
            feed: feed.to_string(),
            status,
            at: Utc::now(),
        }
    }

    #[test]
    fn empty_ledger_is_unknown() {
        let snapshot = build_snapshot(&[], false);
        assert_eq!(snapshot.overall, Overall::Unknown);
        assert_eq!(snapshot.live_count, 0);
        assert_eq!(snapshot.fallback_count, 0);
        assert!(snapshot.fallback_feeds.is_empty());
        assert_eq!(snapshot.last_update, None);
        assert_eq!(snapshot, HealthSnapshot::initial());
    }

    #[test]
    fn one_fallback_degrades_the_aggregate() {
        let ledger = vec![
            report("quotes", FeedStatus::Live),
            report("events", FeedStatus::Fallback),
        ];
        let snapshot = build_snapshot(&ledger, false);
        assert_eq!(snapshot.overall, Overall::Fallback);
        assert_eq!(snapshot.live_count, 1);
        assert_eq!(snapshot.fallback_count, 1);
        assert_eq!(snapshot.fallback_feeds, vec!["events"]);
    }

    #[test]
    fn all_live_is_live() {
        let ledger = vec![
            report("overview", FeedStatus::Live),
            report("quotes", FeedStatus::Live),
        ];
        let snapshot = build_snapshot(&ledger, false);
        assert_eq!(snapshot.overall, Overall::Live);
        assert_eq!(snapshot.live_count, 2);
        assert_eq!(snapshot.fallback_count, 0);
    }

    #[test]
    fn counts_always_cover_the_ledger() {
        let ledger = vec![
            report("overview", FeedStatus::Fallback),
            report("quotes", FeedStatus::Live),
            report("events", FeedStatus::Fallback),
            report("scanner", FeedStatus::Live),
        ];
        let snapshot = build_snapshot(&ledger, true);
        assert_eq!(snapshot.live_count + snapshot.fallback_count, ledger.len());
        assert!(snapshot.warming);
    }

    #[test]
    fn rebuild_without_writes_is_identical() {
        let ledger = vec![
            report("quotes", FeedStatus::Fallback),
            report("events", FeedStatus::Live),
        ];
        assert_eq!(build_snapshot(&ledger, false), build_snapshot(&ledger, false));
    }

    #[test]
    fn fallback_feeds_keep_first_report_order() {
        let ledger = vec![
            report("zebra", FeedStatus::Fallback),
            report("alpha", FeedStatus::Fallback),
            report("quotes", FeedStatus::Live),
            report("mid", FeedStatus::Fallback),
        ];
        let snapshot = build_snapshot(&ledger, false);
        assert_eq!(snapshot.fallback_feeds, vec!["zebra", "alpha", "mid"]);
    }

    #[test]
    fn last_update_is_the_newest_report() {
        let mut first = report("overview", FeedStatus::Live);
        first.at = Utc::now() - chrono::Duration::seconds(30);
        let second = report("quotes", FeedStatus::Live);
        let newest = second.at;
        let snapshot = build_snapshot(&[first, second], false);
        assert_eq!(snapshot.last_update, Some(newest));
    }
}
