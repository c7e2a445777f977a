use crate::health::snapshot::Overall;

/// Startup/degradation grace phases. A fresh process is `Cold`; the first
/// report opens one grace window (`Warming`); the window either confirms the
/// degradation (`Settled`) or is cancelled by the aggregate turning live.
/// After a recovery, entering a non-live state opens a new window — one per
/// degradation session, never re-armed by further fallback reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupPhase {
    Cold,
    Warming,
    Live,
    Settled,
}

/// What the owner of the grace timer has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    None,
    Arm,
    Cancel,
}

impl WarmupPhase {
    pub fn is_warming(&self) -> bool {
        matches!(self, WarmupPhase::Warming)
    }

    /// Advance the phase after a ledger write left the aggregate at `overall`.
    pub fn on_report(self, overall: Overall) -> (WarmupPhase, TimerAction) {
        use WarmupPhase::*;
        match (self, overall.is_live()) {
            (Cold, true) => (Live, TimerAction::None),
            (Cold, false) => (Warming, TimerAction::Arm),
            (Warming, true) => (Live, TimerAction::Cancel),
            (Warming, false) => (Warming, TimerAction::None),
            (Live, true) => (Live, TimerAction::None),
            (Live, false) => (Warming, TimerAction::Arm),
            (Settled, true) => (Live, TimerAction::None),
            (Settled, false) => (Settled, TimerAction::None),
        }
    }

    /// Advance the phase when the grace timer fires. Returns whether the
    /// owner must force a snapshot rebuild/notification. An expiry observed
    /// in any phase other than `Warming` is a stale timer racing its own
    /// cancellation and does nothing.
    pub fn on_grace_elapsed(self) -> (WarmupPhase, bool) {
        match self {
            WarmupPhase::Warming => (WarmupPhase::Settled, true),
            other => (other, false),
        }
    }
}
