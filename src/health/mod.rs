pub mod monitor;
pub mod snapshot;
pub mod warmup;

pub use monitor::HealthMonitor;
pub use snapshot::{build_snapshot, FeedStatus, HealthSnapshot, Overall, StatusReport};
pub use warmup::{TimerAction, WarmupPhase};
