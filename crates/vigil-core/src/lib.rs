//! The monitoring harness itself: per-run latency/violation bookkeeping
//! and the online, offline, and live submission loops.

pub mod live;
pub mod run;
pub mod session;

pub use live::{live_run, RunLog, SampleSource, SourceError, ToolSample};
pub use run::{offline_run, online_run, replay_session, RunError};
pub use session::{MonitoringSession, RunSummary, ViolationRecord};
