use std::time::{Duration, Instant};

use serde::Serialize;

use vigil_oracle::Verdict;

/// The first violation observed in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViolationRecord {
    pub step: u64,
    /// Wall-clock offset from the run's start timestamp.
    pub elapsed: Duration,
}

/// Per-run mutable bookkeeping around the oracle calls.
///
/// Exclusively owned by the single submission loop; never shared across
/// runs or threads.
#[derive(Debug, Default)]
pub struct MonitoringSession {
    start: Option<Instant>,
    last: Option<Instant>,
    max_latency: Duration,
    max_latency_step: Option<u64>,
    violation: Option<ViolationRecord>,
}

impl MonitoringSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed oracle call.
    ///
    /// The run's start timestamp is set exactly once, from the first
    /// recorded call — never at process launch, so parsing/setup cost
    /// stays out of the wall-clock statistics. The max-latency update is
    /// strict-greater, so ties keep the earliest step; the violation
    /// record is written once, by the first `Violated` verdict.
    pub fn record(&mut self, step: u64, started: Instant, finished: Instant, verdict: Verdict) {
        let start = *self.start.get_or_insert(started);
        self.last = Some(finished);

        let latency = finished.duration_since(started);
        if latency > self.max_latency {
            self.max_latency = latency;
            self.max_latency_step = Some(step);
        }

        if verdict.is_violation() && self.violation.is_none() {
            self.violation = Some(ViolationRecord {
                step,
                elapsed: finished.duration_since(start),
            });
        }
    }

    /// Wall-clock span from the first accepted step to the last call.
    /// Zero when nothing was ever accepted — that is a clean empty run,
    /// not an error.
    pub fn total(&self) -> Duration {
        match (self.start, self.last) {
            (Some(start), Some(last)) => last.duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn first_violation(&self) -> Option<ViolationRecord> {
        self.violation
    }

    pub fn finish(&self) -> RunSummary {
        RunSummary {
            max_latency: self.max_latency,
            max_latency_step: self.max_latency_step,
            total: self.total(),
            violation: self.violation,
        }
    }
}

/// End-of-run summary, read once after the loop finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub max_latency: Duration,
    pub max_latency_step: Option<u64>,
    pub total: Duration,
    pub violation: Option<ViolationRecord>,
}

impl RunSummary {
    /// The fixed three-line summary every delivery mode prints.
    pub fn render(&self) -> String {
        let latency_line = match self.max_latency_step {
            Some(step) => format!(
                "Max per-step time: {:.2} ms at step {step}",
                self.max_latency.as_secs_f64() * 1000.0
            ),
            None => "Max per-step time: 0.00 ms".to_string(),
        };
        let total_line = format!("Wall-clock runtime: {:.3} s", self.total.as_secs_f64());
        let verdict_line = match self.violation {
            None => "No violation found.".to_string(),
            Some(v) => format!(
                "Violation at step {} (wall-clock time = {:.3} s)",
                v.step,
                v.elapsed.as_secs_f64()
            ),
        };
        format!("{latency_line}\n{total_line}\n{verdict_line}")
    }
}
