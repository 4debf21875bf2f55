use vigil_obs::{AssertionKind, StateAssertion};

use crate::verdict::Verdict;

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("failed to connect to monitoring service: {0}")]
    Connect(std::io::Error),

    #[error("failed to resolve service name '{name}': {detail}")]
    Resolve { name: String, detail: String },

    #[error("oracle I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("oracle protocol error: {0}")]
    Protocol(String),

    #[error("oracle expects a {expected} assertion")]
    UnsupportedAssertion { expected: &'static str },

    #[error("monitor error: {0}")]
    Monitor(#[from] crate::inproc::MonitorError),
}

/// Submit one step's state assertion, get one verdict.
///
/// Callers depend only on this capability, never on which strategy is
/// behind it. A failed submission is fatal for the run — silently skipping
/// a step would desynchronize step numbering between the harness and the
/// oracle's own step-indexed verdicts, so no retries happen here.
pub trait OracleClient {
    /// The encoding this back end consumes.
    fn assertion_kind(&self) -> AssertionKind {
        AssertionKind::Predicate
    }

    fn submit(&mut self, assertion: &StateAssertion) -> Result<Verdict, OracleError>;
}
