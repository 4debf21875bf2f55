use std::fmt;

/// The oracle's judgment for one step.
///
/// The in-process and replay back ends are boolean and only ever produce
/// `Satisfied` or `Violated`; an RPC monitor may also answer `Unknown`,
/// which is never treated as a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Satisfied,
    Violated,
    Unknown,
}

impl Verdict {
    pub fn is_violation(&self) -> bool {
        matches!(self, Verdict::Violated)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Satisfied => write!(f, "True"),
            Verdict::Violated => write!(f, "False"),
            Verdict::Unknown => write!(f, "Unknown"),
        }
    }
}
