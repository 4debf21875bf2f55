use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam::channel::{unbounded, Sender};

use crate::verdict::Verdict;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to spawn checker '{tool}': {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("checker I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checker exited with {status}")]
    ToolFailed { status: std::process::ExitStatus },
}

/// One event recovered from the checker's output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayEvent {
    /// The "trace stored" marker: the timing epoch. Everything before it
    /// is the tool's own startup chatter and is excluded from latency
    /// statistics.
    TraceStored,
    /// One per-step verdict line.
    Verdict { step: u64, verdict: Verdict },
}

/// Parse one output line against the checker's line grammar:
/// a line containing the literal `Trace is stored` marker, or a
/// `<int>, <true|false>` verdict (case-insensitive, leading whitespace
/// allowed, trailing text ignored). Anything else is noise.
pub fn parse_output_line(line: &str) -> Option<ReplayEvent> {
    if line.contains("Trace is stored") {
        return Some(ReplayEvent::TraceStored);
    }

    let rest = line.trim_start();
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let (digits, tail) = rest.split_at(digits_end);
    let tail = tail.strip_prefix(',')?.trim_start();

    // Byte-wise comparison: the tail is arbitrary subprocess output and
    // may hold multi-byte characters at any offset.
    let tail = tail.as_bytes();
    let verdict = if tail.get(..4).is_some_and(|b| b.eq_ignore_ascii_case(b"true")) {
        Verdict::Satisfied
    } else if tail.get(..5).is_some_and(|b| b.eq_ignore_ascii_case(b"false")) {
        Verdict::Violated
    } else {
        return None;
    };

    let step = digits.parse().ok()?;
    Some(ReplayEvent::Verdict { step, verdict })
}

/// How to invoke the external checker for one offline run.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub tool: PathBuf,
    pub model: PathBuf,
    pub script: PathBuf,
}

/// Offline replay strategy: run the external checker once over a full
/// trace document and scan its output incrementally.
///
/// Not a per-step client — the whole verdict stream arrives through one
/// subprocess invocation, line by line, so latency attribution stays
/// accurate and memory stays bounded for long traces.
pub struct ReplayRunner {
    command: Command,
    tool: String,
}

impl ReplayRunner {
    pub fn new(config: &ReplayConfig) -> Self {
        let mut command = Command::new(&config.tool);
        command
            .arg("-quiet")
            .arg("-source")
            .arg(&config.script)
            .arg(&config.model);
        Self {
            command,
            tool: config.tool.display().to_string(),
        }
    }

    /// Build a runner from an arbitrary command. Tests use this to stand
    /// in a scripted process for the real checker.
    pub fn from_command(command: Command) -> Self {
        let tool = command.get_program().to_string_lossy().into_owned();
        Self { command, tool }
    }

    /// Spawn the checker and feed every parsed event, stamped at arrival
    /// time, to `on_event`. Verdict lines before the marker are startup
    /// noise and are dropped. A non-zero exit is fatal for the run.
    pub fn run(
        mut self,
        mut on_event: impl FnMut(ReplayEvent, Instant),
    ) -> Result<(), ReplayError> {
        self.command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(tool = %self.tool, "spawning checker");
        let mut child = self.command.spawn().map_err(|source| ReplayError::Spawn {
            tool: self.tool.clone(),
            source,
        })?;

        // Merge stdout and stderr into one line stream in arrival order —
        // the marker and the verdicts may land on either.
        let (tx, rx) = unbounded::<String>();
        let mut readers: Vec<JoinHandle<()>> = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        let mut marker_seen = false;
        for line in rx {
            let now = Instant::now();
            match parse_output_line(&line) {
                Some(ReplayEvent::TraceStored) if !marker_seen => {
                    marker_seen = true;
                    on_event(ReplayEvent::TraceStored, now);
                }
                Some(event @ ReplayEvent::Verdict { .. }) if marker_seen => {
                    on_event(event, now);
                }
                _ => {}
            }
        }

        for handle in readers {
            let _ = handle.join();
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(ReplayError::ToolFailed { status });
        }
        Ok(())
    }
}

fn forward_lines(reader: impl Read + Send + 'static, tx: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let reader = BufReader::new(reader);
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    })
}
