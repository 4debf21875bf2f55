use std::io;
use std::path::Path;
use std::time::Instant;

use vigil_obs::{encode_for, parse_observation, PropertyConfig};
use vigil_oracle::{OracleClient, OracleError, ReplayConfig, ReplayError, ReplayEvent, ReplayRunner};
use vigil_trace::{export, ExportError, ReplayArtifacts};

use crate::session::{MonitoringSession, RunSummary};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to read trace input: {0}")]
    Io(#[from] io::Error),

    #[error("checker run did not complete: {source}")]
    Checker {
        #[source]
        source: ReplayError,
        /// Whatever accumulated before the failure. Not conclusive.
        partial: RunSummary,
    },

    #[error("sample source error: {0}")]
    Source(#[from] crate::live::SourceError),
}

/// The online delivery mode: stream one observation at a time to a
/// per-step oracle and track each call.
///
/// Malformed lines are skipped but still advance the 1-based step counter
/// so step numbering stays aligned with the source. A failed oracle call
/// aborts the run — skipping a step would corrupt violation numbering.
pub fn online_run<L>(
    lines: L,
    oracle: &mut dyn OracleClient,
    property: &PropertyConfig,
) -> Result<RunSummary, RunError>
where
    L: IntoIterator<Item = io::Result<String>>,
{
    let kind = oracle.assertion_kind();
    let mut session = MonitoringSession::new();
    let mut step: u64 = 1;

    for line in lines {
        let line = line?;
        let Some(obs) = parse_observation(&line, &property.layout) else {
            step += 1;
            continue;
        };

        let assertion = encode_for(&obs, kind);
        let started = Instant::now();
        let verdict = oracle.submit(&assertion)?;
        let finished = Instant::now();
        session.record(step, started, finished, verdict);
        step += 1;
    }

    let summary = session.finish();
    if let Some(v) = summary.violation {
        tracing::info!(property = %property.name, step = v.step, "first violation");
    }
    Ok(summary)
}

/// Drive a prepared replay runner and fold its event stream into a
/// session: the marker line is the timing epoch, each verdict line is one
/// step whose latency is the gap since the previous line.
pub fn replay_session(runner: ReplayRunner) -> Result<RunSummary, RunError> {
    let mut session = MonitoringSession::new();
    let mut prev: Option<Instant> = None;

    let outcome = runner.run(|event, at| match event {
        ReplayEvent::TraceStored => {
            prev = Some(at);
        }
        ReplayEvent::Verdict { step, verdict } => {
            let started = prev.unwrap_or(at);
            session.record(step, started, at, verdict);
            prev = Some(at);
        }
    });

    let summary = session.finish();
    match outcome {
        Ok(()) => Ok(summary),
        Err(source) => Err(RunError::Checker {
            source,
            partial: summary,
        }),
    }
}

/// The offline delivery mode: convert the whole recorded trace into the
/// checker's document format, replay it through the external process, and
/// recover the verdict stream from its output.
///
/// The temporary artifacts are removed on every exit path.
pub fn offline_run<L>(
    lines: L,
    property: &PropertyConfig,
    tool: &Path,
    model: &Path,
) -> Result<RunSummary, RunError>
where
    L: IntoIterator<Item = io::Result<String>>,
{
    let lines: Vec<String> = lines.into_iter().collect::<io::Result<_>>()?;
    let document = export(lines.iter(), &property.layout);
    tracing::debug!(
        property = %property.name,
        nodes = document.nodes.len(),
        "exported trace document"
    );

    let artifacts = ReplayArtifacts::create(&document, property)?;
    let runner = ReplayRunner::new(&ReplayConfig {
        tool: tool.to_path_buf(),
        model: model.to_path_buf(),
        script: artifacts.script_path().to_path_buf(),
    });

    // Artifacts must outlive the subprocess; drop happens after.
    let summary = replay_session(runner);
    drop(artifacts);
    summary
}
