use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use vigil_obs::{encode_for, FieldValue, Observation, PropertyConfig};
use vigil_oracle::{OracleClient, Verdict};

use crate::run::RunError;
use crate::session::{MonitoringSession, RunSummary};

/// One sample from a live observation producer: the per-tool presence
/// vector emitted by the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSample {
    pub tools: Vec<bool>,
}

impl ToolSample {
    /// The in-view flag: any tool present.
    pub fn any_present(&self) -> bool {
        self.tools.iter().any(|t| *t)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SourceError(pub String);

/// A live observation producer (camera + segmentation model, or a
/// scripted stand-in). `None` means the feed ended.
///
/// Implementations release the underlying capture resource in `Drop`, so
/// the loop can guarantee release on every exit path.
pub trait SampleSource {
    fn next_sample(&mut self) -> Result<Option<ToolSample>, SourceError>;
}

/// Append-only per-step log for the live variant, created fresh per
/// process start under a timestamped name.
pub struct RunLog {
    out: BufWriter<File>,
    path: PathBuf,
}

impl RunLog {
    pub fn create(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let path = dir.join(format!("rv_run_{ts}.log"));
        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(
            out,
            "step, tools vector, inCameraView, verdict, time passed since previous step, FPS"
        )?;
        Ok(Self { out, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(
        &mut self,
        step: u64,
        sample: &ToolSample,
        flag: bool,
        verdict: Verdict,
        elapsed_secs: f64,
        fps: f64,
    ) -> io::Result<()> {
        let vector: Vec<u8> = sample.tools.iter().map(|t| u8::from(*t)).collect();
        writeln!(
            self.out,
            "{step}, {vector:?}, {flag}, {verdict}, {elapsed_secs:.3}, {fps:.2}"
        )?;
        self.out.flush()
    }
}

/// The live delivery mode: pull tool-presence samples from a capture
/// source, submit the derived in-view flag per step, and log every step.
///
/// An operator interrupt (the `cancel` flag) stops the loop without
/// losing the accumulated summary; the source itself is released when it
/// drops, unconditionally. The property must expose a single flag column
/// — its name is the proposition submitted to the oracle.
pub fn live_run<S: SampleSource>(
    mut source: S,
    oracle: &mut dyn OracleClient,
    property: &PropertyConfig,
    log: &mut RunLog,
    cancel: &AtomicBool,
) -> Result<RunSummary, RunError> {
    let kind = oracle.assertion_kind();
    let proposition = property
        .layout
        .columns
        .first()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "inCameraView".to_string());

    let mut session = MonitoringSession::new();
    // Live steps count from 0, matching the capture experiment's log.
    let mut step: u64 = 0;
    // The log's elapsed column reports the previous frame's processing
    // time, as the capture pipeline measures it.
    let mut prev_frame_secs = 0.0;

    while !cancel.load(Ordering::Relaxed) {
        let frame_start = Instant::now();
        let Some(sample) = source.next_sample()? else {
            break;
        };
        let flag = sample.any_present();

        let obs = Observation::new(vec![(proposition.clone(), FieldValue::Flag(flag))]);
        let assertion = encode_for(&obs, kind);

        let started = Instant::now();
        let verdict = oracle.submit(&assertion)?;
        let finished = Instant::now();
        session.record(step, started, finished, verdict);

        let frame_secs = frame_start.elapsed().as_secs_f64();
        let fps = if frame_secs > 0.0 { 1.0 / frame_secs } else { 0.0 };
        log.record(step, &sample, flag, verdict, prev_frame_secs, fps)?;

        prev_frame_secs = frame_secs;
        step += 1;
    }

    if cancel.load(Ordering::Relaxed) {
        tracing::info!("capture loop interrupted by operator");
    }
    Ok(session.finish())
}
