use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vigil_obs::PropertyConfig;

use crate::document::TraceDocument;
use crate::script::CommandScript;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write replay artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// The temporary trace document and command script for one offline run.
///
/// Both files live in an owned temporary directory and are removed when
/// this guard drops, on every exit path — success, verification failure,
/// or panic. Cleanup failures are ignored once the run has its result.
pub struct ReplayArtifacts {
    _dir: TempDir,
    trace_path: PathBuf,
    script_path: PathBuf,
}

impl ReplayArtifacts {
    /// Write the trace document and its command script to fresh
    /// temporary files.
    pub fn create(
        document: &TraceDocument,
        property: &PropertyConfig,
    ) -> Result<Self, ExportError> {
        let dir = tempfile::tempdir()?;
        let trace_path = dir.path().join("trace.xml");
        let script_path = dir.path().join("offline.cmd");

        let mut trace_file = BufWriter::new(File::create(&trace_path)?);
        document.write_xml(&mut trace_file)?;
        trace_file.flush()?;

        let script = CommandScript {
            trace_path: trace_path.clone(),
            property_index: property.property_index,
            past_time: property.past_time,
        };
        std::fs::write(&script_path, script.render())?;

        Ok(Self {
            _dir: dir,
            trace_path,
            script_path,
        })
    }

    pub fn trace_path(&self) -> &Path {
        &self.trace_path
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }
}
