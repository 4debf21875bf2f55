//! Offline trace export: the external checker's counterexample-replay
//! document, its command script, and the temporary artifacts that carry
//! both to the subprocess.

pub mod artifacts;
pub mod document;
pub mod script;

pub use artifacts::{ExportError, ReplayArtifacts};
pub use document::{export, Descriptor, TraceDocument};
pub use script::CommandScript;
