use std::path::PathBuf;

/// The newline-delimited command script consumed by the external checker:
/// start the engine, build the monitor, load the trace document, verify,
/// quit.
#[derive(Debug, Clone)]
pub struct CommandScript {
    pub trace_path: PathBuf,
    pub property_index: u32,
    /// Past-time verification adds the `-r` flag.
    pub past_time: bool,
}

impl CommandScript {
    pub fn render(&self) -> String {
        let n = self.property_index;
        let reversed = if self.past_time { "-r " } else { "" };
        format!(
            "go\n\
             build_monitor -n {n}\n\
             read_trace {path}\n\
             verify_property {reversed}-n {n} 1\n\
             quit\n",
            path = self.trace_path.display(),
        )
    }
}
