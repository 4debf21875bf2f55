use std::io::{self, Write};

use vigil_obs::{encode_node, parse_observation, ColumnLayout, FieldValue, TraceNode};

/// Document-level descriptor of a counterexample-replay trace. The
/// checker requires this fixed triple on the wrapper element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub doc_type: String,
    pub id: String,
    pub desc: String,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            doc_type: "0".to_string(),
            id: "1".to_string(),
            desc: "LTL Counterexample".to_string(),
        }
    }
}

/// An ordered sequence of per-step trace nodes plus the descriptor,
/// ready to be serialized into the checker's trace document format.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceDocument {
    pub descriptor: Descriptor,
    pub nodes: Vec<TraceNode>,
}

impl TraceDocument {
    pub fn new(nodes: Vec<TraceNode>) -> Self {
        Self {
            descriptor: Descriptor::default(),
            nodes,
        }
    }

    /// Serialize as the checker's XML trace document.
    ///
    /// Flags render as `TRUE`/`FALSE`, integers as decimals.
    pub fn write_xml(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        writeln!(
            out,
            r#"<counter-example type="{}" id="{}" desc="{}">"#,
            self.descriptor.doc_type, self.descriptor.id, self.descriptor.desc
        )?;
        for node in &self.nodes {
            write!(out, r#"<node><state id="{}">"#, node.step)?;
            for (name, value) in &node.values {
                let text = match value {
                    FieldValue::Flag(true) => "TRUE".to_string(),
                    FieldValue::Flag(false) => "FALSE".to_string(),
                    FieldValue::Int(v) => v.to_string(),
                };
                write!(out, r#"<value variable="{name}">{text}</value>"#)?;
            }
            writeln!(out, "</state></node>")?;
        }
        writeln!(out, "</counter-example>")?;
        Ok(())
    }
}

/// Convert a whole recorded trace into a trace document.
///
/// One node per accepted line, step-indexed starting at 1. Skipped lines
/// still advance the step counter so exported step numbers align with the
/// checker's own step reporting.
pub fn export<I>(lines: I, layout: &ColumnLayout) -> TraceDocument
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut nodes = Vec::new();
    let mut step: u64 = 1;
    for line in lines {
        if let Some(obs) = parse_observation(line.as_ref(), layout) {
            nodes.push(encode_node(&obs, step));
        }
        step += 1;
    }
    TraceDocument::new(nodes)
}
