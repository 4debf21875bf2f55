use serde::{Deserialize, Serialize};

use crate::property::{ColumnLayout, FieldKind};

/// A single raw field value read from one input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Int(i64),
    Flag(bool),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(v) => Some(*v),
            FieldValue::Int(_) => None,
        }
    }
}

/// One parsed per-step record: the relevant fields, in configuration order.
///
/// Immutable once parsed. Field names come from the active property's
/// column layout, so downstream encoders never touch raw column indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    fields: Vec<(String, FieldValue)>,
}

impl Observation {
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    /// Fields in the order the property configuration lists them.
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Parse one delimited input line against a column layout.
///
/// Splits on only as many delimiters as the layout needs, so trailing
/// free-form text never breaks parsing. Returns `None` (a skip signal,
/// never an error) when the line has too few fields or a relevant numeric
/// field fails to parse. Callers must still advance their step counter on
/// a skip so step indices stay aligned with the source.
pub fn parse_observation(line: &str, layout: &ColumnLayout) -> Option<Observation> {
    let needed = layout.min_fields();
    let parts: Vec<&str> = line.splitn(needed + 1, ',').collect();
    if parts.len() < needed {
        return None;
    }

    let mut fields = Vec::with_capacity(layout.columns.len());
    for spec in &layout.columns {
        let raw = parts.get(spec.column)?;
        let value = match spec.kind {
            FieldKind::Int => FieldValue::Int(raw.trim().parse().ok()?),
            // A flag is set iff its first non-whitespace character is '1'.
            FieldKind::Flag => FieldValue::Flag(raw.trim_start().starts_with('1')),
        };
        fields.push((spec.name.clone(), value));
    }

    Some(Observation::new(fields))
}
