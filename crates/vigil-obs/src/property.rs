use std::path::Path;

use serde::{Deserialize, Serialize};

/// How a raw column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int,
    Flag,
}

/// One relevant column: its 0-based position, the proposition/variable name
/// it maps to, and how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub column: usize,
    pub name: String,
    pub kind: FieldKind,
}

/// The per-property column layout. Listing order is the encoding order and
/// is part of the oracle contract — reordering changes the surface text of
/// every predicate even though the formula is logically equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub columns: Vec<ColumnSpec>,
}

impl ColumnLayout {
    /// Number of leading fields an input line must have.
    pub fn min_fields(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.column + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Sign convention mapping an in-process robustness value to a violation.
///
/// Formula-specific, never a global rule: `historically` over a 0/1 output
/// violates at robustness 0, while some formulas only violate strictly
/// below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSign {
    NonPositive,
    StrictlyNegative,
}

impl ViolationSign {
    pub fn is_violation(&self, robustness: f64) -> bool {
        match self {
            ViolationSign::NonPositive => robustness <= 0.0,
            ViolationSign::StrictlyNegative => robustness < 0.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("unknown built-in property '{0}'")]
    Unknown(String),

    #[error("failed to read property file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid property definition: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything the harness needs to know about one monitored property.
///
/// Replaces the per-property scripts of the original experiments with a
/// single configuration value consumed by one harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyConfig {
    pub name: String,
    pub layout: ColumnLayout,
    /// Formula text handed verbatim to an in-process monitor.
    pub formula: String,
    /// Declared output variable of the formula.
    pub output_var: String,
    /// Steps excluded from violation detection while the formula still
    /// lacks the past steps it depends on.
    #[serde(default)]
    pub warmup: u64,
    pub violation_sign: ViolationSign,
    /// Whether offline verification uses past-time semantics (`-r`).
    #[serde(default)]
    pub past_time: bool,
    /// Monitor index used by the RPC and offline back ends.
    #[serde(default)]
    pub property_index: u32,
}

impl PropertyConfig {
    /// Look up a built-in property by name.
    pub fn builtin(name: &str) -> Result<Self, PropertyError> {
        match name {
            "tool-freeze" => Ok(Self::tool_freeze()),
            "in-view" => Ok(Self::in_view()),
            "suture-gauze" => Ok(Self::suture_gauze()),
            other => Err(PropertyError::Unknown(other.to_string())),
        }
    }

    /// Load a property definition from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, PropertyError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// "The tool never freezes in place for 100 consecutive steps."
    ///
    /// Numeric x/y/z coordinates in the first three columns; the formula
    /// needs 99 past steps, so the first 99 verdicts are warm-up.
    pub fn tool_freeze() -> Self {
        const WINDOW: usize = 99;
        let freeze = |var: &str| freeze_clause(var, WINDOW);
        let formula = format!(
            "safe = historically( not( ({}) and ({}) and ({}) ) )",
            freeze("x"),
            freeze("y"),
            freeze("z"),
        );
        Self {
            name: "tool-freeze".to_string(),
            layout: ColumnLayout {
                columns: vec![
                    ColumnSpec {
                        column: 0,
                        name: "x".to_string(),
                        kind: FieldKind::Int,
                    },
                    ColumnSpec {
                        column: 1,
                        name: "y".to_string(),
                        kind: FieldKind::Int,
                    },
                    ColumnSpec {
                        column: 2,
                        name: "z".to_string(),
                        kind: FieldKind::Int,
                    },
                ],
            },
            formula,
            output_var: "safe".to_string(),
            warmup: WINDOW as u64,
            violation_sign: ViolationSign::NonPositive,
            past_time: false,
            property_index: 0,
        }
    }

    /// "The tool stays in camera view" — a single boolean in column 4.
    pub fn in_view() -> Self {
        Self {
            name: "in-view".to_string(),
            layout: ColumnLayout {
                columns: vec![ColumnSpec {
                    column: 3,
                    name: "inCameraView".to_string(),
                    kind: FieldKind::Flag,
                }],
            },
            formula: "out = historically(inCameraView)".to_string(),
            output_var: "out".to_string(),
            warmup: 0,
            violation_sign: ViolationSign::NonPositive,
            past_time: true,
            property_index: 0,
        }
    }

    /// "Suturing only after gauze has been placed and removed" — two
    /// booleans in columns 5 and 6, in that pinned order.
    pub fn suture_gauze() -> Self {
        Self {
            name: "suture-gauze".to_string(),
            layout: ColumnLayout {
                columns: vec![
                    ColumnSpec {
                        column: 4,
                        name: "suturing".to_string(),
                        kind: FieldKind::Flag,
                    },
                    ColumnSpec {
                        column: 5,
                        name: "gauze".to_string(),
                        kind: FieldKind::Flag,
                    },
                ],
            },
            formula: "ok = historically( suturing -> ( once(gauze) -> \
                      once( (not gauze) and once(gauze) ) ) )"
                .to_string(),
            output_var: "ok".to_string(),
            warmup: 0,
            violation_sign: ViolationSign::StrictlyNegative,
            past_time: true,
            property_index: 0,
        }
    }
}

fn nested_prev(var: &str, depth: usize) -> String {
    let mut expr = var.to_string();
    for _ in 0..depth {
        expr = format!("prev({expr})");
    }
    expr
}

/// `(v == prev(v)) and (v == prev(prev(v))) and ...` up to `window` steps
/// back: true when the variable has not moved for `window + 1` samples.
fn freeze_clause(var: &str, window: usize) -> String {
    let terms: Vec<String> = (1..=window)
        .map(|k| format!("({var} == {})", nested_prev(var, k)))
        .collect();
    terms.join(" and ")
}
