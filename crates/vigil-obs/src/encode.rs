use serde::{Deserialize, Serialize};

use crate::observation::{FieldValue, Observation};

/// One step of an offline trace document: a step index plus the named
/// values observed at that step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceNode {
    pub step: u64,
    pub values: Vec<(String, FieldValue)>,
}

/// Which encoding an oracle back end consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    Predicate,
    Values,
}

/// The oracle-facing encoding of one observation.
#[derive(Debug, Clone, PartialEq)]
pub enum StateAssertion {
    /// A boolean expression over named propositions, for oracles that
    /// accept free-form logic text.
    Predicate(String),
    /// A variable-name to value mapping, for incremental evaluation.
    Values(Vec<(String, FieldValue)>),
    /// A step-indexed node for an offline trace document.
    Node(TraceNode),
}

/// Encode an observation as a predicate string.
///
/// Flags encode as the bare proposition name or its negation; integers as
/// `name = value` equalities; conjuncts joined with `&` in field order.
/// Pure function of the observation — history is the oracle's business.
pub fn encode_predicate(obs: &Observation) -> String {
    let conjuncts: Vec<String> = obs
        .fields()
        .iter()
        .map(|(name, value)| match value {
            FieldValue::Flag(true) => name.clone(),
            FieldValue::Flag(false) => format!("!{name}"),
            FieldValue::Int(v) => format!("{name} = {v}"),
        })
        .collect();
    conjuncts.join(" & ")
}

/// Encode an observation as a named-value set for incremental evaluation.
pub fn encode_values(obs: &Observation) -> Vec<(String, FieldValue)> {
    obs.fields().to_vec()
}

/// Encode an observation as a trace node at the given step index.
pub fn encode_node(obs: &Observation, step: u64) -> TraceNode {
    TraceNode {
        step,
        values: obs.fields().to_vec(),
    }
}

/// Encode an observation in whatever form the active oracle consumes.
pub fn encode_for(obs: &Observation, kind: AssertionKind) -> StateAssertion {
    match kind {
        AssertionKind::Predicate => StateAssertion::Predicate(encode_predicate(obs)),
        AssertionKind::Values => StateAssertion::Values(encode_values(obs)),
    }
}
