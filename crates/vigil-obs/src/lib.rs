//! Observation parsing, property configuration, and state encoding.
//!
//! One parsed [`Observation`] can be encoded three ways — as a predicate
//! string, a named-value set, or a trace node — so that every oracle back
//! end sees the same field extraction.

pub mod encode;
pub mod observation;
pub mod property;

pub use encode::{
    encode_for, encode_node, encode_predicate, encode_values, AssertionKind, StateAssertion,
    TraceNode,
};
pub use observation::{parse_observation, FieldValue, Observation};
pub use property::{
    ColumnLayout, ColumnSpec, FieldKind, PropertyConfig, PropertyError, ViolationSign,
};
