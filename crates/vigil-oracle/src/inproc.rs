use vigil_obs::{FieldKind, FieldValue, PropertyConfig, StateAssertion, ViolationSign};

use crate::client::{OracleClient, OracleError};
use crate::verdict::Verdict;

/// Failure reported by a monitoring library (formula parse error,
/// undeclared variable, ...).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MonitorError(pub String);

/// The consumed interface of an STL-style monitoring library.
///
/// Configured once at startup, then driven with one incremental `update`
/// per step returning a robustness value whose sign indicates
/// satisfaction or violation.
pub trait StlMonitor {
    fn declare_var(&mut self, name: &str, kind: FieldKind) -> Result<(), MonitorError>;
    fn set_formula(&mut self, formula: &str) -> Result<(), MonitorError>;
    fn parse(&mut self) -> Result<(), MonitorError>;
    fn update(
        &mut self,
        step: u64,
        values: &[(String, FieldValue)],
    ) -> Result<f64, MonitorError>;
}

impl<M: StlMonitor + ?Sized> StlMonitor for &mut M {
    fn declare_var(&mut self, name: &str, kind: FieldKind) -> Result<(), MonitorError> {
        (**self).declare_var(name, kind)
    }

    fn set_formula(&mut self, formula: &str) -> Result<(), MonitorError> {
        (**self).set_formula(formula)
    }

    fn parse(&mut self) -> Result<(), MonitorError> {
        (**self).parse()
    }

    fn update(
        &mut self,
        step: u64,
        values: &[(String, FieldValue)],
    ) -> Result<f64, MonitorError> {
        (**self).update(step, values)
    }
}

/// In-process oracle strategy: a standing monitor evaluated incrementally.
///
/// The robustness sign convention and the warm-up window both come from
/// the property configuration; neither is a global rule.
pub struct InProcOracle<M: StlMonitor> {
    monitor: M,
    sign: ViolationSign,
    warmup: u64,
    next_step: u64,
}

impl<M: StlMonitor> InProcOracle<M> {
    /// Declare the property's variables, install the formula, and parse it.
    pub fn new(mut monitor: M, property: &PropertyConfig) -> Result<Self, OracleError> {
        for spec in &property.layout.columns {
            monitor.declare_var(&spec.name, spec.kind)?;
        }
        monitor.declare_var(&property.output_var, FieldKind::Int)?;
        monitor.set_formula(&property.formula)?;
        monitor.parse()?;

        Ok(Self {
            monitor,
            sign: property.violation_sign,
            warmup: property.warmup,
            next_step: 0,
        })
    }
}

impl<M: StlMonitor> OracleClient for InProcOracle<M> {
    fn assertion_kind(&self) -> vigil_obs::AssertionKind {
        vigil_obs::AssertionKind::Values
    }

    fn submit(&mut self, assertion: &StateAssertion) -> Result<Verdict, OracleError> {
        let StateAssertion::Values(values) = assertion else {
            return Err(OracleError::UnsupportedAssertion {
                expected: "named-value",
            });
        };

        let step = self.next_step;
        self.next_step += 1;

        let robustness = self.monitor.update(step, values)?;

        // While the formula still lacks the past steps it depends on, the
        // monitor's output is not meaningful; never report a violation.
        if step < self.warmup {
            return Ok(Verdict::Satisfied);
        }

        if self.sign.is_violation(robustness) {
            Ok(Verdict::Violated)
        } else {
            Ok(Verdict::Satisfied)
        }
    }
}
