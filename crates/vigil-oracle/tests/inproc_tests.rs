use vigil_obs::{
    ColumnLayout, ColumnSpec, FieldKind, FieldValue, PropertyConfig, StateAssertion, ViolationSign,
};
use vigil_oracle::{InProcOracle, MonitorError, OracleClient, StlMonitor, Verdict};

/// A scripted monitor: records its configuration and replays a fixed
/// robustness sequence.
#[derive(Default)]
struct FakeMonitor {
    declared: Vec<(String, FieldKind)>,
    formula: Option<String>,
    parsed: bool,
    robustness: Vec<f64>,
    updates: Vec<(u64, Vec<(String, FieldValue)>)>,
}

impl FakeMonitor {
    fn with_robustness(robustness: Vec<f64>) -> Self {
        Self {
            robustness,
            ..Default::default()
        }
    }
}

impl StlMonitor for FakeMonitor {
    fn declare_var(&mut self, name: &str, kind: FieldKind) -> Result<(), MonitorError> {
        self.declared.push((name.to_string(), kind));
        Ok(())
    }

    fn set_formula(&mut self, formula: &str) -> Result<(), MonitorError> {
        self.formula = Some(formula.to_string());
        Ok(())
    }

    fn parse(&mut self) -> Result<(), MonitorError> {
        self.parsed = true;
        Ok(())
    }

    fn update(
        &mut self,
        step: u64,
        values: &[(String, FieldValue)],
    ) -> Result<f64, MonitorError> {
        self.updates.push((step, values.to_vec()));
        let idx = step as usize;
        Ok(self.robustness.get(idx).copied().unwrap_or(1.0))
    }
}

fn flag_property(name: &str, sign: ViolationSign, warmup: u64) -> PropertyConfig {
    PropertyConfig {
        name: name.to_string(),
        layout: ColumnLayout {
            columns: vec![ColumnSpec {
                column: 0,
                name: "p".to_string(),
                kind: FieldKind::Flag,
            }],
        },
        formula: "out = historically(p)".to_string(),
        output_var: "out".to_string(),
        warmup,
        violation_sign: sign,
        past_time: true,
        property_index: 0,
    }
}

fn values(v: bool) -> StateAssertion {
    StateAssertion::Values(vec![("p".to_string(), FieldValue::Flag(v))])
}

#[test]
fn test_configuration_declares_vars_formula_and_output() {
    let prop = PropertyConfig::suture_gauze();
    let mut monitor = FakeMonitor::default();
    {
        let _oracle = InProcOracle::new(&mut monitor, &prop).unwrap();
    }

    // Columns in layout order, then the formula's output variable.
    assert_eq!(
        monitor.declared,
        vec![
            ("suturing".to_string(), FieldKind::Flag),
            ("gauze".to_string(), FieldKind::Flag),
            ("ok".to_string(), FieldKind::Int),
        ]
    );
    assert_eq!(monitor.formula.as_deref(), Some(prop.formula.as_str()));
    assert!(monitor.parsed);
}

#[test]
fn test_update_receives_sequential_steps_and_values() {
    let prop = flag_property("p-holds", ViolationSign::NonPositive, 0);
    let mut monitor = FakeMonitor::with_robustness(vec![1.0, 1.0]);
    {
        let mut oracle = InProcOracle::new(&mut monitor, &prop).unwrap();
        oracle.submit(&values(true)).unwrap();
        oracle.submit(&values(false)).unwrap();
    }

    assert_eq!(monitor.updates.len(), 2);
    assert_eq!(monitor.updates[0].0, 0);
    assert_eq!(monitor.updates[1].0, 1);
    assert_eq!(
        monitor.updates[1].1,
        vec![("p".to_string(), FieldValue::Flag(false))]
    );
}

#[test]
fn test_non_positive_sign_violates_at_zero() {
    let prop = flag_property("zero-is-bad", ViolationSign::NonPositive, 0);
    let monitor = FakeMonitor::with_robustness(vec![1.0, 0.0]);
    let mut oracle = InProcOracle::new(monitor, &prop).unwrap();

    assert_eq!(oracle.submit(&values(true)).unwrap(), Verdict::Satisfied);
    assert_eq!(oracle.submit(&values(false)).unwrap(), Verdict::Violated);
}

#[test]
fn test_strictly_negative_sign_tolerates_zero() {
    let prop = flag_property("zero-is-fine", ViolationSign::StrictlyNegative, 0);
    let monitor = FakeMonitor::with_robustness(vec![0.0, -1.0]);
    let mut oracle = InProcOracle::new(monitor, &prop).unwrap();

    assert_eq!(oracle.submit(&values(true)).unwrap(), Verdict::Satisfied);
    assert_eq!(oracle.submit(&values(true)).unwrap(), Verdict::Violated);
}

#[test]
fn test_warmup_steps_never_report_violation() {
    let prop = flag_property("needs-history", ViolationSign::NonPositive, 2);
    // Violating robustness from the very first step.
    let monitor = FakeMonitor::with_robustness(vec![-1.0, -1.0, -1.0]);
    let mut oracle = InProcOracle::new(monitor, &prop).unwrap();

    assert_eq!(oracle.submit(&values(false)).unwrap(), Verdict::Satisfied);
    assert_eq!(oracle.submit(&values(false)).unwrap(), Verdict::Satisfied);
    // Step 2 is the first one past the warm-up window.
    assert_eq!(oracle.submit(&values(false)).unwrap(), Verdict::Violated);
}

#[test]
fn test_predicate_assertion_rejected() {
    let prop = flag_property("p", ViolationSign::NonPositive, 0);
    let mut oracle = InProcOracle::new(FakeMonitor::default(), &prop).unwrap();
    let err = oracle
        .submit(&StateAssertion::Predicate("p".to_string()))
        .unwrap_err();
    assert!(matches!(
        err,
        vigil_oracle::OracleError::UnsupportedAssertion { .. }
    ));
}
