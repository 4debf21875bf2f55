use vigil_obs::PropertyConfig;
use vigil_trace::{export, CommandScript, ReplayArtifacts};

#[test]
fn test_export_one_node_per_accepted_line() {
    let prop = PropertyConfig::tool_freeze();
    let doc = export(["1,2,3,0,0,0", "4,5,6,0,0,0"], &prop.layout);
    assert_eq!(doc.nodes.len(), 2);
    assert_eq!(doc.nodes[0].step, 1);
    assert_eq!(doc.nodes[1].step, 2);
}

#[test]
fn test_skipped_lines_still_advance_step_numbers() {
    let prop = PropertyConfig::tool_freeze();
    let doc = export(
        ["garbage", "1,2,3,0,0,0", "also,not,numeric", "4,5,6,0,0,0"],
        &prop.layout,
    );
    // Steps align with source line positions, not with accepted count.
    assert_eq!(doc.nodes.len(), 2);
    assert_eq!(doc.nodes[0].step, 2);
    assert_eq!(doc.nodes[1].step, 4);
}

#[test]
fn test_empty_input_exports_empty_document() {
    let prop = PropertyConfig::in_view();
    let doc = export(Vec::<String>::new(), &prop.layout);
    assert!(doc.nodes.is_empty());
}

#[test]
fn test_xml_wrapper_and_values() {
    let prop = PropertyConfig::in_view();
    let doc = export(["1,2,3,1,0,0", "1,2,3,0,0,0"], &prop.layout);

    let mut buf = Vec::new();
    doc.write_xml(&mut buf).unwrap();
    let xml = String::from_utf8(buf).unwrap();

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    assert!(xml.contains(r#"<counter-example type="0" id="1" desc="LTL Counterexample">"#));
    assert!(xml.contains(r#"<state id="1"><value variable="inCameraView">TRUE</value>"#));
    assert!(xml.contains(r#"<state id="2"><value variable="inCameraView">FALSE</value>"#));
    assert!(xml.trim_end().ends_with("</counter-example>"));
}

#[test]
fn test_xml_numeric_values() {
    let prop = PropertyConfig::tool_freeze();
    let doc = export(["7, 8, -9, 0, 0, 0"], &prop.layout);

    let mut buf = Vec::new();
    doc.write_xml(&mut buf).unwrap();
    let xml = String::from_utf8(buf).unwrap();

    assert!(xml.contains(r#"<value variable="x">7</value>"#));
    assert!(xml.contains(r#"<value variable="y">8</value>"#));
    assert!(xml.contains(r#"<value variable="z">-9</value>"#));
}

#[test]
fn test_command_script_future_time() {
    let script = CommandScript {
        trace_path: "/tmp/t.xml".into(),
        property_index: 0,
        past_time: false,
    };
    assert_eq!(
        script.render(),
        "go\nbuild_monitor -n 0\nread_trace /tmp/t.xml\nverify_property -n 0 1\nquit\n"
    );
}

#[test]
fn test_command_script_past_time() {
    let script = CommandScript {
        trace_path: "/tmp/t.xml".into(),
        property_index: 2,
        past_time: true,
    };
    assert_eq!(
        script.render(),
        "go\nbuild_monitor -n 2\nread_trace /tmp/t.xml\nverify_property -r -n 2 1\nquit\n"
    );
}

#[test]
fn test_artifacts_written_then_removed_on_drop() {
    let prop = PropertyConfig::in_view();
    let doc = export(["1,2,3,1,0,0"], &prop.layout);

    let (trace_path, script_path) = {
        let artifacts = ReplayArtifacts::create(&doc, &prop).unwrap();
        let trace = artifacts.trace_path().to_path_buf();
        let script = artifacts.script_path().to_path_buf();
        assert!(trace.exists());
        assert!(script.exists());

        let script_text = std::fs::read_to_string(&script).unwrap();
        assert!(script_text.contains("read_trace"));
        assert!(script_text.contains(&trace.display().to_string()));
        // in-view is a past-time property.
        assert!(script_text.contains("verify_property -r -n 0 1"));

        (trace, script)
    };

    assert!(!trace_path.exists());
    assert!(!script_path.exists());
}
