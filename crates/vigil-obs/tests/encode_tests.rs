use vigil_obs::{
    encode_node, encode_predicate, encode_values, parse_observation, FieldValue, PropertyConfig,
};

#[test]
fn test_flag_predicate_positive_and_negated() {
    let prop = PropertyConfig::in_view();
    let obs = parse_observation("1,2,3,1,0,0", &prop.layout).unwrap();
    assert_eq!(encode_predicate(&obs), "inCameraView");

    let obs = parse_observation("1,2,3,0,0,0", &prop.layout).unwrap();
    assert_eq!(encode_predicate(&obs), "!inCameraView");
}

#[test]
fn test_numeric_predicate_equalities() {
    let prop = PropertyConfig::tool_freeze();
    let obs = parse_observation("1, 2, 3, 0, 0, 0", &prop.layout).unwrap();
    assert_eq!(encode_predicate(&obs), "x = 1 & y = 2 & z = 3");
}

#[test]
fn test_conjunction_order_is_pinned() {
    // suturing before gauze, always — the surface order is part of the
    // oracle contract.
    let prop = PropertyConfig::suture_gauze();
    let obs = parse_observation("0,0,0,0,1,0", &prop.layout).unwrap();
    assert_eq!(encode_predicate(&obs), "suturing & !gauze");

    let obs = parse_observation("0,0,0,0,0,1", &prop.layout).unwrap();
    assert_eq!(encode_predicate(&obs), "!suturing & gauze");
}

#[test]
fn test_all_encodings_share_one_extraction() {
    let prop = PropertyConfig::suture_gauze();
    let obs = parse_observation("0,0,0,0,1,1", &prop.layout).unwrap();

    let values = encode_values(&obs);
    assert_eq!(
        values,
        vec![
            ("suturing".to_string(), FieldValue::Flag(true)),
            ("gauze".to_string(), FieldValue::Flag(true)),
        ]
    );

    let node = encode_node(&obs, 7);
    assert_eq!(node.step, 7);
    assert_eq!(node.values, values);

    assert_eq!(encode_predicate(&obs), "suturing & gauze");
}

#[test]
fn test_encoding_is_deterministic() {
    let prop = PropertyConfig::tool_freeze();
    let obs = parse_observation("4,5,6,0,0,0", &prop.layout).unwrap();
    let first = encode_predicate(&obs);
    for _ in 0..10 {
        assert_eq!(encode_predicate(&obs), first);
    }
}

#[test]
fn test_property_config_json_round_trip() {
    let prop = PropertyConfig::suture_gauze();
    let json = serde_json::to_string(&prop).unwrap();
    let back: PropertyConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, prop);
}

#[test]
fn test_tool_freeze_formula_mentions_window() {
    let prop = PropertyConfig::tool_freeze();
    assert_eq!(prop.warmup, 99);
    // 99 nested prev() terms per axis.
    assert!(prop.formula.contains("(x == prev(x))"));
    assert!(prop.formula.contains("(z == prev(prev(z)))"));
}
