use assert_matches::assert_matches;
use site_filters::filters::{group_by, jsonify, jsonify_pretty};
use site_filters::{Error, Timestamp, Value};
use site_filters_testing::value;

#[test]
fn test_jsonify() {
    assert_eq!(jsonify(value(r#"{"age": 18}"#)).unwrap(), r#"{"age":18}"#);
    assert_eq!(jsonify([1, 2]).unwrap(), "[1,2]");
    assert_eq!(
        jsonify(value(r#"[{"name": "Jack"}, {"name": "Smith"}]"#)).unwrap(),
        r#"[{"name":"Jack"},{"name":"Smith"}]"#
    );
}

#[test]
fn test_round_trip() {
    let source = r#"{"zeta":[1,2.5,"three",null,true],"alpha":{"nested":{"deep":[]}},"empty":{}}"#;
    let decoded = value(source);
    assert_eq!(jsonify(&decoded).unwrap(), source);
    assert_eq!(value(&jsonify(&decoded).unwrap()), decoded);
}

#[test]
fn test_grouped_output() {
    let items = value(r#"[{"tag": "a"}, {"tag": "b"}, {"tag": "a"}]"#);
    let groups = group_by(items.as_array().unwrap(), "tag").unwrap();
    assert_eq!(
        jsonify(&groups).unwrap(),
        r#"[{"name":"a","items":[{"tag":"a"},{"tag":"a"}]},{"name":"b","items":[{"tag":"b"}]}]"#
    );
}

#[test]
fn test_times() {
    let time = Timestamp::from_utc_ymd_hms(2013, 3, 27, 11, 22, 33).unwrap();
    assert_eq!(
        jsonify(Value::object([("date", time)])).unwrap(),
        r#"{"date":"2013-03-27T11:22:33Z"}"#
    );
}

#[test]
fn test_pretty() {
    assert_eq!(
        jsonify_pretty(value(r#"{"a": [1]}"#), 2).unwrap(),
        "{\n  \"a\": [\n    1\n  ]\n}"
    );
}

#[test]
fn test_unencodable() {
    assert_matches!(jsonify(Value::from(f64::NAN)), Err(Error::Encoding(_)));
    assert_matches!(jsonify(f64::INFINITY), Err(Error::Encoding(_)));
    assert_matches!(jsonify(vec![0.25, f64::NAN]), Err(Error::Encoding(_)));
    assert_matches!(jsonify_pretty(vec![f64::NEG_INFINITY], "\t"), Err(Error::Encoding(_)));
    assert_eq!(jsonify(vec![0.25, 2.0]).unwrap(), "[0.25,2.0]");
}
