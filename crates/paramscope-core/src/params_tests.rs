use super::*;
use serde_json::json;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[test]
fn test_flatten_nested_and_arrays() {
    let set = flatten(&object(json!({"a": {"b": 1}, "c": [1, 2]})));
    assert_eq!(set.len(), 2);
    assert_eq!(set.get("a.b"), Some(&ParamValue::Number(1.into())));
    assert_eq!(
        set.get("c"),
        Some(&ParamValue::Array(vec![json!(1), json!(2)]))
    );
}

#[test]
fn test_flatten_preserves_key_order() {
    let set = flatten(&object(json!({"z": 1, "a": {"y": true, "b": null}, "m": "x"})));
    let keys: Vec<&str> = set.keys().collect();
    assert_eq!(keys, vec!["z", "a.y", "a.b", "m"]);
    assert_eq!(set.get("a.b"), Some(&ParamValue::Null));
    assert_eq!(set.get("a.y"), Some(&ParamValue::Bool(true)));
}

#[test]
fn test_flatten_empty_nested_object_drops_key() {
    let set = flatten(&object(json!({"a": {}, "b": "x"})));
    let keys: Vec<&str> = set.keys().collect();
    assert_eq!(keys, vec!["b"]);
}

#[test]
fn test_body_params_json() {
    let set = extract_body_params(r#"{"user":"a","pw":"b"}"#);
    assert_eq!(set.get("user"), Some(&ParamValue::from("a")));
    assert_eq!(set.get("pw"), Some(&ParamValue::from("b")));
}

#[test]
fn test_body_params_form_encoded() {
    let set = extract_body_params("name=J%C3%BCrgen&city=New%20York&flag&=orphan");
    assert_eq!(set.get("name"), Some(&ParamValue::from("Jürgen")));
    assert_eq!(set.get("city"), Some(&ParamValue::from("New York")));
    assert_eq!(set.get("flag"), Some(&ParamValue::from("")));
    assert_eq!(set.len(), 3);
}

#[test]
fn test_body_params_plus_is_literal() {
    let set = extract_body_params("q=a+b");
    assert_eq!(set.get("q"), Some(&ParamValue::from("a+b")));
}

#[test]
fn test_body_params_value_keeps_later_equals() {
    let set = extract_body_params("token=abc==");
    assert_eq!(set.get("token"), Some(&ParamValue::from("abc==")));
}

#[test]
fn test_body_params_non_object_json_falls_back() {
    let set = extract_body_params("42");
    assert_eq!(set.get("42"), Some(&ParamValue::from("")));

    let set = extract_body_params("[1,2]");
    assert_eq!(set.get("[1,2]"), Some(&ParamValue::from("")));
}

#[test]
fn test_body_params_empty() {
    assert!(extract_body_params("").is_empty());
}

#[test]
fn test_body_params_invalid_escape_kept_raw() {
    let set = extract_body_params("a=%FF%FE");
    assert_eq!(set.get("a"), Some(&ParamValue::from("%FF%FE")));
}

#[test]
fn test_query_params() {
    let set = extract_query_params("https://h/x?a=1&b=2");
    assert_eq!(set.get("a"), Some(&ParamValue::from("1")));
    assert_eq!(set.get("b"), Some(&ParamValue::from("2")));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_query_params_last_wins() {
    let set = extract_query_params("https://h/x?a=1&a=2");
    assert_eq!(set.len(), 1);
    assert_eq!(set.get("a"), Some(&ParamValue::from("2")));
}

#[test]
fn test_query_params_decoding() {
    let set = extract_query_params("https://h/search?q=hello+world&tag=%23rust");
    assert_eq!(set.get("q"), Some(&ParamValue::from("hello world")));
    assert_eq!(set.get("tag"), Some(&ParamValue::from("#rust")));
}

#[test]
fn test_query_params_none() {
    assert!(extract_query_params("https://h/x").is_empty());
}

#[test]
fn test_query_params_unparseable_url_fallback() {
    let set = extract_query_params("/relative/path?x=1&y&=z");
    assert_eq!(set.get("x"), Some(&ParamValue::from("1")));
    assert_eq!(set.get("y"), Some(&ParamValue::from("")));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_query_params_fallback_stops_at_second_question_mark() {
    let set = extract_query_params("not a url?a=1?b=2");
    assert_eq!(set.get("a"), Some(&ParamValue::from("1")));
    assert!(set.get("b").is_none());
}

#[test]
fn test_important_headers() {
    let headers = vec![
        Header::new("Accept", "*/*"),
        Header::new("Cookie", "sid=1"),
        Header::new("X-Trace", "abc"),
        Header::new("authorization", "Bearer t"),
    ];
    let important = extract_important_headers(&headers);
    assert_eq!(
        important,
        vec![
            Header::new("Cookie", "sid=1"),
            Header::new("authorization", "Bearer t"),
        ]
    );
}

#[test]
fn test_important_headers_empty() {
    assert!(extract_important_headers(&[]).is_empty());
}

#[test]
fn test_format_as_lines() {
    let set: ParameterSet = vec![("a", "1"), ("b", "2")].into_iter().collect();
    assert_eq!(format_as_lines(&set), "a:1\nb:2");
}

#[test]
fn test_format_as_lines_mixed_values() {
    let set = flatten(&object(json!({"n": 1.5, "ok": false, "none": null, "ids": [1, 2]})));
    assert_eq!(format_as_lines(&set), "n:1.5\nok:false\nnone:null\nids:[1,2]");
}

#[test]
fn test_format_as_lines_empty() {
    assert_eq!(format_as_lines(&ParameterSet::new()), "");
}

#[test]
fn test_insert_keeps_first_position() {
    let mut set = ParameterSet::new();
    set.insert("a", "1");
    set.insert("b", "2");
    set.insert("a", "3");
    let keys: Vec<&str> = set.keys().collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(set.get("a"), Some(&ParamValue::from("3")));
}

#[test]
fn test_serialize_parameter_set() {
    let set = extract_body_params(r#"{"b":{"c":2},"a":"x"}"#);
    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, r#"{"b.c":2,"a":"x"}"#);
}
