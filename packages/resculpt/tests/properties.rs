//! Engine-level laws: identity, idempotence, shape preservation.

use std::io::Cursor;

use resculpt::{Engine, PathRule};
use serde_json::{json, Value};

const CORPUS: &[&str] = &[
    r#"{}"#,
    r#"[]"#,
    r#"null"#,
    r#"42"#,
    r#""just a string""#,
    r#"{"a":1,"b":2.5,"c":true,"d":null,"e":"s"}"#,
    r#"{"nested":{"deep":{"deeper":[1,[2,[3]]]}}}"#,
    r#"[{"a":1},{"b":2},[],{},"x",-1e10]"#,
    r#"{"esc":"quote \" backslash \\ newline \n done","u":"é"}"#,
    "{\n  \"pretty\": true,\n  \"spaced\" : [ 1 , 2 ]\n}",
    r#"{"empty_obj":{},"empty_arr":[],"after":1}"#,
    r#"{"unicode":"héllo 世界 😀"}"#,
];

fn apply(engine: &Engine, input: &str) -> String {
    let mut out = Vec::new();
    engine
        .transform(Cursor::new(input.as_bytes().to_vec()), &mut out)
        .expect("transform succeeds");
    String::from_utf8(out).expect("output is utf-8")
}

#[test]
fn identity_with_empty_rules() {
    let engine = Engine::new(Vec::new()).unwrap();
    for input in CORPUS {
        assert_eq!(&apply(&engine, input), input, "input: {input}");
    }
}

#[test]
fn identity_when_nothing_matches() {
    // unlike the empty rule set, this exercises the full transformer path
    let engine = Engine::new(vec![
        PathRule::remove("no.such.path"),
        PathRule::set_raw("also.missing", &b"1"[..]),
        PathRule::remove("zzz"),
    ])
    .unwrap();
    for input in CORPUS {
        assert_eq!(&apply(&engine, input), input, "input: {input}");
    }
}

#[test]
fn remove_is_idempotent() {
    let engine = Engine::new(vec![
        PathRule::remove("b"),
        PathRule::remove("nested.secret"),
    ])
    .unwrap();
    let inputs = [
        r#"{"a":1,"b":2,"nested":{"secret":"x","keep":1}}"#,
        r#"{"b":{"deep":[1,2]}}"#,
        r#"{"a":1}"#,
    ];
    for input in inputs {
        let once = apply(&engine, input);
        let twice = apply(&engine, &once);
        assert_eq!(once, twice, "input: {input}");
    }
}

#[test]
fn set_preserves_tree_shape() {
    let engine = Engine::new(vec![PathRule::set_raw("user.age", &b"99"[..])]).unwrap();
    let input = r#"{"user":{"name":"alice","age":20,"tags":["a"]},"other":[1,2]}"#;
    let output = apply(&engine, input);

    let before: Value = serde_json::from_str(input).unwrap();
    let after: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(after["user"]["age"], json!(99));
    // everything except the target is untouched
    assert_eq!(after["user"]["name"], before["user"]["name"]);
    assert_eq!(after["user"]["tags"], before["user"]["tags"]);
    assert_eq!(after["other"], before["other"]);
}

#[test]
fn removed_path_is_absent_after_parse() {
    let engine = Engine::new(vec![PathRule::remove("b")]).unwrap();
    let output = apply(&engine, r#"{"a":1,"b":{"big":[1,2,3]},"c":3}"#);
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert!(parsed.get("b").is_none());
    assert_eq!(parsed, json!({"a": 1, "c": 3}));
}

#[test]
fn added_key_is_present_after_parse() {
    let engine = Engine::new(vec![PathRule::add("k", json!({"v": 1}))]).unwrap();
    let output = apply(&engine, r#"{"a":1}"#);
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, json!({"a": 1, "k": {"v": 1}}));
}

#[test]
fn add_on_existing_key_preserves_original() {
    let engine = Engine::new(vec![PathRule::add_raw("a", &b"999"[..])]).unwrap();
    let output = apply(&engine, r#"{"a":{"original":true}}"#);
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, json!({"a": {"original": true}}));
}

#[test]
fn set_after_parse_has_new_value() {
    let engine = Engine::new(vec![PathRule::set("k", json!([1, "two", null]))]).unwrap();
    let output = apply(&engine, r#"{"k":"old","rest":0}"#);
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, json!({"k": [1, "two", null], "rest": 0}));
}

#[test]
fn outputs_stay_parseable_under_mixed_rules() {
    let engine = Engine::new(vec![
        PathRule::remove("drop"),
        PathRule::set_raw("fix", &b"0"[..]),
        PathRule::add_raw("tag", &br#""added""#[..]),
    ])
    .unwrap();
    let inputs = [
        r#"{"drop":1,"fix":2,"keep":3}"#,
        r#"{"fix":{"nested":true}}"#,
        r#"{"drop":[1,2,3]}"#,
        r#"{"keep":"only"}"#,
        r#"{}"#,
    ];
    for input in inputs {
        let output = apply(&engine, input);
        serde_json::from_str::<Value>(&output)
            .unwrap_or_else(|err| panic!("unparseable output {output:?} for {input}: {err}"));
    }
}
