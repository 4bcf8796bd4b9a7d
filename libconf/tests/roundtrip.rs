//! Integration tests: parse/serialize round trips, ordering guarantees,
//! include resolution, and diagnostic positions.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use libconf::{
    parse_file, parse_text, serialize, serialize_group, Group, ParseError, Value,
};

/// Serialize then reparse, expecting an equal tree.
fn roundtrip(root: &Group) -> Group {
    let text = serialize_group(root);
    parse_text(&text).unwrap_or_else(|e| panic!("reparse of {text:?} failed: {e}"))
}

#[test]
fn scalar_round_trip() {
    let mut root = Group::new();
    root.insert("s", "plain");
    root.insert("esc", "tab\there \"quoted\" back\\slash\nnext");
    root.insert("ctl", "bell\u{07}del\u{7F}");
    root.insert("t", true);
    root.insert("f", false);
    root.insert("i", 123);
    root.insert("imin", i32::MIN);
    root.insert("imax", i32::MAX);
    root.insert("big", Value::Int64(i64::from(i32::MAX) + 1));
    root.insert("nbig", Value::Int64(i64::from(i32::MIN) - 1));
    root.insert("fl", 0.25);
    root.insert("fe", 1.5e10);
    assert_eq!(roundtrip(&root), root);
}

#[test]
fn long_tag_drops_for_small_values() {
    // A small Int64 serializes without the suffix, so it reparses as Int.
    let mut root = Group::new();
    root.insert("n", Value::Int64(7));
    assert_eq!(roundtrip(&root)["n"], Value::Int(7));
}

#[test]
fn nested_round_trip() {
    let mut size = Group::new();
    size.insert("w", 800);
    size.insert("h", 600);
    let mut window = Group::new();
    window.insert("title", "demo");
    window.insert("size", size);
    let mut root = Group::new();
    root.insert("window", window);
    root.insert("tags", Value::Array(vec![Value::Int(1), Value::Int(2)]));
    root.insert(
        "mixed",
        Value::List(vec![
            Value::Str("x".to_string()),
            Value::Int(9),
            Value::Group(Group::new()),
        ]),
    );
    assert_eq!(roundtrip(&root), root);
}

#[test]
fn order_preservation() {
    let root = parse_text("a: 1; b: 2; c: 3;").unwrap();
    let keys: Vec<&str> = root.keys().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn trailing_comma_tolerance() {
    let with = parse_text("a = [1, 2, 3,];").unwrap();
    let without = parse_text("a = [1, 2, 3];").unwrap();
    assert_eq!(with["a"], without["a"]);
    assert_eq!(with["a"].as_array().unwrap().len(), 3);
}

#[test]
fn nested_group_dual_access() {
    let root =
        parse_text("window: { title: \"demo\"; size: { w: 800; h: 600; }; };").unwrap();
    assert_eq!(root["window"]["size"]["w"], Value::Int(800));
    let by_field = root
        .get_field("window")
        .and_then(|w| w.get_field("size"))
        .and_then(|s| s.get_field("w"));
    assert_eq!(by_field, Some(&Value::Int(800)));
}

#[test]
fn multiline_string_and_concatenation() {
    let root = parse_text("script = <\"first line\nsecond line\"> \" tail\";").unwrap();
    assert_eq!(
        root["script"].as_str(),
        Some("first line\nsecond line tail")
    );
}

#[test]
fn include_expansion_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.cfg"), "y: 2;\n").unwrap();
    fs::write(dir.path().join("a.cfg"), "@include \"b.cfg\"\nx: 1;\n").unwrap();

    let root = parse_file(dir.path().join("a.cfg"), dir.path()).unwrap();
    let keys: Vec<&str> = root.keys().collect();
    assert_eq!(keys, vec!["y", "x"]);
    assert_eq!(root["y"], Value::Int(2));
    assert_eq!(root["x"], Value::Int(1));
}

#[test]
fn include_preserves_row_numbers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("inc.cfg"), "y: 2;\n").unwrap();
    fs::write(
        dir.path().join("main.cfg"),
        "@include \"inc.cfg\"\nbroken here\n",
    )
    .unwrap();

    // "broken here" is two names with no '='; the error must point at the
    // physical row in main.cfg, after the blanked directive line.
    let err = parse_file(dir.path().join("main.cfg"), dir.path()).unwrap_err();
    assert!(err.to_string().contains("row 2"), "got: {err}");
}

#[test]
fn nested_includes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("c.cfg"), "z: 3;\n").unwrap();
    fs::write(dir.path().join("b.cfg"), "y: 2;\n@include \"c.cfg\"\n").unwrap();
    fs::write(dir.path().join("a.cfg"), "@include \"b.cfg\"\nx: 1;\n").unwrap();

    let root = parse_file(dir.path().join("a.cfg"), dir.path()).unwrap();
    let keys: Vec<&str> = root.keys().collect();
    assert_eq!(keys, vec!["y", "z", "x"]);
}

#[test]
fn sibling_includes_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("shared.cfg"), "s: 9;\n").unwrap();
    fs::write(
        dir.path().join("a.cfg"),
        "@include \"shared.cfg\"\n@include \"shared.cfg\"\nx: 1;\n",
    )
    .unwrap();

    // Including the same file twice on sibling paths is not a cycle.
    let root = parse_file(dir.path().join("a.cfg"), dir.path()).unwrap();
    assert_eq!(root["s"], Value::Int(9));
    assert_eq!(root["x"], Value::Int(1));
}

#[test]
fn circular_include_detected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.cfg"), "@include \"b.cfg\"\n").unwrap();
    fs::write(dir.path().join("b.cfg"), "@include \"a.cfg\"\n").unwrap();

    let err = parse_file(dir.path().join("a.cfg"), dir.path()).unwrap_err();
    assert!(matches!(err, ParseError::CircularInclude { .. }));
    assert!(err.to_string().contains("circular include"));
}

#[test]
fn missing_include_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.cfg"), "@include \"nope.cfg\"\n").unwrap();

    let err = parse_file(dir.path().join("a.cfg"), dir.path()).unwrap_err();
    match err {
        ParseError::IncludeOpen { path, .. } => {
            assert!(path.ends_with(Path::new("nope.cfg")));
        }
        other => panic!("expected IncludeOpen, got {other:?}"),
    }
}

#[test]
fn row_numbers_across_comments() {
    let input = "a = 1;\n/* block\ncomment\nlines */\nb = $;\n";
    let err = parse_text(input).unwrap_err();
    match err {
        ParseError::BadToken { row, column, .. } => {
            assert_eq!(row, 5);
            assert_eq!(column, 5);
        }
        other => panic!("expected BadToken, got {other:?}"),
    }
}

#[test]
fn missing_value_position() {
    let err = parse_text("foo: ;").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("row 1"), "got: {message}");
    assert!(message.contains("column 6"), "got: {message}");
}

#[test]
fn serialize_rejects_non_group_root() {
    let err = serialize(&Value::Array(vec![Value::Int(1)])).unwrap_err();
    assert!(err.to_string().contains("array"));
}

#[test]
fn serialized_form_is_canonical() {
    // Two inputs differing only in whitespace, comments, and separators
    // serialize identically.
    let a = parse_text("a=1;b={x:2;};").unwrap();
    let b = parse_text("a : 1 // comment\nb : { x = 2 }\n").unwrap();
    assert_eq!(serialize_group(&a), serialize_group(&b));
}
