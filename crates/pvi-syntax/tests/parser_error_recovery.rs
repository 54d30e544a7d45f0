mod common;
use common::*;
use expect_test::expect;

#[test]
fn test_missing_comma_in_header() {
    expect![[r#"
SourceFile@0..17
  Record@0..17
    KwRecord@0..6 "record"
    LParen@6..7 "("
    Value@7..9
      Bareword@7..9 "ai"
    Value@10..13
      String@10..13 "\"x\""
    RParen@13..14 ")"
    RecordBody@15..17
      LBrace@15..16 "{"
      RBrace@16..17 "}"

---
Errors:
  - expected ',' at 10..13
"#]]
    .assert_eq(&snapshot_parse("record(ai \"x\") {}"));
}

#[test]
fn test_unknown_body_entry_is_skipped() {
    let source = r#"record(ai, "$(P)A") { bogus field(DESC, "kept") }"#;
    let parse = parse(source);
    assert!(parse
        .errors()
        .iter()
        .any(|error| error.message == "expected field, info or alias"));

    let record = parse.source_file().records().next().expect("record");
    let values: Vec<_> = record.fields().filter_map(|f| f.value()).collect();
    assert_eq!(values, vec!["kept"]);
}

#[test]
fn test_unclosed_body_at_eof() {
    let source = "record(ai, \"$(P)A\") {\n    field(DESC, \"x\")\n";
    let parse = parse(source);
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.errors()[0].message, "expected '}'");
    assert_eq!(parse.syntax().to_string(), source);
}

#[test]
fn test_stray_tokens_at_top_level() {
    let source = "} record(bi, \"$(P)B\")";
    let parse = parse(source);
    assert_eq!(parse.errors()[0].message, "expected record or include");
    assert_eq!(record_names(source), vec!["$(P)B"]);
}
