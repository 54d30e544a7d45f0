mod common;
use common::*;
use expect_test::expect;

#[test]
fn test_record_tree_shape() {
    let source = "record(bo, \"$(P)Go\") {\n    field(OUT, \"@asyn($(PORT))GO\")\n}\n";
    expect![[r#"
SourceFile@0..60
  Record@0..59
    KwRecord@0..6 "record"
    LParen@6..7 "("
    Value@7..9
      Bareword@7..9 "bo"
    Comma@9..10 ","
    Value@11..19
      String@11..19 "\"$(P)Go\""
    RParen@19..20 ")"
    RecordBody@21..59
      LBrace@21..22 "{"
      Field@27..57
        KwField@27..32 "field"
        LParen@32..33 "("
        Value@33..36
          Bareword@33..36 "OUT"
        Comma@36..37 ","
        Value@38..56
          String@38..56 "\"@asyn($(PORT))GO\""
        RParen@56..57 ")"
      RBrace@58..59 "}"
"#]]
    .assert_eq(&snapshot_parse(source));
}

#[test]
fn test_commented_records_are_trivia() {
    let source = r#"
#record(ai, "$(P)Old")
#{
#    field(INP, "@asyn($(PORT))OLD")
#}
record(ai, "$(P)New_RBV")
{
#   field(SCAN, "I/O Intr")
    field(INP, "@asyn($(PORT))NEW")
}
"#;
    assert_eq!(record_names(source), vec!["$(P)New_RBV"]);

    let parse = parse(source);
    assert!(parse.ok(), "errors: {:?}", parse.errors());
    let record = parse.source_file().records().next().expect("record");
    let fields: Vec<_> = record.fields().filter_map(|f| f.name()).collect();
    assert_eq!(fields, vec!["INP"]);
}

#[test]
fn test_grecord_and_mixed_items() {
    let source = r#"
include "base.template"
grecord(stringin, "$(P)Version") { field(VAL, "1.0") }
record(mbbo, "$(P)Mode")
{
    field(ZRST, "Off")
    field(ONST, "On")
    info(asyn:READBACK, "1")
}
"#;
    let parse = parse(source);
    assert!(parse.ok(), "errors: {:?}", parse.errors());
    assert_eq!(record_names(source), vec!["$(P)Version", "$(P)Mode"]);

    let mode = parse.source_file().records().nth(1).expect("mode record");
    let infos: Vec<_> = mode
        .infos()
        .map(|i| (i.name().unwrap_or_default(), i.value().unwrap_or_default()))
        .collect();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].0, "asyn:READBACK");
    assert_eq!(infos[0].1, "1");
}

#[test]
fn test_round_trip_is_byte_exact() {
    let source = "\n\n# header\nrecord(ao,\"$(P)X\")\n{\n\tfield(DTYP,\"asynFloat64\")\t# tab\n}\n\n\n";
    assert_eq!(parse(source).syntax().to_string(), source);
}
