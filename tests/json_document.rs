//! Reading, editing and writing JSON documents.

use rstest::{fixture, rstest};
use tokeval::json::{
    JsonArray, JsonError, JsonObject, JsonType, JsonValue, JsonWriter, open_document,
    parse_document,
};
use tokeval::{Cursor, Error, SourceResolver, SyntaxError};

mod test_util;
use test_util::scratch_file;

const CONFIG: &str = r#"
{
    "title": "Semester 1",
    "credits": 30,
    "passed": true,
    "ratio": 0.75,
    "modules": ["SE1", "SE2", 'PW'],
    "notes": null,
    "limits": { "low": -1e2, "high": 2.5E1 }
}
"#;

#[fixture]
fn config() -> JsonObject {
    let doc: JsonValue = CONFIG.parse().unwrap_or_else(|e| panic!("{e}"));
    match doc {
        JsonValue::Object(obj) => obj,
        other => panic!("expected an object, got {}", other.value_type()),
    }
}

#[rstest]
fn typed_reads(config: JsonObject) {
    assert_eq!(config.get_str("title"), Ok("Semester 1"));
    assert_eq!(config.get_i32("credits"), Ok(30));
    assert_eq!(config.get_i8("credits"), Ok(30));
    assert_eq!(config.get_bool("passed"), Ok(true));
    assert_eq!(config.get_f32("ratio"), Ok(0.75));
    assert_eq!(config.is_null("notes"), Ok(true));

    let modules = config.get_array("modules").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(modules.len(), 3);
    assert_eq!(modules.get_str(2), Ok("PW"));

    let limits = config.get_object("limits").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(limits.get_f64("low"), Ok(-100.0));
    assert_eq!(limits.get_i64("high"), Ok(25));
}

#[rstest]
fn lookup_failures(config: JsonObject) {
    assert_eq!(
        config.get_str("missing"),
        Err(JsonError::MissingKey("missing".into()))
    );
    assert!(matches!(
        config.get_str("credits"),
        Err(JsonError::WrongType {
            expected: JsonType::String,
            found: JsonType::Number,
            ..
        })
    ));
    assert!(matches!(
        config.get_i8("limits"),
        Err(JsonError::WrongType { .. })
    ));
    let modules = config.get_array("modules").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        modules.get(3).map(JsonValue::value_type),
        Err(JsonError::IndexOutOfRange { index: 3, len: 3 })
    );
}

#[test]
fn integer_widths() {
    let doc: JsonValue = "[300, 2.5]".parse().unwrap_or_else(|e| panic!("{e}"));
    let arr = doc.as_array().unwrap_or_else(|| panic!("array"));
    assert_eq!(arr.get_i16(0), Ok(300));
    assert!(matches!(
        arr.get_i8(0),
        Err(JsonError::NumberOutOfRange { target: "i8", .. })
    ));
    // Fractions truncate toward zero.
    assert_eq!(arr.get_i32(1), Ok(2));
}

#[rstest]
fn edit_and_write(mut config: JsonObject) {
    config.remove("limits");
    config.remove("modules");
    config.remove("ratio");
    config.set("credits", 45_i64);
    config.set_null("title");
    assert!(config.has("notes"));

    // Keys are written in sorted order.
    assert_eq!(
        config.to_string(),
        r#"{"credits":45,"notes":null,"passed":true,"title":null}"#
    );
}

#[test]
fn pretty_output_uses_tabs() {
    let mut list = JsonArray::new();
    list.push(1_i64);
    list.push_null();
    let mut root = JsonObject::new();
    root.set("a", list);
    root.set("b", JsonObject::new());
    let doc = JsonValue::from(root);
    assert_eq!(
        doc.to_string_pretty(),
        "{\n\t\"a\": [\n\t\t1,\n\t\tnull\n\t],\n\t\"b\": {}\n}"
    );
}

#[test]
fn writer_into_any_sink() {
    let doc: JsonValue = "['x', false]".parse().unwrap_or_else(|e| panic!("{e}"));
    let mut writer = JsonWriter::new(String::from("doc="), false);
    writer
        .write_value(&doc)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(writer.into_inner(), r#"doc=["x",false]"#);
}

#[test]
fn written_documents_read_back() {
    let doc: JsonValue = CONFIG.parse().unwrap_or_else(|e| panic!("{e}"));
    let again: JsonValue = doc
        .to_string_pretty()
        .parse()
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(again, doc);
}

#[rstest]
#[case("42", SyntaxError::ExpectedChar('{'))]
#[case("{\"a\": 1} {", SyntaxError::UnexpectedCharacter('{'))]
#[case("[true, nope]", SyntaxError::ExpectedToken("null"))]
#[case("[tru]", SyntaxError::InvalidBooleanLiteral { expected: true, found: "tru]".into() })]
fn malformed(#[case] src: &str, #[case] expected: SyntaxError) {
    assert_eq!(src.parse::<JsonValue>(), Err(expected));
}

#[test]
fn parse_document_declines_scalars() {
    let mut cursor = Cursor::from("  'text'");
    assert_eq!(parse_document(&mut cursor), Ok(None));
    assert_eq!(cursor.peek(), Some('\''));
}

#[test]
fn open_document_from_file() {
    let path = scratch_file("doc.json", CONFIG);
    let resolver = SourceResolver::new();
    let doc = open_document(&path.to_string_lossy(), &resolver).unwrap_or_else(|e| panic!("{e}"));
    let obj = doc.as_object().unwrap_or_else(|| panic!("object"));
    assert_eq!(obj.get_str("title"), Ok("Semester 1"));
    std::fs::remove_file(&path).unwrap_or_else(|e| panic!("{e}"));

    let scalar = scratch_file("scalar.json", "12");
    let result = open_document(&scalar.to_string_lossy(), &resolver);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    std::fs::remove_file(&scalar).unwrap_or_else(|e| panic!("{e}"));
}
