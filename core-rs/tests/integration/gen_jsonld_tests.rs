//! Integration tests for AST to JSON-LD conversion
//!
//! Metamodel directory + AST file -> AstConverter -> JSON-LD array on disk

use semtag_core::{ast_to_jsonld, GenerateJsonLdConfig, Operation, OperationOutput, SemtagError};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    _temp_dir: TempDir,
    metadata_dir: PathBuf,
    input: PathBuf,
    output: PathBuf,
}

fn fixture(contexts: &[(&str, Value)], ast: Value) -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let metadata_dir = temp_dir.path().join("metamodel");
    fs::create_dir_all(&metadata_dir).unwrap();

    for (type_name, context) in contexts {
        fs::write(
            metadata_dir.join(format!("{}.jsonld", type_name)),
            serde_json::to_string_pretty(context).unwrap(),
        )
        .unwrap();
    }

    let input = temp_dir.path().join("ast.json");
    fs::write(&input, serde_json::to_string(&ast).unwrap()).unwrap();
    let output = temp_dir.path().join("model.jsonld");

    Fixture {
        metadata_dir,
        input,
        output,
        _temp_dir: temp_dir,
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_sensor_entity_scenario() {
    let f = fixture(
        &[("Sensor", json!({"@context": {"name": "ex:hasName"}}))],
        json!([{"payload": {"@type": "Sensor", "name": "S1"}, "identity": {"@id": "1"}}]),
    );

    let count = ast_to_jsonld(&f.input, &f.output, "http://x/", &f.metadata_dir).unwrap();
    assert_eq!(count, 1);

    assert_eq!(
        read_json(&f.output),
        json!([{
            "name": "S1",
            "@id": "1",
            "@type": "Sensor",
            "@context": {"name": "ex:hasName", "@base": "http://x/"}
        }])
    );
}

#[test]
fn test_output_format_and_order() {
    let f = fixture(
        &[
            ("PartUsage", json!({"@context": {"@vocab": "http://omg.org/ns/sysml/v2/metamodel#"}})),
            ("Package", json!({"@context": {"@vocab": "http://omg.org/ns/sysml/v2/metamodel#"}})),
        ],
        json!([
            {"payload": {"@type": "Package", "declaredName": "Plant"}, "identity": {"@id": "pkg"}},
            {"payload": {"@type": "PartUsage", "declaredName": "thermo"}, "identity": {"@id": "part"}},
            {"payload": {"@type": "PartUsage", "declaredName": "pump"}, "identity": {"@id": "part2"}}
        ]),
    );

    let operation = Operation::GenerateJsonLd(GenerateJsonLdConfig {
        input_ast: f.input.clone(),
        output: f.output.clone(),
        base_uri: "http://tuwien.at/ns/".to_string(),
        metadata_dir: f.metadata_dir.clone(),
    });
    match operation.execute().unwrap() {
        OperationOutput::JsonLd { entities, .. } => assert_eq!(entities, 3),
        other => panic!("Unexpected output: {:?}", other),
    }

    let text = fs::read_to_string(&f.output).unwrap();
    assert!(text.starts_with("[\n    {\n        \""));

    let ids: Vec<Value> = read_json(&f.output)
        .as_array()
        .unwrap()
        .iter()
        .map(|entity| entity["@id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("pkg"), json!("part"), json!("part2")]);
}

#[test]
fn test_rerun_is_byte_identical() {
    let f = fixture(
        &[("Sensor", json!({"@context": {"b": "ex:b", "a": "ex:a"}, "z": 1, "k": {"y": 2, "x": 1}}))],
        json!([
            {"payload": {"@type": "Sensor", "zeta": 1, "alpha": 2}, "identity": {"@id": "1"}},
            {"payload": {"@type": "Sensor"}, "identity": {"@id": "2"}}
        ]),
    );

    ast_to_jsonld(&f.input, &f.output, "http://x/", &f.metadata_dir).unwrap();
    let first = fs::read(&f.output).unwrap();

    ast_to_jsonld(&f.input, &f.output, "http://x/", &f.metadata_dir).unwrap();
    let second = fs::read(&f.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_context_writes_nothing() {
    let f = fixture(
        &[("Sensor", json!({"@context": {}}))],
        json!([
            {"payload": {"@type": "Sensor"}, "identity": {"@id": "1"}},
            {"payload": {"@type": "Actuator"}, "identity": {"@id": "2"}}
        ]),
    );

    match ast_to_jsonld(&f.input, &f.output, "http://x/", &f.metadata_dir) {
        Err(SemtagError::NotFound(msg)) => assert!(msg.contains("Actuator")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert!(!f.output.exists());
}

#[test]
fn test_existing_output_untouched_on_failure() {
    let f = fixture(&[], json!([{"payload": {"@type": "Sensor"}}]));
    fs::write(&f.output, "previous").unwrap();

    let result = ast_to_jsonld(&f.input, &f.output, "http://x/", &f.metadata_dir);
    assert!(matches!(result, Err(SemtagError::MissingField { .. })));
    assert_eq!(fs::read_to_string(&f.output).unwrap(), "previous");
}

#[test]
fn test_invalid_context_document() {
    let f = fixture(&[], json!([{"payload": {"@type": "Broken"}, "identity": {}}]));
    fs::write(f.metadata_dir.join("Broken.jsonld"), "{ not json").unwrap();

    let result = ast_to_jsonld(&f.input, &f.output, "http://x/", &f.metadata_dir);
    assert!(matches!(result, Err(SemtagError::Parse(_))));
}

#[test]
fn test_ast_must_be_array() {
    let f = fixture(&[], json!({"payload": {}}));

    let result = ast_to_jsonld(&f.input, &f.output, "http://x/", &f.metadata_dir);
    assert!(matches!(result, Err(SemtagError::Parse(_))));
}

#[test]
fn test_empty_ast() {
    let f = fixture(&[], json!([]));

    let count = ast_to_jsonld(&f.input, &f.output, "http://x/", &f.metadata_dir).unwrap();
    assert_eq!(count, 0);
    assert_eq!(fs::read_to_string(&f.output).unwrap(), "[]");
}
