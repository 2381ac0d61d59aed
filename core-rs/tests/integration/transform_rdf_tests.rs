//! Integration tests for the RDF tag transform
//!
//! AST -> gen-jsonld -> JSON-LD model -> transform-rdf -> Turtle tag graph

use semtag_core::{
    ast_to_jsonld, ModelSource, Operation, RdfGraph, SemtagError, TransformRdfConfig,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SYSML: &str = "http://omg.org/ns/sysml/v2/metamodel#";
const BASE: &str = "http://tuwien.at/ns/";

/// Writes a tagged SysML v2 model as JSON-LD through the converter
fn tagged_model(dir: &Path) -> PathBuf {
    let metadata_dir = dir.join("metamodel");
    fs::create_dir_all(&metadata_dir).unwrap();
    for type_name in ["MetadataDefinition", "MetadataUsage", "PartUsage", "ConnectionUsage"] {
        fs::write(
            metadata_dir.join(format!("{}.jsonld", type_name)),
            json!({"@context": {"@vocab": SYSML}}).to_string(),
        )
        .unwrap();
    }

    let ast = json!([
        {
            "payload": {"@type": "MetadataDefinition", "declaredName": "SOSA_Sensor"},
            "identity": {"@id": "def1"}
        },
        {
            "payload": {"@type": "MetadataDefinition", "declaredName": "Unrelated"},
            "identity": {"@id": "def2"}
        },
        {
            "payload": {
                "@type": "PartUsage",
                "declaredName": "thermo",
                "qualifiedName": "Plant::thermo"
            },
            "identity": {"@id": "part1"}
        },
        {
            "payload": {"@type": "PartUsage", "declaredName": "platform"},
            "identity": {"@id": "part2"}
        },
        {
            "payload": {
                "@type": "MetadataUsage",
                "itemDefinition": {"@id": "def1"},
                "annotatedElement": [{"@id": "part1"}]
            },
            "identity": {"@id": "meta1"}
        },
        {
            "payload": {
                "@type": "MetadataUsage",
                "itemDefinition": {"@id": "def2"},
                "annotatedElement": [{"@id": "part2"}]
            },
            "identity": {"@id": "meta2"}
        },
        {
            "payload": {
                "@type": "ConnectionUsage",
                "declaredName": "SOSA_hosts",
                "source": [{"@id": "part2"}],
                "target": [{"@id": "part1"}]
            },
            "identity": {"@id": "conn1"}
        }
    ]);

    let input = dir.join("ast.json");
    fs::write(&input, ast.to_string()).unwrap();

    let model = dir.join("model.jsonld");
    ast_to_jsonld(&input, &model, BASE, &metadata_dir).unwrap();
    model
}

fn transform_config(source: ModelSource, output: &Path) -> TransformRdfConfig {
    TransformRdfConfig {
        source,
        output: output.to_path_buf(),
        base_uri: BASE.to_string(),
        ontology_ns: "https://www.w3.org/ns/sosa/".to_string(),
        prefix_ontology: "sosa:".to_string(),
        prefix_library: "SOSA_".to_string(),
        ownership_tags: false,
    }
}

#[test]
fn test_jsonld_model_to_tag_graph() {
    let temp_dir = TempDir::new().unwrap();
    let model = tagged_model(temp_dir.path());
    let output = temp_dir.path().join("tags.ttl");

    Operation::TransformRdf(transform_config(ModelSource::File(model), &output))
        .execute()
        .unwrap();

    let turtle = fs::read_to_string(&output).unwrap();
    assert!(turtle.contains("@prefix sosa: <https://www.w3.org/ns/sosa/>"));
    assert!(turtle.contains("@prefix base: <http://tuwien.at/ns/>"));

    let tags = RdfGraph::load_file(&output, None).unwrap();

    let sensors = tags
        .subjects_of_type("https://www.w3.org/ns/sosa/Sensor")
        .unwrap();
    assert_eq!(sensors.len(), 1);
    assert_eq!(sensors[0].to_string(), "<http://tuwien.at/ns/part1>");

    // type + label + comment for part1, one hosts statement
    assert_eq!(tags.len().unwrap(), 4);
    assert!(turtle.contains("sosa:hosts"));
    assert!(turtle.contains("\"Plant::thermo\""));
    assert!(!turtle.contains("Unrelated"));
}

#[test]
fn test_transform_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let model = tagged_model(temp_dir.path());
    let first = temp_dir.path().join("first.ttl");
    let second = temp_dir.path().join("second.ttl");

    transform_config(ModelSource::File(model.clone()), &first)
        .execute()
        .unwrap();
    transform_config(ModelSource::File(model), &second)
        .execute()
        .unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_other_library_prefix_yields_empty_graph() {
    let temp_dir = TempDir::new().unwrap();
    let model = tagged_model(temp_dir.path());
    let output = temp_dir.path().join("tags.ttl");

    let mut config = transform_config(ModelSource::File(model), &output);
    config.prefix_library = "SSN_".to_string();
    config.execute().unwrap();

    let tags = RdfGraph::load_file(&output, None).unwrap();
    assert!(tags.is_empty().unwrap());
}

#[test]
fn test_unreachable_api_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("tags.ttl");

    let result = transform_config(ModelSource::Api("http://127.0.0.1:1".to_string()), &output).execute();
    assert!(matches!(result, Err(SemtagError::Network(_))));
    assert!(!output.exists());
}

#[test]
fn test_malformed_model() {
    let temp_dir = TempDir::new().unwrap();
    let model = temp_dir.path().join("model.jsonld");
    fs::write(&model, "[{\"@id\": ").unwrap();
    let output = temp_dir.path().join("tags.ttl");

    let result = transform_config(ModelSource::File(model), &output).execute();
    assert!(matches!(result, Err(SemtagError::Parse(_))));
    assert!(!output.exists());
}
