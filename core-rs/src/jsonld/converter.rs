//! AST to JSON-LD conversion
//!
//! Each AST entity `{"payload": {...}, "identity": {...}}` is flattened into a
//! single JSON-LD node: payload merged over identity, then merged over the
//! context document of the payload's `@type`, with `@context.@base` forced to
//! the caller's base URI.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{Result, SemtagError};
use crate::jsonld::merge::merge;
use crate::output::write_output;

/// Extension of per-type context documents
pub const CONTEXT_EXTENSION: &str = "jsonld";

pub const CONTEXT_KEY: &str = "@context";
pub const BASE_KEY: &str = "@base";
pub const TYPE_KEY: &str = "@type";
pub const PAYLOAD_KEY: &str = "payload";
pub const IDENTITY_KEY: &str = "identity";

pub struct AstConverter {
    metadata_dir: PathBuf,
    base_uri: String,
    contexts: HashMap<String, Map<String, Value>>,
}

impl AstConverter {
    /// # Arguments
    /// * `metadata_dir` - Directory holding `{type}.jsonld` context documents
    /// * `base_uri` - Value forced into every entity's `@context.@base`
    pub fn new(metadata_dir: impl Into<PathBuf>, base_uri: impl Into<String>) -> Self {
        Self {
            metadata_dir: metadata_dir.into(),
            base_uri: base_uri.into(),
            contexts: HashMap::new(),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Path of the context document for `type_name`
    pub fn context_path(&self, type_name: &str) -> PathBuf {
        self.metadata_dir
            .join(format!("{}.{}", type_name, CONTEXT_EXTENSION))
    }

    /// Context document for `type_name`, read once per converter
    pub fn context_for_type(&mut self, type_name: &str) -> Result<&Map<String, Value>> {
        if !self.contexts.contains_key(type_name) {
            let context = self.load_context(type_name)?;
            self.contexts.insert(type_name.to_string(), context);
        }

        Ok(&self.contexts[type_name])
    }

    fn load_context(&self, type_name: &str) -> Result<Map<String, Value>> {
        let path = self.context_path(type_name);

        if !path.is_file() {
            return Err(SemtagError::NotFound(format!(
                "No context document for type '{}' (expected {})",
                type_name,
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        let document: Value = serde_json::from_str(&content).map_err(|e| {
            SemtagError::Parse(format!("Invalid context document {}: {}", path.display(), e))
        })?;
        debug!(type_name, path = %path.display(), "context document loaded");

        match document {
            Value::Object(map) => Ok(map),
            _ => Err(SemtagError::Parse(format!(
                "Context document {} is not a JSON object",
                path.display()
            ))),
        }
    }

    /// Convert one AST entity; `index` only labels errors
    pub fn convert_entity(&mut self, index: usize, entity: &Value) -> Result<Value> {
        let label = format!("AST entity #{}", index);

        let payload = object_field(entity, PAYLOAD_KEY, &label)?;
        let identity = object_field(entity, IDENTITY_KEY, &label)?;

        let type_name = match payload.get(TYPE_KEY) {
            Some(Value::String(type_name)) => type_name.clone(),
            Some(_) => {
                return Err(SemtagError::missing_field(
                    TYPE_KEY,
                    format!("payload of {} (value is not a string)", label),
                ))
            }
            None => return Err(SemtagError::missing_field(TYPE_KEY, format!("payload of {}", label))),
        };

        let entry = merge(payload, identity);
        let base_uri = self.base_uri.clone();
        let context = self.context_for_type(&type_name)?;
        let mut entry = merge(&entry, context);

        inject_base(&mut entry, base_uri);

        Ok(Value::Object(entry))
    }

    /// Convert every entity, preserving order; the first failure aborts
    pub fn convert(&mut self, entities: &[Value]) -> Result<Vec<Value>> {
        entities
            .iter()
            .enumerate()
            .map(|(index, entity)| self.convert_entity(index, entity))
            .collect()
    }

    /// Read an AST array from `input` and write the JSON-LD array to `output`.
    ///
    /// Nothing is written unless every entity converts. Returns the number of
    /// entities written.
    pub fn convert_file(&mut self, input: &Path, output: &Path) -> Result<usize> {
        if !input.is_file() {
            return Err(SemtagError::NotFound(format!(
                "AST file not found: {}",
                input.display()
            )));
        }

        let content = fs::read_to_string(input)?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| SemtagError::Parse(format!("Invalid AST JSON {}: {}", input.display(), e)))?;

        let entities = match document {
            Value::Array(entities) => entities,
            _ => {
                return Err(SemtagError::Parse(format!(
                    "AST file {} must contain a JSON array",
                    input.display()
                )))
            }
        };

        let converted = self.convert(&entities)?;
        write_output(output, &to_pretty_json(&converted)?)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            entities = converted.len(),
            "JSON-LD written"
        );

        Ok(converted.len())
    }
}

/// Convert `input_file` into `output_file` with a fresh converter
pub fn ast_to_jsonld(
    input_file: &Path,
    output_file: &Path,
    base_uri: &str,
    metadata_dir: &Path,
) -> Result<usize> {
    AstConverter::new(metadata_dir, base_uri).convert_file(input_file, output_file)
}

/// Serialize with a four-space indent
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

fn object_field<'a>(entity: &'a Value, key: &str, label: &str) -> Result<&'a Map<String, Value>> {
    match entity.get(key) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(SemtagError::Parse(format!("{} field '{}' is not an object", label, key))),
        None => Err(SemtagError::missing_field(key, label)),
    }
}

/// Assign `@context.@base`, replacing a missing or non-object `@context`
fn inject_base(entry: &mut Map<String, Value>, base_uri: String) {
    let context = entry
        .entry(CONTEXT_KEY)
        .or_insert_with(|| Value::Object(Map::new()));

    if !context.is_object() {
        *context = Value::Object(Map::new());
    }

    if let Value::Object(context) = context {
        context.insert(BASE_KEY.to_string(), Value::String(base_uri));
    }
}
