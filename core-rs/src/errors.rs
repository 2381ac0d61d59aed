//! Error types for semtag core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SemtagError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Subject '{subject}' does not use ontology prefix '{prefix}'")]
    PrefixMismatch { subject: String, prefix: String },

    #[error("Query error: {0}")]
    Query(String),

    #[error("RDF store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SemtagError {
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        SemtagError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }
}

impl From<crate::ontology::library::OntologyError> for SemtagError {
    fn from(err: crate::ontology::library::OntologyError) -> Self {
        use crate::ontology::library::OntologyError;

        match err {
            OntologyError::NotFound(msg) => SemtagError::NotFound(msg),
            OntologyError::ParseError(msg) => SemtagError::Parse(msg),
            OntologyError::FetchError(msg) => SemtagError::Network(msg),
            OntologyError::QueryError(msg) => SemtagError::Query(msg),
            OntologyError::StoreError(msg) => SemtagError::Store(msg),
            OntologyError::IoError(e) => SemtagError::Io(e),
        }
    }
}

impl From<reqwest::Error> for SemtagError {
    fn from(err: reqwest::Error) -> Self {
        SemtagError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SemtagError>;
