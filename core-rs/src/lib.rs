//! # semtag core - semantic metadata tags for SysML v2
//!
//! Bridges ontologies and SysML v2 models in both directions.
//!
//! ## Pipelines
//!
//! - **gen-library**: ontology (Turtle, RDF/XML, JSON-LD, ...) to a SysML v2
//!   package of `metadata def` / `connection def` tags
//! - **gen-jsonld**: SysML v2 AST (JSON) to JSON-LD, each entity enriched with
//!   the metamodel `@context` of its type
//! - **transform-rdf**: tagged SysML v2 model graph to ontology statements
//!
//! ## Architecture
//!
//! ```text
//!  ontology ──► RdfGraph ──► OntologyExtractor ──► TagLibraryGenerator ──► .sysml
//!
//!  AST JSON ──► AstConverter (merge + metamodel contexts) ──► .jsonld
//!
//!  .jsonld / SysML v2 API ──► RdfGraph ──► SPARQL CONSTRUCT ──► .ttl
//! ```
//!
//! The pipelines share no runtime state; each runs synchronously to
//! completion and writes its artifact only on success.

pub mod client;
pub mod config;
pub mod errors;
pub mod jsonld;
pub mod ontology;
pub mod operations;
pub mod output;
pub mod transform;

pub use client::{ApiClient, ApiRecord, LatestElements};
pub use config::ToolConfig;
pub use errors::{Result, SemtagError};
pub use jsonld::{ast_to_jsonld, merge, AstConverter};
pub use ontology::{
    ClassSet, ExtractedOntology, NamespaceResolver, OntologyError, OntologyExtractor,
    PropertyList, QualifiedName, RdfGraph, TagLibrary, TagLibraryGenerator,
};
pub use operations::{
    GenerateJsonLdConfig, GenerateLibraryConfig, Operation, OperationOutput, TransformRdfConfig,
};
pub use transform::{transform_rdf, ModelSource, RdfTransformer, TransformOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
