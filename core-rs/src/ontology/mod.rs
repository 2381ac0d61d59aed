/**
 * ontology module
 *
 * - library: RDF graph loading (files, URLs) on an Oxigraph store
 * - namespace: prefix bindings and qualified names
 * - query: SPARQL query builders
 * - extractor: classes and object properties of an ontology
 * - generator: SysML v2 tagging library rendering
 * - vocab: RDF, RDFS, OWL and SysML IRIs
 */

pub mod extractor;
pub mod generator;
pub mod library;
pub mod namespace;
pub mod query;
pub mod vocab;

pub use extractor::{ClassSet, ExtractedOntology, OntologyExtractor, PropertyList};
pub use generator::{is_basic_name, TagLibrary, TagLibraryGenerator};
pub use library::{OntologyError, RdfGraph};
pub use namespace::{LocalName, NamespaceResolver, QualifiedName};
pub use query::SparqlQuery;
