/**
 * library.rs
 * In-memory RDF graph backed by an Oxigraph store
 *
 * Loads ontologies and model graphs from files or http(s) URLs, keeps the
 * prefix declarations of the document, and answers the SPARQL queries the
 * extractor and the transformer need.
 */

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{GraphNameRef, QuadRef, Term, Triple};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::ontology::namespace::NamespaceResolver;
use crate::ontology::query::SparqlQuery;

#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Failed to parse RDF: {0}")]
    ParseError(String),

    #[error("Ontology not found: {0}")]
    NotFound(String),

    #[error("Failed to fetch ontology: {0}")]
    FetchError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Oxigraph error: {0}")]
    StoreError(String),
}

/// Accept header used when dereferencing an ontology URL
pub const RDF_ACCEPT: &str =
    "text/turtle, application/rdf+xml;q=0.9, application/ld+json;q=0.8, application/n-triples;q=0.7";

/// Number of leading bytes inspected when sniffing a serialization
const SNIFF_WINDOW: usize = 512;

pub struct RdfGraph {
    store: Store,
    resolver: NamespaceResolver,
    source: String,
}

impl RdfGraph {
    /// Load a graph from a path, a `file://` reference or an `http(s)://` URL
    pub fn load(reference: &str) -> Result<Self, OntologyError> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::fetch(reference)
        } else if let Some(path) = reference.strip_prefix("file://") {
            Self::load_file(Path::new(path), None)
        } else {
            Self::load_file(Path::new(reference), None)
        }
    }

    /// Load a graph file; `base_iri` defaults to the file's own `file://` IRI
    pub fn load_file(path: &Path, base_iri: Option<&str>) -> Result<Self, OntologyError> {
        if !path.exists() {
            return Err(OntologyError::NotFound(format!("File not found: {}", path.display())));
        }

        if path.is_dir() {
            return Err(OntologyError::NotFound(format!(
                "Path is a directory, expected an RDF file: {}",
                path.display()
            )));
        }

        let data = fs::read(path)?;
        let format = format_from_path(path).unwrap_or_else(|| sniff_format(&data));
        debug!(path = %path.display(), ?format, "loading RDF file");

        let file_base;
        let base = match base_iri {
            Some(base) => base,
            None => {
                file_base = file_iri(path)?;
                file_base.as_str()
            }
        };

        Self::parse(&data, format, Some(base), &path.display().to_string())
    }

    /// Dereference an ontology URL with content negotiation
    pub fn fetch(url: &str) -> Result<Self, OntologyError> {
        info!(url, "fetching ontology");

        let client = reqwest::blocking::Client::new();
        let response = client
            .get(url)
            .header(ACCEPT, RDF_ACCEPT)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| OntologyError::FetchError(format!("{}: {}", url, e)))?;

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());

        let body = response
            .bytes()
            .map_err(|e| OntologyError::FetchError(format!("{}: {}", url, e)))?;

        let format = media_type
            .as_deref()
            .and_then(RdfFormat::from_media_type)
            .or_else(|| {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                format_from_path(Path::new(path))
            })
            .unwrap_or_else(|| sniff_format(&body));
        debug!(url, ?media_type, ?format, "resolved ontology format");

        Self::parse(&body, format, Some(url), url)
    }

    /// Parse serialized RDF; every quad lands in the default graph
    pub fn parse(
        data: &[u8],
        format: RdfFormat,
        base_iri: Option<&str>,
        source: &str,
    ) -> Result<Self, OntologyError> {
        let mut parser = RdfParser::from_format(format);
        if let Some(base) = base_iri {
            parser = parser
                .with_base_iri(base)
                .map_err(|e| OntologyError::ParseError(format!("Invalid base IRI {}: {}", base, e)))?;
        }

        let store = Store::new().map_err(|e| OntologyError::StoreError(e.to_string()))?;
        let mut resolver = NamespaceResolver::with_well_known();

        let mut reader = parser.for_reader(data);
        for quad in reader.by_ref() {
            let quad = quad.map_err(|e| OntologyError::ParseError(format!("{}: {}", source, e)))?;
            store
                .insert(QuadRef::new(
                    &quad.subject,
                    &quad.predicate,
                    &quad.object,
                    GraphNameRef::DefaultGraph,
                ))
                .map_err(|e| OntologyError::StoreError(e.to_string()))?;
        }

        for (prefix, namespace) in reader.prefixes() {
            resolver.bind(prefix, namespace);
        }

        let graph = Self {
            store,
            resolver,
            source: source.to_string(),
        };
        info!(source, statements = graph.len()?, "graph loaded");

        Ok(graph)
    }

    pub fn resolver(&self) -> &NamespaceResolver {
        &self.resolver
    }

    /// Where the graph was loaded from (path or URL)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of distinct triples
    pub fn len(&self) -> Result<usize, OntologyError> {
        self.store
            .len()
            .map_err(|e| OntologyError::StoreError(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, OntologyError> {
        Ok(self.len()? == 0)
    }

    /// Distinct subjects `?s` of `?s rdf:type <type_iri>`, in store order
    pub fn subjects_of_type(&self, type_iri: &str) -> Result<Vec<Term>, OntologyError> {
        let query = SparqlQuery::subjects_of_type(type_iri);

        #[allow(deprecated)]
        let results = self
            .store
            .query(query.as_str())
            .map_err(|e| OntologyError::QueryError(e.to_string()))?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut subjects = Vec::new();

                for solution in solutions {
                    let solution = solution.map_err(|e| OntologyError::QueryError(e.to_string()))?;
                    if let Some(term) = solution.get(SparqlQuery::SUBJECT_VAR) {
                        subjects.push(term.clone());
                    }
                }

                Ok(subjects)
            }
            _ => Err(OntologyError::QueryError(
                "Expected solutions from subject query".to_string(),
            )),
        }
    }

    /// Evaluate a CONSTRUCT query
    pub fn construct(&self, query: &SparqlQuery) -> Result<Vec<Triple>, OntologyError> {
        #[allow(deprecated)]
        let results = self
            .store
            .query(query.as_str())
            .map_err(|e| OntologyError::QueryError(e.to_string()))?;

        match results {
            QueryResults::Graph(triples) => triples
                .map(|triple| triple.map_err(|e| OntologyError::QueryError(e.to_string())))
                .collect(),
            _ => Err(OntologyError::QueryError(
                "Expected a graph from CONSTRUCT query".to_string(),
            )),
        }
    }
}

/// Serialization implied by a file extension (`.json` is read as JSON-LD)
pub fn format_from_path(path: &Path) -> Option<RdfFormat> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "json" => RdfFormat::from_extension("jsonld"),
        other => RdfFormat::from_extension(other),
    }
}

/// Guess a serialization from the leading bytes of a document
pub fn sniff_format(data: &[u8]) -> RdfFormat {
    let window = &data[..data.len().min(SNIFF_WINDOW)];
    let text = String::from_utf8_lossy(window);
    let head = text.trim_start_matches('\u{feff}').trim_start();

    if head.starts_with("<?xml") || head.starts_with("<rdf:RDF") {
        RdfFormat::RdfXml
    } else if looks_like_json(head) {
        RdfFormat::from_extension("jsonld").unwrap_or(RdfFormat::Turtle)
    } else {
        RdfFormat::Turtle
    }
}

/// `{...` or `[ {...`; a bare `[` also opens a Turtle blank node
fn looks_like_json(head: &str) -> bool {
    match head.strip_prefix('[') {
        Some(rest) => rest.trim_start().starts_with('{'),
        None => head.starts_with('{'),
    }
}

fn file_iri(path: &Path) -> Result<String, OntologyError> {
    let absolute: PathBuf = fs::canonicalize(path)?;
    Ok(format!("file://{}", absolute.display()))
}
