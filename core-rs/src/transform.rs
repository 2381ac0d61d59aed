/**
 * transform.rs
 * SysML v2 model graph to ontology graph
 *
 * Semantic metadata tags (`#SOSA_Sensor`) and tagged connections
 * (`connection : SOSA_hosts connect a to b`) in a SysML v2 model become plain
 * ontology statements:
 *
 * ```text
 * <element> rdf:type sosa:Sensor ; rdfs:label "a" ; rdfs:comment "Pkg::a" .
 * <a> sosa:hosts <b> .
 * ```
 */

use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{Graph, TripleRef};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::client::{ApiClient, ELEMENTS_FILE};
use crate::errors::{Result, SemtagError};
use crate::ontology::library::RdfGraph;
use crate::ontology::namespace::PREFIX_SEPARATOR;
use crate::ontology::query::SparqlQuery;
use crate::ontology::vocab::{RDFS_NS, RDF_NS};
use crate::output::write_output;

/// Prefix bound to the base URI in the output
pub const BASE_PREFIX: &str = "base";

/// Where the SysML v2 model comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// RDF file, usually the JSON-LD written by `gen-jsonld`
    File(PathBuf),
    /// SysML v2 API; the latest commit of the latest project is downloaded
    Api(String),
}

/// Summary of one transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    pub model_statements: usize,
    pub tag_statements: usize,
    /// Base URI the model was parsed with
    pub base_uri: String,
}

pub struct RdfTransformer {
    ontology_ns: String,
    prefix_ontology: String,
    prefix_library: String,
    ownership_tags: bool,
}

impl RdfTransformer {
    /// # Arguments
    /// * `ontology_ns` - Namespace replacing the library prefix (e.g. `https://www.w3.org/ns/sosa/`)
    /// * `prefix_ontology` - Output prefix for `ontology_ns` (e.g. `sosa:`)
    /// * `prefix_library` - Prefix of the tag definitions (e.g. `SOSA_`)
    pub fn new(
        ontology_ns: impl Into<String>,
        prefix_ontology: impl Into<String>,
        prefix_library: impl Into<String>,
    ) -> Self {
        Self {
            ontology_ns: ontology_ns.into(),
            prefix_ontology: prefix_ontology.into(),
            prefix_library: prefix_library.into(),
            ownership_tags: false,
        }
    }

    /// Also derive metadata tags from ownership relationships
    pub fn with_ownership_tags(mut self, enabled: bool) -> Self {
        self.ownership_tags = enabled;
        self
    }

    /// Prefix name for the ontology namespace, separator removed
    pub fn ontology_prefix_name(&self) -> &str {
        self.prefix_ontology
            .strip_suffix(PREFIX_SEPARATOR)
            .unwrap_or(&self.prefix_ontology)
    }

    /// Union of the metadata and connection tag triples of `model`
    pub fn tag_graph(&self, model: &RdfGraph) -> Result<Graph> {
        let mut queries = vec![(
            "metadata",
            SparqlQuery::metadata_tags(&self.ontology_ns, &self.prefix_library),
        )];
        if self.ownership_tags {
            queries.push((
                "ownership",
                SparqlQuery::metadata_tags_ownership(&self.ontology_ns, &self.prefix_library),
            ));
        }
        queries.push((
            "connection",
            SparqlQuery::connection_tags(&self.ontology_ns, &self.prefix_library),
        ));

        let mut graph = Graph::new();
        for (kind, query) in &queries {
            let triples = model.construct(query)?;
            debug!(kind, triples = triples.len(), "tag query evaluated");
            for triple in &triples {
                graph.insert(triple);
            }
        }

        Ok(graph)
    }

    /// Turtle with `rdf`, `rdfs`, the ontology prefix and `base` declared.
    ///
    /// Triples are written sorted by subject, predicate and object.
    pub fn to_turtle(&self, graph: &Graph, base_uri: &str) -> Result<Vec<u8>> {
        let prefixes = [
            ("rdf", RDF_NS),
            ("rdfs", RDFS_NS),
            (self.ontology_prefix_name(), self.ontology_ns.as_str()),
            (BASE_PREFIX, base_uri),
        ];

        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
        for (name, iri) in prefixes {
            serializer = serializer.with_prefix(name, iri).map_err(|e| {
                SemtagError::Serialization(format!("Invalid prefix {}: <{}>: {}", name, iri, e))
            })?;
        }

        let mut triples: Vec<TripleRef<'_>> = graph.iter().collect();
        triples.sort_by_cached_key(|triple| {
            (
                triple.subject.to_string(),
                triple.predicate.to_string(),
                triple.object.to_string(),
            )
        });

        let mut writer = serializer.for_writer(Vec::new());
        for triple in triples {
            writer
                .serialize_triple(triple)
                .map_err(|e| SemtagError::Serialization(e.to_string()))?;
        }

        writer
            .finish()
            .map_err(|e| SemtagError::Serialization(e.to_string()))
    }

    /// Load `source`, extract its tags and write them to `output` as Turtle
    pub fn transform(
        &self,
        source: &ModelSource,
        output: &Path,
        base_uri: &str,
    ) -> Result<TransformOutcome> {
        let (model, base_uri) = match source {
            ModelSource::File(path) => (RdfGraph::load_file(path, Some(base_uri))?, base_uri.to_string()),
            ModelSource::Api(api_url) => {
                let latest = ApiClient::new(api_url).download_latest_elements(Path::new(ELEMENTS_FILE))?;
                let model = RdfGraph::load_file(&latest.path, Some(&latest.base_uri))?;
                (model, latest.base_uri)
            }
        };

        let model_statements = model.len()?;
        info!(source = model.source(), statements = model_statements, "model graph loaded");

        let graph = self.tag_graph(&model)?;
        let turtle = self.to_turtle(&graph, &base_uri)?;
        write_output(output, &turtle)?;

        info!(
            output = %output.display(),
            statements = graph.len(),
            "tag graph written"
        );

        Ok(TransformOutcome {
            model_statements,
            tag_statements: graph.len(),
            base_uri,
        })
    }
}

/// Transform with the default query set (no ownership tags)
pub fn transform_rdf(
    source: &ModelSource,
    output: &Path,
    base_uri: &str,
    ontology_ns: &str,
    prefix_ontology: &str,
    prefix_library: &str,
) -> Result<TransformOutcome> {
    RdfTransformer::new(ontology_ns, prefix_ontology, prefix_library).transform(source, output, base_uri)
}
