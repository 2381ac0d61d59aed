//! Operations exposed by the semtag CLI
//!
//! Each operation owns a validated configuration and runs to completion or
//! fails before writing anything.

use std::path::PathBuf;
use tracing::info;

use crate::config::ToolConfig;
use crate::errors::{Result, SemtagError};
use crate::jsonld::converter::AstConverter;
use crate::ontology::extractor::OntologyExtractor;
use crate::ontology::generator::{TagLibrary, TagLibraryGenerator};
use crate::ontology::library::RdfGraph;
use crate::transform::{ModelSource, RdfTransformer, TransformOutcome};

/// Ontology to SysML v2 tagging library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateLibraryConfig {
    /// Path or URL of the ontology, echoed in every provenance comment
    pub input_ontology: String,
    /// Printed to stdout when absent
    pub output: Option<PathBuf>,
    pub prefix_ontology: String,
    pub prefix_library: String,
    pub package_name: String,
    pub strict: bool,
}

impl GenerateLibraryConfig {
    pub fn from_tool_config(config: &ToolConfig) -> Self {
        Self {
            input_ontology: config.ontology_ns.clone(),
            output: None,
            prefix_ontology: config.prefix_ontology.clone(),
            prefix_library: config.prefix_library.clone(),
            package_name: config.package_name.clone(),
            strict: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("input ontology", &self.input_ontology)?;
        require("ontology prefix", &self.prefix_ontology)?;
        require("package name", &self.package_name)
    }

    pub fn execute(&self) -> Result<OperationOutput> {
        self.validate()?;
        info!(ontology = %self.input_ontology, "generating tagging library");

        let graph = RdfGraph::load(&self.input_ontology)?;
        let extracted = OntologyExtractor::new(&graph, &self.prefix_ontology)
            .strict(self.strict)
            .extract()?;

        let library = TagLibraryGenerator::new(
            self.input_ontology.as_str(),
            self.prefix_library.as_str(),
            self.package_name.as_str(),
        )
        .generate(&extracted);

        if let Some(path) = &self.output {
            library.write(path)?;
        }

        Ok(OperationOutput::Library {
            library,
            output: self.output.clone(),
        })
    }
}

/// SysML v2 AST to JSON-LD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateJsonLdConfig {
    pub input_ast: PathBuf,
    pub output: PathBuf,
    pub base_uri: String,
    pub metadata_dir: PathBuf,
}

impl GenerateJsonLdConfig {
    pub fn validate(&self) -> Result<()> {
        require("base URI", &self.base_uri)?;
        if !self.metadata_dir.is_dir() {
            return Err(SemtagError::NotFound(format!(
                "Metadata directory not found: {}",
                self.metadata_dir.display()
            )));
        }
        Ok(())
    }

    pub fn execute(&self) -> Result<OperationOutput> {
        self.validate()?;
        info!(
            input = %self.input_ast.display(),
            metadata_dir = %self.metadata_dir.display(),
            "generating JSON-LD"
        );

        let entities = AstConverter::new(&self.metadata_dir, self.base_uri.as_str())
            .convert_file(&self.input_ast, &self.output)?;

        Ok(OperationOutput::JsonLd {
            output: self.output.clone(),
            entities,
        })
    }
}

/// SysML v2 model graph to ontology graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRdfConfig {
    pub source: ModelSource,
    pub output: PathBuf,
    pub base_uri: String,
    pub ontology_ns: String,
    pub prefix_ontology: String,
    pub prefix_library: String,
    pub ownership_tags: bool,
}

impl TransformRdfConfig {
    pub fn validate(&self) -> Result<()> {
        require("base URI", &self.base_uri)?;
        require("ontology namespace", &self.ontology_ns)?;
        require("library prefix", &self.prefix_library)
    }

    pub fn execute(&self) -> Result<OperationOutput> {
        self.validate()?;
        info!(source = ?self.source, "retrieving semantic tags and transforming RDF graph");

        let outcome = RdfTransformer::new(
            self.ontology_ns.as_str(),
            self.prefix_ontology.as_str(),
            self.prefix_library.as_str(),
        )
        .with_ownership_tags(self.ownership_tags)
        .transform(&self.source, &self.output, &self.base_uri)?;

        Ok(OperationOutput::Rdf {
            output: self.output.clone(),
            outcome,
        })
    }
}

/// Result of a successful operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutput {
    Library {
        library: TagLibrary,
        output: Option<PathBuf>,
    },
    JsonLd {
        output: PathBuf,
        entities: usize,
    },
    Rdf {
        output: PathBuf,
        outcome: TransformOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    GenerateLibrary(GenerateLibraryConfig),
    GenerateJsonLd(GenerateJsonLdConfig),
    TransformRdf(TransformRdfConfig),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GenerateLibrary(_) => "gen-library",
            Operation::GenerateJsonLd(_) => "gen-jsonld",
            Operation::TransformRdf(_) => "transform-rdf",
        }
    }

    pub fn execute(&self) -> Result<OperationOutput> {
        match self {
            Operation::GenerateLibrary(config) => config.execute(),
            Operation::GenerateJsonLd(config) => config.execute(),
            Operation::TransformRdf(config) => config.execute(),
        }
    }
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SemtagError::Config(format!("{} cannot be empty", what)));
    }
    Ok(())
}
