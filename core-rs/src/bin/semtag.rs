//! semtag - semantic tag utility CLI
//!
//! Generates SysML v2 tagging libraries from ontologies, enriches SysML v2
//! ASTs into JSON-LD and extracts the tagged model as ontology statements.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use semtag_core::config::ToolConfig;
use semtag_core::operations::{
    GenerateJsonLdConfig, GenerateLibraryConfig, Operation, OperationOutput, TransformRdfConfig,
};
use semtag_core::transform::ModelSource;

#[derive(Parser)]
#[command(name = "semtag")]
#[command(version)]
#[command(arg_required_else_help = true)]
#[command(about = "Utility for generating and extracting semantic metadata tags for SysML v2 models")]
struct Cli {
    /// YAML file overriding the built-in defaults
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a semantic metadata tagging library for SysML v2 from an ontology
    GenLibrary {
        /// Ontology path or URL, e.g. 'https://www.w3.org/ns/sosa/'
        #[arg(long)]
        input_ontology_ns: Option<String>,
        /// Path for the generated library file (stdout when omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Prefix of the ontology, e.g. 'sosa:'
        #[arg(long = "prefix-ontology", visible_alias = "po")]
        prefix_ontology: Option<String>,
        /// Prefix of the generated library, e.g. 'SOSA_'
        #[arg(long = "prefix-library", visible_alias = "pl")]
        prefix_library: Option<String>,
        /// Name of the generated SysML v2 package, e.g. 'SosaTags'
        #[arg(long, short = 'n')]
        package_name: Option<String>,
        /// Fail on classes or properties outside the ontology prefix
        #[arg(long)]
        strict: bool,
    },
    /// Generate JSON-LD with @context information from the SysML v2 metamodel for a SysML v2 AST
    GenJsonld {
        /// Input JSON AST of the SysML v2 model
        #[arg(long, short = 'i')]
        input_ast_file: PathBuf,
        /// Output JSON-LD file
        #[arg(long, short = 'o')]
        output_jsonld: PathBuf,
        /// Base URI used for the output RDF graph
        #[arg(long, short = 'b')]
        base_uri: Option<String>,
        /// Directory with the SysML v2 metamodel JSON-LD files
        #[arg(long, short = 'm')]
        metadata_dir: Option<PathBuf>,
    },
    /// Transform the SysML v2 RDF graph into the target ontology of the semantic metadata tags
    TransformRdf {
        /// SysML v2 API used to retrieve the elements of the most recent project
        #[arg(long, conflicts_with = "input_model")]
        api_endpoint: Option<String>,
        /// RDF representation of the SysML v2 model (JSON-LD)
        #[arg(long, short = 'i')]
        input_model: Option<PathBuf>,
        /// Transformed, serialized RDF graph
        #[arg(long, short = 'o')]
        output_rdf: PathBuf,
        /// Base URI used for the output RDF graph
        #[arg(long, short = 'b')]
        base_uri: Option<String>,
        /// Ontology namespace used by the tagging library
        #[arg(long)]
        input_ontology_ns: Option<String>,
        /// Prefix of the ontology, e.g. 'sosa:'
        #[arg(long = "prefix-ontology", visible_alias = "po")]
        prefix_ontology: Option<String>,
        /// Prefix of the generated library, e.g. 'SOSA_'
        #[arg(long = "prefix-library", visible_alias = "pl")]
        prefix_library: Option<String>,
        /// Also derive metadata tags from ownership relationships
        #[arg(long)]
        ownership_tags: bool,
    },
}

impl Commands {
    fn into_operation(self, config: ToolConfig) -> Operation {
        match self {
            Commands::GenLibrary {
                input_ontology_ns,
                output,
                prefix_ontology,
                prefix_library,
                package_name,
                strict,
            } => Operation::GenerateLibrary(GenerateLibraryConfig {
                input_ontology: input_ontology_ns.unwrap_or(config.ontology_ns),
                output,
                prefix_ontology: prefix_ontology.unwrap_or(config.prefix_ontology),
                prefix_library: prefix_library.unwrap_or(config.prefix_library),
                package_name: package_name.unwrap_or(config.package_name),
                strict,
            }),
            Commands::GenJsonld {
                input_ast_file,
                output_jsonld,
                base_uri,
                metadata_dir,
            } => Operation::GenerateJsonLd(GenerateJsonLdConfig {
                input_ast: input_ast_file,
                output: output_jsonld,
                base_uri: base_uri.unwrap_or(config.base_uri),
                metadata_dir: metadata_dir.unwrap_or(config.metadata_dir),
            }),
            Commands::TransformRdf {
                api_endpoint,
                input_model,
                output_rdf,
                base_uri,
                input_ontology_ns,
                prefix_ontology,
                prefix_library,
                ownership_tags,
            } => {
                let source = match input_model {
                    Some(path) => ModelSource::File(path),
                    None => ModelSource::Api(api_endpoint.unwrap_or(config.api_url)),
                };

                Operation::TransformRdf(TransformRdfConfig {
                    source,
                    output: output_rdf,
                    base_uri: base_uri.unwrap_or(config.base_uri),
                    ontology_ns: input_ontology_ns.unwrap_or(config.ontology_ns),
                    prefix_ontology: prefix_ontology.unwrap_or(config.prefix_ontology),
                    prefix_library: prefix_library.unwrap_or(config.prefix_library),
                    ownership_tags,
                })
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ToolConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ToolConfig::default(),
    };

    let operation = cli.command.into_operation(config);
    let output = operation
        .execute()
        .with_context(|| format!("{} failed", operation.name()))?;

    match output {
        OperationOutput::Library { library, output: None } => {
            println!("{}", library.as_str());
        }
        OperationOutput::Library { library, output: Some(path) } => {
            println!(
                "✓ Generated tagging library '{}' ({} metadata, {} connection definitions) at {}",
                library.package_name,
                library.metadata_defs.len(),
                library.connection_defs.len(),
                path.display()
            );
        }
        OperationOutput::JsonLd { output, entities } => {
            println!("✓ Generated JSON-LD with {} entities at {}", entities, output.display());
        }
        OperationOutput::Rdf { output, outcome } => {
            println!(
                "✓ Model graph has {} statements, wrote {} tag statements to {}",
                outcome.model_statements,
                outcome.tag_statements,
                output.display()
            );
        }
    }

    Ok(())
}
