/**
 * config.rs
 * Tool configuration (YAML format)
 *
 * Every field is optional in the file; missing fields take the documented
 * defaults below. CLI flags override whatever the file provides.
 *
 * Format:
 * ```yaml
 * apiUrl: http://localhost:9000/
 * baseUri: http://tuwien.at/ns/
 * metadataDir: ./res/jsonld/metamodel
 * ontologyNs: https://www.w3.org/ns/sosa/
 * prefixOntology: "sosa:"
 * prefixLibrary: SOSA_
 * packageName: SosaTags
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, SemtagError};

/// Path to the SysML v2 metamodel context documents
pub const DEFAULT_METADATA_DIR: &str = "./res/jsonld/metamodel";

/// Base URI for generated RDF graphs
pub const DEFAULT_BASE_URI: &str = "http://tuwien.at/ns/";

pub const DEFAULT_ONTOLOGY_NS: &str = "https://www.w3.org/ns/sosa/";
pub const DEFAULT_PREFIX_ONTOLOGY: &str = "sosa:";
pub const DEFAULT_PREFIX_LIBRARY: &str = "SOSA_";
pub const DEFAULT_PACKAGE_NAME: &str = "SosaTags";

/// SysML v2 API serving projects, commits and elements
pub const DEFAULT_API_URL: &str = "http://localhost:9000/";

/// Settings shared by every operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolConfig {
    pub api_url: String,
    pub base_uri: String,
    pub metadata_dir: PathBuf,
    pub ontology_ns: String,
    pub prefix_ontology: String,
    pub prefix_library: String,
    pub package_name: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_uri: DEFAULT_BASE_URI.to_string(),
            metadata_dir: PathBuf::from(DEFAULT_METADATA_DIR),
            ontology_ns: DEFAULT_ONTOLOGY_NS.to_string(),
            prefix_ontology: DEFAULT_PREFIX_ONTOLOGY.to_string(),
            prefix_library: DEFAULT_PREFIX_LIBRARY.to_string(),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SemtagError::NotFound(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;

        let config: ToolConfig = serde_yaml::from_str(&content).map_err(|e| {
            SemtagError::Config(format!("Invalid config YAML {}: {}", path.display(), e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Ensures no identifier-producing field is empty
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("apiUrl", &self.api_url),
            ("baseUri", &self.base_uri),
            ("prefixOntology", &self.prefix_ontology),
            ("packageName", &self.package_name),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(SemtagError::Config(format!("{} cannot be empty", name)));
            }
        }

        Ok(())
    }

    /// Save configuration as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| SemtagError::Serialization(format!("Failed to serialize config: {}", e)))?;

        fs::write(path.as_ref(), yaml)?;

        Ok(())
    }
}
