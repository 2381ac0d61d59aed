/**
 * generator.rs
 * SysML v2 tagging library generation
 *
 * Every ontology class becomes a `metadata def`, every object property a
 * `connection def` with the two ends `sub` and `obj`. All definitions are
 * wrapped in a single package:
 *
 * ```text
 * package SosaTags {
 *     //  This package was auto-generated
 *
 *     //  https://www.w3.org/ns/sosa/Sensor
 *     metadata def SOSA_Sensor;
 *
 *     //  https://www.w3.org/ns/sosa/observes
 *     connection def SOSA_observes {
 *         end sub;
 *         end obj;
 *     }
 *
 * }
 * ```
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{info, warn};

use crate::errors::Result;
use crate::ontology::extractor::{ClassSet, ExtractedOntology};
use crate::output::write_output;

/// Comment opening every generated package
pub const AUTO_GENERATED_NOTICE: &str = "//  This package was auto-generated";

/// SysML v2 basic name
static BASIC_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("basic name pattern"));

/// Whether `identifier` is usable as an unquoted SysML v2 name
pub fn is_basic_name(identifier: &str) -> bool {
    BASIC_NAME.is_match(identifier)
}

/// Rendered tagging library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLibrary {
    pub package_name: String,
    /// Identifiers of the metadata definitions, in output order
    pub metadata_defs: Vec<String>,
    /// Identifiers of the connection definitions, in output order
    pub connection_defs: Vec<String>,
    text: String,
}

impl TagLibrary {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Write the library, replacing any existing file
    pub fn write(&self, path: &Path) -> Result<()> {
        write_output(path, self.text.as_bytes())?;
        info!(
            path = %path.display(),
            metadata = self.metadata_defs.len(),
            connections = self.connection_defs.len(),
            "tagging library written"
        );
        Ok(())
    }
}

pub struct TagLibraryGenerator {
    namespace: String,
    lib_prefix: String,
    package_name: String,
}

impl TagLibraryGenerator {
    /// # Arguments
    /// * `namespace` - Ontology reference echoed in the provenance comments
    /// * `lib_prefix` - Prefix of every generated identifier (e.g. `SOSA_`)
    /// * `package_name` - Name of the wrapping package
    pub fn new(
        namespace: impl Into<String>,
        lib_prefix: impl Into<String>,
        package_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            lib_prefix: lib_prefix.into(),
            package_name: package_name.into(),
        }
    }

    /// `{lib_prefix}{local_name}` with every `:` replaced by `_`
    pub fn identifier(&self, local_name: &str) -> String {
        let identifier = format!("{}{}", self.lib_prefix, local_name.replace(':', "_"));
        if !is_basic_name(&identifier) {
            warn!(%identifier, "generated identifier is not a SysML v2 basic name");
        }
        identifier
    }

    pub fn generate(&self, ontology: &ExtractedOntology) -> TagLibrary {
        let (meta_def, metadata_defs) = self.metadata_defs(&ontology.classes);
        let (conn_def, connection_defs) = self.connection_defs(&ontology.properties);

        TagLibrary {
            package_name: self.package_name.clone(),
            metadata_defs,
            connection_defs,
            text: render_package(&self.package_name, &meta_def, &conn_def),
        }
    }

    /// Metadata definitions text and their identifiers
    pub fn metadata_defs(&self, classes: &ClassSet) -> (String, Vec<String>) {
        let mut text = String::new();
        let mut identifiers = Vec::with_capacity(classes.len());

        for class in classes {
            let identifier = self.identifier(class);
            text.push_str(&format!("\t//  {}{}\n", self.namespace, class));
            text.push_str(&format!("\tmetadata def {};\n\n", identifier));
            identifiers.push(identifier);
        }

        (text, identifiers)
    }

    /// Connection definitions text and their identifiers
    pub fn connection_defs(&self, properties: &[String]) -> (String, Vec<String>) {
        let mut text = String::new();
        let mut identifiers = Vec::with_capacity(properties.len());

        for property in properties {
            let identifier = self.identifier(property);
            text.push_str(&format!("\t//  {}{}\n", self.namespace, property));
            text.push_str(&format!("\tconnection def {} {{\n", identifier));
            text.push_str("\t\tend sub;\n");
            text.push_str("\t\tend obj;\n");
            text.push_str("\t}\n\n");
            identifiers.push(identifier);
        }

        (text, identifiers)
    }
}

/// Wrap definitions in `package {name} { ... }` after the auto-generation notice
pub fn render_package(package_name: &str, meta_def: &str, conn_def: &str) -> String {
    let mut package = format!("package {} {{\n", package_name);
    package.push_str(&format!("\t{}\n\n", AUTO_GENERATED_NOTICE));
    package.push_str(meta_def);
    package.push_str(conn_def);
    package.push('}');
    package
}
