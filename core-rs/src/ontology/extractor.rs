/**
 * extractor.rs
 * Classifies ontology subjects into classes and object properties
 *
 * Classes are subjects typed `rdfs:Class` or `owl:Class` and are kept unique.
 * Object properties are subjects typed `owl:ObjectProperty`; their local
 * names are kept in traversal order without deduplication.
 */

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::errors::{Result, SemtagError};
use crate::ontology::library::RdfGraph;
use crate::ontology::namespace::{normalize_prefix, LocalName};
use crate::ontology::vocab::{OWL_CLASS, OWL_OBJECT_PROPERTY, RDFS_CLASS};

/// Insertion-ordered set of local class names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSet(IndexSet<String>);

impl ClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name; returns false when it was already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, String> {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for ClassSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ClassSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Local object-property names in traversal order, duplicates included
pub type PropertyList = Vec<String>;

/// Classes and object properties of one ontology
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedOntology {
    pub classes: ClassSet,
    pub properties: PropertyList,
}

pub struct OntologyExtractor<'g> {
    graph: &'g RdfGraph,
    prefix: String,
    strict: bool,
}

impl<'g> OntologyExtractor<'g> {
    /// Extractor stripping `ontology_prefix` (separator appended when absent)
    pub fn new(graph: &'g RdfGraph, ontology_prefix: &str) -> Self {
        Self {
            graph,
            prefix: normalize_prefix(ontology_prefix),
            strict: false,
        }
    }

    /// Fail on subjects outside the ontology prefix instead of passing them through
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn extract(&self) -> Result<ExtractedOntology> {
        let classes = self.classes()?;
        let properties = self.object_properties()?;
        debug!(
            classes = classes.len(),
            properties = properties.len(),
            "ontology extracted"
        );

        Ok(ExtractedOntology { classes, properties })
    }

    /// `rdfs:Class` subjects first, then `owl:Class` subjects
    pub fn classes(&self) -> Result<ClassSet> {
        let mut classes = ClassSet::new();
        for class_type in [RDFS_CLASS, OWL_CLASS] {
            for name in self.local_names(class_type)? {
                classes.insert(name);
            }
        }
        Ok(classes)
    }

    pub fn object_properties(&self) -> Result<PropertyList> {
        self.local_names(OWL_OBJECT_PROPERTY)
    }

    fn local_names(&self, type_iri: &str) -> Result<Vec<String>> {
        let resolver = self.graph.resolver();
        let mut names = Vec::new();

        for subject in self.graph.subjects_of_type(type_iri)? {
            match resolver.local_name(&subject, &self.prefix) {
                Some(LocalName::Stripped(name)) => names.push(name),
                Some(LocalName::Unprefixed(qualified)) => {
                    if self.strict {
                        return Err(SemtagError::PrefixMismatch {
                            subject: qualified,
                            prefix: self.prefix.clone(),
                        });
                    }
                    warn!(
                        subject = %qualified,
                        prefix = %self.prefix,
                        "subject does not use the ontology prefix, keeping qualified name"
                    );
                    names.push(qualified);
                }
                None => debug!(%subject, "skipping non-resource subject"),
            }
        }

        Ok(names)
    }
}
