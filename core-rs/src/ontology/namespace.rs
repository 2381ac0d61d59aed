/**
 * namespace.rs
 * Prefix bindings and qualified names for ontology subjects
 *
 * A subject IRI is shortened through the bound namespaces to `prefix:local`
 * (shortest bound form), and the declared ontology prefix is then stripped
 * from that textual form.
 */

use oxigraph::model::Term;
use std::collections::BTreeMap;
use std::fmt;

/// Vocabularies bound before any document prefix is read
pub const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("brick", "https://brickschema.org/schema/Brick#"),
    ("csvw", "http://www.w3.org/ns/csvw#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcam", "http://purl.org/dc/dcam/"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("dcmitype", "http://purl.org/dc/dcmitype/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("doap", "http://usefulinc.com/ns/doap#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("geo", "http://www.opengis.net/ont/geosparql#"),
    ("odrl", "http://www.w3.org/ns/odrl/2/"),
    ("org", "http://www.w3.org/ns/org#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("prof", "http://www.w3.org/ns/dx/prof/"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("qb", "http://purl.org/linked-data/cube#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("schema", "https://schema.org/"),
    ("sh", "http://www.w3.org/ns/shacl#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("sosa", "http://www.w3.org/ns/sosa/"),
    ("ssn", "http://www.w3.org/ns/ssn/"),
    ("time", "http://www.w3.org/2006/time#"),
    ("vann", "http://purl.org/vocab/vann/"),
    ("void", "http://rdfs.org/ns/void#"),
    ("wgs", "https://www.w3.org/2003/01/geo/wgs84_pos#"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// Separator between prefix and local name
pub const PREFIX_SEPARATOR: char = ':';

/// Textual name of an RDF subject under the bound namespaces
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QualifiedName {
    /// `prefix:local`
    Prefixed { prefix: String, local_name: String },
    /// IRI with no usable binding, rendered `<iri>`
    Iri(String),
    /// Blank node, rendered `_:id`
    Blank(String),
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualifiedName::Prefixed { prefix, local_name } => {
                write!(f, "{}{}{}", prefix, PREFIX_SEPARATOR, local_name)
            }
            QualifiedName::Iri(iri) => write!(f, "<{}>", iri),
            QualifiedName::Blank(id) => write!(f, "_:{}", id),
        }
    }
}

/// Outcome of stripping the ontology prefix from a qualified name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalName {
    /// The ontology prefix matched and was removed
    Stripped(String),
    /// The subject lives outside the ontology prefix; kept in qualified form
    Unprefixed(String),
}

impl LocalName {
    pub fn as_str(&self) -> &str {
        match self {
            LocalName::Stripped(name) | LocalName::Unprefixed(name) => name,
        }
    }
}

/// Append the prefix separator when absent (`sosa` -> `sosa:`)
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.ends_with(PREFIX_SEPARATOR) {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, PREFIX_SEPARATOR)
    }
}

/// Remove a normalized ontology prefix from the front of a qualified name
pub fn strip_ontology_prefix(qualified: &str, ontology_prefix: &str) -> LocalName {
    match qualified.strip_prefix(ontology_prefix) {
        Some(rest) => LocalName::Stripped(rest.to_string()),
        None => LocalName::Unprefixed(qualified.to_string()),
    }
}

fn is_local_part(candidate: &str) -> bool {
    !candidate.is_empty() && !candidate.contains(['/', '#', '?'])
}

/// Prefix to namespace bindings of one graph
#[derive(Debug, Clone, Default)]
pub struct NamespaceResolver {
    bindings: BTreeMap<String, String>,
}

impl NamespaceResolver {
    /// Resolver without any binding
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver preloaded with [`WELL_KNOWN_PREFIXES`]
    pub fn with_well_known() -> Self {
        let mut resolver = Self::new();
        for (prefix, namespace) in WELL_KNOWN_PREFIXES {
            resolver.bind(prefix, namespace);
        }
        resolver
    }

    /// Bind `prefix` to `namespace`.
    ///
    /// A namespace keeps a single prefix: a later binding of the same
    /// namespace replaces the earlier prefix, so document declarations win
    /// over the well-known table.
    pub fn bind(&mut self, prefix: &str, namespace: &str) {
        self.bindings.retain(|_, bound| bound != namespace);
        self.bindings.insert(prefix.to_string(), namespace.to_string());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Shortest qualified form of an IRI
    ///
    /// Picks the binding with the longest namespace that leaves a valid local
    /// part; ties go to the shorter, then lexically smaller, prefix.
    pub fn qualify_iri(&self, iri: &str) -> QualifiedName {
        let best = self
            .bindings
            .iter()
            .filter_map(|(prefix, namespace)| {
                let local = iri.strip_prefix(namespace.as_str())?;
                is_local_part(local).then_some((prefix, namespace, local))
            })
            .min_by(|(pa, na, _), (pb, nb, _)| {
                nb.len()
                    .cmp(&na.len())
                    .then_with(|| pa.len().cmp(&pb.len()))
                    .then_with(|| pa.cmp(pb))
            });

        match best {
            Some((prefix, _, local)) => QualifiedName::Prefixed {
                prefix: prefix.clone(),
                local_name: local.to_string(),
            },
            None => QualifiedName::Iri(iri.to_string()),
        }
    }

    /// Qualified name of a subject term; `None` for terms that cannot be subjects
    pub fn qualify_term(&self, term: &Term) -> Option<QualifiedName> {
        match term {
            Term::NamedNode(node) => Some(self.qualify_iri(node.as_str())),
            Term::BlankNode(node) => Some(QualifiedName::Blank(node.as_str().to_string())),
            _ => None,
        }
    }

    /// Qualify a subject and strip the (normalized) ontology prefix from it
    pub fn local_name(&self, term: &Term, ontology_prefix: &str) -> Option<LocalName> {
        let qualified = self.qualify_term(term)?;
        Some(strip_ontology_prefix(&qualified.to_string(), ontology_prefix))
    }
}
