/**
 * query.rs
 * Query builders for SPARQL
 *
 * Tag queries rewrite a library-prefixed declared name (e.g. `SOSA_Sensor`)
 * into the ontology IRI it stands for (`https://www.w3.org/ns/sosa/Sensor`).
 */

use crate::ontology::vocab::{RDFS_NS, RDF_NS, RDF_TYPE, SYSML_NS};

pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    /// Projection variable of [`SparqlQuery::subjects_of_type`]
    pub const SUBJECT_VAR: &'static str = "subject";

    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Distinct subjects typed with `type_iri`
    pub fn subjects_of_type(type_iri: &str) -> Self {
        Self::new(format!(
            r#"
            SELECT DISTINCT ?{var}
            WHERE {{
                ?{var} <{rdf_type}> <{type_iri}> .
            }}
            "#,
            var = Self::SUBJECT_VAR,
            rdf_type = RDF_TYPE,
            type_iri = type_iri,
        ))
    }

    /// Elements annotated by a metadata usage whose definition is a library tag
    pub fn metadata_tags(ontology_ns: &str, prefix_library: &str) -> Self {
        Self::new(format!(
            r#"
            PREFIX sysml: <{sysml}>
            PREFIX rdf: <{rdf}>
            PREFIX rdfs: <{rdfs}>

            CONSTRUCT {{
                ?element rdf:type ?tag ;
                         rdfs:label ?element_name_short ;
                         rdfs:comment ?element_name_long .
            }}
            WHERE {{
                ?metadata_usg a sysml:MetadataUsage ;
                              sysml:itemDefinition ?def ;
                              sysml:annotatedElement ?element .
                ?def sysml:declaredName ?uri_string .
                OPTIONAL {{ ?element sysml:declaredName ?element_name_short . }}
                OPTIONAL {{ ?element sysml:qualifiedName ?element_name_long . }}
                {rewrite}
            }}
            "#,
            sysml = SYSML_NS,
            rdf = RDF_NS,
            rdfs = RDFS_NS,
            rewrite = tag_rewrite("tag", ontology_ns, prefix_library),
        ))
    }

    /// Same output as [`SparqlQuery::metadata_tags`], reached through the
    /// ownership relationships of the metadata usage
    pub fn metadata_tags_ownership(ontology_ns: &str, prefix_library: &str) -> Self {
        Self::new(format!(
            r#"
            PREFIX sysml: <{sysml}>
            PREFIX rdf: <{rdf}>
            PREFIX rdfs: <{rdfs}>

            CONSTRUCT {{
                ?element rdf:type ?tag ;
                         rdfs:label ?element_name_short ;
                         rdfs:comment ?element_name_long .
            }}
            WHERE {{
                ?metadata_usg a sysml:MetadataUsage ;
                              sysml:ownedRelationship ?owned ;
                              sysml:owningRelationship ?owning .
                ?owned sysml:type ?def .
                ?def sysml:declaredName ?uri_string .
                ?owning sysml:source ?element .
                ?element sysml:declaredName ?element_name_short .
                OPTIONAL {{ ?element sysml:qualifiedName ?element_name_long . }}
                {rewrite}
            }}
            "#,
            sysml = SYSML_NS,
            rdf = RDF_NS,
            rdfs = RDFS_NS,
            rewrite = tag_rewrite("tag", ontology_ns, prefix_library),
        ))
    }

    /// Part-to-part connection usages, directly or through feature chains on
    /// either end, turned into `source <property> target`
    pub fn connection_tags(ontology_ns: &str, prefix_library: &str) -> Self {
        Self::new(format!(
            r#"
            PREFIX sysml: <{sysml}>

            CONSTRUCT {{ ?source_element ?property ?target_element }}
            WHERE {{
                {{
                    ?connection a sysml:ConnectionUsage ;
                                sysml:declaredName ?uri_string ;
                                sysml:source ?source_element ;
                                sysml:target ?target_element .
                    ?source_element a sysml:PartUsage .
                    ?target_element a sysml:PartUsage .
                }}
                UNION
                {{
                    ?connection a sysml:ConnectionUsage ;
                                sysml:declaredName ?uri_string ;
                                sysml:source ?source_element ;
                                sysml:target ?target_feature .
                    ?source_element a sysml:PartUsage .
                    ?target_feature a sysml:Feature .
                    ?chain_target a sysml:FeatureChaining ;
                                  sysml:featureChained ?target_feature ;
                                  sysml:target ?target_element .
                }}
                UNION
                {{
                    ?connection a sysml:ConnectionUsage ;
                                sysml:declaredName ?uri_string ;
                                sysml:source ?source_feature ;
                                sysml:target ?target_element .
                    ?target_element a sysml:PartUsage .
                    ?source_feature a sysml:Feature .
                    ?chain_source a sysml:FeatureChaining ;
                                  sysml:featureChained ?source_feature ;
                                  sysml:target ?source_element .
                }}
                UNION
                {{
                    ?connection a sysml:ConnectionUsage ;
                                sysml:declaredName ?uri_string ;
                                sysml:source ?source_feature ;
                                sysml:target ?target_feature .
                    ?source_feature a sysml:Feature .
                    ?target_feature a sysml:Feature .
                    ?chain_source a sysml:FeatureChaining ;
                                  sysml:featureChained ?source_feature ;
                                  sysml:target ?source_element .
                    ?chain_target a sysml:FeatureChaining ;
                                  sysml:featureChained ?target_feature ;
                                  sysml:target ?target_element .
                }}
                {rewrite}
            }}
            "#,
            sysml = SYSML_NS,
            rewrite = tag_rewrite("property", ontology_ns, prefix_library),
        ))
    }
}

/// FILTER + BIND turning `?uri_string` into the ontology IRI bound to `?{target}`
fn tag_rewrite(target: &str, ontology_ns: &str, prefix_library: &str) -> String {
    format!(
        r#"FILTER(STRSTARTS(STR(?uri_string), "{prefix}"))
                BIND(IRI(REPLACE(STR(?uri_string), "^{pattern}", "{replacement}")) AS ?{target})"#,
        prefix = escape_literal(prefix_library),
        pattern = escape_literal(&regex::escape(prefix_library)),
        replacement = escape_literal(&escape_replacement(ontology_ns)),
        target = target,
    )
}

/// Escape a value for a double-quoted SPARQL string literal
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `$` and `\` are special in a REPLACE replacement string
fn escape_replacement(value: &str) -> String {
    value.replace('\\', "\\\\").replace('$', "\\$")
}
