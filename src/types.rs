//! Shared constants and IRI helpers.

/// Description used when an entity carries no description annotation and
/// `default_descriptions` is enabled.
pub const DEFAULT_DESCRIPTION: &str = "Description not available";

/// Annotation properties consulted for descriptions, in lookup order.
pub const DEFAULT_DESCRIPTION_PROPERTIES: &[&str] = &[
    "http://www.w3.org/2000/01/rdf-schema#comment",
    "http://www.w3.org/2004/02/skos/core#definition",
    "http://purl.org/dc/terms/description",
    "http://purl.org/dc/elements/1.1/description",
    "http://www.w3.org/ns/prov#definition",
];

/// `owl:Thing`, never emitted as an ancestor schema.
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";

/// Prefix of component references in the generated document.
pub const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// Returns the local name of an IRI: the text after the last `#`, `/` or `:`.
///
/// ```
/// use owl_openapi::local_name;
///
/// assert_eq!(local_name("https://w3id.org/example#Person"), "Person");
/// assert_eq!(local_name("https://w3id.org/example/Person"), "Person");
/// assert_eq!(local_name("ex:Person"), "Person");
/// assert_eq!(local_name("Person"), "Person");
/// ```
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/', ':']) {
        Some(idx) => &iri[idx + 1..],
        None => iri,
    }
}

/// Returns true when an annotation property IRI matches a configured name.
///
/// A configured name matches either the full IRI or its local name, so
/// configuration files can say `readOnly` instead of the whole IRI.
pub fn annotation_name_matches(property_iri: &str, configured: &str) -> bool {
    !configured.is_empty() && (property_iri == configured || local_name(property_iri) == configured)
}
