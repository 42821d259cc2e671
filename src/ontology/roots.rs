//! Root selection for tree building.

use super::{HierarchyIndex, OntologyError};

/// Resolves the entities to build trees from.
///
/// With a non-empty `root_label`, returns the single entity whose label matches
/// it case-insensitively; the first match in label lookup order wins when
/// several entities share the label. Without one, returns every class that is
/// not a subclass of anything, in document order.
///
/// # Errors
///
/// Returns [`OntologyError::RootNotFound`] when an explicit label matches nothing.
pub fn resolve_roots(
    index: &HierarchyIndex,
    root_label: Option<&str>,
) -> Result<Vec<String>, OntologyError> {
    match root_label.filter(|label| !label.is_empty()) {
        Some(label) => {
            let root = find_by_label(index, label).ok_or_else(|| OntologyError::RootNotFound {
                label: label.to_string(),
            })?;
            tracing::debug!(root, label, "resolved root by label");
            Ok(vec![root.to_string()])
        }
        None => Ok(index.implicit_roots().map(str::to_string).collect()),
    }
}

/// Finds the first entity whose resolved label equals `label`, ignoring case.
pub fn find_by_label<'a>(index: &'a HierarchyIndex, label: &str) -> Option<&'a str> {
    let wanted = label.to_lowercase();
    index
        .labels()
        .find(|(_, candidate)| candidate.to_lowercase() == wanted)
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{SourceFormat, parse_str};

    const ZOO: &str = r#"
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix ex: <http://example.org/zoo#> .

        ex:A rdfs:subClassOf ex:B ; rdfs:label "Cat" .
        ex:B rdfs:subClassOf ex:C ; rdfs:label "Mammal" .
        ex:C rdfs:label "Animal" .
    "#;

    fn zoo_index() -> HierarchyIndex {
        let triples = parse_str(ZOO, SourceFormat::Turtle).unwrap();
        HierarchyIndex::from_triples(&triples)
    }

    #[test]
    fn implicit_roots_return_top_level_class() {
        let roots = resolve_roots(&zoo_index(), None).unwrap();
        assert_eq!(roots, vec!["http://example.org/zoo#C"]);
    }

    #[test]
    fn empty_label_behaves_like_no_label() {
        let roots = resolve_roots(&zoo_index(), Some("")).unwrap();
        assert_eq!(roots, vec!["http://example.org/zoo#C"]);
    }

    #[test]
    fn label_match_is_case_insensitive() {
        let roots = resolve_roots(&zoo_index(), Some("mAmMaL")).unwrap();
        assert_eq!(roots, vec!["http://example.org/zoo#B"]);
    }

    #[test]
    fn unknown_label_is_root_not_found() {
        let result = resolve_roots(&zoo_index(), Some("Nonexistent"));
        match result {
            Err(OntologyError::RootNotFound { label }) => assert_eq!(label, "Nonexistent"),
            other => panic!("expected RootNotFound, got {other:?}"),
        }
    }

    #[test]
    fn derived_labels_are_searchable() {
        let triples = parse_str(
            "<http://ex.org/onto#Leaf> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/onto#Trunk> .",
            SourceFormat::NTriples,
        )
        .unwrap();
        let index = HierarchyIndex::from_triples(&triples);

        assert_eq!(find_by_label(&index, "trunk"), Some("http://ex.org/onto#Trunk"));
    }

    #[test]
    fn shared_label_resolves_to_first_in_lookup_order() {
        let triples = parse_str(
            r#"
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            @prefix ex: <http://example.org/zoo#> .
            ex:first rdfs:label "Bird" .
            ex:second rdfs:label "bird" .
            "#,
            SourceFormat::Turtle,
        )
        .unwrap();
        let index = HierarchyIndex::from_triples(&triples);

        assert_eq!(
            find_by_label(&index, "BIRD"),
            Some("http://example.org/zoo#first")
        );
    }
}
