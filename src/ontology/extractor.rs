//! Subclass hierarchy extraction from RDF triples.

use indexmap::{IndexMap, IndexSet};
use oxrdf::vocab::rdfs;
use oxrdf::{Term, Triple};

/// In-memory subclass hierarchy of one RDF document.
///
/// All containers keep document order, so children, implicit roots and label
/// lookups enumerate the same way on every run over the same input.
#[derive(Debug, Default, Clone)]
pub struct HierarchyIndex {
    children: IndexMap<String, IndexSet<String>>,
    classes: IndexSet<String>,
    has_parent: IndexSet<String>,
    labels: IndexMap<String, String>,
}

impl HierarchyIndex {
    /// Scans triples for `rdfs:label` and `rdfs:subClassOf` statements.
    ///
    /// Only `subClassOf` statements whose object is a named node create edges;
    /// blank-node restrictions and literals are ignored. Empty labels are
    /// dropped, and classes left without a label get one derived from their URI.
    pub fn from_triples<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> Self {
        let mut index = Self::default();

        for triple in triples {
            let predicate = triple.predicate.as_ref();

            if predicate == rdfs::LABEL {
                let subject = term_text(&Term::from(triple.subject.clone()));
                let object = term_text(&triple.object);
                // An empty label counts as no label.
                if let (Some(subject), Some(object)) = (subject, object)
                    && !object.is_empty()
                {
                    index.labels.insert(subject, object);
                }
            } else if predicate == rdfs::SUB_CLASS_OF
                && let Term::NamedNode(parent) = &triple.object
                && let Some(child) = term_text(&Term::from(triple.subject.clone()))
            {
                index.add_edge(parent.as_str(), child);
            }
        }

        for class in &index.classes {
            if !index.labels.contains_key(class) {
                index
                    .labels
                    .insert(class.clone(), extract_fragment(class).to_string());
            }
        }

        tracing::debug!(
            classes = index.classes.len(),
            labels = index.labels.len(),
            roots = index.implicit_roots().count(),
            "extracted subclass hierarchy"
        );

        index
    }

    fn add_edge(&mut self, parent: &str, child: String) {
        self.classes.insert(child.clone());
        self.classes.insert(parent.to_string());
        self.has_parent.insert(child.clone());
        self.children
            .entry(parent.to_string())
            .or_default()
            .insert(child);
    }

    /// Direct subclasses of `id`, in document order.
    pub fn children_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.children
            .get(id)
            .into_iter()
            .flat_map(|children| children.iter().map(String::as_str))
    }

    /// Resolved label of `id`, explicit or derived.
    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// All `(entity, label)` pairs: explicit labels first, then derived ones.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .map(|(id, label)| (id.as_str(), label.as_str()))
    }

    /// Every entity that participates in a `subClassOf` edge.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Whether `id` is declared a subclass of anything.
    pub fn has_parent(&self, id: &str) -> bool {
        self.has_parent.contains(id)
    }

    /// Classes that are never the subject of a `subClassOf` edge.
    pub fn implicit_roots(&self) -> impl Iterator<Item = &str> {
        self.classes().filter(|class| !self.has_parent(class))
    }

    /// Number of parent-child edges.
    pub fn edge_count(&self) -> usize {
        self.children.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Plain text of a term: IRI text, blank node id or literal value.
fn term_text(term: &Term) -> Option<String> {
    match term {
        Term::NamedNode(node) => Some(node.as_str().to_string()),
        Term::BlankNode(node) => Some(node.as_str().to_string()),
        Term::Literal(literal) => Some(literal.value().to_string()),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Returns the trailing segment of a URI, used as a fallback label.
///
/// Takes the part after the last `#`, otherwise the part after the last `/`
/// once trailing slashes are removed. Falls back to the whole URI when that
/// segment is empty.
///
/// # Examples
///
/// ```
/// use ontograph::ontology::extract_fragment;
///
/// assert_eq!(extract_fragment("http://example.org/zoo#Cat"), "Cat");
/// assert_eq!(extract_fragment("http://example.org/zoo/Dog/"), "Dog");
/// assert_eq!(extract_fragment("urn:x"), "urn:x");
/// ```
pub fn extract_fragment(uri: &str) -> &str {
    let fragment = match uri.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => {
            let trimmed = uri.trim_end_matches('/');
            trimmed
                .rsplit_once('/')
                .map_or(trimmed, |(_, segment)| segment)
        }
    };

    if fragment.is_empty() { uri } else { fragment }
}
