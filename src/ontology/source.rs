//! Reading RDF documents from disk or memory.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use oxrdf::Triple;
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};

use super::OntologyError;

/// Serialization formats accepted as ontology sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Turtle,
    /// RDF/XML, the usual serialization of `.owl` files.
    RdfXml,
    NTriples,
}

impl SourceFormat {
    /// Detects the format from a file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use ontograph::ontology::SourceFormat;
    ///
    /// assert_eq!(SourceFormat::from_path(Path::new("pizza.owl")).unwrap(), SourceFormat::RdfXml);
    /// assert_eq!(SourceFormat::from_path(Path::new("zoo.TTL")).unwrap(), SourceFormat::Turtle);
    /// assert!(SourceFormat::from_path(Path::new("notes.txt")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self, OntologyError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "ttl" | "turtle" => Ok(Self::Turtle),
            "owl" | "rdf" | "xml" => Ok(Self::RdfXml),
            "nt" => Ok(Self::NTriples),
            _ => Err(OntologyError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn rdf_format(self) -> RdfFormat {
        match self {
            Self::Turtle => RdfFormat::Turtle,
            Self::RdfXml => RdfFormat::RdfXml,
            Self::NTriples => RdfFormat::NTriples,
        }
    }
}

/// Reads every triple of the document at `path`.
///
/// The format is detected from the extension; RDF/XML is parsed directly,
/// which is equivalent to normalizing it to Turtle first.
pub fn read_triples(path: &Path) -> Result<Vec<Triple>, OntologyError> {
    let format = SourceFormat::from_path(path)?;
    let file = File::open(path).map_err(|source| OntologyError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let triples = parse_reader(BufReader::new(file), format)?;
    tracing::debug!(path = %path.display(), ?format, triples = triples.len(), "parsed ontology source");
    Ok(triples)
}

/// Parses an in-memory document.
pub fn parse_str(content: &str, format: SourceFormat) -> Result<Vec<Triple>, OntologyError> {
    parse_reader(content.as_bytes(), format)
}

fn parse_reader(reader: impl Read, format: SourceFormat) -> Result<Vec<Triple>, OntologyError> {
    RdfParser::from_format(format.rdf_format())
        .for_reader(reader)
        .map(|quad| quad.map(Triple::from).map_err(OntologyError::Parse))
        .collect()
}

/// Re-serializes the document at `path` as Turtle into `writer`.
///
/// Returns the writer once the output has been flushed.
pub fn normalize_to_turtle<W: Write>(path: &Path, writer: W) -> Result<W, OntologyError> {
    let triples = read_triples(path)?;
    write_turtle(&triples, writer)
}

/// Serializes triples as Turtle into `writer`.
pub fn write_turtle<W: Write>(triples: &[Triple], writer: W) -> Result<W, OntologyError> {
    let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle).for_writer(writer);
    for triple in triples {
        serializer
            .serialize_triple(triple)
            .map_err(OntologyError::Serialize)?;
    }
    serializer.finish().map_err(OntologyError::Serialize)
}
