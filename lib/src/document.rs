//! Text rendering of constraint documents.
//!
//! The grammar itself is oxigraph's; this module only fixes the prefixes and
//! maps I/O errors. Statement order in the output follows the graph's
//! iteration order and carries no meaning, and blank node labels are not
//! stable across parses.

use crate::error::{Error, Result};
use crate::named_nodes::{EX, NEO, SH};
use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{Graph, Triple};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    #[default]
    Turtle,
    NTriples,
}

impl DocumentFormat {
    /// Format name expected by the deploy procedure.
    pub fn tag(&self) -> &'static str {
        match self {
            DocumentFormat::Turtle => "Turtle",
            DocumentFormat::NTriples => "N-Triples",
        }
    }

    fn rdf_format(&self) -> RdfFormat {
        match self {
            DocumentFormat::Turtle => RdfFormat::Turtle,
            DocumentFormat::NTriples => RdfFormat::NTriples,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

const PREFIXES: [(&str, &str); 5] = [
    ("sh", SH),
    ("neo", NEO),
    ("ex", EX),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

fn serialization_error(e: impl fmt::Display) -> Error {
    Error::Serialization(e.to_string())
}

pub fn serialize(graph: &Graph, format: DocumentFormat) -> Result<String> {
    let mut serializer = RdfSerializer::from_format(format.rdf_format());
    for (name, iri) in PREFIXES {
        serializer = serializer
            .with_prefix(name, iri)
            .map_err(serialization_error)?;
    }

    let mut writer = serializer.for_writer(Vec::new());
    for triple in graph.iter() {
        writer.serialize_triple(triple).map_err(serialization_error)?;
    }
    let buffer = writer.finish().map_err(serialization_error)?;
    String::from_utf8(buffer).map_err(serialization_error)
}

pub fn parse(text: &str, format: DocumentFormat) -> Result<Graph> {
    let mut graph = Graph::new();
    let parser = RdfParser::from_format(format.rdf_format());
    for quad in parser.for_reader(Cursor::new(text.as_bytes())) {
        let quad = quad.map_err(|e| Error::Parse(e.to_string()))?;
        graph.insert(&Triple::from(quad));
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonicalization::are_isomorphic;
    use crate::expectation::Constraint;
    use crate::shape::Shape;
    use crate::types::Value;

    fn sample() -> Shape {
        let mut shape = Shape::for_label("Person").unwrap();
        shape
            .expect(Constraint::InSet {
                property: "status".into(),
                values: vec![Value::from("active"), Value::from("inactive")],
            })
            .unwrap()
            .expect(Constraint::IncomingRelationshipCount {
                relationship: "MANAGES".into(),
                min: None,
                max: Some(1),
            })
            .unwrap();
        shape
    }

    #[test]
    fn turtle_uses_the_registered_prefixes() {
        let text = serialize(sample().graph(), DocumentFormat::Turtle).unwrap();
        assert!(text.contains("sh: <http://www.w3.org/ns/shacl#>"));
        assert!(text.contains("neo: <neo4j://graph.schema#>"));
        assert!(text.contains("Person"));
    }

    #[test]
    fn both_formats_round_trip() {
        let shape = sample();
        for format in [DocumentFormat::Turtle, DocumentFormat::NTriples] {
            let text = serialize(shape.graph(), format).unwrap();
            let parsed = parse(&text, format).unwrap();
            assert_eq!(parsed.len(), shape.len());
            assert!(are_isomorphic(&parsed, shape.graph()), "{} round trip", format);
        }
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        match parse("<a> <b> .", DocumentFormat::Turtle) {
            Err(Error::Parse(_)) => {}
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
