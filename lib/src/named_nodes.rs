//! Vocabulary registry: the three namespaces a suite writes into, the fixed
//! SHACL terms, and the one constructor for qualified references.

use crate::error::{Error, Result};
use oxigraph::model::{NamedNode, NamedNodeRef};
use std::fmt;

pub const SH: &str = "http://www.w3.org/ns/shacl#";
pub const NEO: &str = "neo4j://graph.schema#";
pub const EX: &str = "http://ex#";

pub const GEO_WKT_LITERAL: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.opengis.net/ont/geosparql#wktLiteral");

/// SHACL terms emitted by the shape builder.
pub mod sh {
    use oxigraph::model::NamedNodeRef;

    pub const NODE_SHAPE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#NodeShape");
    pub const PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#property");
    pub const PATH: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#path");
    pub const INVERSE_PATH: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#inversePath");

    pub const TARGET_CLASS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#targetClass");
    // not part of SHACL core; n10s reads it as a Cypher predicate
    pub const TARGET_QUERY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#targetQuery");

    pub const MIN_EXCLUSIVE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minExclusive");
    pub const MIN_INCLUSIVE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minInclusive");
    pub const MAX_EXCLUSIVE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxExclusive");
    pub const MAX_INCLUSIVE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxInclusive");
    pub const MIN_COUNT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minCount");
    pub const MAX_COUNT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxCount");
    pub const MIN_LENGTH: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minLength");
    pub const MAX_LENGTH: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxLength");
    pub const PATTERN: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#pattern");
    pub const DATATYPE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#datatype");
    pub const CLASS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#class");
    pub const IN: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#in");
    pub const NOT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#not");

    pub const NODE_KIND: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#nodeKind");
    pub const IRI: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#IRI");
    pub const LITERAL: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#Literal");

    pub const CLOSED: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#closed");
    pub const IGNORED_PROPERTIES: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#ignoredProperties");

    pub const SEVERITY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#severity");
    pub const MESSAGE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#message");
}

/// Namespaces local names can be qualified into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    /// SHACL itself; severities are qualified here.
    Constraint,
    /// Labels, property keys and relationship types of the property graph.
    Schema,
    User,
}

impl Vocabulary {
    pub fn namespace(&self) -> &'static str {
        match self {
            Vocabulary::Constraint => SH,
            Vocabulary::Schema => NEO,
            Vocabulary::User => EX,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Vocabulary::Constraint => "sh",
            Vocabulary::Schema => "neo",
            Vocabulary::User => "ex",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

fn is_forbidden(c: char) -> bool {
    c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

/// Qualifies `local_name` into `vocabulary`.
///
/// The name must be non-empty and must form a valid IRI once appended to the
/// namespace; anything else is rejected with [`Error::InvalidLocalName`].
pub fn qualify(vocabulary: Vocabulary, local_name: &str) -> Result<NamedNode> {
    let invalid = || Error::InvalidLocalName {
        vocabulary,
        name: local_name.to_string(),
    };
    if local_name.is_empty() || local_name.chars().any(is_forbidden) {
        return Err(invalid());
    }
    NamedNode::new(format!("{}{}", vocabulary.namespace(), local_name)).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifies_into_each_namespace() {
        assert_eq!(
            qualify(Vocabulary::Schema, "Person").unwrap().as_str(),
            "neo4j://graph.schema#Person"
        );
        assert_eq!(
            qualify(Vocabulary::Constraint, "Warning").unwrap().as_ref(),
            NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#Warning")
        );
        assert_eq!(qualify(Vocabulary::User, "x").unwrap().as_str(), "http://ex#x");
    }

    #[test]
    fn rejects_names_that_break_the_iri() {
        for name in ["", "first name", "a<b", "tab\there", "quote\""] {
            match qualify(Vocabulary::Schema, name) {
                Err(Error::InvalidLocalName { vocabulary, .. }) => {
                    assert_eq!(vocabulary, Vocabulary::Schema)
                }
                other => panic!("expected InvalidLocalName for {:?}, got {:?}", name, other),
            }
        }
    }
}
