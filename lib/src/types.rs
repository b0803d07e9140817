use crate::named_nodes::GEO_WKT_LITERAL;
use oxigraph::model::vocab::xsd;
use oxigraph::model::{Literal, NamedNodeRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static SHAPE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

impl ShapeId {
    pub(crate) fn next() -> Self {
        ShapeId(SHAPE_SEQUENCE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape-{}", self.0)
    }
}

/// Which graph entities a shape applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Nodes carrying a label.
    Label(String),
    /// Nodes matching a Cypher predicate.
    Query(String),
    /// Every node.
    All,
}

impl Target {
    /// Picks the selector from optional constructor inputs: a non-empty label
    /// wins over a non-empty query, and neither means [`Target::All`].
    pub fn from_parts(label: Option<&str>, query: Option<&str>) -> Self {
        match (label, query) {
            (Some(l), _) if !l.is_empty() => Target::Label(l.to_string()),
            (_, Some(q)) if !q.is_empty() => Target::Query(q.to_string()),
            _ => Target::All,
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::All
    }
}

/// Datatype names understood by [`datatype_for`].
pub const RECOGNIZED_DATATYPES: [&str; 9] = [
    "string",
    "boolean",
    "float",
    "integer",
    "date",
    "datetime",
    "localdatetime",
    "time",
    "point",
];

/// Maps a property-graph type name to the datatype used in `sh:datatype`.
/// Unknown names fall back to `xsd:string`.
pub fn datatype_for(name: &str) -> NamedNodeRef<'static> {
    match name {
        "string" => xsd::STRING,
        "boolean" => xsd::BOOLEAN,
        "float" => xsd::FLOAT,
        "integer" => xsd::INTEGER,
        "date" => xsd::DATE,
        "datetime" | "localdatetime" => xsd::DATE_TIME,
        "time" => xsd::TIME,
        "point" => GEO_WKT_LITERAL,
        _ => xsd::STRING,
    }
}

/// A scalar used as a bound or as a member of a literal list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Lexical form plus a datatype name from [`RECOGNIZED_DATATYPES`],
    /// e.g. `{"value": "2020-01-01", "datatype": "date"}`.
    Typed { value: String, datatype: String },
}

impl Value {
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Value::Typed {
            value: value.into(),
            datatype: datatype.into(),
        }
    }

    pub fn to_literal(&self) -> Literal {
        match self {
            Value::Boolean(b) => Literal::from(*b),
            Value::Integer(i) => Literal::from(*i),
            Value::Float(f) => Literal::from(*f),
            Value::Text(s) => Literal::new_simple_literal(s),
            Value::Typed { value, datatype } => {
                Literal::new_typed_literal(value, datatype_for(datatype))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// How the values of a key are stored on a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    /// Values point at other entities (`sh:IRI`).
    Reference,
    /// Values are plain scalars (`sh:Literal`).
    Literal,
}
