//! One tagged variant per kind of declaration a shape accepts.
//!
//! Variants carry only the fields their facet needs. Empty names, empty
//! lists and absent bounds are tolerated here and turn the declaration into
//! a no-op when it is applied to a shape.

use crate::types::{KeyRole, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Property values lie within bounds. On each side an exclusive bound
    /// takes precedence over an inclusive one.
    ValueRange {
        property: String,
        #[serde(default)]
        min_exclusive: Option<Value>,
        #[serde(default)]
        min_inclusive: Option<Value>,
        #[serde(default)]
        max_exclusive: Option<Value>,
        #[serde(default)]
        max_inclusive: Option<Value>,
    },
    Datatype {
        property: String,
        datatype: String,
    },
    OutgoingRelationshipCount {
        relationship: String,
        #[serde(default)]
        min: Option<u64>,
        #[serde(default)]
        max: Option<u64>,
    },
    IncomingRelationshipCount {
        relationship: String,
        #[serde(default)]
        min: Option<u64>,
        #[serde(default)]
        max: Option<u64>,
    },
    PropertyCount {
        property: String,
        #[serde(default)]
        min: Option<u64>,
        #[serde(default)]
        max: Option<u64>,
    },
    InSet {
        property: String,
        values: Vec<Value>,
    },
    NotInSet {
        property: String,
        values: Vec<Value>,
    },
    StringLength {
        property: String,
        #[serde(default)]
        min: Option<u64>,
        #[serde(default)]
        max: Option<u64>,
    },
    Pattern {
        property: String,
        regex: String,
    },
    RelationshipTarget {
        relationship: String,
        node_type: String,
    },
    RelationshipTargetIn {
        relationship: String,
        node_types: Vec<String>,
    },
    RelationshipTargetNotIn {
        relationship: String,
        node_types: Vec<String>,
    },
    NodeTypesIn {
        types: Vec<String>,
    },
    NodeTypesNotIn {
        types: Vec<String>,
    },
    /// No properties or relationships beyond the declared ones, except the
    /// ignored ones.
    Closed {
        #[serde(default)]
        ignore: Vec<String>,
    },
    KeyRole {
        key: String,
        role: KeyRole,
    },
}

/// A constraint plus the annotations attached to its property constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    #[serde(flatten)]
    pub constraint: Constraint,
    /// Local name in the SHACL namespace, e.g. `Warning`. Not validated
    /// against the SHACL severities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Expectation {
    pub fn new(constraint: Constraint) -> Self {
        Expectation {
            constraint,
            severity: None,
            message: None,
        }
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<Constraint> for Expectation {
    fn from(constraint: Constraint) -> Self {
        Expectation::new(constraint)
    }
}
