//! Declarative suites read from JSON files.
//!
//! ```json
//! {
//!   "description": "people",
//!   "shapes": [
//!     {
//!       "label": "Person",
//!       "expectations": [
//!         { "kind": "value_range", "property": "age", "min_inclusive": 0 },
//!         { "kind": "in_set", "property": "status", "values": ["active", "inactive"] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::expectation::Expectation;
use crate::shape::Shape;
use crate::suite::Suite;
use crate::types::Target;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuiteDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub shapes: Vec<ShapeDefinition>,
}

/// One shape. `label` takes precedence over `query`; with neither the shape
/// targets every node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default)]
    pub expectations: Vec<Expectation>,
}

impl ShapeDefinition {
    pub fn target(&self) -> Target {
        Target::from_parts(self.label.as_deref(), self.query.as_deref())
    }

    pub fn into_shape(self) -> Result<Shape> {
        let mut shape = Shape::new(self.target())?;
        shape.expect_all(self.expectations)?;
        Ok(shape)
    }
}

impl SuiteDefinition {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Definition(format!("{}: {}", path.display(), e)))?;
        let definition = Self::from_json(&text)?;
        info!(
            "loaded {} shape definitions from {}",
            definition.shapes.len(),
            path.display()
        );
        Ok(definition)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds every shape, failing on the first invalid name.
    pub fn into_suite(self) -> Result<Suite> {
        let mut suite = match self.description {
            Some(description) => Suite::with_description(description),
            None => Suite::new(),
        };
        let shapes = self
            .shapes
            .into_iter()
            .map(ShapeDefinition::into_shape)
            .collect::<Result<Vec<_>>>()?;
        suite.add_expectations(shapes);
        Ok(suite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectation::Constraint;

    #[test]
    fn label_wins_over_query() {
        let definition = ShapeDefinition {
            label: Some("Person".into()),
            query: Some("n.age > 3".into()),
            expectations: vec![],
        };
        assert_eq!(definition.target(), Target::Label("Person".into()));
        assert_eq!(ShapeDefinition::default().target(), Target::All);
    }

    #[test]
    fn json_round_trips_through_the_definition() {
        let definition = SuiteDefinition {
            description: None,
            shapes: vec![ShapeDefinition {
                label: None,
                query: Some("n.age > 3".into()),
                expectations: vec![Expectation::new(Constraint::Closed {
                    ignore: vec!["id".into()],
                })
                .with_message("no extra keys")],
            }],
        };
        let json = definition.to_json().unwrap();
        assert_eq!(SuiteDefinition::from_json(&json).unwrap(), definition);
    }

    #[test]
    fn unknown_kinds_are_definition_errors() {
        let json = r#"{"shapes": [{"expectations": [{"kind": "frobnicate"}]}]}"#;
        assert!(matches!(
            SuiteDefinition::from_json(json),
            Err(Error::Definition(_))
        ));
    }

    #[test]
    fn invalid_labels_fail_the_suite() {
        let json = r#"{"shapes": [{"label": "Not a label"}]}"#;
        let definition = SuiteDefinition::from_json(json).unwrap();
        assert!(matches!(
            definition.into_suite(),
            Err(Error::InvalidLocalName { .. })
        ));
    }
}
