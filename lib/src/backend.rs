//! Boundary to the database hosting the validation procedures.
//!
//! The library never opens connections itself. Callers hand a
//! [`ValidationEngine`] to [`crate::Suite::bind`], which drives it with the
//! Cypher texts below.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns a single boolean column, true when the deploy procedure exists.
pub const CHECK_VALIDATION_MODULE: &str = "CALL dbms.procedures() YIELD name \
     WHERE name STARTS WITH 'n10s.validation.shacl.import.fetch' \
     RETURN count(name) = 1 AS shacl_installed";

/// Returns a single boolean column, true when a graph configuration node exists.
pub const CHECK_GRAPH_CONFIG: &str = "MATCH (gc:_GraphConfig) RETURN count(gc) > 0 AS present";

/// Expects `$payload` (document text) and `$format` (format tag); returns the
/// number of deployed shapes.
pub const DEPLOY_SHAPES: &str = "CALL n10s.validation.shacl.import.inline($payload, $format) \
     YIELD target RETURN count(*) AS shapes_deployed";

pub const VALIDATE_ALL: &str = "CALL n10s.validation.shacl.validate()";

/// Must follow a scope query that binds `col`.
pub const VALIDATE_SET: &str = "CALL n10s.validation.shacl.validateSet(col)";

/// One failed check reported by the validation procedures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub focus_node: serde_json::Value,
    pub node_type: String,
    /// Local name of the violated constraint component.
    pub property_shape: String,
    #[serde(default)]
    pub offending_value: serde_json::Value,
    pub result_path: String,
    /// Local name of the severity, e.g. `Violation`.
    pub severity: String,
    pub result_message: String,
    #[serde(default)]
    pub custom_message: Option<String>,
}

impl fmt::Display for ValidationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} on {}: {}",
            self.severity, self.node_type, self.result_path, self.focus_node, self.result_message
        )?;
        if let Some(custom) = &self.custom_message {
            write!(f, " ({})", custom)?;
        }
        Ok(())
    }
}

/// Minimal interface the bound context needs from a database session.
pub trait ValidationEngine {
    type Error: fmt::Display;

    /// Called once before anything else with the configured database name.
    fn select_database(&mut self, _database: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Runs [`CHECK_VALIDATION_MODULE`].
    fn has_validation_module(&mut self) -> Result<bool, Self::Error>;

    /// Runs [`CHECK_GRAPH_CONFIG`].
    fn has_graph_config(&mut self) -> Result<bool, Self::Error>;

    /// Runs [`DEPLOY_SHAPES`] with the given document and format tag.
    fn deploy_shapes(&mut self, document: &str, format_tag: &str) -> Result<usize, Self::Error>;

    /// Runs a complete validation query and decodes its rows.
    fn run_validation(&mut self, cypher: &str) -> Result<Vec<ValidationRecord>, Self::Error>;
}
