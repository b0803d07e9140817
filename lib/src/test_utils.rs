//! In-memory engine for exercising bound contexts without a database.

use crate::backend::{ValidationEngine, ValidationRecord, CHECK_GRAPH_CONFIG, CHECK_VALIDATION_MODULE, DEPLOY_SHAPES};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingError(pub String);

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Engine that answers from fixed settings and keeps every statement it was
/// asked to run.
#[derive(Debug, Clone)]
pub struct RecordingEngine {
    pub module_installed: bool,
    pub graph_config: bool,
    /// Shape count reported by deploys. `None` counts the `sh:NodeShape`
    /// subjects in the deployed document.
    pub deployed: Option<usize>,
    pub records: Vec<ValidationRecord>,
    /// When set, validation runs fail with this message.
    pub failure: Option<String>,
    pub database: Option<String>,
    pub queries: Vec<String>,
    pub documents: Vec<(String, String)>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        RecordingEngine {
            module_installed: true,
            graph_config: true,
            deployed: None,
            records: Vec::new(),
            failure: None,
            database: None,
            queries: Vec::new(),
            documents: Vec::new(),
        }
    }
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_module(mut self) -> Self {
        self.module_installed = false;
        self
    }

    pub fn without_graph_config(mut self) -> Self {
        self.graph_config = false;
        self
    }

    pub fn deploying(mut self, count: usize) -> Self {
        self.deployed = Some(count);
        self
    }

    pub fn returning(mut self, records: Vec<ValidationRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of recorded queries equal to `cypher`.
    pub fn count_of(&self, cypher: &str) -> usize {
        self.queries.iter().filter(|q| q.as_str() == cypher).count()
    }
}

impl ValidationEngine for RecordingEngine {
    type Error = RecordingError;

    fn select_database(&mut self, database: &str) -> Result<(), Self::Error> {
        self.database = Some(database.to_string());
        Ok(())
    }

    fn has_validation_module(&mut self) -> Result<bool, Self::Error> {
        self.queries.push(CHECK_VALIDATION_MODULE.to_string());
        Ok(self.module_installed)
    }

    fn has_graph_config(&mut self) -> Result<bool, Self::Error> {
        self.queries.push(CHECK_GRAPH_CONFIG.to_string());
        Ok(self.graph_config)
    }

    fn deploy_shapes(&mut self, document: &str, format_tag: &str) -> Result<usize, Self::Error> {
        self.queries.push(DEPLOY_SHAPES.to_string());
        self.documents
            .push((document.to_string(), format_tag.to_string()));
        Ok(self
            .deployed
            .unwrap_or_else(|| document.matches("NodeShape").count()))
    }

    fn run_validation(&mut self, cypher: &str) -> Result<Vec<ValidationRecord>, Self::Error> {
        self.queries.push(cypher.to_string());
        match &self.failure {
            Some(message) => Err(RecordingError(message.clone())),
            None => Ok(self.records.clone()),
        }
    }
}

/// A record as the engine would report a failed check on `focus`.
pub fn violation(focus: i64, node_type: &str, path: &str, message: &str) -> ValidationRecord {
    ValidationRecord {
        focus_node: serde_json::Value::from(focus),
        node_type: node_type.to_string(),
        property_shape: "MinInclusiveConstraintComponent".to_string(),
        offending_value: serde_json::Value::Null,
        result_path: path.to_string(),
        severity: "Violation".to_string(),
        result_message: message.to_string(),
        custom_message: None,
    }
}
