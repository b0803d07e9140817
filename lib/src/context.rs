use crate::backend::{ValidationEngine, ValidationRecord, VALIDATE_ALL, VALIDATE_SET};
use crate::document::DocumentFormat;
use crate::error::{Error, Result};
use crate::scope::{rewrite_scope_query, ResultProjection};
use crate::suite::Suite;
use log::{debug, info, warn};

pub const DEFAULT_DATABASE: &str = "neo4j";

/// Settings used when deploying a suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    format: DocumentFormat,
    database: String,
}

impl Default for BindOptions {
    fn default() -> Self {
        BindOptions {
            format: DocumentFormat::Turtle,
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

fn engine_error(e: impl std::fmt::Display) -> Error {
    Error::Engine(e.to_string())
}

/// A suite deployed to an engine.
///
/// The result projection is chosen once, when the context is bound.
pub struct Context<E: ValidationEngine> {
    engine: E,
    options: BindOptions,
    projection: ResultProjection,
    deployed: usize,
}

impl<E: ValidationEngine> Context<E> {
    pub(crate) fn bind(suite: &Suite, mut engine: E, options: BindOptions) -> Result<Self> {
        engine
            .select_database(options.database())
            .map_err(engine_error)?;
        if !engine.has_validation_module().map_err(engine_error)? {
            return Err(Error::MissingValidationModule);
        }

        let document = suite.serialize(options.format())?;
        let deployed = engine
            .deploy_shapes(&document, options.format().tag())
            .map_err(engine_error)?;
        if deployed == 0 {
            return Err(Error::DeploymentFailed {
                deployed,
                triples: suite.len(),
            });
        }
        if deployed < suite.shapes().len() {
            warn!(
                "deployed {} shapes but the suite declares {}",
                deployed,
                suite.shapes().len()
            );
        }

        let projection =
            ResultProjection::for_graph_config(engine.has_graph_config().map_err(engine_error)?);
        info!(
            "bound {} shapes ({} triples) to database {} using {:?} projection",
            deployed,
            suite.len(),
            options.database(),
            projection
        );
        Ok(Context {
            engine,
            options,
            projection,
            deployed,
        })
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    pub fn projection(&self) -> ResultProjection {
        self.projection
    }

    /// Shape count reported by the deploy procedure.
    pub fn deployed(&self) -> usize {
        self.deployed
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Validates every node in the database against the deployed shapes.
    pub fn run(&mut self) -> Result<Vec<ValidationRecord>> {
        let cypher = format!("{}\n{}", VALIDATE_ALL, self.projection.cypher());
        self.execute(&cypher)
    }

    /// Validates only the nodes returned by `query`.
    pub fn run_on_subset(&mut self, query: &str) -> Result<Vec<ValidationRecord>> {
        let scope = rewrite_scope_query(query)?;
        let cypher = format!("{}\n{}\n{}", scope, VALIDATE_SET, self.projection.cypher());
        self.execute(&cypher)
    }

    fn execute(&mut self, cypher: &str) -> Result<Vec<ValidationRecord>> {
        debug!("running validation:\n{}", cypher);
        let records = self.engine.run_validation(cypher).map_err(engine_error)?;
        info!("validation returned {} records", records.len());
        Ok(records)
    }
}
