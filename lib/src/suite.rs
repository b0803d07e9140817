use crate::backend::ValidationEngine;
use crate::context::{BindOptions, Context};
use crate::document::{self, DocumentFormat};
use crate::error::Result;
use crate::shape::Shape;
use crate::types::ShapeId;
use log::debug;
use oxigraph::model::{Graph, TripleRef};

/// Union of the statements of several shapes, ready to be deployed as one
/// document.
///
/// Shapes are moved in, so nothing can keep declaring on a shape once its
/// statements have been copied into the suite.
#[derive(Debug, Default)]
pub struct Suite {
    description: Option<String>,
    graph: Graph,
    shapes: Vec<Shape>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(description: impl Into<String>) -> Self {
        Suite {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn add_expectations(&mut self, shapes: impl IntoIterator<Item = Shape>) -> &mut Self {
        for shape in shapes {
            let before = self.graph.len();
            for triple in shape.graph().iter() {
                self.graph.insert(triple);
            }
            debug!(
                "{} added {} statements to the suite",
                shape.id(),
                self.graph.len() - before
            );
            self.shapes.push(shape);
        }
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Shapes that contributed `triple`, in the order they were added.
    pub fn provenance(&self, triple: TripleRef<'_>) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|shape| shape.graph().contains(triple))
            .map(Shape::id)
            .collect()
    }

    pub fn serialize(&self, format: DocumentFormat) -> Result<String> {
        document::serialize(&self.graph, format)
    }

    pub fn serialise(&self) -> Result<String> {
        self.serialize(DocumentFormat::Turtle)
    }

    /// Triple count header followed by the Turtle rendering.
    pub fn summary(&self) -> Result<String> {
        Ok(format!(
            "Expectations in this Suite include {} triples:\n{}",
            self.graph.len(),
            self.serialise()?
        ))
    }

    /// Deploys the suite through `engine` and returns a context for running
    /// validations against it.
    pub fn bind<E: ValidationEngine>(&self, engine: E, options: BindOptions) -> Result<Context<E>> {
        Context::bind(self, engine, options)
    }
}
