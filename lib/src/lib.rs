//! Compiles data-quality expectations over a property graph into SHACL
//! shapes and runs them through the n10s validation procedures.
//!
//! ```
//! use graphexpect::{Constraint, Shape, Suite};
//!
//! let mut people = Shape::for_label("Person")?;
//! people.expect(Constraint::PropertyCount {
//!     property: "name".into(),
//!     min: Some(1),
//!     max: Some(1),
//! })?;
//!
//! let mut suite = Suite::new();
//! suite.add_expectations([people]);
//! println!("{}", suite.serialise()?);
//! # Ok::<(), graphexpect::Error>(())
//! ```

mod arena;
pub mod backend;
pub mod canonicalization;
pub mod context;
pub mod definition;
pub mod document;
pub mod error;
pub mod expectation;
pub mod list;
pub mod named_nodes;
pub mod scope;
pub mod shape;
pub mod suite;
pub mod test_utils;
pub mod types;

pub use backend::{ValidationEngine, ValidationRecord};
pub use context::{BindOptions, Context};
pub use definition::{ShapeDefinition, SuiteDefinition};
pub use document::DocumentFormat;
pub use error::{Error, Result};
pub use expectation::{Constraint, Expectation};
pub use scope::{rewrite_scope_query, ResultProjection, ScopeQuery};
pub use shape::Shape;
pub use suite::Suite;
pub use types::{KeyRole, ShapeId, Target, Value};
