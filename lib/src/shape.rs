use crate::arena::NodeArena;
use crate::document::{self, DocumentFormat};
use crate::error::Result;
use crate::expectation::{Constraint, Expectation};
use crate::list::{encode_list, ListItems};
use crate::named_nodes::{qualify, sh, Vocabulary};
use crate::types::{datatype_for, KeyRole, ShapeId, Target, Value};
use log::{debug, trace};
use oxigraph::model::vocab::{rdf, xsd};
use oxigraph::model::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Term, Triple};

/// The set of constraints declared for one target selector.
///
/// A shape never seals: every call to [`Shape::expect`] appends statements,
/// and repeating a declaration simply adds another property constraint.
/// Statements are rooted at one blank node and all anonymous nodes come from
/// the shape's own arena.
#[derive(Debug)]
pub struct Shape {
    id: ShapeId,
    node: BlankNode,
    target: Target,
    graph: Graph,
    arena: NodeArena,
}

enum PathSpec<'a> {
    Direct(&'a str),
    Inverse(&'a str),
    NodeType,
}

impl Shape {
    pub fn new(target: Target) -> Result<Self> {
        let id = ShapeId::next();
        let mut arena = NodeArena::new(id);
        let node = arena.fresh();

        let target_statement = match &target {
            Target::Label(label) => Triple::new(
                node.clone(),
                sh::TARGET_CLASS,
                qualify(Vocabulary::Schema, label)?,
            ),
            Target::Query(query) => Triple::new(
                node.clone(),
                sh::TARGET_QUERY,
                Literal::new_simple_literal(query),
            ),
            Target::All => Triple::new(
                node.clone(),
                sh::TARGET_QUERY,
                Literal::new_simple_literal("true"),
            ),
        };

        let mut graph = Graph::new();
        graph.insert(&Triple::new(node.clone(), rdf::TYPE, sh::NODE_SHAPE.into_owned()));
        graph.insert(&target_statement);
        debug!("{}: created for {:?}", id, target);

        Ok(Shape {
            id,
            node,
            target,
            graph,
            arena,
        })
    }

    /// Shape for nodes carrying `label`. An empty label targets every node.
    pub fn for_label(label: &str) -> Result<Self> {
        Self::new(Target::from_parts(Some(label), None))
    }

    /// Shape for nodes matching `query`. An empty query targets every node.
    pub fn for_query(query: &str) -> Result<Self> {
        Self::new(Target::from_parts(None, Some(query)))
    }

    pub fn for_all() -> Result<Self> {
        Self::new(Target::All)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// The blank node all statements of this shape hang from.
    pub fn node(&self) -> &BlankNode {
        &self.node
    }

    pub fn target(&self) -> &Target {
        &self.target
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

    /// Number of anonymous nodes allocated so far, the shape node included.
    pub fn anonymous_nodes(&self) -> u64 {
        self.arena.allocated()
    }

    /// Applies one declaration.
    ///
    /// Declarations missing a required input (an empty property name, no
    /// bound, an empty list) are skipped without touching the statement set.
    /// A name that cannot be qualified fails the whole declaration, again
    /// without partial statements.
    pub fn expect(&mut self, expectation: impl Into<Expectation>) -> Result<&mut Self> {
        let expectation = expectation.into();
        if !has_required_inputs(&expectation.constraint) {
            debug!(
                "{}: skipping declaration with missing inputs: {:?}",
                self.id, expectation.constraint
            );
            return Ok(self);
        }

        let mut staged = Graph::new();
        Emitter {
            graph: &mut staged,
            arena: &mut self.arena,
            shape: &self.node,
        }
        .emit(&expectation)?;

        trace!("{}: {} statements staged", self.id, staged.len());
        for triple in staged.iter() {
            self.graph.insert(triple);
        }
        Ok(self)
    }

    /// Applies each declaration in order, stopping at the first error.
    pub fn expect_all(
        &mut self,
        expectations: impl IntoIterator<Item = Expectation>,
    ) -> Result<&mut Self> {
        for expectation in expectations {
            self.expect(expectation)?;
        }
        Ok(self)
    }

    pub fn serialise(&self) -> Result<String> {
        document::serialize(&self.graph, DocumentFormat::Turtle)
    }

    /// Triple count header followed by the Turtle rendering.
    pub fn summary(&self) -> Result<String> {
        Ok(format!(
            "Expectations in this Set contain {} triples\n{}",
            self.graph.len(),
            self.serialise()?
        ))
    }
}

fn present(name: &str) -> bool {
    !name.is_empty()
}

fn has_required_inputs(constraint: &Constraint) -> bool {
    match constraint {
        Constraint::ValueRange {
            property,
            min_exclusive,
            min_inclusive,
            max_exclusive,
            max_inclusive,
        } => {
            present(property)
                && (min_exclusive.is_some()
                    || min_inclusive.is_some()
                    || max_exclusive.is_some()
                    || max_inclusive.is_some())
        }
        Constraint::Datatype { property, datatype } => present(property) && present(datatype),
        Constraint::OutgoingRelationshipCount {
            relationship: name,
            min,
            max,
        }
        | Constraint::IncomingRelationshipCount {
            relationship: name,
            min,
            max,
        }
        | Constraint::PropertyCount {
            property: name,
            min,
            max,
        }
        | Constraint::StringLength {
            property: name,
            min,
            max,
        } => present(name) && (min.is_some() || max.is_some()),
        Constraint::InSet { property, values } | Constraint::NotInSet { property, values } => {
            present(property) && !values.is_empty()
        }
        Constraint::Pattern { property, regex } => present(property) && present(regex),
        Constraint::RelationshipTarget {
            relationship,
            node_type,
        } => present(relationship) && present(node_type),
        Constraint::RelationshipTargetIn {
            relationship,
            node_types,
        }
        | Constraint::RelationshipTargetNotIn {
            relationship,
            node_types,
        } => present(relationship) && !node_types.is_empty(),
        Constraint::NodeTypesIn { types } | Constraint::NodeTypesNotIn { types } => {
            !types.is_empty()
        }
        Constraint::Closed { .. } => true,
        Constraint::KeyRole { key, .. } => present(key),
    }
}

fn count_literal(n: u64) -> Literal {
    Literal::new_typed_literal(n.to_string(), xsd::INTEGER)
}

#[derive(Clone, Copy)]
struct Annotations<'e> {
    severity: Option<&'e str>,
    message: Option<&'e str>,
}

struct Emitter<'a> {
    graph: &'a mut Graph,
    arena: &'a mut NodeArena,
    shape: &'a BlankNode,
}

impl Emitter<'_> {
    fn add(&mut self, subject: &BlankNode, predicate: NamedNodeRef<'_>, object: impl Into<Term>) {
        self.graph
            .insert(&Triple::new(subject.clone(), predicate, object.into()));
    }

    fn emit(&mut self, expectation: &Expectation) -> Result<()> {
        let notes = Annotations {
            severity: expectation.severity.as_deref().filter(|s| !s.is_empty()),
            message: expectation.message.as_deref().filter(|m| !m.is_empty()),
        };

        match &expectation.constraint {
            Constraint::ValueRange {
                property,
                min_exclusive,
                min_inclusive,
                max_exclusive,
                max_inclusive,
            } => {
                let pc = self.property_constraint(PathSpec::Direct(property), notes)?;
                let lower = pick_bound(
                    (sh::MIN_EXCLUSIVE, min_exclusive),
                    (sh::MIN_INCLUSIVE, min_inclusive),
                );
                let upper = pick_bound(
                    (sh::MAX_EXCLUSIVE, max_exclusive),
                    (sh::MAX_INCLUSIVE, max_inclusive),
                );
                for (predicate, value) in lower.into_iter().chain(upper) {
                    self.add(&pc, predicate, value.to_literal());
                }
            }
            Constraint::Datatype { property, datatype } => {
                let pc = self.property_constraint(PathSpec::Direct(property), notes)?;
                self.add(&pc, sh::DATATYPE, datatype_for(datatype).into_owned());
            }
            Constraint::OutgoingRelationshipCount {
                relationship,
                min,
                max,
            } => {
                let pc = self.property_constraint(PathSpec::Direct(relationship), notes)?;
                self.counts(&pc, (sh::MIN_COUNT, *min), (sh::MAX_COUNT, *max));
            }
            Constraint::IncomingRelationshipCount {
                relationship,
                min,
                max,
            } => {
                let pc = self.property_constraint(PathSpec::Inverse(relationship), notes)?;
                self.counts(&pc, (sh::MIN_COUNT, *min), (sh::MAX_COUNT, *max));
            }
            Constraint::PropertyCount { property, min, max } => {
                let pc = self.property_constraint(PathSpec::Direct(property), notes)?;
                self.counts(&pc, (sh::MIN_COUNT, *min), (sh::MAX_COUNT, *max));
            }
            Constraint::StringLength { property, min, max } => {
                let pc = self.property_constraint(PathSpec::Direct(property), notes)?;
                self.counts(&pc, (sh::MIN_LENGTH, *min), (sh::MAX_LENGTH, *max));
            }
            Constraint::InSet { property, values } => {
                let pc = self.property_constraint(PathSpec::Direct(property), notes)?;
                self.members(&pc, ListItems::Literals(values), false)?;
            }
            Constraint::NotInSet { property, values } => {
                let pc = self.property_constraint(PathSpec::Direct(property), notes)?;
                self.members(&pc, ListItems::Literals(values), true)?;
            }
            Constraint::Pattern { property, regex } => {
                let pc = self.property_constraint(PathSpec::Direct(property), notes)?;
                self.add(&pc, sh::PATTERN, Literal::new_simple_literal(regex));
            }
            Constraint::RelationshipTarget {
                relationship,
                node_type,
            } => {
                let class = qualify(Vocabulary::Schema, node_type)?;
                let pc = self.property_constraint(PathSpec::Direct(relationship), notes)?;
                self.add(&pc, sh::CLASS, class);
            }
            Constraint::RelationshipTargetIn {
                relationship,
                node_types,
            } => {
                let pc = self.property_constraint(PathSpec::Direct(relationship), notes)?;
                self.members(&pc, ListItems::SchemaNames(node_types), false)?;
            }
            Constraint::RelationshipTargetNotIn {
                relationship,
                node_types,
            } => {
                let pc = self.property_constraint(PathSpec::Direct(relationship), notes)?;
                self.members(&pc, ListItems::SchemaNames(node_types), true)?;
            }
            Constraint::NodeTypesIn { types } => {
                let pc = self.property_constraint(PathSpec::NodeType, notes)?;
                self.members(&pc, ListItems::SchemaNames(types), false)?;
            }
            Constraint::NodeTypesNotIn { types } => {
                let pc = self.property_constraint(PathSpec::NodeType, notes)?;
                self.members(&pc, ListItems::SchemaNames(types), true)?;
            }
            Constraint::Closed { ignore } => {
                let shape = self.shape.clone();
                self.add(&shape, sh::CLOSED, Literal::from(true));
                encode_list(
                    self.graph,
                    self.arena,
                    &shape,
                    sh::IGNORED_PROPERTIES,
                    ListItems::SchemaNames(ignore),
                )?;
            }
            Constraint::KeyRole { key, role } => {
                let pc = self.property_constraint(PathSpec::Direct(key), notes)?;
                let kind = match role {
                    KeyRole::Reference => sh::IRI,
                    KeyRole::Literal => sh::LITERAL,
                };
                self.add(&pc, sh::NODE_KIND, kind.into_owned());
            }
        }
        Ok(())
    }

    /// Links a new property constraint to the shape and gives it a path and
    /// the optional severity and message. Facets are added by the caller.
    fn property_constraint(&mut self, path: PathSpec<'_>, notes: Annotations<'_>) -> Result<BlankNode> {
        let severity = notes
            .severity
            .map(|s| qualify(Vocabulary::Constraint, s))
            .transpose()?;
        let pc = self.arena.fresh();
        let shape = self.shape.clone();
        self.add(&shape, sh::PROPERTY, pc.clone());

        match path {
            PathSpec::Direct(name) => {
                let target: NamedNode = qualify(Vocabulary::Schema, name)?;
                self.add(&pc, sh::PATH, target);
            }
            PathSpec::Inverse(name) => {
                let target: NamedNode = qualify(Vocabulary::Schema, name)?;
                let wrapper = self.arena.fresh();
                self.add(&pc, sh::PATH, wrapper.clone());
                self.add(&wrapper, sh::INVERSE_PATH, target);
            }
            PathSpec::NodeType => self.add(&pc, sh::PATH, rdf::TYPE.into_owned()),
        }

        if let Some(severity) = severity {
            self.add(&pc, sh::SEVERITY, severity);
        }
        if let Some(message) = notes.message {
            self.add(&pc, sh::MESSAGE, Literal::new_simple_literal(message));
        }
        Ok(pc)
    }

    fn counts(
        &mut self,
        pc: &BlankNode,
        min: (NamedNodeRef<'static>, Option<u64>),
        max: (NamedNodeRef<'static>, Option<u64>),
    ) {
        for (predicate, bound) in [min, max] {
            if let Some(n) = bound {
                self.add(pc, predicate, count_literal(n));
            }
        }
    }

    /// `sh:in` list on the property constraint, or, when `negated`, on a
    /// wrapper node reached through `sh:not`.
    fn members(&mut self, pc: &BlankNode, items: ListItems<'_>, negated: bool) -> Result<()> {
        let root = if negated {
            let wrapper = self.arena.fresh();
            self.add(pc, sh::NOT, wrapper.clone());
            wrapper
        } else {
            pc.clone()
        };
        encode_list(self.graph, self.arena, &root, sh::IN, items)?;
        Ok(())
    }
}

fn pick_bound<'v>(
    exclusive: (NamedNodeRef<'static>, &'v Option<Value>),
    inclusive: (NamedNodeRef<'static>, &'v Option<Value>),
) -> Option<(NamedNodeRef<'static>, &'v Value)> {
    match (exclusive, inclusive) {
        ((predicate, Some(value)), _) => Some((predicate, value)),
        (_, (predicate, Some(value))) => Some((predicate, value)),
        _ => None,
    }
}
