//! `rdf:first`/`rdf:rest` encoding shared by membership, exclusion and
//! ignored-property lists.

use crate::arena::NodeArena;
use crate::error::Result;
use crate::named_nodes::{qualify, Vocabulary};
use crate::types::Value;
use oxigraph::model::vocab::rdf;
use oxigraph::model::{BlankNode, Graph, NamedNodeRef, SubjectRef, Term, TermRef, Triple};

/// Items of an encoded list and how they become RDF terms.
#[derive(Debug, Clone, Copy)]
pub enum ListItems<'a> {
    /// Each value becomes a literal.
    Literals(&'a [Value]),
    /// Each name is qualified into the graph-schema namespace.
    SchemaNames(&'a [String]),
}

impl ListItems<'_> {
    pub fn len(&self) -> usize {
        match self {
            ListItems::Literals(values) => values.len(),
            ListItems::SchemaNames(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_terms(self) -> Result<Vec<Term>> {
        match self {
            ListItems::Literals(values) => {
                Ok(values.iter().map(|v| v.to_literal().into()).collect())
            }
            ListItems::SchemaNames(names) => names
                .iter()
                .map(|n| qualify(Vocabulary::Schema, n).map(Term::from))
                .collect(),
        }
    }
}

/// Emits `(root, predicate, C0)` followed by one chain node per item, the
/// last one closed with `rdf:nil`. An empty list emits nothing and returns
/// `None`; otherwise the head node is returned.
///
/// All items are converted before the first statement is written, so a name
/// that fails to qualify leaves `graph` untouched.
pub(crate) fn encode_list(
    graph: &mut Graph,
    arena: &mut NodeArena,
    root: &BlankNode,
    predicate: NamedNodeRef<'_>,
    items: ListItems<'_>,
) -> Result<Option<BlankNode>> {
    let terms = items.to_terms()?;
    if terms.is_empty() {
        return Ok(None);
    }

    let chain: Vec<BlankNode> = (0..terms.len()).map(|_| arena.fresh()).collect();
    graph.insert(&Triple::new(root.clone(), predicate, chain[0].clone()));

    for (i, item) in terms.into_iter().enumerate() {
        graph.insert(&Triple::new(chain[i].clone(), rdf::FIRST, item));
        let rest: Term = match chain.get(i + 1) {
            Some(next) => next.clone().into(),
            None => rdf::NIL.into_owned().into(),
        };
        graph.insert(&Triple::new(chain[i].clone(), rdf::REST, rest));
    }
    Ok(Some(chain[0].clone()))
}

/// Walks a list from its head and returns the `rdf:first` values in order.
/// Stops at `rdf:nil`, at a node without `rdf:first`, or at a literal.
pub fn read_list(graph: &Graph, head: SubjectRef<'_>) -> Vec<Term> {
    let mut items = Vec::new();
    let mut current = head;
    while current != SubjectRef::from(rdf::NIL) {
        let Some(first) = graph.object_for_subject_predicate(current, rdf::FIRST) else {
            break;
        };
        items.push(first.into_owned());
        current = match graph.object_for_subject_predicate(current, rdf::REST) {
            Some(TermRef::BlankNode(bn)) => bn.into(),
            Some(TermRef::NamedNode(nn)) => nn.into(),
            _ => break,
        };
    }
    items
}
