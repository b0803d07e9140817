use oxigraph::model::{Graph, NamedNode, Term};
use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Converts an `oxigraph::model::Graph` to a `petgraph::graph::DiGraph`.
///
/// Every distinct subject and object becomes a node. All predicates linking
/// the same ordered pair of nodes are folded into one edge whose weight is
/// the sorted predicate list, so the result is never a multigraph.
pub fn oxigraph_to_petgraph(ox_graph: &Graph) -> DiGraph<Term, Vec<NamedNode>> {
    let mut pg_graph = DiGraph::<Term, Vec<NamedNode>>::new();
    let mut node_map = HashMap::<Term, NodeIndex>::new();
    let mut edges = HashMap::<(NodeIndex, NodeIndex), Vec<NamedNode>>::new();

    for triple_ref in ox_graph.iter() {
        let subject_term = Term::from(triple_ref.subject.into_owned());
        let object_term = triple_ref.object.into_owned();

        let s_node = *node_map
            .entry(subject_term.clone())
            .or_insert_with(|| pg_graph.add_node(subject_term));
        let o_node = *node_map
            .entry(object_term.clone())
            .or_insert_with(|| pg_graph.add_node(object_term));

        edges
            .entry((s_node, o_node))
            .or_default()
            .push(triple_ref.predicate.into_owned());
    }

    for ((s_node, o_node), mut predicates) in edges {
        predicates.sort();
        pg_graph.add_edge(s_node, o_node, predicates);
    }
    pg_graph
}

/// Blank nodes match any blank node; every other term must be equal.
fn node_equality(n1: &Term, n2: &Term) -> bool {
    match (n1, n2) {
        (Term::BlankNode(_), Term::BlankNode(_)) => true,
        (n1, n2) => n1 == n2,
    }
}

/// Checks if two graphs are equal up to blank node relabeling.
pub fn are_isomorphic(g1: &Graph, g2: &Graph) -> bool {
    if g1.len() != g2.len() {
        return false;
    }
    let pg1 = oxigraph_to_petgraph(g1);
    let pg2 = oxigraph_to_petgraph(g2);
    is_isomorphic_matching(&pg1, &pg2, node_equality, |e1, e2| e1 == e2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{BlankNode, Literal, NamedNodeRef, Triple};

    const P: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://ex#p");
    const Q: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://ex#q");

    fn graph(triples: &[Triple]) -> Graph {
        let mut g = Graph::new();
        for t in triples {
            g.insert(t);
        }
        g
    }

    #[test]
    fn relabeled_blank_nodes_are_isomorphic() {
        let (a, b) = (BlankNode::new_unchecked("a"), BlankNode::new_unchecked("b"));
        let (x, y) = (BlankNode::new_unchecked("x"), BlankNode::new_unchecked("y"));
        let g1 = graph(&[
            Triple::new(a.clone(), P, b.clone()),
            Triple::new(b, Q, Literal::from(1i64)),
        ]);
        let g2 = graph(&[
            Triple::new(x.clone(), P, y.clone()),
            Triple::new(y, Q, Literal::from(1i64)),
        ]);
        assert!(are_isomorphic(&g1, &g2));
    }

    #[test]
    fn literals_and_predicates_must_match() {
        let a = BlankNode::new_unchecked("a");
        let g1 = graph(&[Triple::new(a.clone(), P, Literal::from(1i64))]);
        let g2 = graph(&[Triple::new(a.clone(), P, Literal::from(2i64))]);
        let g3 = graph(&[Triple::new(a, Q, Literal::from(1i64))]);
        assert!(!are_isomorphic(&g1, &g2));
        assert!(!are_isomorphic(&g1, &g3));
    }

    #[test]
    fn parallel_predicates_are_compared_as_a_set() {
        let a = BlankNode::new_unchecked("a");
        let z = BlankNode::new_unchecked("z");
        let one = Literal::from(1i64);
        let g1 = graph(&[
            Triple::new(a.clone(), P, one.clone()),
            Triple::new(a, Q, one.clone()),
        ]);
        let g2 = graph(&[
            Triple::new(z.clone(), Q, one.clone()),
            Triple::new(z, P, one),
        ]);
        assert!(are_isomorphic(&g1, &g2));
    }
}
