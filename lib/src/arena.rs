use crate::types::ShapeId;
use oxigraph::model::BlankNode;

/// Allocates the anonymous nodes of one shape.
///
/// Labels are `s{shape}n{counter}`: the shape id is process-unique and the
/// counter is monotonic, so nodes from different shapes never collide when
/// their statements are unioned into a suite.
#[derive(Debug)]
pub(crate) struct NodeArena {
    scope: ShapeId,
    next_id: u64,
}

impl NodeArena {
    pub(crate) fn new(scope: ShapeId) -> Self {
        Self { scope, next_id: 0 }
    }

    pub(crate) fn fresh(&mut self) -> BlankNode {
        let id = self.next_id;
        self.next_id += 1;
        BlankNode::new_unchecked(format!("s{}n{}", self.scope.0, id))
    }

    /// Number of nodes handed out so far.
    pub(crate) fn allocated(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_distinct_within_and_across_arenas() {
        let mut a = NodeArena::new(ShapeId(1));
        let mut b = NodeArena::new(ShapeId(2));
        let a0 = a.fresh();
        let a1 = a.fresh();
        let b0 = b.fresh();
        assert_ne!(a0, a1);
        assert_ne!(a0, b0);
        assert_eq!(a.allocated(), 2);
        assert_eq!(b.allocated(), 1);
    }
}
