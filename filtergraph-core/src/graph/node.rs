//! Graph Nodes
//!
//! This module defines the node type that lives in the filter dependency graph.

use smallvec::SmallVec;

use crate::filter::TotalKey;

/// Index of a node in the dependency graph.
///
/// Ids are dense and assigned in insertion order by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Edge list of a node. Most filters have a handful of dependents at most.
pub type Edges = SmallVec<[NodeId; 4]>;

/// A filter in the dependency graph.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,

    /// The filter this node stands for.
    key: TotalKey,

    /// Nodes that must run before this one (edges pointing in).
    dependencies: Edges,

    /// Nodes that must re-run after this one, in declaration order.
    dependents: Edges,
}

impl Node {
    pub(crate) fn new(id: NodeId, key: TotalKey) -> Self {
        Self {
            id,
            key,
            dependencies: Edges::new(),
            dependents: Edges::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &TotalKey {
        &self.key
    }

    /// Add a dependency. Duplicate edges are ignored.
    pub fn add_dependency(&mut self, node_id: NodeId) {
        if !self.dependencies.contains(&node_id) {
            self.dependencies.push(node_id);
        }
    }

    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    /// Add a dependent. Duplicate edges are ignored.
    pub fn add_dependent(&mut self, node_id: NodeId) {
        if !self.dependents.contains(&node_id) {
            self.dependents.push(node_id);
        }
    }

    pub fn dependents(&self) -> &[NodeId] {
        &self.dependents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(index: usize, key: &str) -> Node {
        Node::new(NodeId::new(index), TotalKey::parse(key).unwrap())
    }

    #[test]
    fn edges_keep_insertion_order() {
        let mut n = node(0, "nodes.a");
        n.add_dependent(NodeId::new(3));
        n.add_dependent(NodeId::new(1));
        n.add_dependent(NodeId::new(2));

        assert_eq!(
            n.dependents(),
            &[NodeId::new(3), NodeId::new(1), NodeId::new(2)]
        );
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut n = node(1, "nodes.b");
        n.add_dependency(NodeId::new(0));
        n.add_dependency(NodeId::new(0));
        n.add_dependent(NodeId::new(2));
        n.add_dependent(NodeId::new(2));

        assert_eq!(n.dependencies().len(), 1);
        assert_eq!(n.dependents().len(), 1);
        assert_eq!(n.key().to_string(), "nodes.b");
        assert_eq!(n.id().index(), 1);
    }
}
