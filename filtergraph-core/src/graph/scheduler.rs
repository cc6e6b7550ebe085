//! Update Scheduler
//!
//! The scheduler determines the order in which filters re-run after one of
//! them changed. It ensures that a filter always runs after every filter it
//! depends on within the affected part of the graph.
//!
//! # Algorithm
//!
//! 1. Starting from the changed filter, collect every filter reachable over
//!    dependent edges (breadth first, dependents in declaration order).
//! 2. Count, for each collected filter, the incoming edges from other
//!    collected filters.
//! 3. Run Kahn's algorithm over the collected filters with a FIFO queue.
//!
//! Ties are broken by discovery order, so the result is deterministic for a
//! given registration and declaration order. The graph is expected to be
//! acyclic; [`UpdateScheduler::find_cycle`] is used at finalization to
//! guarantee that.

use std::collections::{HashMap, HashSet, VecDeque};

use super::node::{Node, NodeId};
use crate::filter::TotalKey;

/// The dependency graph of all filters in a collection.
#[derive(Debug, Default, Clone)]
pub struct UpdateScheduler {
    /// All nodes, indexed by `NodeId`.
    nodes: Vec<Node>,

    /// Lookup from filter key to node.
    index: HashMap<TotalKey, NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Done,
}

impl UpdateScheduler {
    /// Create a new empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for `key`. Adding a key twice returns the existing node.
    pub fn add_node(&mut self, key: TotalKey) -> NodeId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId::new(self.nodes.len());
        self.index.insert(key.clone(), id);
        self.nodes.push(Node::new(id, key));
        id
    }

    pub fn get_node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(node_id.index())
    }

    pub fn node_id(&self, key: &TotalKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Add an edge: `dependent` must re-run after `dependency`.
    pub fn add_edge(&mut self, dependency: NodeId, dependent: NodeId) {
        let count = self.nodes.len();
        if dependency.index() >= count || dependent.index() >= count {
            return;
        }
        self.nodes[dependency.index()].add_dependent(dependent);
        self.nodes[dependent.index()].add_dependency(dependency);
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Order in which filters re-run after `root` changed.
    ///
    /// The result starts with `root` and contains every node reachable from it.
    /// The graph must be acyclic, check with [`find_cycle`](Self::find_cycle)
    /// first. Nodes on or behind a cycle never reach in-degree zero and are
    /// left out of the order.
    pub fn update_order(&self, root: NodeId) -> Vec<NodeId> {
        let affected = self.reachable_from(root);
        self.topological_sort(&affected)
    }

    /// Find one cycle, returned closed (first node repeated at the end).
    pub fn find_cycle(&self) -> Option<Vec<NodeId>> {
        let mut state = vec![Visit::Unvisited; self.nodes.len()];

        for start in 0..self.nodes.len() {
            if state[start] != Visit::Unvisited {
                continue;
            }
            state[start] = Visit::OnPath;
            let mut stack: Vec<(NodeId, usize)> = vec![(NodeId::new(start), 0)];

            while let Some(&(node_id, edge)) = stack.last() {
                let next = self.nodes[node_id.index()].dependents().get(edge).copied();
                let Some(next) = next else {
                    state[node_id.index()] = Visit::Done;
                    stack.pop();
                    continue;
                };

                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                match state[next.index()] {
                    Visit::Unvisited => {
                        state[next.index()] = Visit::OnPath;
                        stack.push((next, 0));
                    }
                    Visit::OnPath => {
                        let from = stack.iter().position(|&(id, _)| id == next).unwrap_or(0);
                        let mut cycle: Vec<NodeId> =
                            stack[from..].iter().map(|&(id, _)| id).collect();
                        cycle.push(next);
                        return Some(cycle);
                    }
                    Visit::Done => {}
                }
            }
        }

        None
    }

    /// Collect `root` and everything reachable from it, breadth first.
    fn reachable_from(&self, root: NodeId) -> Vec<NodeId> {
        let mut reached = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        if root.index() < self.nodes.len() {
            queue.push_back(root);
        }

        while let Some(node_id) = queue.pop_front() {
            if !visited.insert(node_id) {
                continue;
            }
            reached.push(node_id);
            queue.extend(self.nodes[node_id.index()].dependents().iter().copied());
        }

        reached
    }

    /// Perform a topological sort of the given nodes.
    ///
    /// Returns nodes in order such that dependencies come before dependents.
    fn topological_sort(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        let node_set: HashSet<_> = nodes.iter().copied().collect();
        let mut in_degree: HashMap<NodeId, usize> = HashMap::new();
        let mut result = Vec::with_capacity(nodes.len());
        let mut queue = VecDeque::new();

        // Calculate in-degrees (only counting edges within the node set)
        for &node_id in nodes {
            let degree = self.nodes[node_id.index()]
                .dependencies()
                .iter()
                .filter(|d| node_set.contains(*d))
                .count();
            in_degree.insert(node_id, degree);
            if degree == 0 {
                queue.push_back(node_id);
            }
        }

        // Kahn's algorithm
        while let Some(node_id) = queue.pop_front() {
            result.push(node_id);

            for dependent_id in self.nodes[node_id.index()].dependents() {
                if let Some(degree) = in_degree.get_mut(dependent_id) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        queue.push_back(*dependent_id);
                    }
                }
            }
        }

        result
    }
}
