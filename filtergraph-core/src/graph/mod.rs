//! Dependency Graph
//!
//! This module implements the graph that tracks which filters must re-run
//! when another filter changes.
//!
//! # Overview
//!
//! The dependency graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes represent filters, identified by their total key
//! - Edges run from a filter to each of its declared dependents
//!
//! The graph is built once when a collection is finalized. Updates then only
//! read it: the scheduler collects the part of the graph reachable from the
//! changed filter and orders it topologically.
//!
//! # Design Decisions
//!
//! 1. Nodes are stored densely and addressed by index; keys are resolved
//!    to node ids once.
//!
//! 2. Both forward (dependents) and reverse (dependencies) edges are kept,
//!    the reverse ones feed the in-degree count of Kahn's algorithm.
//!
//! 3. Edge lists preserve declaration order, which makes the update order
//!    deterministic.

mod node;
mod scheduler;

pub use node::{Node, NodeId};
pub use scheduler::UpdateScheduler;
