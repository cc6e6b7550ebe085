//! Filtergraph Core
//!
//! This crate manages named, interdependent filters applied to graph-like
//! objects. When one filter changes, every filter depending on it re-runs in
//! dependency order before the combined result is applied.
//!
//! It implements:
//!
//! - Gated filters with fixed or supplied predicates
//! - Filter groups sharing one target object
//! - A collection that validates cross-group dependencies at build time
//! - Dependency-ordered re-evaluation (topological sort over the affected filters)
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `filter`: keys, preconditions, predicates and the filter itself
//! - `group`: filter groups, the target trait and the group builder
//! - `graph`: the filter dependency graph and update scheduler
//! - `collection`: the registry, its builder and diagnostic snapshots
//!
//! # Example
//!
//! ```rust
//! use filtergraph_core::collection::FilterCollection;
//! use filtergraph_core::group::{shared, FilterGroup, FilteredView};
//!
//! # fn main() -> Result<(), filtergraph_core::FilterError> {
//! let view = shared(FilteredView::new(vec!["class A", "interface B", "class C"]));
//!
//! let nodes = FilterGroup::builder("nodes", view.clone())
//!     .add_fixed_filter("visibility", |_| true)
//!     .with_static_precondition(true)
//!     .add_fixed_filter("typeFilter", |n: &&str| n.starts_with("class"))
//!     .with_dependents(["nodes.visibility"])
//!     .with_dynamic_precondition(|| true)
//!     .build()?;
//!
//! let mut filters = FilterCollection::builder().add_filter_group(nodes).build()?;
//!
//! // Runs typeFilter, then visibility, then applies every group
//! filters.update_filter("nodes.typeFilter")?;
//! assert_eq!(view.lock().visible(), &["class A", "class C"]);
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod error;
pub mod filter;
pub mod graph;
pub mod group;

#[cfg(test)]
mod testing;

pub use collection::{FilterCollection, FilterCollectionBuilder};
pub use error::{FilterError, TargetError};
pub use filter::{Filter, FilterMeta, FilterPrecondition, Predicate, PredicateSlot, TotalKey};
pub use group::{FilterGroup, FilterGroupBuilder, FilterTarget};
