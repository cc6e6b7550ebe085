//! Filter Collection
//!
//! The top-level registry of filter groups. It validates the declared
//! dependencies across groups, builds the dependency graph once, and re-runs
//! filters in dependency order when one of them changes.
//!
//! # Lifecycle
//!
//! 1. Groups are registered with [`FilterCollection::add_filter_group`].
//! 2. [`FilterCollection::finish_creation`] validates every dependent key,
//!    rejects cycles, builds the graph and stages the neutral predicate for
//!    every filter (the baseline).
//! 3. [`FilterCollection::update_filter`] re-runs the changed filter and
//!    everything depending on it, then applies all groups.
//!
//! Registering a group after finalization drops the graph; the collection
//! has to be finalized again before the next update.

mod builder;
mod snapshot;

pub use builder::FilterCollectionBuilder;
pub use snapshot::{CollectionSnapshot, FilterSnapshot, GroupSnapshot};

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::FilterError;
use crate::filter::{FilterMeta, GroupKey, Predicate, TotalKey};
use crate::graph::UpdateScheduler;
use crate::group::{DynFilterGroup, FilterGroup, FilterTarget};

/// Registry of filter groups with dependency-ordered updates.
#[derive(Default)]
pub struct FilterCollection {
    groups: IndexMap<GroupKey, Box<dyn DynFilterGroup>>,

    /// Built by `finish_creation`; `None` while the collection is open.
    scheduler: Option<UpdateScheduler>,
}

impl FilterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FilterCollectionBuilder {
        FilterCollectionBuilder::new()
    }

    /// Register a group. A group with the same key is replaced (last write wins).
    pub fn add_filter_group<T: FilterTarget>(&mut self, group: FilterGroup<T>) {
        self.add_dyn_filter_group(Box::new(group));
    }

    /// Register an already type-erased group.
    pub fn add_dyn_filter_group(&mut self, group: Box<dyn DynFilterGroup>) {
        if self.scheduler.take().is_some() {
            debug!(group = %group.key(), "group added after finalization, graph dropped");
        }
        self.groups.insert(group.key().clone(), group);
    }

    pub fn group_keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    /// Typed access to a group. `None` if the key is unknown or `T` does not match.
    pub fn group<T: FilterTarget>(&self, key: &str) -> Option<&FilterGroup<T>> {
        self.groups
            .get(key)
            .and_then(|group| group.as_any().downcast_ref::<FilterGroup<T>>())
    }

    /// Look up a filter by its `group.filter` key.
    pub fn get_filter(&self, total_key: &str) -> Result<&dyn FilterMeta, FilterError> {
        let key = TotalKey::parse(total_key)?;
        let group = self
            .groups
            .get(key.group().as_str())
            .ok_or_else(|| FilterError::GroupNotFound(key.group().to_string()))?;
        group
            .filter_meta(key.filter().as_str())
            .ok_or_else(|| FilterError::NotFound(key.to_string()))
    }

    pub fn is_finalized(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Validate dependencies, build the graph and establish the baseline.
    ///
    /// Fails on the first dependent key that does not resolve to a registered
    /// filter, or if the dependencies contain a cycle. Nothing is staged on
    /// any target in either case.
    pub fn finish_creation(&mut self) -> Result<(), FilterError> {
        self.scheduler = None;

        for group in self.groups.values() {
            for filter in group.filter_metas() {
                for dependent in filter.dependent_filter_keys() {
                    if self.lookup(dependent).is_none() {
                        return Err(FilterError::InvalidDependencies {
                            filter: TotalKey::new(group.key().clone(), filter.key().clone()),
                            dependent: dependent.clone(),
                        });
                    }
                }
            }
        }

        let scheduler = self.build_scheduler();
        if let Some(cycle) = scheduler.find_cycle() {
            let cycle = cycle
                .into_iter()
                .filter_map(|id| scheduler.get_node(id))
                .map(|node| node.key().clone())
                .collect();
            return Err(FilterError::DependencyCycle { cycle });
        }

        for group in self.groups.values() {
            for filter in group.filter_metas() {
                group.init_filter(filter.key().as_str())?;
            }
        }

        debug!(
            groups = self.groups.len(),
            filters = scheduler.node_count(),
            "filter collection finalized"
        );
        self.scheduler = Some(scheduler);
        Ok(())
    }

    /// Re-run `total_key` and every filter depending on it, then apply all groups.
    ///
    /// Returns the filters in the order they were run. Takes `&mut self` so
    /// that updates on one collection never overlap. A failing target leaves
    /// the update partially applied.
    pub fn update_filter(&mut self, total_key: &str) -> Result<Vec<TotalKey>, FilterError> {
        let key = TotalKey::parse(total_key)?;
        let scheduler = self.scheduler.as_ref().ok_or(FilterError::NotFinalized)?;
        let root = scheduler
            .node_id(&key)
            .ok_or_else(|| FilterError::NotFound(key.to_string()))?;

        let order: Vec<TotalKey> = scheduler
            .update_order(root)
            .into_iter()
            .filter_map(|id| scheduler.get_node(id))
            .map(|node| node.key().clone())
            .collect();
        debug!(filter = %key, affected = order.len(), "updating filter");

        for filter in &order {
            trace!(filter = %filter, "re-running filter");
            self.group_of(filter)?.run_filter(filter.filter().as_str())?;
        }

        for group in self.groups.values() {
            group.apply_filters()?;
        }

        Ok(order)
    }

    /// Assign the static precondition of a filter.
    ///
    /// Takes effect on the next update that runs the filter.
    pub fn set_filter_enabled(
        &mut self,
        total_key: &str,
        enabled: bool,
    ) -> Result<(), FilterError> {
        let key = TotalKey::parse(total_key)?;
        let filter = self
            .groups
            .get_mut(key.group().as_str())
            .and_then(|group| group.filter_meta_mut(key.filter().as_str()))
            .ok_or_else(|| FilterError::NotFound(key.to_string()))?;
        filter.precondition_mut().set_filter_is_enabled(enabled)
    }

    /// Replace the predicate of a filter, making it static.
    ///
    /// `E` must be the element type of the filter's group.
    pub fn set_filter<E: 'static>(
        &mut self,
        total_key: &str,
        predicate: Predicate<E>,
    ) -> Result<(), FilterError> {
        let key = TotalKey::parse(total_key)?;
        let group = self
            .groups
            .get_mut(key.group().as_str())
            .ok_or_else(|| FilterError::NotFound(key.to_string()))?;
        group.replace_predicate(key.filter().as_str(), Box::new(predicate))
    }

    /// Capture keys, gates and dependencies of every filter.
    pub fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot::capture(self.is_finalized(), self.groups.values())
    }

    fn lookup(&self, key: &TotalKey) -> Option<&dyn FilterMeta> {
        self.groups
            .get(key.group().as_str())
            .and_then(|group| group.filter_meta(key.filter().as_str()))
    }

    fn group_of(&self, key: &TotalKey) -> Result<&dyn DynFilterGroup, FilterError> {
        self.groups
            .get(key.group().as_str())
            .map(|group| &**group)
            .ok_or_else(|| FilterError::GroupNotFound(key.group().to_string()))
    }

    /// Nodes in group then filter registration order, edges in declaration order.
    fn build_scheduler(&self) -> UpdateScheduler {
        let mut scheduler = UpdateScheduler::new();

        for group in self.groups.values() {
            for filter in group.filter_metas() {
                scheduler.add_node(TotalKey::new(group.key().clone(), filter.key().clone()));
            }
        }

        for group in self.groups.values() {
            for filter in group.filter_metas() {
                let from = TotalKey::new(group.key().clone(), filter.key().clone());
                let Some(from) = scheduler.node_id(&from) else {
                    continue;
                };
                for dependent in filter.dependent_filter_keys() {
                    if let Some(to) = scheduler.node_id(dependent) {
                        scheduler.add_edge(from, to);
                    }
                }
            }
        }

        scheduler
    }
}

impl fmt::Debug for FilterCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCollection")
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .field("finalized", &self.is_finalized())
            .finish()
    }
}
