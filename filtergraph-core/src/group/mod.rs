//! Filter Groups
//!
//! A group is a named set of filters that share one target. The group is the
//! only place where a filter's predicate meets the target: running a filter
//! resolves its current predicate (gate and supplier included) and stages it
//! on the target under the filter's key.
//!
//! # Heterogeneous groups
//!
//! Each group filters one element type, but a collection holds groups of
//! different types (nodes, dependencies, ...). [`DynFilterGroup`] is the
//! object-safe face of [`FilterGroup`] that the collection works with; the
//! typed group can be recovered with [`DynFilterGroup::as_any`].

mod builder;
mod target;
mod view;

pub use builder::{FilterDraft, FilterGroupBuilder};
pub use target::{shared, FilterTarget, SharedTarget};
pub use view::FilteredView;

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::FilterError;
use crate::filter::{
    match_all, Filter, FilterKey, FilterMeta, GroupKey, Predicate, TotalKey, SEPARATOR,
};

/// A named collection of filters over one shared target.
pub struct FilterGroup<T: FilterTarget> {
    key: GroupKey,
    target: SharedTarget<T>,
    filters: IndexMap<FilterKey, Filter<T::Element>>,
}

impl<T: FilterTarget> FilterGroup<T> {
    pub fn new(key: GroupKey, target: SharedTarget<T>) -> Self {
        Self {
            key,
            target,
            filters: IndexMap::new(),
        }
    }

    /// Start building a group. Key errors surface from [`FilterGroupBuilder::build`].
    pub fn builder(key: impl Into<String>, target: SharedTarget<T>) -> FilterGroupBuilder<T> {
        FilterGroupBuilder::new(key.into(), target)
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn target(&self) -> &SharedTarget<T> {
        &self.target
    }

    /// Register a filter under its key and stamp it with this group's key.
    ///
    /// Registering a key twice replaces the earlier filter (last write wins);
    /// the replaced filter is returned without a group and can be registered
    /// again.
    pub fn add_filter(&mut self, mut filter: Filter<T::Element>) -> Option<Filter<T::Element>> {
        filter.assign_group(self.key.clone());
        let mut replaced = self.filters.insert(filter.key().clone(), filter)?;
        replaced.release_group();
        Some(replaced)
    }

    pub fn get_filter(&self, key: &str) -> Option<&Filter<T::Element>> {
        self.filters.get(key)
    }

    pub fn get_filter_mut(&mut self, key: &str) -> Option<&mut Filter<T::Element>> {
        self.filters.get_mut(key)
    }

    /// Filters in registration order.
    pub fn filters(&self) -> impl Iterator<Item = &Filter<T::Element>> {
        self.filters.values()
    }

    pub fn filter_keys(&self) -> impl Iterator<Item = &FilterKey> {
        self.filters.keys()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Stage the currently resolved predicate of `key` on the target.
    pub fn run_filter(&self, key: &str) -> Result<(), FilterError> {
        let filter = self
            .filters
            .get(key)
            .ok_or_else(|| FilterError::NotFound(self.total_key_str(key)))?;

        // Resolve before locking: suppliers may consult arbitrary state.
        let predicate = filter.filter();
        trace!(group = %self.key, filter = key, "running filter");
        self.stage(predicate, key)
    }

    /// Stage the neutral predicate for `key`, establishing its baseline.
    pub fn init_filter(&self, key: &str) -> Result<(), FilterError> {
        if !self.filters.contains_key(key) {
            return Err(FilterError::NotFound(self.total_key_str(key)));
        }
        self.stage(match_all(), key)
    }

    /// Commit everything staged on the target since the last apply.
    pub fn apply_filters(&self) -> Result<(), FilterError> {
        self.target
            .lock()
            .apply_filters()
            .map_err(|source| FilterError::Target {
                key: self.key.to_string(),
                source,
            })
    }

    fn stage(&self, predicate: Predicate<T::Element>, key: &str) -> Result<(), FilterError> {
        self.target
            .lock()
            .run_filter(predicate, key)
            .map_err(|source| FilterError::Target {
                key: self.total_key_str(key),
                source,
            })
    }

    fn total_key_str(&self, key: &str) -> String {
        join(&self.key, key)
    }
}

fn join(group: &GroupKey, key: &str) -> String {
    format!("{}{}{}", group, SEPARATOR, key)
}

impl<T: FilterTarget> fmt::Debug for FilterGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterGroup")
            .field("key", &self.key)
            .field("filters", &self.filters)
            .finish()
    }
}

/// Object-safe interface of a [`FilterGroup`], independent of its element type.
pub trait DynFilterGroup: Send + Sync {
    fn key(&self) -> &GroupKey;

    fn filter_meta(&self, key: &str) -> Option<&dyn FilterMeta>;

    fn filter_meta_mut(&mut self, key: &str) -> Option<&mut dyn FilterMeta>;

    /// All filters in registration order.
    fn filter_metas(&self) -> Vec<&dyn FilterMeta>;

    fn run_filter(&self, key: &str) -> Result<(), FilterError>;

    fn init_filter(&self, key: &str) -> Result<(), FilterError>;

    fn apply_filters(&self) -> Result<(), FilterError>;

    /// Assign a predicate boxed as `Predicate<Element>`, making the filter static.
    fn replace_predicate(&mut self, key: &str, predicate: Box<dyn Any>) -> Result<(), FilterError>;

    fn as_any(&self) -> &dyn Any;
}

impl<T: FilterTarget> DynFilterGroup for FilterGroup<T> {
    fn key(&self) -> &GroupKey {
        &self.key
    }

    fn filter_meta(&self, key: &str) -> Option<&dyn FilterMeta> {
        self.filters.get(key).map(|f| f as &dyn FilterMeta)
    }

    fn filter_meta_mut(&mut self, key: &str) -> Option<&mut dyn FilterMeta> {
        self.filters.get_mut(key).map(|f| f as &mut dyn FilterMeta)
    }

    fn filter_metas(&self) -> Vec<&dyn FilterMeta> {
        self.filters.values().map(|f| f as &dyn FilterMeta).collect()
    }

    fn run_filter(&self, key: &str) -> Result<(), FilterError> {
        FilterGroup::run_filter(self, key)
    }

    fn init_filter(&self, key: &str) -> Result<(), FilterError> {
        FilterGroup::init_filter(self, key)
    }

    fn apply_filters(&self) -> Result<(), FilterError> {
        FilterGroup::apply_filters(self)
    }

    fn replace_predicate(&mut self, key: &str, predicate: Box<dyn Any>) -> Result<(), FilterError> {
        let filter = self
            .filters
            .get_mut(key)
            .ok_or_else(|| FilterError::NotFound(join(&self.key, key)))?;
        let predicate = predicate
            .downcast::<Predicate<T::Element>>()
            .map_err(|_| {
                FilterError::ElementTypeMismatch(TotalKey::new(self.key.clone(), filter.key().clone()))
            })?;
        filter.set_filter(*predicate);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
