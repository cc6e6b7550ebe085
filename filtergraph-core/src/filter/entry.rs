//! Filter Entries
//!
//! A [`Filter`] is a named, gated unit of filtering logic. Its predicate is
//! resolved lazily on every access and collapses to the neutral predicate
//! whenever the precondition is disabled. A disabled filter therefore keeps
//! its place in the dependency graph and still runs, it just lets everything
//! through.

use std::fmt;

use indexmap::IndexSet;

use super::key::{FilterKey, GroupKey, TotalKey};
use super::precondition::FilterPrecondition;
use super::slot::{match_all, Predicate, PredicateSlot};

/// Element-type independent view of a filter.
///
/// Groups of different element types live side by side in a collection;
/// this trait is how the collection inspects their filters uniformly.
pub trait FilterMeta {
    fn key(&self) -> &FilterKey;

    /// Key of the owning group, `None` until the filter is registered.
    fn group_key(&self) -> Option<&GroupKey>;

    fn total_key(&self) -> Option<TotalKey> {
        self.group_key()
            .map(|group| TotalKey::new(group.clone(), self.key().clone()))
    }

    /// Filters to re-evaluate whenever this one changes.
    fn dependent_filter_keys(&self) -> &IndexSet<TotalKey>;

    fn precondition(&self) -> &FilterPrecondition;

    fn precondition_mut(&mut self) -> &mut FilterPrecondition;

    /// Whether the predicate is fixed rather than supplied.
    fn is_static(&self) -> bool;
}

/// A named, gated filter over elements of type `E`.
pub struct Filter<E> {
    key: FilterKey,
    group_key: Option<GroupKey>,
    precondition: FilterPrecondition,
    dependents: IndexSet<TotalKey>,
    predicate: PredicateSlot<E>,
}

impl<E: 'static> Filter<E> {
    pub fn new<I>(
        key: FilterKey,
        precondition: FilterPrecondition,
        predicate: PredicateSlot<E>,
        dependents: I,
    ) -> Self
    where
        I: IntoIterator<Item = TotalKey>,
    {
        Self {
            key,
            group_key: None,
            precondition,
            dependents: dependents.into_iter().collect(),
            predicate,
        }
    }

    /// Record another filter that must re-run after this one. Idempotent.
    pub fn add_dependent_filter_key(&mut self, key: TotalKey) {
        self.dependents.insert(key);
    }

    /// The predicate to apply right now.
    ///
    /// Disabled filters resolve to [`match_all`]; supplied predicates are
    /// re-obtained from their supplier on each call.
    pub fn filter(&self) -> Predicate<E> {
        if self.precondition.filter_is_enabled() {
            self.predicate.resolve()
        } else {
            match_all()
        }
    }

    /// Replace the predicate. The filter is static from here on.
    pub fn set_filter(&mut self, predicate: Predicate<E>) {
        self.predicate = PredicateSlot::Fixed(predicate);
    }

    /// Called by the owning group on registration.
    pub(crate) fn assign_group(&mut self, group: GroupKey) {
        self.group_key = Some(group);
    }

    /// Called by the group when it hands a replaced filter back.
    pub(crate) fn release_group(&mut self) {
        self.group_key = None;
    }
}

impl<E> FilterMeta for Filter<E> {
    fn key(&self) -> &FilterKey {
        &self.key
    }

    fn group_key(&self) -> Option<&GroupKey> {
        self.group_key.as_ref()
    }

    fn dependent_filter_keys(&self) -> &IndexSet<TotalKey> {
        &self.dependents
    }

    fn precondition(&self) -> &FilterPrecondition {
        &self.precondition
    }

    fn precondition_mut(&mut self) -> &mut FilterPrecondition {
        &mut self.precondition
    }

    fn is_static(&self) -> bool {
        self.predicate.is_static()
    }
}

impl<E> fmt::Debug for Filter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("key", &self.key)
            .field("group_key", &self.group_key)
            .field("precondition", &self.precondition)
            .field("dependents", &self.dependents)
            .field("predicate", &self.predicate)
            .finish()
    }
}
