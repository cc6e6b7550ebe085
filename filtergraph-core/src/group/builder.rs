//! Group Builder
//!
//! Fluent construction of a [`FilterGroup`]. Each filter is started with one
//! of the `add_*` methods, optionally given dependents, and closed by choosing
//! its precondition. Only the precondition methods hand the group builder
//! back, so a filter cannot be registered without exactly one precondition.
//!
//! ```rust,ignore
//! let nodes = FilterGroup::builder("nodes", shared(view))
//!     .add_fixed_filter("visibility", |_| true)
//!     .with_static_precondition(true)
//!     .add_fixed_filter("typeFilter", |n: &Node| n.kind == Kind::Class)
//!     .with_dependents(["nodes.visibility"])
//!     .with_dynamic_precondition(move || toggle.get())
//!     .build()?;
//! ```

use crate::error::FilterError;
use crate::filter::{
    Filter, FilterKey, FilterPrecondition, GroupKey, Predicate, PredicateSlot, TotalKey,
};

use super::{FilterGroup, FilterTarget, SharedTarget};

/// Builder for a [`FilterGroup`].
///
/// Malformed keys do not abort the chain; the first error is kept and
/// returned by [`build`](Self::build).
pub struct FilterGroupBuilder<T: FilterTarget> {
    key: String,
    target: SharedTarget<T>,
    filters: Vec<Filter<T::Element>>,
    error: Option<FilterError>,
}

impl<T: FilterTarget> FilterGroupBuilder<T> {
    pub(super) fn new(key: String, target: SharedTarget<T>) -> Self {
        Self {
            key,
            target,
            filters: Vec::new(),
            error: None,
        }
    }

    /// Start a filter with an explicit predicate slot.
    pub fn add_filter(
        self,
        key: impl Into<String>,
        predicate: PredicateSlot<T::Element>,
    ) -> FilterDraft<T> {
        FilterDraft {
            builder: self,
            key: key.into(),
            predicate,
            dependents: Vec::new(),
        }
    }

    /// Start a filter whose predicate never changes.
    pub fn add_fixed_filter<F>(self, key: impl Into<String>, predicate: F) -> FilterDraft<T>
    where
        F: Fn(&T::Element) -> bool + Send + Sync + 'static,
    {
        self.add_filter(key, PredicateSlot::fixed(predicate))
    }

    /// Start a filter whose predicate is re-obtained from `supplier` on each run.
    pub fn add_supplied_filter<F>(self, key: impl Into<String>, supplier: F) -> FilterDraft<T>
    where
        F: Fn() -> Predicate<T::Element> + Send + Sync + 'static,
    {
        self.add_filter(key, PredicateSlot::supplied(supplier))
    }

    /// Validate the keys and assemble the group.
    pub fn build(self) -> Result<FilterGroup<T>, FilterError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut group = FilterGroup::new(GroupKey::new(self.key)?, self.target);
        for filter in self.filters {
            group.add_filter(filter);
        }
        Ok(group)
    }

    fn record(&mut self, err: FilterError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// A filter being configured inside a [`FilterGroupBuilder`].
pub struct FilterDraft<T: FilterTarget> {
    builder: FilterGroupBuilder<T>,
    key: String,
    predicate: PredicateSlot<T::Element>,
    dependents: Vec<String>,
}

impl<T: FilterTarget> FilterDraft<T> {
    /// Declare filters (as `group.filter`) that must re-run after this one.
    pub fn with_dependents<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependents.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Gate the filter on `supplier`, consulted on every run.
    pub fn with_dynamic_precondition<F>(self, supplier: F) -> FilterGroupBuilder<T>
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.finish(FilterPrecondition::dynamic(supplier))
    }

    /// Gate the filter on an assignable value.
    pub fn with_static_precondition(self, enabled: bool) -> FilterGroupBuilder<T> {
        self.finish(FilterPrecondition::fixed(enabled))
    }

    fn finish(self, precondition: FilterPrecondition) -> FilterGroupBuilder<T> {
        let Self {
            mut builder,
            key,
            predicate,
            dependents,
        } = self;

        let parsed = FilterKey::new(key).and_then(|key| {
            let dependents = dependents
                .iter()
                .map(|d| TotalKey::parse(d))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((key, dependents))
        });

        match parsed {
            Ok((key, dependents)) => builder
                .filters
                .push(Filter::new(key, precondition, predicate, dependents)),
            Err(err) => builder.record(err),
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMeta;
    use crate::group::{shared, FilteredView};

    fn target() -> SharedTarget<FilteredView<i32>> {
        shared(FilteredView::new(vec![1, 2, 3]))
    }

    #[test]
    fn builds_filters_with_preconditions_and_dependents() {
        let group = FilterGroup::builder("nodes", target())
            .add_fixed_filter("visibility", |_| true)
            .with_static_precondition(true)
            .add_fixed_filter("typeFilter", |v| *v == 2)
            .with_dependents(["nodes.visibility"])
            .with_dynamic_precondition(|| true)
            .build()
            .unwrap();

        assert_eq!(group.key().as_str(), "nodes");
        assert_eq!(group.len(), 2);

        let type_filter = group.get_filter("typeFilter").unwrap();
        assert!(type_filter.precondition().is_dynamic());
        assert!(type_filter.is_static());
        let dependents: Vec<_> = type_filter
            .dependent_filter_keys()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(dependents, vec!["nodes.visibility"]);

        let visibility = group.get_filter("visibility").unwrap();
        assert!(!visibility.precondition().is_dynamic());
        assert!(visibility.dependent_filter_keys().is_empty());
    }

    #[test]
    fn supplied_filters_are_not_static() {
        let group = FilterGroup::builder("nodes", target())
            .add_supplied_filter("lazy", || crate::filter::match_all())
            .with_static_precondition(false)
            .build()
            .unwrap();

        assert!(!group.get_filter("lazy").unwrap().is_static());
    }

    #[test]
    fn malformed_dependent_fails_build() {
        let result = FilterGroup::builder("nodes", target())
            .add_fixed_filter("a", |_| true)
            .with_dependents(["no-separator"])
            .with_static_precondition(true)
            .build();

        assert!(matches!(result, Err(FilterError::InvalidKey { key, .. }) if key == "no-separator"));
    }

    #[test]
    fn malformed_group_key_fails_build() {
        let result = FilterGroup::builder("bad.group", target())
            .add_fixed_filter("a", |_| true)
            .with_static_precondition(true)
            .build();

        assert!(matches!(result, Err(FilterError::InvalidKey { .. })));
    }

    #[test]
    fn first_error_is_reported() {
        let result = FilterGroup::builder("nodes", target())
            .add_fixed_filter("first.bad", |_| true)
            .with_static_precondition(true)
            .add_fixed_filter("", |_| true)
            .with_static_precondition(true)
            .build();

        assert!(matches!(result, Err(FilterError::InvalidKey { key, .. }) if key == "first.bad"));
    }
}
