//! Filter Preconditions
//!
//! A precondition gates whether a filter contributes its predicate or is
//! bypassed with the neutral one. Two kinds exist:
//!
//! - `Dynamic`: asks a supplier on every read, so enablement can follow
//!   external state (a UI toggle, a setting) without re-registering the filter.
//! - `Static`: holds a value that is changed by explicit assignment.

use std::fmt;
use std::sync::Arc;

use crate::error::FilterError;

/// Supplier consulted by a dynamic precondition.
pub type EnabledSupplier = Arc<dyn Fn() -> bool + Send + Sync>;

/// Boolean gate controlling whether a filter is active.
#[derive(Clone)]
pub enum FilterPrecondition {
    /// Re-evaluated on every read. No caching.
    Dynamic(EnabledSupplier),

    /// Returns the last assigned value.
    Static(bool),
}

impl FilterPrecondition {
    /// Create a dynamic precondition from a supplier.
    pub fn dynamic<F>(supplier: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(supplier))
    }

    /// Create a static precondition with an initial value.
    pub fn fixed(enabled: bool) -> Self {
        Self::Static(enabled)
    }

    /// Whether the guarded filter is currently enabled.
    ///
    /// The only side effect is invoking the supplier of a dynamic precondition.
    pub fn filter_is_enabled(&self) -> bool {
        match self {
            Self::Dynamic(supplier) => supplier(),
            Self::Static(enabled) => *enabled,
        }
    }

    /// Assign a new value to a static precondition.
    ///
    /// Dynamic preconditions have no stored value and reject the assignment.
    pub fn set_filter_is_enabled(&mut self, enabled: bool) -> Result<(), FilterError> {
        match self {
            Self::Static(current) => {
                *current = enabled;
                Ok(())
            }
            Self::Dynamic(_) => Err(FilterError::PreconditionNotAssignable),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl fmt::Debug for FilterPrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
            Self::Static(enabled) => f.debug_tuple("Static").field(enabled).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    #[test]
    fn dynamic_reads_supplier_every_time() {
        let toggle = Arc::new(AtomicBool::new(false));
        let reads = Arc::new(AtomicI32::new(0));
        let toggle_clone = toggle.clone();
        let reads_clone = reads.clone();

        let precondition = FilterPrecondition::dynamic(move || {
            reads_clone.fetch_add(1, Ordering::SeqCst);
            toggle_clone.load(Ordering::SeqCst)
        });

        assert!(!precondition.filter_is_enabled());
        toggle.store(true, Ordering::SeqCst);
        assert!(precondition.filter_is_enabled());
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn static_returns_last_assignment() {
        let mut precondition = FilterPrecondition::fixed(true);
        assert!(precondition.filter_is_enabled());

        precondition.set_filter_is_enabled(false).unwrap();
        assert!(!precondition.filter_is_enabled());
    }

    #[test]
    fn dynamic_rejects_assignment() {
        let mut precondition = FilterPrecondition::dynamic(|| true);
        assert!(matches!(
            precondition.set_filter_is_enabled(false),
            Err(FilterError::PreconditionNotAssignable)
        ));
        assert!(precondition.filter_is_enabled());
    }
}
