//! Predicates
//!
//! A predicate decides whether a graph element survives filtering. A filter
//! either holds a fixed predicate or a supplier that builds a fresh predicate
//! on each access (for predicates recomputed from current external state).

use std::fmt;
use std::sync::Arc;

/// Function from a graph element to "does it survive the filter".
pub type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Supplier producing the current predicate of a non-static filter.
pub type PredicateSupplier<E> = Arc<dyn Fn() -> Predicate<E> + Send + Sync>;

/// The neutral predicate: every element survives.
pub fn match_all<E: 'static>() -> Predicate<E> {
    Arc::new(|_: &E| true)
}

/// Wrap a closure as a [`Predicate`].
pub fn predicate<E, F>(f: F) -> Predicate<E>
where
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a filter resolves its predicate.
pub enum PredicateSlot<E> {
    /// Used as-is on every access.
    Fixed(Predicate<E>),

    /// Invoked on every access to obtain the predicate.
    Supplied(PredicateSupplier<E>),
}

impl<E> PredicateSlot<E> {
    pub fn fixed<F>(f: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self::Fixed(Arc::new(f))
    }

    pub fn supplied<F>(supplier: F) -> Self
    where
        F: Fn() -> Predicate<E> + Send + Sync + 'static,
    {
        Self::Supplied(Arc::new(supplier))
    }

    /// Resolve the slot to a concrete predicate, invoking the supplier if any.
    pub fn resolve(&self) -> Predicate<E> {
        match self {
            Self::Fixed(predicate) => Arc::clone(predicate),
            Self::Supplied(supplier) => supplier(),
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

impl<E> Clone for PredicateSlot<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(predicate) => Self::Fixed(Arc::clone(predicate)),
            Self::Supplied(supplier) => Self::Supplied(Arc::clone(supplier)),
        }
    }
}

impl<E> fmt::Debug for PredicateSlot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(_) => f.write_str("Fixed(..)"),
            Self::Supplied(_) => f.write_str("Supplied(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn match_all_accepts_everything() {
        let p = match_all::<i32>();
        assert!(p(&0));
        assert!(p(&-7));
    }

    #[test]
    fn supplied_slot_invokes_supplier_per_resolve() {
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();
        let slot = PredicateSlot::<i32>::supplied(move || {
            let threshold = calls_clone.fetch_add(1, Ordering::SeqCst);
            predicate(move |v: &i32| *v > threshold)
        });

        assert!(!slot.is_static());
        assert!(!slot.resolve()(&0));
        assert!(slot.resolve()(&2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
