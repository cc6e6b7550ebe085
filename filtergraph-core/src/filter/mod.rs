//! Filters
//!
//! The leaf model of the crate: keys, preconditions, predicates and the
//! [`Filter`] that ties them together.
//!
//! # Concepts
//!
//! ## Preconditions
//!
//! A [`FilterPrecondition`] decides whether a filter contributes its real
//! predicate. Dynamic preconditions ask a supplier on every read; static ones
//! hold an assignable value.
//!
//! ## Predicates
//!
//! A [`Predicate`] maps an element to "keep it or not". A filter holds its
//! predicate in a [`PredicateSlot`], either fixed or produced by a supplier
//! on each access. Assigning a predicate through [`Filter::set_filter`] always
//! makes the slot fixed.
//!
//! ## Keys
//!
//! Filters are identified by a [`TotalKey`] made of the group key and the
//! filter key. The dotted string form `group.filter` is accepted and produced
//! at the API boundary only.

mod entry;
mod key;
mod precondition;
mod slot;

pub use entry::{Filter, FilterMeta};
pub use key::{FilterKey, GroupKey, TotalKey, SEPARATOR};
pub use precondition::{EnabledSupplier, FilterPrecondition};
pub use slot::{match_all, predicate, Predicate, PredicateSlot, PredicateSupplier};
