//! Filter Targets
//!
//! The target is the graph-like object a group filters. It stages predicates
//! under a key and commits all staged predicates at once when asked to apply.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TargetError;
use crate::filter::Predicate;

/// A graph-like object that filters can be applied to.
pub trait FilterTarget: Send + 'static {
    /// Element type the predicates are evaluated on.
    type Element: 'static;

    /// Stage `predicate` under `key`, replacing whatever was staged there.
    fn run_filter(&mut self, predicate: Predicate<Self::Element>, key: &str)
        -> Result<(), TargetError>;

    /// Commit the combined effect of all staged predicates.
    fn apply_filters(&mut self) -> Result<(), TargetError>;
}

/// Target shared between a group and the code that owns the graph.
pub type SharedTarget<T> = Arc<Mutex<T>>;

/// Wrap a target for sharing with a group.
pub fn shared<T: FilterTarget>(target: T) -> SharedTarget<T> {
    Arc::new(Mutex::new(target))
}
