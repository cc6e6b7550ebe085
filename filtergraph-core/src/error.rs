//! Error Types
//!
//! Every fallible operation in the crate returns [`FilterError`]. Build-time
//! contract violations (bad keys, unresolved or cyclic dependencies) and
//! runtime lookup misses share one enum so callers can propagate with `?`.

use thiserror::Error;

use crate::filter::TotalKey;

/// Error produced by a filter target while staging or applying predicates.
pub type TargetError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building or operating a filter collection.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A group, filter or total key is malformed.
    #[error("invalid key `{key}`: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// A filter declares a dependent that does not resolve to a registered filter.
    #[error("invalid filter dependencies: `{filter}` declares unknown dependent `{dependent}`")]
    InvalidDependencies { filter: TotalKey, dependent: TotalKey },

    /// The declared dependents form a cycle.
    #[error("invalid filter dependencies: cycle {}", render_cycle(.cycle))]
    DependencyCycle { cycle: Vec<TotalKey> },

    /// No filter is registered under the given key.
    #[error("filter `{0}` not found")]
    NotFound(String),

    /// No group is registered under the given key.
    #[error("filter group `{0}` not found")]
    GroupNotFound(String),

    /// The collection was used before `finish_creation` succeeded.
    #[error("filter collection has not been finalized")]
    NotFinalized,

    /// Only static preconditions accept an assigned value.
    #[error("dynamic filter precondition cannot be assigned")]
    PreconditionNotAssignable,

    /// A predicate was supplied for a different element type than the group filters.
    #[error("predicate type does not match the element type of `{0}`")]
    ElementTypeMismatch(TotalKey),

    /// The filter target failed while running or applying filters.
    #[error("filter target failed at `{key}`: {source}")]
    Target {
        key: String,
        #[source]
        source: TargetError,
    },
}

fn render_cycle(cycle: &[TotalKey]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
