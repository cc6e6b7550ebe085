//! Filtered View
//!
//! A ready-made [`FilterTarget`] over a fixed list of elements. Staged
//! predicates are kept per key; applying keeps the elements that pass every
//! staged predicate.

use indexmap::IndexMap;

use super::target::FilterTarget;
use crate::error::TargetError;
use crate::filter::Predicate;

/// A list of elements and the subset that currently survives filtering.
pub struct FilteredView<E> {
    elements: Vec<E>,
    staged: IndexMap<String, Predicate<E>>,
    visible: Vec<E>,
    applied: usize,
}

impl<E> FilteredView<E>
where
    E: Clone + Send + 'static,
{
    /// Create a view in which every element is visible.
    pub fn new(elements: Vec<E>) -> Self {
        Self {
            visible: elements.clone(),
            elements,
            staged: IndexMap::new(),
            applied: 0,
        }
    }

    /// Elements that survived the last apply.
    pub fn visible(&self) -> &[E] {
        &self.visible
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Keys with a staged predicate, in first-staged order.
    pub fn staged_keys(&self) -> impl Iterator<Item = &str> {
        self.staged.keys().map(String::as_str)
    }

    /// Number of completed applies.
    pub fn apply_count(&self) -> usize {
        self.applied
    }
}

impl<E> FilterTarget for FilteredView<E>
where
    E: Clone + Send + 'static,
{
    type Element = E;

    fn run_filter(&mut self, predicate: Predicate<E>, key: &str) -> Result<(), TargetError> {
        self.staged.insert(key.to_string(), predicate);
        Ok(())
    }

    fn apply_filters(&mut self) -> Result<(), TargetError> {
        self.visible = self
            .elements
            .iter()
            .filter(|element| self.staged.values().all(|predicate| predicate(*element)))
            .cloned()
            .collect();
        self.applied += 1;
        Ok(())
    }
}
