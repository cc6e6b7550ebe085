//! Collection Builder

use super::FilterCollection;
use crate::error::FilterError;
use crate::group::{FilterGroup, FilterTarget};

/// Collects groups and finalizes them into a [`FilterCollection`].
#[derive(Debug, Default)]
pub struct FilterCollectionBuilder {
    collection: FilterCollection,
}

impl FilterCollectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter_group<T: FilterTarget>(mut self, group: FilterGroup<T>) -> Self {
        self.collection.add_filter_group(group);
        self
    }

    /// Finalize the collection, see [`FilterCollection::finish_creation`].
    pub fn build(mut self) -> Result<FilterCollection, FilterError> {
        self.collection.finish_creation()?;
        Ok(self.collection)
    }
}
