//! Collection Snapshots
//!
//! A serializable picture of a collection: which filters exist, whether
//! they are currently enabled, how their predicate is resolved and what
//! depends on them. Meant for diagnostics and debugging output.

use serde::{Deserialize, Serialize};

use crate::filter::{FilterMeta, GroupKey, TotalKey};
use crate::group::DynFilterGroup;

/// State of one filter at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub key: TotalKey,
    /// Result of reading the precondition while capturing.
    pub enabled: bool,
    pub dynamic_precondition: bool,
    pub static_predicate: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependents: Vec<TotalKey>,
}

/// Filters of one group, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub key: GroupKey,
    pub filters: Vec<FilterSnapshot>,
}

/// Complete snapshot of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub finalized: bool,
    pub groups: Vec<GroupSnapshot>,
}

impl CollectionSnapshot {
    pub(super) fn capture<'a, I>(finalized: bool, groups: I) -> Self
    where
        I: IntoIterator<Item = &'a Box<dyn DynFilterGroup>>,
    {
        let groups = groups
            .into_iter()
            .map(|group| GroupSnapshot {
                key: group.key().clone(),
                filters: group
                    .filter_metas()
                    .into_iter()
                    .map(|filter| capture_filter(group.key(), filter))
                    .collect(),
            })
            .collect();

        Self { finalized, groups }
    }

    /// Find a filter by its `group.filter` key.
    pub fn filter(&self, total_key: &str) -> Option<&FilterSnapshot> {
        self.groups
            .iter()
            .flat_map(|group| group.filters.iter())
            .find(|filter| filter.key.to_string() == total_key)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn capture_filter(group: &GroupKey, filter: &dyn FilterMeta) -> FilterSnapshot {
    FilterSnapshot {
        key: TotalKey::new(group.clone(), filter.key().clone()),
        enabled: filter.precondition().filter_is_enabled(),
        dynamic_precondition: filter.precondition().is_dynamic(),
        static_predicate: filter.is_static(),
        dependents: filter.dependent_filter_keys().iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::collection::FilterCollection;
    use crate::filter::match_all;
    use crate::group::{shared, FilterGroup, FilteredView};

    fn collection() -> FilterCollection {
        let nodes = FilterGroup::builder("nodes", shared(FilteredView::new(vec![1, 2])))
            .add_fixed_filter("visibility", |_| true)
            .with_static_precondition(false)
            .add_supplied_filter("typeFilter", match_all::<i32>)
            .with_dependents(["nodes.visibility"])
            .with_dynamic_precondition(|| true)
            .build()
            .unwrap();
        FilterCollection::builder()
            .add_filter_group(nodes)
            .build()
            .unwrap()
    }

    #[test]
    fn captures_gates_and_dependents() {
        let snapshot = collection().snapshot();
        assert!(snapshot.finalized);
        assert_eq!(snapshot.groups.len(), 1);

        let visibility = snapshot.filter("nodes.visibility").unwrap();
        assert!(!visibility.enabled);
        assert!(!visibility.dynamic_precondition);
        assert!(visibility.static_predicate);
        assert!(visibility.dependents.is_empty());

        let type_filter = snapshot.filter("nodes.typeFilter").unwrap();
        assert!(type_filter.enabled);
        assert!(type_filter.dynamic_precondition);
        assert!(!type_filter.static_predicate);
        assert_eq!(type_filter.dependents[0].to_string(), "nodes.visibility");
    }

    #[test]
    fn json_uses_dotted_keys() {
        let snapshot = collection().snapshot();
        let json = snapshot.to_json().unwrap();

        assert!(json.contains("\"nodes.typeFilter\""));
        let restored = super::CollectionSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
