//! Filter Keys
//!
//! Filters are addressed by a group key and a filter key. Internally the pair
//! is kept as a [`TotalKey`]; the dotted `group.filter` string only exists at
//! the API boundary. Neither segment may contain the separator, otherwise the
//! dotted form could not be split unambiguously.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Separator between the group and filter segment of a total key.
pub const SEPARATOR: char = '.';

fn validate(key: &str) -> Result<(), FilterError> {
    if key.is_empty() {
        return Err(FilterError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty",
        });
    }
    if key.contains(SEPARATOR) {
        return Err(FilterError::InvalidKey {
            key: key.to_string(),
            reason: "key must not contain `.`",
        });
    }
    Ok(())
}

macro_rules! segment_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a key segment.
            pub fn new(key: impl Into<String>) -> Result<Self, FilterError> {
                let key = key.into();
                validate(&key)?;
                Ok(Self(key))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = FilterError;

            fn try_from(key: String) -> Result<Self, Self::Error> {
                Self::new(key)
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }
    };
}

segment_key! {
    /// Identity of a filter group, unique within a collection.
    GroupKey
}

segment_key! {
    /// Identity of a filter, unique within its group.
    FilterKey
}

/// Globally unique identity of a filter: its group key plus its filter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TotalKey {
    group: GroupKey,
    filter: FilterKey,
}

impl TotalKey {
    pub fn new(group: GroupKey, filter: FilterKey) -> Self {
        Self { group, filter }
    }

    /// Parse the dotted `group.filter` form.
    pub fn parse(key: &str) -> Result<Self, FilterError> {
        let (group, filter) = key.split_once(SEPARATOR).ok_or_else(|| FilterError::InvalidKey {
            key: key.to_string(),
            reason: "total key must have the form `group.filter`",
        })?;
        if filter.contains(SEPARATOR) {
            return Err(FilterError::InvalidKey {
                key: key.to_string(),
                reason: "total key must contain exactly one `.`",
            });
        }
        Ok(Self {
            group: GroupKey::new(group)?,
            filter: FilterKey::new(filter)?,
        })
    }

    pub fn group(&self) -> &GroupKey {
        &self.group
    }

    pub fn filter(&self) -> &FilterKey {
        &self.filter
    }
}

impl fmt::Display for TotalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.group, SEPARATOR, self.filter)
    }
}

impl FromStr for TotalKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TotalKey {
    type Error = FilterError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        Self::parse(&key)
    }
}

impl From<TotalKey> for String {
    fn from(key: TotalKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_key_round_trips_through_display() {
        let key = TotalKey::parse("nodes.typeFilter").unwrap();
        assert_eq!(key.group().as_str(), "nodes");
        assert_eq!(key.filter().as_str(), "typeFilter");
        assert_eq!(key.to_string(), "nodes.typeFilter");
    }

    #[test]
    fn segments_reject_separator_and_empty() {
        assert!(matches!(
            FilterKey::new("a.b"),
            Err(FilterError::InvalidKey { .. })
        ));
        assert!(matches!(GroupKey::new(""), Err(FilterError::InvalidKey { .. })));
    }

    #[test]
    fn total_key_requires_exactly_one_separator() {
        assert!(TotalKey::parse("nodes").is_err());
        assert!(TotalKey::parse("nodes.a.b").is_err());
        assert!(TotalKey::parse(".a").is_err());
        assert!(TotalKey::parse("nodes.").is_err());
    }

    #[test]
    fn total_key_serializes_as_dotted_string() {
        let key = TotalKey::parse("deps.kind").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"deps.kind\"");
        let back: TotalKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<TotalKey>("\"deps\"").is_err());
    }
}
