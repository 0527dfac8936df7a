use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An immutable tag filter: items must carry every included tag and none of
/// the excluded ones.
///
/// Tag sets are ordered so that two filters built from the same tags in any
/// order compare equal and serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub exclude_tags: BTreeSet<String>,
}

impl SearchFilter {
    /// Filter that matches the whole feed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<I, E, S, T>(tags: I, exclude_tags: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            exclude_tags: exclude_tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.exclude_tags.is_empty()
    }

    /// Comma-joined included tags for the backend's `t` query parameter.
    /// `None` when the set is empty — the parameter is omitted entirely.
    pub fn include_param(&self) -> Option<String> {
        Self::join(&self.tags)
    }

    /// Comma-joined excluded tags for the `e` query parameter.
    pub fn exclude_param(&self) -> Option<String> {
        Self::join(&self.exclude_tags)
    }

    fn join(tags: &BTreeSet<String>) -> Option<String> {
        if tags.is_empty() {
            None
        } else {
            Some(tags.iter().cloned().collect::<Vec<_>>().join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_filter_omits_params() {
        let filter = SearchFilter::empty();
        assert!(filter.is_empty());
        assert_eq!(filter.include_param(), None);
        assert_eq!(filter.exclude_param(), None);
    }

    #[test]
    fn test_params_are_comma_joined_and_sorted() {
        let filter = SearchFilter::new(["zebra", "apple"], ["scenery"]);
        assert_eq!(filter.include_param().as_deref(), Some("apple,zebra"));
        assert_eq!(filter.exclude_param().as_deref(), Some("scenery"));
    }

    #[test]
    fn test_tag_order_does_not_affect_equality() {
        let a = SearchFilter::new(["cat", "dog"], Vec::<String>::new());
        let b = SearchFilter::new(["dog", "cat"], Vec::<String>::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_tags_collapse() {
        let filter = SearchFilter::new(["cat", "cat"], Vec::<String>::new());
        assert_eq!(filter.tags.len(), 1);
    }
}
