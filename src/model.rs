use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved page boundary: page number paired with the cursor its first
/// item starts at.
///
/// 'start_id' is opaque to this crate — it is produced by the backend's
/// resolution endpoints and echoed back verbatim when fetching items or when
/// resolving further pages outward from this one. For a fixed filter, `no`
/// is strictly increasing in feed order as the cursor advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based page number.
    pub no: u32,
    /// Cursor of the first item on this page.
    pub start_id: i64,
}

impl PageInfo {
    pub fn new(no: u32, start_id: i64) -> Self {
        Self { no, start_id }
    }
}

/// A single feed entry as returned by the item-fetch endpoint.
///
/// Only `id` and `tags` carry behavior on the client side (item reload
/// splicing and the derived tag list); the rest is carried through for
/// presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_info_deserializes_from_wire_shape() {
        let info: PageInfo = serde_json::from_str(r#"{"no": 7, "start_id": 1042}"#).unwrap();
        assert_eq!(info, PageInfo::new(7, 1042));
    }

    #[test]
    fn test_item_tolerates_missing_optional_fields() {
        let item: Item = serde_json::from_str(
            r#"{"id": 3, "created_at": "2024-01-01T00:00:00Z", "user_name": "alice"}"#,
        )
        .unwrap();
        assert_eq!(item.id, 3);
        assert!(item.title.is_none());
        assert!(item.tags.is_empty());
    }
}
