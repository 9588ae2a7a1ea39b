//! Domain records for a user's todo collection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Positive id, unique within the owner's collection
    pub id: u64,
    /// Trimmed, non-empty text
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner_key: String,
}

/// All items belonging to one owner key.
///
/// `last_inserted_id` never decreases, so ids are not reused after a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub items: HashMap<u64, Item>,
    pub last_inserted_id: u64,
    pub owner_key: String,
    pub created_at: DateTime<Utc>,
}

impl Collection {
    // == Constructor ==
    /// Creates an empty collection for `owner_key`.
    pub fn empty(owner_key: impl Into<String>) -> Self {
        Self {
            items: HashMap::new(),
            last_inserted_id: 0,
            owner_key: owner_key.into(),
            created_at: Utc::now(),
        }
    }

    /// Builds a collection from initial item contents, numbering them from 1.
    pub fn seeded<I, S>(owner_key: impl Into<String>, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collection = Self::empty(owner_key);
        for content in contents {
            collection.push(content.into());
        }
        collection
    }

    // == Push ==
    /// Appends a new item with the next id and returns a copy of it.
    ///
    /// The caller is responsible for validating `content`.
    pub fn push(&mut self, content: String) -> Item {
        let id = self.next_id();
        let item = Item {
            id,
            content,
            created_at: Utc::now(),
            owner_key: self.owner_key.clone(),
        };
        self.items.insert(id, item.clone());
        self.last_inserted_id = id;
        item
    }

    // == Remove ==
    /// Removes an item by id, returning it if it existed.
    pub fn remove(&mut self, id: u64) -> Option<Item> {
        self.items.remove(&id)
    }

    /// Id the next pushed item will receive.
    pub fn next_id(&self) -> u64 {
        let max_existing = self.items.keys().copied().max().unwrap_or(0);
        self.last_inserted_id.max(max_existing) + 1
    }

    /// Items as an unordered list.
    pub fn to_list(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_numbers_from_one() {
        let collection = Collection::seeded("alice", ["a", "b", "c"]);

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.last_inserted_id, 3);
        assert_eq!(collection.items[&2].content, "b");
        assert!(collection.items.values().all(|i| i.owner_key == "alice"));
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut collection = Collection::seeded("alice", ["a", "b"]);
        assert!(collection.remove(2).is_some());

        let item = collection.push("c".to_string());
        assert_eq!(item.id, 3);
        assert!(!collection.items.contains_key(&2));
    }

    #[test]
    fn test_remove_missing_returns_none() {
        let mut collection = Collection::empty("alice");
        assert!(collection.remove(999).is_none());
    }

    #[test]
    fn test_next_id_respects_existing_items() {
        let mut collection = Collection::empty("alice");
        collection.items.insert(
            7,
            Item {
                id: 7,
                content: "imported".to_string(),
                created_at: Utc::now(),
                owner_key: "alice".to_string(),
            },
        );
        assert_eq!(collection.next_id(), 8);
    }

    #[test]
    fn test_json_shape() {
        let collection = Collection::seeded("alice", ["a"]);
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["lastInsertedId"], 1);
        assert_eq!(json["ownerKey"], "alice");
        assert_eq!(json["items"]["1"]["content"], "a");
        assert!(json["items"]["1"]["createdAt"].is_string());

        let back: Collection = serde_json::from_value(json).unwrap();
        assert_eq!(back, collection);
    }
}
