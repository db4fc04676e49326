//! Items API.

use serde::Deserialize;

use crate::client::GorseClient;
use crate::contract::{ApiRequest, Operation, decode_json};
use crate::error::Result;
use crate::types::{Item, ItemPatch, Page, RowAffected, null_as_default};

/// Insert one item: `POST /api/item`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertItem {
    pub item: Item,
}

impl Operation for InsertItem {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        ApiRequest::post(["api", "item"]).json(&self.item)
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// Insert a batch of items: `POST /api/items`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertItems {
    pub items: Vec<Item>,
}

impl Operation for InsertItems {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        ApiRequest::post(["api", "items"]).json(&self.items)
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// Fetch one item: `GET /api/item/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetItem {
    pub item_id: String,
}

impl Operation for GetItem {
    type Output = Item;

    fn request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::get(["api", "item", self.item_id.as_str()]))
    }

    fn decode(&self, body: &str) -> Result<Item> {
        decode_json(body)
    }
}

/// Overwrite some fields of an item: `PATCH /api/item/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItem {
    pub item_id: String,
    pub patch: ItemPatch,
}

impl Operation for UpdateItem {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        ApiRequest::patch(["api", "item", self.item_id.as_str()]).json(&self.patch)
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// Delete one item: `DELETE /api/item/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteItem {
    pub item_id: String,
}

impl Operation for DeleteItem {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::delete(["api", "item", self.item_id.as_str()]))
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// One page of the item listing: `GET /api/items?n=&cursor=`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetItems {
    pub n: usize,
    pub cursor: String,
}

impl GetItems {
    /// First page of `n` items.
    pub fn first(n: usize) -> Self {
        Self {
            n,
            cursor: String::new(),
        }
    }

    /// Page of `n` items following `cursor`.
    pub fn after(n: usize, cursor: impl Into<String>) -> Self {
        Self {
            n,
            cursor: cursor.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemIterator {
    #[serde(default)]
    cursor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<Item>,
}

impl Operation for GetItems {
    type Output = Page<Item>;

    fn request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::get(["api", "items"])
            .query("n", self.n)
            .query("cursor", &self.cursor))
    }

    fn decode(&self, body: &str) -> Result<Page<Item>> {
        let page: ItemIterator = decode_json(body)?;
        Ok(Page {
            items: page.items,
            cursor: page.cursor,
        })
    }
}

impl GorseClient {
    /// Insert an item.
    pub async fn insert_item(&self, item: Item) -> Result<RowAffected> {
        self.send(&InsertItem { item }).await
    }

    /// Insert a batch of items.
    pub async fn insert_items(&self, items: Vec<Item>) -> Result<RowAffected> {
        self.send(&InsertItems { items }).await
    }

    /// Get an item by ID.
    pub async fn get_item(&self, item_id: &str) -> Result<Item> {
        self.send(&GetItem {
            item_id: item_id.to_string(),
        })
        .await
    }

    /// Update the fields present in `patch`.
    pub async fn update_item(&self, item_id: &str, patch: ItemPatch) -> Result<RowAffected> {
        self.send(&UpdateItem {
            item_id: item_id.to_string(),
            patch,
        })
        .await
    }

    /// Delete an item.
    pub async fn delete_item(&self, item_id: &str) -> Result<RowAffected> {
        self.send(&DeleteItem {
            item_id: item_id.to_string(),
        })
        .await
    }

    /// Get a page of `n` items. Pass an empty cursor for the first page.
    pub async fn get_items(&self, n: usize, cursor: &str) -> Result<Page<Item>> {
        self.send(&GetItems::after(n, cursor)).await
    }
}

#[cfg(feature = "blocking")]
impl crate::blocking::GorseClient {
    /// Insert an item.
    pub fn insert_item(&self, item: Item) -> Result<RowAffected> {
        self.send(&InsertItem { item })
    }

    /// Insert a batch of items.
    pub fn insert_items(&self, items: Vec<Item>) -> Result<RowAffected> {
        self.send(&InsertItems { items })
    }

    /// Get an item by ID.
    pub fn get_item(&self, item_id: &str) -> Result<Item> {
        self.send(&GetItem {
            item_id: item_id.to_string(),
        })
    }

    /// Update the fields present in `patch`.
    pub fn update_item(&self, item_id: &str, patch: ItemPatch) -> Result<RowAffected> {
        self.send(&UpdateItem {
            item_id: item_id.to_string(),
            patch,
        })
    }

    /// Delete an item.
    pub fn delete_item(&self, item_id: &str) -> Result<RowAffected> {
        self.send(&DeleteItem {
            item_id: item_id.to_string(),
        })
    }

    /// Get a page of `n` items. Pass an empty cursor for the first page.
    pub fn get_items(&self, n: usize, cursor: &str) -> Result<Page<Item>> {
        self.send(&GetItems::after(n, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Labels;
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn test_get_items_query() {
        let req = GetItems::first(3).request().unwrap();
        assert_eq!(req.segments, vec!["api", "items"]);
        assert_eq!(
            req.query,
            vec![("n", "3".to_string()), ("cursor", String::new())]
        );
    }

    #[test]
    fn test_get_items_decodes_page() {
        let body = r#"{"Cursor":"abc","Items":[{
            "ItemId":"100","IsHidden":true,"Labels":["a"],"Categories":["d"],
            "Timestamp":"2022-01-01T00:00:00Z","Comment":"comment"
        }]}"#;
        let page = GetItems::first(1).decode(body).unwrap();
        assert_eq!(page.cursor, "abc");
        assert!(!page.is_last());
        assert_eq!(page.items[0].item_id, "100");
        assert!(page.items[0].is_hidden);
    }

    #[test]
    fn test_get_items_last_page_with_null_items() {
        let page = GetItems::after(3, "abc")
            .decode(r#"{"Cursor":"","Items":null}"#)
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.is_last());
    }

    #[test]
    fn test_update_item_sends_only_supplied_fields() {
        let op = UpdateItem {
            item_id: "100".to_string(),
            patch: ItemPatch::new().labels(Labels::list(["x", "y", "z"])),
        };
        let req = op.request().unwrap();
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.segments, vec!["api", "item", "100"]);
        assert_eq!(req.body, Some(json!({"Labels": ["x", "y", "z"]})));
    }

    #[test]
    fn test_insert_items_is_batch() {
        let op = InsertItems {
            items: vec![Item::new("1"), Item::new("2")],
        };
        let req = op.request().unwrap();
        assert_eq!(req.segments, vec!["api", "items"]);
        assert_eq!(req.body.unwrap().as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_delete_item() {
        let req = DeleteItem {
            item_id: "100".to_string(),
        }
        .request()
        .unwrap();
        assert_eq!(req.method, Method::DELETE);
        assert!(req.body.is_none());
    }
}
