//! Request and response types for the Gorse API.
//!
//! These types mirror the server's JSON contract, which uses PascalCase field
//! names (`UserId`, `IsHidden`, `RowAffected`, ...).

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Go encodes empty slices as `null`; treat that as the default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Labels
// ─────────────────────────────────────────────────────────────────────────────

/// Labels attached to a user or an item.
///
/// Older servers take a flat list of strings; newer ones accept arbitrary
/// JSON objects keyed by label name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Labels {
    /// Plain list of labels.
    List(Vec<String>),
    /// Label-keyed attributes.
    Map(serde_json::Map<String, serde_json::Value>),
}

impl Labels {
    /// Build a list of labels.
    pub fn list<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Labels::List(labels.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self {
        Labels::List(labels)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Labels {
    fn from(labels: serde_json::Map<String, serde_json::Value>) -> Self {
        Labels::Map(labels)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// A user known to the recommender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// User ID.
    pub user_id: String,
    /// User labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    /// Subscribed categories.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscribe: Vec<String>,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
}

impl User {
    /// Create a user with only an ID.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }
}

/// Partial update of a user. Fields left at `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Option<Labels>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<Option<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Option<String>>,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(mut self, labels: impl Into<Labels>) -> Self {
        self.labels = Some(Some(labels.into()));
        self
    }

    pub fn subscribe<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subscribe = Some(Some(categories.into_iter().map(Into::into).collect()));
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(Some(comment.into()));
        self
    }

    /// Send an explicit `null` for the labels.
    pub fn clear_labels(mut self) -> Self {
        self.labels = Some(None);
        self
    }

    /// Send an explicit `null` for the comment.
    pub fn clear_comment(mut self) -> Self {
        self.comment = Some(None);
        self
    }

    /// True when no field would be sent.
    pub fn is_empty(&self) -> bool {
        self.labels.is_none() && self.subscribe.is_none() && self.comment.is_none()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Items
// ─────────────────────────────────────────────────────────────────────────────

/// An item that can be recommended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    /// Item ID.
    pub item_id: String,
    /// Hidden items are never recommended.
    #[serde(default)]
    pub is_hidden: bool,
    /// Item labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    /// Categories the item belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    /// ISO 8601 timestamp.
    #[serde(default)]
    pub timestamp: String,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
}

impl Item {
    /// Create a visible item with only an ID.
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            ..Default::default()
        }
    }
}

/// Partial update of an item.
///
/// Each field is tri-state: `None` leaves it out of the request body,
/// `Some(None)` sends `null`, `Some(Some(v))` sends the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<Option<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Option<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Option<Labels>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Option<String>>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = Some(Some(hidden));
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(Some(categories.into_iter().map(Into::into).collect()));
        self
    }

    pub fn labels(mut self, labels: impl Into<Labels>) -> Self {
        self.labels = Some(Some(labels.into()));
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(Some(timestamp.into()));
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(Some(comment.into()));
        self
    }

    /// Send an explicit `null` for the labels.
    pub fn clear_labels(mut self) -> Self {
        self.labels = Some(None);
        self
    }

    /// Send an explicit `null` for the categories.
    pub fn clear_categories(mut self) -> Self {
        self.categories = Some(None);
        self
    }

    /// True when no field would be sent.
    pub fn is_empty(&self) -> bool {
        self.is_hidden.is_none()
            && self.categories.is_none()
            && self.labels.is_none()
            && self.timestamp.is_none()
            && self.comment.is_none()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feedback
// ─────────────────────────────────────────────────────────────────────────────

/// A typed interaction between a user and an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Feedback {
    /// Feedback type, e.g. `like`, `read`, `star`.
    pub feedback_type: String,
    /// User ID.
    pub user_id: String,
    /// Item ID.
    pub item_id: String,
    /// Optional numeric strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// ISO 8601 timestamp.
    #[serde(default)]
    pub timestamp: String,
    /// Free-text comment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl Feedback {
    pub fn new(
        feedback_type: impl Into<String>,
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            feedback_type: feedback_type.into(),
            user_id: user_id.into(),
            item_id: item_id.into(),
            timestamp: timestamp.into(),
            ..Default::default()
        }
    }

    /// Attach a numeric value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Attach a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────────

/// An identifier with a score, as returned by neighbor and session queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Score {
    /// User or item ID.
    pub id: String,
    /// Score; higher is better.
    pub score: f64,
}

impl Score {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Acknowledgement of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RowAffected {
    /// Number of rows the server changed.
    pub row_affected: u64,
}

impl RowAffected {
    /// Fail unless exactly `expected` rows were affected.
    pub fn expect(self, expected: u64) -> Result<Self> {
        if self.row_affected == expected {
            Ok(self)
        } else {
            Err(Error::UnexpectedRowCount {
                expected,
                actual: self.row_affected,
            })
        }
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Entries on this page.
    pub items: Vec<T>,
    /// Opaque cursor for the next page; empty on the last page.
    pub cursor: String,
}

impl<T> Page<T> {
    /// True when there are no further pages.
    pub fn is_last(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Split into `(items, cursor)`.
    pub fn into_parts(self) -> (Vec<T>, String) {
        (self.items, self.cursor)
    }
}
