//! Feedback API.

use crate::client::GorseClient;
use crate::contract::{ApiRequest, Operation, decode_json, decode_list};
use crate::error::Result;
use crate::types::{Feedback, RowAffected};

/// Insert a batch of feedback: `POST /api/feedback`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertFeedbacks {
    pub feedbacks: Vec<Feedback>,
}

impl InsertFeedbacks {
    pub fn new(feedbacks: Vec<Feedback>) -> Self {
        Self { feedbacks }
    }

    /// Wrap a single event in a one-element batch.
    pub fn single(feedback: Feedback) -> Self {
        Self {
            feedbacks: vec![feedback],
        }
    }
}

impl Operation for InsertFeedbacks {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        ApiRequest::post(["api", "feedback"]).json(&self.feedbacks)
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

/// List a user's feedback of one type: `GET /api/user/{user}/feedback/{type}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFeedbacks {
    pub feedback_type: String,
    pub user_id: String,
}

impl ListFeedbacks {
    pub fn new(feedback_type: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            feedback_type: feedback_type.into(),
            user_id: user_id.into(),
        }
    }
}

impl Operation for ListFeedbacks {
    type Output = Vec<Feedback>;

    fn request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::get([
            "api",
            "user",
            self.user_id.as_str(),
            "feedback",
            self.feedback_type.as_str(),
        ]))
    }

    fn decode(&self, body: &str) -> Result<Vec<Feedback>> {
        decode_list(body)
    }
}

/// Delete a user's feedback on an item:
/// `DELETE /api/user/{user}/feedback/{type}/{item}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteFeedback {
    pub feedback_type: String,
    pub user_id: String,
    pub item_id: String,
}

impl DeleteFeedback {
    pub fn new(
        feedback_type: impl Into<String>,
        user_id: impl Into<String>,
        item_id: impl Into<String>,
    ) -> Self {
        Self {
            feedback_type: feedback_type.into(),
            user_id: user_id.into(),
            item_id: item_id.into(),
        }
    }
}

impl Operation for DeleteFeedback {
    type Output = RowAffected;

    fn request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest::delete([
            "api",
            "user",
            self.user_id.as_str(),
            "feedback",
            self.feedback_type.as_str(),
            self.item_id.as_str(),
        ]))
    }

    fn decode(&self, body: &str) -> Result<RowAffected> {
        decode_json(body)
    }
}

impl GorseClient {
    /// Insert a single feedback event.
    pub async fn insert_feedback(
        &self,
        feedback_type: &str,
        user_id: &str,
        item_id: &str,
        timestamp: &str,
    ) -> Result<RowAffected> {
        let feedback = Feedback::new(feedback_type, user_id, item_id, timestamp);
        self.send(&InsertFeedbacks::single(feedback)).await
    }

    /// Insert a batch of feedback events.
    pub async fn insert_feedbacks(&self, feedbacks: Vec<Feedback>) -> Result<RowAffected> {
        self.send(&InsertFeedbacks::new(feedbacks)).await
    }

    /// List a user's feedback of one type.
    pub async fn list_feedbacks(
        &self,
        feedback_type: &str,
        user_id: &str,
    ) -> Result<Vec<Feedback>> {
        self.send(&ListFeedbacks::new(feedback_type, user_id)).await
    }

    /// Delete a user's feedback of one type on an item.
    pub async fn delete_feedback(
        &self,
        feedback_type: &str,
        user_id: &str,
        item_id: &str,
    ) -> Result<RowAffected> {
        self.send(&DeleteFeedback::new(feedback_type, user_id, item_id))
            .await
    }
}

#[cfg(feature = "blocking")]
impl crate::blocking::GorseClient {
    /// Insert a single feedback event.
    pub fn insert_feedback(
        &self,
        feedback_type: &str,
        user_id: &str,
        item_id: &str,
        timestamp: &str,
    ) -> Result<RowAffected> {
        let feedback = Feedback::new(feedback_type, user_id, item_id, timestamp);
        self.send(&InsertFeedbacks::single(feedback))
    }

    /// Insert a batch of feedback events.
    pub fn insert_feedbacks(&self, feedbacks: Vec<Feedback>) -> Result<RowAffected> {
        self.send(&InsertFeedbacks::new(feedbacks))
    }

    /// List a user's feedback of one type.
    pub fn list_feedbacks(&self, feedback_type: &str, user_id: &str) -> Result<Vec<Feedback>> {
        self.send(&ListFeedbacks::new(feedback_type, user_id))
    }

    /// Delete a user's feedback of one type on an item.
    pub fn delete_feedback(
        &self,
        feedback_type: &str,
        user_id: &str,
        item_id: &str,
    ) -> Result<RowAffected> {
        self.send(&DeleteFeedback::new(feedback_type, user_id, item_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn test_single_feedback_is_a_batch() {
        let feedback = Feedback::new("like", "100", "100", "2022-01-01T00:00:00Z");
        let op = InsertFeedbacks::single(feedback);
        let req = op.request().unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.segments, vec!["api", "feedback"]);
        assert_eq!(
            req.body,
            Some(json!([{
                "FeedbackType": "like",
                "UserId": "100",
                "ItemId": "100",
                "Timestamp": "2022-01-01T00:00:00Z"
            }]))
        );
    }

    #[test]
    fn test_list_feedbacks_path() {
        let req = ListFeedbacks::new("read", "100").request().unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.segments, vec!["api", "user", "100", "feedback", "read"]);
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn test_delete_feedback_path() {
        let req = DeleteFeedback::new("read", "100", "200").request().unwrap();
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(
            req.segments,
            vec!["api", "user", "100", "feedback", "read", "200"]
        );
    }

    #[test]
    fn test_decode_feedback_list() {
        let body = r#"[
            {"FeedbackType":"read","UserId":"100","ItemId":"200",
             "Timestamp":"2022-01-01T00:00:00Z","Comment":""},
            {"FeedbackType":"read","UserId":"100","ItemId":"300",
             "Timestamp":"2022-01-01T00:00:00Z","Comment":""}
        ]"#;
        let feedbacks = ListFeedbacks::new("read", "100").decode(body).unwrap();
        assert_eq!(feedbacks.len(), 2);
        assert_eq!(feedbacks[1].item_id, "300");
    }
}
