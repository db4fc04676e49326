//! Recommendation and similarity API.

use crate::client::GorseClient;
use crate::contract::{ApiRequest, DEFAULT_N, Operation, decode_list};
use crate::error::Result;
use crate::types::{Feedback, Score};

/// Personalized recommendation: `GET /api/recommend/{user}[/{category}]`.
///
/// When a write-back type is set the server also records the returned items
/// as feedback of that type, optionally after `write_back_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRecommend {
    pub user_id: String,
    pub category: Option<String>,
    pub n: usize,
    pub offset: usize,
    pub write_back_type: Option<String>,
    pub write_back_delay: Option<String>,
}

impl GetRecommend {
    /// Top 10 for a user, across all categories.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            category: None,
            n: DEFAULT_N,
            offset: 0,
            write_back_type: None,
            write_back_delay: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn write_back(mut self, feedback_type: impl Into<String>) -> Self {
        self.write_back_type = Some(feedback_type.into());
        self
    }

    /// Delay before the write-back, in the server's duration syntax (`10m`).
    pub fn write_back_delay(mut self, delay: impl Into<String>) -> Self {
        self.write_back_delay = Some(delay.into());
        self
    }
}

impl Operation for GetRecommend {
    type Output = Vec<String>;

    fn request(&self) -> Result<ApiRequest> {
        let mut segments = vec!["api", "recommend", self.user_id.as_str()];
        if let Some(category) = &self.category {
            segments.push(category.as_str());
        }
        Ok(ApiRequest::get(segments)
            .query("n", self.n)
            .query("offset", self.offset)
            .query_opt("write-back-type", self.write_back_type.as_deref())
            .query_opt("write-back-delay", self.write_back_delay.as_deref()))
    }

    fn decode(&self, body: &str) -> Result<Vec<String>> {
        decode_list(body)
    }
}

/// Recommendation from an inline feedback history:
/// `POST /api/session/recommend?n=`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecommend {
    pub feedbacks: Vec<Feedback>,
    pub n: usize,
}

impl SessionRecommend {
    pub fn new(feedbacks: Vec<Feedback>) -> Self {
        Self {
            feedbacks,
            n: DEFAULT_N,
        }
    }

    pub fn n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }
}

impl Operation for SessionRecommend {
    type Output = Vec<Score>;

    fn request(&self) -> Result<ApiRequest> {
        ApiRequest::post(["api", "session", "recommend"])
            .query("n", self.n)
            .json(&self.feedbacks)
    }

    fn decode(&self, body: &str) -> Result<Vec<Score>> {
        decode_list(body)
    }
}

/// Which kind of entity a neighbor query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborKind {
    Item,
    User,
}

/// Similar items or users:
/// `GET /api/item/{id}/neighbors` or `GET /api/user/{id}/neighbors`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetNeighbors {
    pub kind: NeighborKind,
    pub id: String,
    pub n: usize,
    pub offset: usize,
}

impl GetNeighbors {
    /// Items similar to an item.
    pub fn item(item_id: impl Into<String>) -> Self {
        Self {
            kind: NeighborKind::Item,
            id: item_id.into(),
            n: DEFAULT_N,
            offset: 0,
        }
    }

    /// Users similar to a user.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            kind: NeighborKind::User,
            ..Self::item(user_id)
        }
    }

    pub fn n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl Operation for GetNeighbors {
    type Output = Vec<Score>;

    fn request(&self) -> Result<ApiRequest> {
        let kind = match self.kind {
            NeighborKind::Item => "item",
            NeighborKind::User => "user",
        };
        Ok(ApiRequest::get(["api", kind, self.id.as_str(), "neighbors"])
            .query("n", self.n)
            .query("offset", self.offset))
    }

    fn decode(&self, body: &str) -> Result<Vec<Score>> {
        decode_list(body)
    }
}

impl GorseClient {
    /// Top 10 recommended item IDs for a user.
    pub async fn get_recommend(&self, user_id: &str) -> Result<Vec<String>> {
        self.send(&GetRecommend::new(user_id)).await
    }

    /// Recommended item IDs with category, paging and write-back options.
    pub async fn get_recommend_with(&self, query: GetRecommend) -> Result<Vec<String>> {
        self.send(&query).await
    }

    /// Top `n` items for an inline feedback history.
    pub async fn session_recommend(
        &self,
        feedbacks: Vec<Feedback>,
        n: usize,
    ) -> Result<Vec<Score>> {
        self.send(&SessionRecommend::new(feedbacks).n(n)).await
    }

    /// Top 10 items similar to an item.
    pub async fn get_neighbors(&self, item_id: &str) -> Result<Vec<Score>> {
        self.send(&GetNeighbors::item(item_id)).await
    }

    /// Similar items or users with explicit paging.
    pub async fn get_neighbors_with(&self, query: GetNeighbors) -> Result<Vec<Score>> {
        self.send(&query).await
    }

    /// Top 10 users similar to a user.
    pub async fn get_user_neighbors(&self, user_id: &str) -> Result<Vec<Score>> {
        self.send(&GetNeighbors::user(user_id)).await
    }
}

#[cfg(feature = "blocking")]
impl crate::blocking::GorseClient {
    /// Top 10 recommended item IDs for a user.
    pub fn get_recommend(&self, user_id: &str) -> Result<Vec<String>> {
        self.send(&GetRecommend::new(user_id))
    }

    /// Recommended item IDs with category, paging and write-back options.
    pub fn get_recommend_with(&self, query: GetRecommend) -> Result<Vec<String>> {
        self.send(&query)
    }

    /// Top `n` items for an inline feedback history.
    pub fn session_recommend(&self, feedbacks: Vec<Feedback>, n: usize) -> Result<Vec<Score>> {
        self.send(&SessionRecommend::new(feedbacks).n(n))
    }

    /// Top 10 items similar to an item.
    pub fn get_neighbors(&self, item_id: &str) -> Result<Vec<Score>> {
        self.send(&GetNeighbors::item(item_id))
    }

    /// Similar items or users with explicit paging.
    pub fn get_neighbors_with(&self, query: GetNeighbors) -> Result<Vec<Score>> {
        self.send(&query)
    }

    /// Top 10 users similar to a user.
    pub fn get_user_neighbors(&self, user_id: &str) -> Result<Vec<Score>> {
        self.send(&GetNeighbors::user(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use url::Url;

    fn url_of(op: &impl Operation) -> String {
        let base = Url::parse("http://127.0.0.1:8088").unwrap();
        op.request().unwrap().url(&base).unwrap().to_string()
    }

    #[test]
    fn test_recommend_defaults() {
        assert_eq!(
            url_of(&GetRecommend::new("100")),
            "http://127.0.0.1:8088/api/recommend/100?n=10&offset=0"
        );
    }

    #[test]
    fn test_recommend_with_category_and_write_back() {
        let op = GetRecommend::new("100")
            .category("tech")
            .n(3)
            .offset(6)
            .write_back("read")
            .write_back_delay("10m");
        assert_eq!(
            url_of(&op),
            concat!(
                "http://127.0.0.1:8088/api/recommend/100/tech",
                "?n=3&offset=6&write-back-type=read&write-back-delay=10m"
            )
        );
    }

    #[test]
    fn test_session_recommend_request() {
        let history = vec![Feedback::new("like", "0", "1", "2010-01-01T01:01:01")];
        let op = SessionRecommend::new(history).n(3);
        let req = op.request().unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.segments, vec!["api", "session", "recommend"]);
        assert_eq!(req.query, vec![("n", "3".to_string())]);
        assert_eq!(req.body.unwrap().as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_neighbors_paths() {
        assert_eq!(
            url_of(&GetNeighbors::item("100")),
            "http://127.0.0.1:8088/api/item/100/neighbors?n=10&offset=0"
        );
        assert_eq!(
            url_of(&GetNeighbors::user("7").n(5).offset(5)),
            "http://127.0.0.1:8088/api/user/7/neighbors?n=5&offset=5"
        );
    }

    #[test]
    fn test_scores_keep_server_order() {
        let scores = GetNeighbors::item("100")
            .decode(r#"[{"Id":"3","Score":3},{"Id":"2","Score":2},{"Id":"1","Score":1}]"#)
            .unwrap();
        let ids: Vec<&str> = scores.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert_eq!(scores[0], Score::new("3", 3.0));
    }
}
