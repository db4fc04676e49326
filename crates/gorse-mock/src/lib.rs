//! In-memory fake of the Gorse REST API.
//!
//! Serves users, items and feedback with the same paths, query parameters
//! and JSON shapes as a real Gorse server, backed by ordered maps. Nothing is
//! ranked here: recommendation and neighbor lists are seeded by the caller
//! and served in descending score order.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::ops::Bound;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock, task::JoinHandle};

/// Header checked against the configured key.
pub const API_KEY_HEADER: &str = "x-api-key";

const DEFAULT_N: usize = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub labels: serde_json::Value,
    #[serde(default)]
    pub subscribe: Vec<String>,
    #[serde(default)]
    pub comment: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    pub item_id: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub labels: serde_json::Value,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Feedback {
    pub feedback_type: String,
    pub user_id: String,
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Score {
    pub id: String,
    pub score: f64,
}

/// `null` and missing fields both leave the stored value alone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemPatch {
    is_hidden: Option<bool>,
    categories: Option<Vec<String>>,
    labels: Option<serde_json::Value>,
    timestamp: Option<String>,
    comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserPatch {
    labels: Option<serde_json::Value>,
    subscribe: Option<Vec<String>>,
    comment: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RowAffected {
    row_affected: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ItemIterator {
    cursor: String,
    items: Vec<Item>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct UserIterator {
    cursor: String,
    users: Vec<User>,
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    n: usize,
    #[serde(default)]
    cursor: String,
}

fn default_n() -> usize {
    DEFAULT_N
}

#[derive(Deserialize)]
struct SessionQuery {
    #[serde(default = "default_n")]
    n: usize,
}

#[derive(Deserialize)]
struct RankQuery {
    #[serde(default = "default_n")]
    n: usize,
    #[serde(default)]
    offset: usize,
    #[serde(rename = "write-back-type")]
    write_back_type: Option<String>,
    #[serde(rename = "write-back-delay")]
    write_back_delay: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Store {
    users: BTreeMap<String, User>,
    items: BTreeMap<String, Item>,
    /// Keyed by (user, feedback type, item).
    feedback: BTreeMap<(String, String, String), Feedback>,
    /// Keyed by (user, category); the empty category is the global list.
    recommend: HashMap<(String, String), Vec<Score>>,
    item_neighbors: HashMap<String, Vec<Score>>,
    user_neighbors: HashMap<String, Vec<Score>>,
    /// Candidates for session recommendation.
    session: Vec<Score>,
}

impl Store {
    fn put_feedback(&mut self, feedback: Feedback) {
        let key = (
            feedback.user_id.clone(),
            feedback.feedback_type.clone(),
            feedback.item_id.clone(),
        );
        self.feedback.insert(key, feedback);
    }
}

/// One page of an ordered map. The cursor is the key the next page starts at.
fn page<T: Clone>(map: &BTreeMap<String, T>, n: usize, cursor: &str) -> (Vec<T>, String) {
    let n = if n == 0 { usize::MAX } else { n };
    let mut entries = map.range::<str, _>((Bound::Included(cursor), Bound::Unbounded));
    let items = entries.by_ref().take(n).map(|(_, v)| v.clone()).collect();
    let next = entries.next().map(|(k, _)| k.clone()).unwrap_or_default();
    (items, next)
}

fn window(scores: Option<&Vec<Score>>, n: usize, offset: usize) -> Vec<Score> {
    scores
        .map(|s| s.iter().skip(offset).take(n).cloned().collect())
        .unwrap_or_default()
}

fn sorted(scores: &[(&str, f64)]) -> Vec<Score> {
    let mut scores: Vec<Score> = scores
        .iter()
        .map(|(id, score)| Score {
            id: id.to_string(),
            score: *score,
        })
        .collect();
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

/// A fake Gorse server with its own store.
#[derive(Clone)]
pub struct MockGorse {
    api_key: Arc<str>,
    store: Arc<RwLock<Store>>,
}

/// A running fake server; stops when dropped.
pub struct MockServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Entry point to hand to a client.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockGorse {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Arc::from(api_key.into()),
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    /// Seed the recommendation list of a user, optionally per category.
    pub async fn seed_recommend(
        &self,
        user_id: &str,
        category: Option<&str>,
        scores: &[(&str, f64)],
    ) {
        let key = (user_id.to_string(), category.unwrap_or_default().to_string());
        self.store.write().await.recommend.insert(key, sorted(scores));
    }

    /// Seed the neighbors of an item.
    pub async fn seed_item_neighbors(&self, item_id: &str, scores: &[(&str, f64)]) {
        self.store
            .write()
            .await
            .item_neighbors
            .insert(item_id.to_string(), sorted(scores));
    }

    /// Seed the neighbors of a user.
    pub async fn seed_user_neighbors(&self, user_id: &str, scores: &[(&str, f64)]) {
        self.store
            .write()
            .await
            .user_neighbors
            .insert(user_id.to_string(), sorted(scores));
    }

    /// Seed the candidates for session recommendation. Items already in the
    /// posted history are left out of the answer.
    pub async fn seed_session(&self, scores: &[(&str, f64)]) {
        self.store.write().await.session = sorted(scores);
    }

    /// All stored feedback, ordered by (user, type, item).
    pub async fn feedback(&self) -> Vec<Feedback> {
        self.store.read().await.feedback.values().cloned().collect()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/feedback", post(insert_feedback))
            .route("/api/user/{user_id}/feedback/{feedback_type}", get(list_feedback))
            .route(
                "/api/user/{user_id}/feedback/{feedback_type}/{item_id}",
                delete(delete_feedback),
            )
            .route("/api/recommend/{user_id}", get(recommend))
            .route("/api/recommend/{user_id}/{category}", get(recommend_in_category))
            .route("/api/session/recommend", post(session_recommend))
            .route("/api/item/{item_id}/neighbors", get(item_neighbors))
            .route("/api/user/{user_id}/neighbors", get(user_neighbors))
            .route("/api/item", post(insert_item))
            .route("/api/items", get(list_items).post(insert_items))
            .route(
                "/api/item/{item_id}",
                get(get_item).patch(update_item).delete(delete_item),
            )
            .route("/api/user", post(insert_user))
            .route("/api/users", get(list_users).post(insert_users))
            .route(
                "/api/user/{user_id}",
                get(get_user).patch(update_user).delete(delete_user),
            )
            .layer(middleware::from_fn_with_state(self.clone(), require_api_key))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral local port.
    pub async fn start(&self) -> std::io::Result<MockServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock gorse server stopped");
            }
        });
        Ok(MockServer { addr, handle })
    }

    /// Serve on a listener until the process exits.
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }
}

async fn require_api_key(State(mock): State<MockGorse>, request: Request, next: Next) -> Response {
    tracing::debug!(method = %request.method(), uri = %request.uri(), "mock gorse request");
    let key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if key != Some(&*mock.api_key) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    next.run(request).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

type Reply<T> = Result<Json<T>, (StatusCode, String)>;

fn not_found(what: &str, id: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{} {} not found", what, id))
}

fn bad_request(message: &str) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, message.to_string())
}

async fn insert_feedback(
    State(mock): State<MockGorse>,
    Json(batch): Json<Vec<Feedback>>,
) -> Reply<RowAffected> {
    if batch
        .iter()
        .any(|f| f.feedback_type.is_empty() || f.user_id.is_empty() || f.item_id.is_empty())
    {
        return Err(bad_request("feedback type, user id and item id are required"));
    }
    let mut store = mock.store.write().await;
    let row_affected = batch.len();
    for feedback in batch {
        store.put_feedback(feedback);
    }
    Ok(Json(RowAffected { row_affected }))
}

async fn list_feedback(
    State(mock): State<MockGorse>,
    Path((user_id, feedback_type)): Path<(String, String)>,
) -> Json<Vec<Feedback>> {
    let store = mock.store.read().await;
    Json(
        store
            .feedback
            .values()
            .filter(|f| f.user_id == user_id && f.feedback_type == feedback_type)
            .cloned()
            .collect(),
    )
}

async fn delete_feedback(
    State(mock): State<MockGorse>,
    Path((user_id, feedback_type, item_id)): Path<(String, String, String)>,
) -> Json<RowAffected> {
    let removed = mock
        .store
        .write()
        .await
        .feedback
        .remove(&(user_id, feedback_type, item_id));
    Json(RowAffected {
        row_affected: usize::from(removed.is_some()),
    })
}

async fn ranked(
    mock: &MockGorse,
    user_id: String,
    category: String,
    query: RankQuery,
) -> Vec<String> {
    let mut store = mock.store.write().await;
    let ids: Vec<String> = window(
        store.recommend.get(&(user_id.clone(), category)),
        query.n,
        query.offset,
    )
    .into_iter()
    .map(|s| s.id)
    .collect();

    // Delay is accepted but not simulated.
    if let Some(feedback_type) = query.write_back_type {
        tracing::debug!(delay = ?query.write_back_delay, "write-back requested");
        for item_id in &ids {
            store.put_feedback(Feedback {
                feedback_type: feedback_type.clone(),
                user_id: user_id.clone(),
                item_id: item_id.clone(),
                ..Default::default()
            });
        }
    }
    ids
}

async fn recommend(
    State(mock): State<MockGorse>,
    Path(user_id): Path<String>,
    Query(query): Query<RankQuery>,
) -> Json<Vec<String>> {
    Json(ranked(&mock, user_id, String::new(), query).await)
}

async fn recommend_in_category(
    State(mock): State<MockGorse>,
    Path((user_id, category)): Path<(String, String)>,
    Query(query): Query<RankQuery>,
) -> Json<Vec<String>> {
    Json(ranked(&mock, user_id, category, query).await)
}

async fn session_recommend(
    State(mock): State<MockGorse>,
    Query(query): Query<SessionQuery>,
    Json(history): Json<Vec<Feedback>>,
) -> Json<Vec<Score>> {
    let store = mock.store.read().await;
    Json(
        store
            .session
            .iter()
            .filter(|s| !history.iter().any(|f| f.item_id == s.id))
            .take(query.n)
            .cloned()
            .collect(),
    )
}

async fn item_neighbors(
    State(mock): State<MockGorse>,
    Path(item_id): Path<String>,
    Query(query): Query<RankQuery>,
) -> Json<Vec<Score>> {
    let store = mock.store.read().await;
    Json(window(store.item_neighbors.get(&item_id), query.n, query.offset))
}

async fn user_neighbors(
    State(mock): State<MockGorse>,
    Path(user_id): Path<String>,
    Query(query): Query<RankQuery>,
) -> Json<Vec<Score>> {
    let store = mock.store.read().await;
    Json(window(store.user_neighbors.get(&user_id), query.n, query.offset))
}

async fn insert_item(State(mock): State<MockGorse>, Json(item): Json<Item>) -> Reply<RowAffected> {
    insert_items(State(mock), Json(vec![item])).await
}

async fn insert_items(
    State(mock): State<MockGorse>,
    Json(items): Json<Vec<Item>>,
) -> Reply<RowAffected> {
    if items.iter().any(|i| i.item_id.is_empty()) {
        return Err(bad_request("item id is required"));
    }
    let mut store = mock.store.write().await;
    let row_affected = items.len();
    for item in items {
        store.items.insert(item.item_id.clone(), item);
    }
    Ok(Json(RowAffected { row_affected }))
}

async fn get_item(State(mock): State<MockGorse>, Path(item_id): Path<String>) -> Reply<Item> {
    let store = mock.store.read().await;
    store
        .items
        .get(&item_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("item", &item_id))
}

async fn update_item(
    State(mock): State<MockGorse>,
    Path(item_id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> Reply<RowAffected> {
    let mut store = mock.store.write().await;
    let item = store
        .items
        .get_mut(&item_id)
        .ok_or_else(|| not_found("item", &item_id))?;
    if let Some(is_hidden) = patch.is_hidden {
        item.is_hidden = is_hidden;
    }
    if let Some(categories) = patch.categories {
        item.categories = categories;
    }
    if let Some(labels) = patch.labels {
        item.labels = labels;
    }
    if let Some(timestamp) = patch.timestamp {
        item.timestamp = timestamp;
    }
    if let Some(comment) = patch.comment {
        item.comment = comment;
    }
    Ok(Json(RowAffected { row_affected: 1 }))
}

async fn delete_item(
    State(mock): State<MockGorse>,
    Path(item_id): Path<String>,
) -> Json<RowAffected> {
    let mut store = mock.store.write().await;
    let removed = store.items.remove(&item_id).is_some();
    store.feedback.retain(|(_, _, item), _| *item != item_id);
    Json(RowAffected {
        row_affected: usize::from(removed),
    })
}

async fn list_items(
    State(mock): State<MockGorse>,
    Query(query): Query<PageQuery>,
) -> Json<ItemIterator> {
    let store = mock.store.read().await;
    let (items, cursor) = page(&store.items, query.n, &query.cursor);
    Json(ItemIterator { cursor, items })
}

async fn insert_user(State(mock): State<MockGorse>, Json(user): Json<User>) -> Reply<RowAffected> {
    insert_users(State(mock), Json(vec![user])).await
}

async fn insert_users(
    State(mock): State<MockGorse>,
    Json(users): Json<Vec<User>>,
) -> Reply<RowAffected> {
    if users.iter().any(|u| u.user_id.is_empty()) {
        return Err(bad_request("user id is required"));
    }
    let mut store = mock.store.write().await;
    let row_affected = users.len();
    for user in users {
        store.users.insert(user.user_id.clone(), user);
    }
    Ok(Json(RowAffected { row_affected }))
}

async fn get_user(State(mock): State<MockGorse>, Path(user_id): Path<String>) -> Reply<User> {
    let store = mock.store.read().await;
    store
        .users
        .get(&user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("user", &user_id))
}

async fn update_user(
    State(mock): State<MockGorse>,
    Path(user_id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Reply<RowAffected> {
    let mut store = mock.store.write().await;
    let user = store
        .users
        .get_mut(&user_id)
        .ok_or_else(|| not_found("user", &user_id))?;
    if let Some(labels) = patch.labels {
        user.labels = labels;
    }
    if let Some(subscribe) = patch.subscribe {
        user.subscribe = subscribe;
    }
    if let Some(comment) = patch.comment {
        user.comment = comment;
    }
    Ok(Json(RowAffected { row_affected: 1 }))
}

async fn delete_user(
    State(mock): State<MockGorse>,
    Path(user_id): Path<String>,
) -> Json<RowAffected> {
    let mut store = mock.store.write().await;
    let removed = store.users.remove(&user_id).is_some();
    store.feedback.retain(|(user, _, _), _| *user != user_id);
    Json(RowAffected {
        row_affected: usize::from(removed),
    })
}

async fn list_users(
    State(mock): State<MockGorse>,
    Query(query): Query<PageQuery>,
) -> Json<UserIterator> {
    let store = mock.store.read().await;
    let (users, cursor) = page(&store.users, query.n, &query.cursor);
    Json(UserIterator { cursor, users })
}
