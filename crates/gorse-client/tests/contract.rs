//! Wire-level checks: exact paths, query strings, headers and bodies.

use std::time::Duration;

use gorse_client::{
    ClientConfig, Error, Feedback, GetRecommend, GorseClient, ItemPatch, Labels, Score, UserPatch,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "zhenghaoz";

fn row_affected(n: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "RowAffected": n }))
}

async fn client_for(server: &MockServer) -> GorseClient {
    GorseClient::new(&server.uri(), API_KEY).unwrap()
}

#[tokio::test]
async fn test_api_key_header_on_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/100"))
        .and(header("X-API-Key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ItemId": "100"})))
        .expect(1)
        .mount(&server)
        .await;

    let item = client_for(&server).await.get_item("100").await.unwrap();
    assert_eq!(item.item_id, "100");
}

#[tokio::test]
async fn test_entry_point_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/gorse/api/user/7"))
        .respond_with(row_affected(1))
        .expect(1)
        .mount(&server)
        .await;

    let client = GorseClient::new(&format!("{}/gorse/", server.uri()), API_KEY).unwrap();
    let rows = client.delete_user("7").await.unwrap();
    assert_eq!(rows.row_affected, 1);
}

#[tokio::test]
async fn test_non_200_status_carries_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("user missing not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.get_user("missing").await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::Api { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "user missing not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_201_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/item"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .insert_item(gorse_client::Item::new("1"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(201));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ItemId": "slow"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = GorseClient::builder()
        .entry_point(server.uri())
        .api_key(API_KEY)
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let err = client.get_item("slow").await.unwrap_err();
    assert!(err.is_timeout());
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_config_timeout_below_one_second_still_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ItemId": "fast"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), API_KEY).with_timeout(Duration::from_millis(500));
    assert_eq!(config.timeout(), Some(Duration::from_secs(1)));

    let client = GorseClient::from_config(&config).unwrap();
    let item = client.get_item("fast").await.unwrap();
    assert_eq!(item.item_id, "fast");
}

#[tokio::test]
async fn test_insert_feedback_sends_one_element_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/feedback"))
        .and(body_json(json!([{
            "FeedbackType": "read",
            "UserId": "100",
            "ItemId": "300",
            "Timestamp": "2022-11-20T13:55:27Z"
        }])))
        .respond_with(row_affected(1))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client_for(&server)
        .await
        .insert_feedback("read", "100", "300", "2022-11-20T13:55:27Z")
        .await
        .unwrap();
    assert_eq!(rows.row_affected, 1);
}

#[tokio::test]
async fn test_insert_feedbacks_reports_batch_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/feedback"))
        .respond_with(row_affected(3))
        .mount(&server)
        .await;

    let batch = (0..3)
        .map(|i| Feedback::new("like", "0", i.to_string(), "2022-01-01T00:00:00Z"))
        .collect();
    let rows = client_for(&server).await.insert_feedbacks(batch).await.unwrap();
    assert!(rows.expect(3).is_ok());
    assert!(rows.expect(2).is_err());
}

#[tokio::test]
async fn test_recommend_default_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/100"))
        .and(query_param("n", "10"))
        .and(query_param("offset", "0"))
        .and(query_param_is_missing("write-back-type"))
        .and(query_param_is_missing("write-back-delay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["1", "2", "3"])))
        .expect(1)
        .mount(&server)
        .await;

    let ids = client_for(&server).await.get_recommend("100").await.unwrap();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_recommend_in_category_with_write_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/100/tech"))
        .and(query_param("n", "3"))
        .and(query_param("offset", "3"))
        .and(query_param("write-back-type", "read"))
        .and(query_param("write-back-delay", "10m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let query = GetRecommend::new("100")
        .category("tech")
        .n(3)
        .offset(3)
        .write_back("read")
        .write_back_delay("10m");
    let ids = client_for(&server).await.get_recommend_with(query).await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_session_recommend_returns_scores_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/recommend"))
        .and(query_param("n", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": "9", "Score": 4},
            {"Id": "8", "Score": 3},
            {"Id": "7", "Score": 2}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        Feedback::new("like", "0", "1", "2010-01-01T01:01:01Z"),
        Feedback::new("like", "0", "2", "2010-01-01T01:01:01Z"),
    ];
    let scores = client_for(&server)
        .await
        .session_recommend(history, 3)
        .await
        .unwrap();
    assert_eq!(
        scores,
        vec![Score::new("9", 4.0), Score::new("8", 3.0), Score::new("7", 2.0)]
    );
}

#[tokio::test]
async fn test_item_patch_omits_unset_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/item/100"))
        .and(body_json(json!({"Labels": ["x"], "Categories": null})))
        .respond_with(row_affected(1))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ItemPatch::new().labels(Labels::list(["x"])).clear_categories();
    client_for(&server)
        .await
        .update_item("100", patch)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_user_patch_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/user/7"))
        .and(body_json(json!({"Subscribe": ["tech"]})))
        .respond_with(row_affected(1))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .update_user("7", UserPatch::new().subscribe(["tech"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_items_passes_cursor_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("n", "2"))
        .and(query_param("cursor", "opaque/token=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Cursor": "",
            "Items": [{"ItemId": "5"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .await
        .get_items(2, "opaque/token==")
        .await
        .unwrap();
    assert!(page.is_last());
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_ids_are_percent_encoded_as_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/a%2Fb%20c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ItemId": "a/b c"})))
        .expect(1)
        .mount(&server)
        .await;

    let item = client_for(&server).await.get_item("a/b c").await.unwrap();
    assert_eq!(item.item_id, "a/b c");
}

#[tokio::test]
async fn test_malformed_success_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/item/1/neighbors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.get_neighbors("1").await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_client_sends_same_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/7/neighbors"))
        .and(header("X-API-Key", API_KEY))
        .and(query_param("n", "10"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"Id": "8", "Score": 0.5}])))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let scores = tokio::task::spawn_blocking(move || {
        let client = gorse_client::blocking::GorseClient::new(&uri, API_KEY).unwrap();
        client.get_user_neighbors("7")
    })
    .await
    .unwrap()
    .unwrap();
    assert_eq!(scores, vec![Score::new("8", 0.5)]);
}
