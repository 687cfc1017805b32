//! Integration tests for the HTTP client and the retrieval paginator,
//! exercised against a mock server: wire shapes, offset/count window math,
//! boundary behavior, and degradation of failed calls to empty results.

use httpmock::prelude::*;
use serde_json::json;

use vectorsearch_client::api::ApiClient;
use vectorsearch_client::config::ApiConfig;
use vectorsearch_client::search::Paginator;

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.base_url(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn search_body(ids: &[u64]) -> serde_json::Value {
    json!({
        "documents": ids
            .iter()
            .map(|id| {
                json!({
                    "document": format!("document {}", id),
                    "document_id": id,
                    "document_similarity": 0.9,
                    "centroid_similarity": 0.8,
                })
            })
            .collect::<Vec<_>>()
    })
}

fn page_ids(paginator: &Paginator) -> Vec<u64> {
    paginator
        .results()
        .unwrap()
        .iter()
        .map(|hit| hit.document_id)
        .collect()
}

#[tokio::test]
async fn categories_returns_names() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/categories")
                .json_body(json!({"owner": "owner-1"}));
            then.status(200)
                .json_body(json!({"category_names": ["General", "Science"]}));
        })
        .await;

    let api = client_for(&server);
    let names = api.categories("owner-1").await;

    mock.assert_async().await;
    assert_eq!(
        names,
        Some(vec!["General".to_string(), "Science".to_string()])
    );
}

#[tokio::test]
async fn failed_call_degrades_to_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/categories");
            then.status(500).body("boom");
        })
        .await;

    let api = client_for(&server);
    assert_eq!(api.categories("owner-1").await, None);
}

#[tokio::test]
async fn search_scenario_first_page_then_next_offsets() {
    // Searching "General" for "rust" with count=3, offset=0 returns a full
    // page; next() must then issue offset=3.
    let server = MockServer::start_async().await;
    let first_page = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/search").json_body(json!({
                "owner": "owner-1",
                "category": "General",
                "prefix": "General",
                "text": "rust",
                "count": 3,
                "offset": 0,
            }));
            then.status(200).json_body(search_body(&[1, 2, 3]));
        })
        .await;
    let second_page = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/search")
                .json_body_partial(r#"{"offset": 3}"#);
            then.status(200).json_body(search_body(&[4]));
        })
        .await;

    let api = client_for(&server);
    let mut paginator = Paginator::new(3, None);

    paginator.search(&api, "owner-1", "rust", "General", 1).await;
    first_page.assert_async().await;
    assert_eq!(page_ids(&paginator), vec![1, 2, 3]);
    assert!(paginator.has_next());

    paginator.next(&api, "owner-1").await;
    second_page.assert_async().await;
    assert_eq!(paginator.page(), 2);
    assert_eq!(page_ids(&paginator), vec![4]);
    // A page shorter than the window is the terminal-page signal.
    assert!(!paginator.has_next());
    assert!(paginator.has_previous());
}

#[tokio::test]
async fn next_then_previous_returns_to_prior_page() {
    let server = MockServer::start_async().await;
    let first_page = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/search")
                .json_body_partial(r#"{"offset": 0}"#);
            then.status(200).json_body(search_body(&[1, 2, 3]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/search")
                .json_body_partial(r#"{"offset": 3}"#);
            then.status(200).json_body(search_body(&[4, 5, 6]));
        })
        .await;

    let api = client_for(&server);
    let mut paginator = Paginator::new(3, None);

    paginator.search(&api, "owner-1", "rust", "General", 1).await;
    let shown = page_ids(&paginator);

    paginator.next(&api, "owner-1").await;
    assert_eq!(page_ids(&paginator), vec![4, 5, 6]);

    paginator.previous(&api, "owner-1").await;
    assert_eq!(paginator.page(), 1);
    assert_eq!(page_ids(&paginator), shown);
    // Page 1 was fetched twice: once by search, once by previous.
    first_page.assert_hits_async(2).await;
}

#[tokio::test]
async fn previous_on_page_one_issues_no_request() {
    let server = MockServer::start_async().await;
    let any_search = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/search");
            then.status(200).json_body(search_body(&[1, 2, 3]));
        })
        .await;

    let api = client_for(&server);
    let mut paginator = Paginator::new(3, None);

    paginator.search(&api, "owner-1", "rust", "General", 1).await;
    let shown = page_ids(&paginator);

    paginator.previous(&api, "owner-1").await;

    assert_eq!(paginator.page(), 1);
    assert_eq!(page_ids(&paginator), shown);
    any_search.assert_hits_async(1).await;
}

#[tokio::test]
async fn search_transport_failure_yields_empty_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/search");
            then.status(503).body("unavailable");
        })
        .await;

    let api = client_for(&server);
    let mut paginator = Paginator::new(3, None);

    paginator.search(&api, "owner-1", "rust", "General", 1).await;

    assert_eq!(paginator.results().unwrap().len(), 0);
    assert!(!paginator.has_next());
}

#[tokio::test]
async fn new_query_enters_at_page_one() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/search")
                .json_body_partial(r#"{"offset": 3}"#);
            then.status(200).json_body(search_body(&[4, 5, 6]));
        })
        .await;
    let fresh_query = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/search").json_body_partial(
                r#"{"text": "tokio", "offset": 0}"#,
            );
            then.status(200).json_body(search_body(&[9]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/search")
                .json_body_partial(r#"{"text": "rust", "offset": 0}"#);
            then.status(200).json_body(search_body(&[1, 2, 3]));
        })
        .await;

    let api = client_for(&server);
    let mut paginator = Paginator::new(3, None);

    paginator.search(&api, "owner-1", "rust", "General", 1).await;
    paginator.next(&api, "owner-1").await;
    assert_eq!(paginator.page(), 2);

    paginator
        .search(&api, "owner-1", "tokio", "General", 1)
        .await;
    fresh_query.assert_async().await;
    assert_eq!(paginator.page(), 1);
    assert_eq!(page_ids(&paginator), vec![9]);
}

#[tokio::test]
async fn delete_category_omits_document_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/delete/category")
                .json_body(json!({"owner": "owner-1", "category": "Science"}));
            then.status(200).json_body(json!({}));
        })
        .await;

    let api = client_for(&server);
    assert!(api.delete_category("owner-1", "Science").await);
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_document_carries_document_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/delete/category").json_body(
                json!({"owner": "owner-1", "category": "Science", "document_id": 42}),
            );
            then.status(200).json_body(json!({}));
        })
        .await;

    let api = client_for(&server);
    assert!(api.delete_document("owner-1", "Science", 42).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_owner_posts_owner() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/delete/owner")
                .json_body(json!({"owner": "owner-1"}));
            then.status(200).json_body(json!({}));
        })
        .await;

    let api = client_for(&server);
    assert!(api.delete_owner("owner-1").await);
    mock.assert_async().await;
}
