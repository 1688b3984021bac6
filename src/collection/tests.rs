//! Tests for collection iteration

use super::*;
use crate::client::{Client, ClientConfig};
use crate::error::ErrorKind;
use crate::http::{HttpTransport, Transport};
use futures::{pin_mut, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn records(range: std::ops::Range<u64>) -> Vec<Value> {
    range.map(|id| json!({ "id": id })).collect()
}

fn ids(records: &[Value]) -> Vec<u64> {
    records.iter().map(|r| r["id"].as_u64().unwrap()).collect()
}

/// Mount `pages` pages of 20 records each, every page expected exactly once
async fn mount_pages(server: &MockServer, pages: u64) {
    for page in 1..=pages {
        let start = (page - 1) * 20;
        Mock::given(method("GET"))
            .and(path("/api/things"))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": records(start..start + 20),
                "pages": pages,
                "total": pages * 20,
            })))
            .expect(1)
            .mount(server)
            .await;
    }
}

async fn things(server: &MockServer) -> Resource {
    Client::new(&format!("{}/api", server.uri()))
        .unwrap()
        .resource("things")
        .unwrap()
}

// ============================================================================
// each / each_page
// ============================================================================

#[tokio::test]
async fn test_each_walks_all_pages_in_order() {
    let server = MockServer::start().await;
    mount_pages(&server, 3).await;

    let all = things(&server).await.records().await.unwrap();

    assert_eq!(all.len(), 60);
    assert_eq!(ids(&all), (0..60).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_each_page_yields_responses() {
    let server = MockServer::start().await;
    mount_pages(&server, 3).await;

    let pages = things(&server).await.pages().await.unwrap();

    assert_eq!(pages.len(), 3);
    for response in &pages {
        assert_eq!(response.status(), 200);
        assert_eq!(response.page().unwrap().results.len(), 20);
    }
}

#[tokio::test]
async fn test_each_is_lazy() {
    let server = MockServer::start().await;

    // Only the first page may be requested
    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": records(0..20),
            "pages": 3,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stream = things(&server).await.each();
    pin_mut!(stream);

    let first_five: Vec<Value> = stream.take(5).map(|r| r.unwrap()).collect().await;

    assert_eq!(ids(&first_five), vec![0, 1, 2, 3, 4]);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_each_is_restartable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": records(0..2),
            "pages": 1,
        })))
        .expect(2)
        .mount(&server)
        .await;

    let resource = things(&server).await;
    let first_run = resource.records().await.unwrap();
    let second_run = resource.records().await.unwrap();

    assert_eq!(first_run, second_run);
}

#[tokio::test]
async fn test_caller_per_page_wins() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": records(0..5),
            "pages": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let all = things(&server)
        .await
        .query([("per_page", 5)])
        .records()
        .await
        .unwrap();

    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn test_client_per_page_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": records(0..3),
            "pages": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new().unwrap());
    let client = Client::with_transport(
        &format!("{}/api", server.uri()),
        transport,
        ClientConfig::default().per_page(50),
    )
    .unwrap();

    let all = client.resource("things").unwrap().records().await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_missing_pages_means_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": records(0..4),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let all = things(&server).await.records().await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_each_propagates_failed_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": records(0..20),
            "pages": 2,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = things(&server).await.records().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestFailed);
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_each_rejects_page_without_results_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1}],
            "pages": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = things(&server).await.records().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert!(err.to_string().contains("'results'"));
}

#[tokio::test]
async fn test_each_page_accepts_whole_float_page_count() {
    let server = MockServer::start().await;

    for page in 1..=3u64 {
        let start = (page - 1) * 20;
        Mock::given(method("GET"))
            .and(path("/api/things"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": records(start..start + 20),
                "pages": 3.0,
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let all = things(&server).await.records().await.unwrap();
    assert_eq!(ids(&all), (0..60).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_each_page_rejects_unreadable_page_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": records(0..20),
            "pages": "many",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stream = things(&server).await.each_page();
    pin_mut!(stream);

    let err = stream.try_next().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert!(err.to_string().contains("'pages'"));
}

// ============================================================================
// count / first / is_empty
// ============================================================================

#[tokio::test]
async fn test_count_issues_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": records(0..1),
            "pages": 60,
            "total": 60,
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(things(&server).await.count().await.unwrap(), 60);
}

#[tokio::test]
async fn test_count_without_total() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let err = things(&server).await.count().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
}

#[tokio::test]
async fn test_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 7}],
            "total": 12,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = things(&server).await.first().await.unwrap();
    assert_eq!(record, json!({"id": 7}));
}

#[tokio::test]
async fn test_first_on_empty_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "total": 0,
        })))
        .mount(&server)
        .await;

    let resource = things(&server).await;
    let err = resource.first().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyCollection);
    assert!(resource.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_first_propagates_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/things"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = things(&server).await.first().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestFailed);
}

// ============================================================================
// while_results
// ============================================================================

#[tokio::test]
async fn test_while_results_drains_until_empty() {
    let server = MockServer::start().await;

    // Mocks are matched in mount order; each serves once
    for batch in [records(0..3), records(3..5)] {
        Mock::given(method("GET"))
            .and(path("/api/queue"))
            .and(query_param_is_missing("page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": batch })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let queue = Client::new(&format!("{}/api", server.uri()))
        .unwrap()
        .resource("queue")
        .unwrap();
    let drained: Vec<Value> = queue.while_results().try_collect().await.unwrap();

    assert_eq!(ids(&drained), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_while_results_raises_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 1}]})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/queue"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let queue = Client::new(&format!("{}/api", server.uri()))
        .unwrap()
        .resource("queue")
        .unwrap();
    let results: Vec<Result<Record>> = queue.while_results().collect().await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert_eq!(results[1].as_ref().unwrap_err().status(), Some(500));
}

#[tokio::test]
async fn test_while_results_stops_when_results_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 1}]})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "idle"})))
        .expect(1)
        .mount(&server)
        .await;

    let queue = Client::new(&format!("{}/api", server.uri()))
        .unwrap()
        .resource("queue")
        .unwrap();
    let drained: Vec<Value> = queue.while_results().try_collect().await.unwrap();

    assert_eq!(ids(&drained), vec![1]);
}
