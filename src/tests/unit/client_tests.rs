//! BaleenClient Unit Tests
//!
//! Runs the reqwest client against a wiremock server to check:
//! - Query-string encoding of page requests
//! - Endpoint paths and HTTP methods
//! - Error-status mapping and user-facing messages
//! - Reload-from-Niord bodies on failure statuses

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::api::{
    ApiError, BaleenApi, BaleenClient, ErrorKind, LogLevel, PageRequest, SortDirection, SortSpec,
};

fn client(server: &MockServer) -> BaleenClient {
    BaleenClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn dataset_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "mrn": format!("urn:mrn:s124:NW-{id}"),
        "uuid": null,
        "createdAt": "2025-03-01T10:00:00Z",
        "validFrom": null,
        "validTo": null,
        "dataProductVersion": "2.0.0",
        "geometryWkt": null,
        "referencedDatasetIds": []
    })
}

fn page_json(number: u32, content: Vec<serde_json::Value>, total: u64, pages: u32) -> serde_json::Value {
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": pages,
        "number": number,
        "size": 20,
        "first": number == 0,
        "last": number + 1 >= pages
    })
}

// =============================================================================
// Datasets
// =============================================================================

#[tokio::test]
async fn test_datasets_sends_paging_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/s124-datasets"))
        .and(query_param("page", "1"))
        .and(query_param("size", "20"))
        .and(query_param("sortBy", "createdAt"))
        .and(query_param("sortDirection", "DESC"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(1, (21..=40).map(dataset_json).collect(), 45, 3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = PageRequest::new(1, 20, SortSpec::new("createdAt", SortDirection::Desc));
    let page = client(&server).datasets(&request).await.unwrap();

    assert_eq!(page.total_elements, 45);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.number, 1);
    assert_eq!(page.content.len(), 20);
    assert_eq!(page.content[0].id, 21);
}

#[tokio::test]
async fn test_dataset_details_path() {
    let server = MockServer::start().await;
    let mut body = dataset_json(7);
    body["gml"] = json!("<S124:Dataset/>");
    Mock::given(method("GET"))
        .and(path("/api/s124-datasets/7/details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let detail = client(&server).dataset_details(7).await.unwrap();
    assert_eq!(detail.dataset.id, 7);
    assert_eq!(detail.gml.as_deref(), Some("<S124:Dataset/>"));
}

#[tokio::test]
async fn test_clear_datasets_uses_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/s124-datasets/clear"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).clear_datasets().await.unwrap();
}

#[tokio::test]
async fn test_niord_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/s124-datasets/niord-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"configured": true})))
        .mount(&server)
        .await;

    assert!(client(&server).niord_status().await.unwrap().configured);
}

// =============================================================================
// Reload from Niord
// =============================================================================

#[tokio::test]
async fn test_reload_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/s124-datasets/reload-from-niord"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "datasetsLoaded": 12, "message": "Loaded 12 datasets"
        })))
        .mount(&server)
        .await;

    let result = client(&server).reload_from_niord().await.unwrap();
    assert!(result.success);
    assert_eq!(result.datasets_loaded, 12);
}

#[tokio::test]
async fn test_reload_failure_body_on_500_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/s124-datasets/reload-from-niord"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false, "datasetsLoaded": 0, "message": "Niord unreachable"
        })))
        .mount(&server)
        .await;

    let result = client(&server).reload_from_niord().await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "Niord unreachable");
}

#[tokio::test]
async fn test_reload_failure_without_body_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/s124-datasets/reload-from-niord"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server).reload_from_niord().await.unwrap_err();
    assert_eq!(err.status(), 502);
}

#[tokio::test]
async fn test_reload_outlasts_regular_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/s124-datasets/reload-from-niord"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "success": true, "datasetsLoaded": 3, "message": "Loaded 3 datasets"
                }))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/s124-datasets/count"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("3")
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;

    let client = BaleenClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let err = client.dataset_count().await.unwrap_err();
    assert_eq!(err.status(), 0);

    let result = client.reload_from_niord().await.unwrap();
    assert!(result.success);
    assert_eq!(result.datasets_loaded, 3);
}

// =============================================================================
// Subscribers, logs, about
// =============================================================================

#[tokio::test]
async fn test_subscribers_list_and_clear() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscribers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "00000000-0000-0000-0000-000000000001",
            "dataProductType": "S124",
            "productVersion": null,
            "containerType": null,
            "unlocode": "DKCPH",
            "wkt": null,
            "subscriptionStart": "2025-01-01T00:00:00Z",
            "subscriptionEnd": null,
            "nodeMrn": "urn:mrn:mcp:device:node-1"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/subscribers"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let subscribers = api.subscribers().await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].unlocode.as_deref(), Some("DKCPH"));
    api.clear_subscribers().await.unwrap();
}

#[tokio::test]
async fn test_logs_sends_limit_and_parses_levels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"timestamp": "2025-03-01 10:00:00.000", "level": "WARN",
             "logger": "dk.dma.baleen.App", "message": "slow", "thread": "main"},
            {"timestamp": "2025-03-01 10:00:01.000", "level": "FATAL",
             "logger": "dk.dma.baleen.App", "message": "boom", "thread": "main"}
        ])))
        .mount(&server)
        .await;

    let logs = client(&server).logs(1000).await.unwrap();
    assert_eq!(logs[0].level, LogLevel::Warn);
    assert_eq!(logs[1].level, LogLevel::Other("FATAL".into()));
}

#[tokio::test]
async fn test_log_count_unwraps_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 314})))
        .mount(&server)
        .await;

    assert_eq!(client(&server).log_count().await.unwrap(), 314);
}

#[tokio::test]
async fn test_dataset_count_is_bare_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/s124-datasets/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("45"))
        .mount(&server)
        .await;

    assert_eq!(client(&server).dataset_count().await.unwrap(), 45);
}

#[tokio::test]
async fn test_about_and_database_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/about"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"backendUrl": "", "version": "1.4.0"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/about/database/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Database connection successful",
            "databaseInfo": {"product": "PostgreSQL", "version": "16.2", "driver": "pgjdbc"}
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    assert_eq!(api.about().await.unwrap().version, "1.4.0");
    let test = api.test_database().await.unwrap();
    assert!(test.success);
    assert_eq!(test.database_info.unwrap().product, "PostgreSQL");
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn test_404_maps_to_not_found_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscribers"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).subscribers().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.describe("subscribers"),
        "Subscribers endpoint not found. The API might not be deployed correctly."
    );
}

#[tokio::test]
async fn test_500_maps_to_server_fault() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/s124-datasets"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": 500, "error": "Internal Server Error", "message": "db down"
        })))
        .mount(&server)
        .await;

    let request = PageRequest::new(0, 20, SortSpec::default_for("createdAt"));
    let err = client(&server).datasets(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, ref message } if message == "db down"));
    assert_eq!(
        err.describe("datasets"),
        "Server error occurred. Check the backend logs for details."
    );
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/about/database"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).database_info().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { status: 200, .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_connectivity() {
    // Port 9 (discard) is closed on test hosts; the connect fails immediately.
    let api = BaleenClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = api.logs(10).await.unwrap_err();
    assert_eq!(err.status(), 0);
    assert_eq!(
        err.describe("logs"),
        "Cannot connect to the server. Make sure the Baleen backend is running."
    );
}
