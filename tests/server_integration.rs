//! Integration tests for the HTTP routes, driven through `tower::ServiceExt::oneshot`.

mod support;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bookproxy_core::Settings;
use bookproxy_core::server::{AppState, create_router};
use support::{
    HASH_A, HASH_B, endpoints_for, metadata_body, metadata_body_without_hash, mirror_page,
    results_page,
};
use tower::ServiceExt; // for oneshot()
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn router_for(server: &MockServer, configure: impl FnOnce(&mut Settings)) -> Router {
    let mut settings = Settings {
        endpoints: endpoints_for(server),
        ..Settings::default()
    };
    configure(&mut settings);
    create_router(AppState::from_settings(settings).expect("state should build"))
}

async fn get(router: Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    router.oneshot(request).await.expect("router is infallible")
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect")
        .to_vec()
}

async fn mount_book(server: &MockServer, hash: &str) {
    Mock::given(method("GET"))
        .and(path("/json.php"))
        .and(query_param("md5", hash))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(metadata_body(hash, "Foo", "2020", "Bar", "pdf")),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let response = get(router_for(&server, |_| {}), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_versioned_search_returns_books_with_wire_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .and(query_param("req", "foo"))
        .and(query_param("res", "25"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[HASH_A])))
        .expect(1)
        .mount(&server)
        .await;
    mount_book(&server, HASH_A).await;

    let response = get(router_for(&server, |_| {}), "/v1/search/foo/25/2").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    let books = json.as_array().expect("array body");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["Title"], "Foo");
    assert_eq!(books[0]["Md5"], HASH_A);
    assert_eq!(books[0]["Isbn"], "9781234567890");
    assert_eq!(
        books[0]["Url"],
        format!("{}/get.php?md5={HASH_A}", server.uri())
    );
}

#[tokio::test]
async fn test_short_search_uses_configured_page_size_and_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .and(query_param("req", "foo"))
        .and(query_param("res", "30"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let response = get(router_for(&server, |s| s.page_size = 30), "/foo").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"[]");
}

#[tokio::test]
async fn test_search_failure_is_503_with_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let response = get(router_for(&server, |_| {}), "/v1/search/foo/10/1").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(json["error"]["code"], "search_unavailable");
    assert!(json["error"]["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn test_download_streams_file_with_headers() {
    let server = MockServer::start().await;
    mount_book(&server, HASH_A).await;
    let content = vec![42u8; 1000];
    Mock::given(method("GET"))
        .and(path("/get.php"))
        .and(query_param("md5", HASH_A))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ads.php"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for route in ["/v1/download/", "/download/"] {
        let response = get(router_for(&server, |_| {}), &format!("{route}{HASH_A}")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(headers[header::CONTENT_LENGTH], "1000");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=Foo (2020 - Bar).pdf"
        );
        assert_eq!(body_bytes(response).await, content);
    }
}

#[tokio::test]
async fn test_download_unknown_hash_is_empty_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json.php"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = get(router_for(&server, |_| {}), &format!("/download/{HASH_B}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_download_file_host_error_is_empty_200() {
    let server = MockServer::start().await;
    mount_book(&server, HASH_A).await;
    Mock::given(method("GET"))
        .and(path("/get.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = get(router_for(&server, |_| {}), &format!("/v1/download/{HASH_A}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_download_resolves_link_from_mirror_when_record_has_no_hash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json.php"))
        .and(query_param("md5", HASH_A))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(metadata_body_without_hash("Foo", "2020", "Bar", "pdf")),
        )
        .mount(&server)
        .await;
    let (_, page) = mirror_page(&server, HASH_A);
    Mock::given(method("GET"))
        .and(path("/ads.php"))
        .and(query_param("md5", HASH_A))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(&server)
        .await;
    let content = vec![9u8; 10];
    Mock::given(method("GET"))
        .and(path("/get.php"))
        .and(query_param("md5", HASH_A))
        .and(query_param("key", "ABCDEFGH12345678"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let response = get(router_for(&server, |_| {}), &format!("/download/{HASH_A}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=Foo (2020 - Bar).pdf"
    );
    assert_eq!(body_bytes(response).await, content);
}

#[tokio::test]
async fn test_download_resolves_link_when_metadata_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let (_, page) = mirror_page(&server, HASH_B);
    Mock::given(method("GET"))
        .and(path("/ads.php"))
        .and(query_param("md5", HASH_B))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get.php"))
        .and(query_param("md5", HASH_B))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"0123456789".to_vec()))
        .mount(&server)
        .await;

    let response = get(router_for(&server, |_| {}), &format!("/v1/download/{HASH_B}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"0123456789");
}
