use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use labelpress::{
    AssetRecord, FontLibrary, InMemoryAssetSource, IsolatedSessions, LabelPipeline, Settings,
    TemplateRegistry,
};
use labelpress_server::{AppState, build_router};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const CONFIG: &str = r#"
    [inventory]
    base_url = "https://inventory.example.com"
    token = "test-token"
    max_assets = 3

    [labels]
    company_name = "Example Corp"
"#;

fn test_app() -> Router {
    let source = InMemoryAssetSource::new()
        .with_asset(
            AssetRecord::new(1, "IT-0001")
                .with_name("Front desk laptop")
                .with_category("Laptops"),
        )
        .with_asset(AssetRecord::new(2, "IT-0002").with_name("Loose part"))
        .with_asset(
            AssetRecord::new(3, "IT-0003")
                .with_model("USB-C Cable")
                .with_category("Cables"),
        );
    let settings = Settings::from_toml(CONFIG).unwrap();
    let sessions = IsolatedSessions::new(Arc::new(FontLibrary::empty()), None);
    let pipeline = LabelPipeline::new(
        Arc::new(settings),
        Arc::new(TemplateRegistry::embedded().unwrap()),
        Arc::new(sessions),
        Arc::new(source),
    );
    build_router(AppState::new(pipeline))
}

async fn send(request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn batch(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/labels/batch")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn error_code(body: &[u8]) -> String {
    let json: Value = serde_json::from_slice(body).unwrap();
    json["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_single_label_defaults_to_pdf() {
    let (status, headers, body) = send(get("/api/v1/labels/1?type=medium")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"label_medium_IT_0001_Front_desk_laptop.pdf\""
    );
    assert!(body.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_accept_header_selects_png() {
    let request = Request::builder()
        .uri("/api/v1/labels/1")
        .header(header::ACCEPT, "image/png")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert!(body.starts_with(b"\x89PNG"));

    let request = Request::builder()
        .uri("/api/v1/labels/1?format=pdf")
        .header(header::ACCEPT, "image/png")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(request).await;
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
}

#[tokio::test]
async fn test_single_label_errors() {
    let (status, _, body) = send(get("/api/v1/labels/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ValidationError");

    let (status, _, body) = send(get("/api/v1/labels/404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NotFound");

    let (status, _, body) = send(get("/api/v1/labels/2")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "IncompleteAsset");

    let (status, _, _) = send(get("/api/v1/labels/1?format=gif")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_reports_counts() {
    let (status, headers, body) = send(batch(r#"{"ids": [1, 2, 3], "type": "cable_flag"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-labels-rendered"], "2");
    assert_eq!(headers["x-labels-failed"], "1");
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("labels_cable_flag_3_"));

    let doc = lopdf::Document::load_mem(&body).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[tokio::test]
async fn test_batch_errors() {
    let (status, _, body) = send(batch(r#"{"ids": [2, 9]}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "AssemblyError");

    let (status, _, body) = send(batch(r#"{"ids": []}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ValidationError");

    let (status, _, _) = send(batch(r#"{"ids": [1, 2, 3, 4]}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(batch("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ValidationError");
}
