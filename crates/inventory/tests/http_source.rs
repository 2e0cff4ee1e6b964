//! Exercises `HttpAssetSource` against a local stand-in for the inventory API.

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use labelpress_inventory::{AssetSource, DEFAULT_TIMEOUT, FetchError, HttpAssetSource};
use serde_json::json;

const TOKEN: &str = "secret-token";

async fn hardware(Path(id): Path<u64>, headers: HeaderMap) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."}))).into_response();
    }
    match id {
        1 => Json(json!({
            "id": 1,
            "asset_tag": "IT-0001",
            "name": "Front desk laptop",
            "category": {"id": 2, "name": "Laptops"},
            "custom_fields": []
        }))
        .into_response(),
        2 => Json(json!({"status": "error", "messages": "Asset does not exist.", "payload": null}))
            .into_response(),
        3 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_inventory() -> String {
    let app = Router::new().route("/api/v1/hardware/:id", get(hardware));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_maps_responses() {
    let base = spawn_inventory().await;
    let source = HttpAssetSource::new(&base, TOKEN, DEFAULT_TIMEOUT).unwrap();

    let record = source.fetch(1).await.unwrap();
    assert_eq!(record.asset_tag, "IT-0001");
    assert_eq!(record.category_name(), Some("Laptops"));
    assert!(record.custom_fields.is_empty());

    assert!(matches!(source.fetch(2).await, Err(FetchError::NotFound { id: 2 })));
    assert!(matches!(source.fetch(3).await, Err(FetchError::Status { id: 3, status: 500 })));
    assert!(matches!(source.fetch(404).await, Err(FetchError::NotFound { id: 404 })));
}

#[tokio::test]
async fn test_bad_token_is_unauthorized() {
    let base = spawn_inventory().await;
    let source = HttpAssetSource::new(&base, "wrong", DEFAULT_TIMEOUT).unwrap();
    assert!(matches!(source.fetch(1).await, Err(FetchError::Unauthorized)));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpAssetSource::new(&format!("http://{}", addr), TOKEN, DEFAULT_TIMEOUT).unwrap();
    assert!(matches!(source.fetch(1).await, Err(FetchError::Transport(_))));
}
