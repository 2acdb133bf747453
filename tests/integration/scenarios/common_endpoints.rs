use crate::helpers::{client::TestClient, mock_server::MockServer};
use axum::http::StatusCode;

/// 観点: /health エンドポイントが 200 OK を返すか
#[tokio::test]
async fn test_health_check() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);
    let (status, body) = client.get_text("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

/// 観点: セッションの作成・取得・削除
#[tokio::test]
async fn test_session_lifecycle() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);

    let session_id = client.create_session().await;
    let (status, view) = client.view(&session_id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "idle");
    assert_eq!(view["total"], 0);
    assert!(view["query"].is_null());
    assert_eq!(view["columns"].as_array().unwrap().len(), 0);

    assert_eq!(client.delete_session(&session_id).await, StatusCode::NO_CONTENT);
    assert_eq!(client.delete_session(&session_id).await, StatusCode::NOT_FOUND);

    let (status, body) = client.view(&session_id, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains(&session_id));
    assert_eq!(mock.search_calls(), 0);
}

/// 観点: 存在しない / 不正なセッション ID
#[tokio::test]
async fn test_unknown_and_invalid_session_ids() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);

    let (status, _) = client
        .search("00000000-0000-4000-8000-000000000000", "x")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = client.view("not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(mock.search_calls(), 0);
}

/// 観点: 不正なスクロール値は 400
#[tokio::test]
async fn test_scroll_rejects_negative_metrics() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);
    let session_id = client.create_session().await;

    let (status, body) = client.scroll(&session_id, -10.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
