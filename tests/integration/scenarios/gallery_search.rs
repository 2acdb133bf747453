use crate::helpers::client::{card_ids, TestClient};
use crate::helpers::mock_server::MockServer;
use axum::http::StatusCode;
use gallery::EmptyQueryPolicy;

fn solution_ids(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("solution-{}", i)).collect()
}

/// 観点: "neural network" は 10 件 → スクロールで 13 件になり打ち止め
#[tokio::test]
async fn test_neural_network_infinite_scroll() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);
    let session_id = client.create_session().await;

    let (status, view) = client.search(&session_id, "neural network").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["total"], 10);
    assert_eq!(view["has_more"], true);
    assert_eq!(view["phase"], "idle");
    assert_eq!(view["page"], 1);
    assert!(view["status"].is_null());
    assert_eq!(card_ids(&view), solution_ids(0..10));

    // 底まで届いていないスクロールでは取得しない
    let (_, view) = client.scroll(&session_id, 0.0).await;
    assert_eq!(view["total"], 10);
    assert_eq!(mock.search_calls(), 1);

    let (status, view) = client.scroll_to_bottom(&session_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["total"], 13);
    assert_eq!(view["has_more"], false);
    assert_eq!(view["phase"], "exhausted");
    assert_eq!(view["page"], 2);
    assert_eq!(card_ids(&view), solution_ids(0..13));

    // 打ち止め後のスクロールではリクエストを送らない
    let (_, view) = client.scroll_to_bottom(&session_id).await;
    assert_eq!(view["total"], 13);
    assert_eq!(mock.search_calls(), 2);
}

/// 観点: 空クエリ (list_all) は新着順の全件一覧をページングする
#[tokio::test]
async fn test_empty_query_lists_everything_by_recency() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);
    let session_id = client.create_session().await;

    let (_, view) = client.search(&session_id, "").await;
    assert_eq!(view["query"], "");
    assert_eq!(card_ids(&view), solution_ids(0..10));

    let (_, view) = client.scroll_to_bottom(&session_id).await;
    assert_eq!(view["total"], 20);
    assert_eq!(view["phase"], "idle");

    let (_, view) = client.scroll_to_bottom(&session_id).await;
    assert_eq!(view["total"], 25);
    assert_eq!(view["phase"], "exhausted");
    assert_eq!(card_ids(&view), solution_ids(0..25));

    client.scroll_to_bottom(&session_id).await;
    assert_eq!(mock.search_calls(), 3);
}

/// 観点: 空クエリ (clear) は何も取得せずに結果を消す
#[tokio::test]
async fn test_empty_query_clear_policy() {
    let mock = MockServer::start().await;
    let client = TestClient::with_policy(&mock, EmptyQueryPolicy::Clear);
    let session_id = client.create_session().await;

    let (_, view) = client.search(&session_id, "graph").await;
    assert_eq!(view["total"], 10);
    assert_eq!(mock.search_calls(), 1);

    let (status, view) = client.search(&session_id, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["total"], 0);
    assert_eq!(view["has_more"], false);
    assert_eq!(view["phase"], "exhausted");

    client.scroll_to_bottom(&session_id).await;
    assert_eq!(mock.search_calls(), 1);
}

/// 観点: 新しい検索は結果を置き換える (追記しない)
#[tokio::test]
async fn test_new_search_replaces_result_set() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);
    let session_id = client.create_session().await;

    client.search(&session_id, "neural").await;
    client.scroll_to_bottom(&session_id).await;

    let (_, view) = client.search(&session_id, "graph theory").await;
    assert_eq!(view["query"], "graph theory");
    assert_eq!(view["page"], 1);
    assert_eq!(view["total"], 10);
    assert_eq!(card_ids(&view), solution_ids(13..23));

    let (_, view) = client.scroll_to_bottom(&session_id).await;
    assert_eq!(card_ids(&view), solution_ids(13..25));
}

/// 観点: 検索失敗はエラー表示になり、次の検索まで自動取得しない
#[tokio::test]
async fn test_search_failure_is_sticky() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);
    let session_id = client.create_session().await;

    let (status, view) = client.search(&session_id, "boom").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "error");
    assert_eq!(view["status"], "Error fetching solutions");
    assert_eq!(view["total"], 0);

    client.scroll_to_bottom(&session_id).await;
    assert_eq!(mock.search_calls(), 1);

    let (_, view) = client.search(&session_id, "neural").await;
    assert_eq!(view["phase"], "idle");
    assert!(view["status"].is_null());
    assert_eq!(view["total"], 10);
}

/// 観点: 画面幅に応じて列数が変わる
#[tokio::test]
async fn test_viewport_width_columns() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);
    let session_id = client.create_session().await;
    client.search(&session_id, "neural network").await;

    let (_, wide) = client.view(&session_id, None).await;
    assert_eq!(wide["column_count"], 5);
    assert_eq!(wide["columns"][0].as_array().unwrap().len(), 2);

    let (_, tablet) = client.view(&session_id, Some(700)).await;
    assert_eq!(tablet["column_count"], 2);

    let (_, phone) = client.view(&session_id, Some(400)).await;
    assert_eq!(phone["column_count"], 1);
    assert_eq!(phone["columns"][0].as_array().unwrap().len(), 10);

    // 件数より多い列は作らない
    client.search(&session_id, "solution 0").await;
    let (_, few) = client.view(&session_id, None).await;
    let total = few["total"].as_u64().unwrap();
    assert_eq!(total, 1);
    assert_eq!(few["column_count"].as_u64().unwrap(), total);
}

/// 観点: カードに表示用フィールドが入っている
#[tokio::test]
async fn test_card_fields() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock);
    let session_id = client.create_session().await;

    let (_, view) = client.search(&session_id, "neural").await;
    let card = &view["columns"][0][0];
    assert_eq!(card["id"], "solution-0");
    assert_eq!(card["index"], 0);
    assert_eq!(card["title"], "Neural network solution 0");
    assert_eq!(card["image"], "https://img.example.com/solution-0.png");
    assert_eq!(card["published_at"], "2024-05-01T12:00:00Z");
    assert_eq!(card["content"]["id"], "solution-0");
    assert!(card["content"].get("_id").is_none());
}
