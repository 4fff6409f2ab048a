//! `HttpQuerier` against a mock core.

mod common;

use std::collections::HashMap;

use serde_json::json;

use common::*;
use supertokens::normalise::NormalisedUrlPath;
use supertokens::querier::{HttpQuerier, Querier, QuerierError};

fn path(p: &str) -> NormalisedUrlPath {
    NormalisedUrlPath::new(p).unwrap()
}

#[tokio::test]
async fn test_hosts_are_used_round_robin() {
    let a = start_core_mock(|_| (200, r#"{"host":"a"}"#.to_string())).await;
    let b = start_core_mock(|_| (200, r#"{"host":"b"}"#.to_string())).await;
    let querier =
        HttpQuerier::from_connection_uri(&format!("http://{};http://{}", a, b), None).unwrap();

    let mut seen = Vec::new();
    for _ in 0..4 {
        let reply = querier.send_get(&path("/hello"), &HashMap::new()).await.unwrap();
        seen.push(reply["host"].as_str().unwrap().to_string());
    }
    assert_eq!(seen, vec!["a", "b", "a", "b"]);
}

#[tokio::test]
async fn test_unreachable_host_is_skipped() {
    let down = closed_port();
    let up = start_core_mock(|_| (200, r#"{"status":"OK"}"#.to_string())).await;
    let querier =
        HttpQuerier::from_connection_uri(&format!("http://{};http://{}", down, up), None).unwrap();

    let reply = querier.send_post(&path("/recipe/session/remove"), &json!({})).await.unwrap();
    assert_eq!(reply["status"], "OK");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let core = start_core_mock(|_| (500, "boom".to_string())).await;
    let querier = HttpQuerier::from_connection_uri(&format!("http://{}", core), None).unwrap();

    let err = querier.send_put(&path("/x"), &json!({})).await.unwrap_err();
    match err {
        QuerierError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_json_reply_is_a_decode_error() {
    let core = start_core_mock(|_| (200, "not json".to_string())).await;
    let querier = HttpQuerier::from_connection_uri(&format!("http://{}", core), None).unwrap();

    let err = querier.send_delete(&path("/x"), &json!({})).await.unwrap_err();
    assert!(matches!(err, QuerierError::Decode(_)));
}

#[tokio::test]
async fn test_request_carries_api_key_query_and_body() {
    let core = start_core_mock(|req| {
        let lower = req.to_lowercase();
        let ok = req.starts_with("GET /users/count?includeRecipeIds=session")
            && lower.contains("api-key: secret");
        if ok {
            (200, r#"{"status":"OK","count":7}"#.to_string())
        } else {
            (400, req.to_string())
        }
    })
    .await;
    let querier =
        HttpQuerier::from_connection_uri(&format!("http://{}", core), Some("secret".into())).unwrap();

    let mut params = HashMap::new();
    params.insert("includeRecipeIds".to_string(), "session".to_string());
    let reply = querier.send_get(&path("/users/count"), &params).await.unwrap();
    assert_eq!(reply["count"], 7);

    let echo = start_core_mock(|req| {
        let body = req.split("\r\n\r\n").nth(1).unwrap_or_default();
        (200, body.to_string())
    })
    .await;
    let querier = HttpQuerier::from_connection_uri(&format!("http://{}", echo), None).unwrap();
    let reply = querier
        .send_post(&path("/echo"), &json!({"sessionHandles": ["h1"]}))
        .await
        .unwrap();
    assert_eq!(reply, json!({"sessionHandles": ["h1"]}));
}
