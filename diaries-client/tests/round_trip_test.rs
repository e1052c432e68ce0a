//! Round-trip integration tests against the mock broker

mod common;

use common::{accepted, rejected, MockBroker};
use diaries_client::{requests, Reply, RemoteProcedureCall, WsTransport};
use diaries_core::{Error, Request};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

async fn connect(broker: &MockBroker) -> RemoteProcedureCall {
    let transport = WsTransport::connect(&broker.url(), None).await.unwrap();
    let rpc = RemoteProcedureCall::new(Arc::new(transport), "requester");
    rpc.subscribe_to_response_topic().await.unwrap();
    rpc
}

#[tokio::test]
async fn test_get_diaries_round_trip() {
    let broker = MockBroker::start(|request| async move {
        assert_eq!(request.method, "getDiaries");
        assert_eq!(request.params["accessToken"], "tok1");
        vec![accepted(json!([{"id": 7, "title": "My Diary"}]))]
    })
    .await;

    let rpc = connect(&broker).await;
    let reply = requests::get_diaries(&rpc, "tok1").await.unwrap();

    match reply {
        Reply::Accepted(diaries) => {
            assert_eq!(diaries.len(), 1);
            assert_eq!(diaries[0].id, 7);
            assert_eq!(diaries[0].title, "My Diary");
        }
        Reply::Rejected(status) => panic!("unexpected rejection: {status}"),
    }

    broker.shutdown().await;
}

#[tokio::test]
async fn test_rejected_status_is_an_outcome_not_an_error() {
    let broker = MockBroker::start(|_request| async move {
        vec![rejected(401, "access token expired")]
    })
    .await;

    let rpc = connect(&broker).await;
    let reply = requests::get_diaries(&rpc, "stale").await.unwrap();

    match reply {
        Reply::Rejected(status) => {
            assert_eq!(status.code, 401);
            assert_eq!(status.message, "access token expired");
        }
        Reply::Accepted(_) => panic!("expected rejection"),
    }

    broker.shutdown().await;
}

#[tokio::test]
async fn test_signin_decodes_nested_token_document() {
    let broker = MockBroker::start(|request| async move {
        assert_eq!(request.method, "signin");
        vec![accepted(json!(
            "{\"accessToken\":\"a\",\"refreshToken\":\"b\"}"
        ))]
    })
    .await;

    let rpc = connect(&broker).await;
    let reply = requests::signin(&rpc, "alice", "secret").await.unwrap();

    match reply {
        Reply::Accepted(tokens) => {
            assert_eq!(tokens.access_token, "a");
            assert_eq!(tokens.refresh_token, "b");
        }
        Reply::Rejected(status) => panic!("unexpected rejection: {status}"),
    }

    broker.shutdown().await;
}

#[tokio::test]
async fn test_signin_malformed_inner_document() {
    let broker =
        MockBroker::start(|_request| async move { vec![accepted(json!("{not json"))] }).await;

    let rpc = connect(&broker).await;
    let result = requests::signin(&rpc, "alice", "secret").await;
    assert!(matches!(result, Err(Error::MalformedPayload(_))));

    broker.shutdown().await;
}

#[tokio::test]
async fn test_register_returns_integer_id() {
    let broker = MockBroker::start(|request| async move {
        assert_eq!(request.method, "register");
        assert_eq!(request.params["firstname"], "Alice");
        vec![accepted(json!(42))]
    })
    .await;

    let rpc = connect(&broker).await;
    let registration = diaries_core::Registration {
        username: "alice".to_string(),
        password: "secret".to_string(),
        firstname: "Alice".to_string(),
        lastname: "Smith".to_string(),
        knownas: "Al".to_string(),
        email: "alice@example.com".to_string(),
        phone: "0123456789".to_string(),
    };
    let reply = requests::register(&rpc, &registration).await.unwrap();

    match reply {
        Reply::Accepted(id) => assert_eq!(id, 42),
        Reply::Rejected(status) => panic!("unexpected rejection: {status}"),
    }

    broker.shutdown().await;
}

#[tokio::test]
async fn test_out_of_order_replies_reach_their_own_waiters() {
    let broker = MockBroker::start(|request| async move {
        match request.method.as_str() {
            "slow" => {
                tokio::time::sleep(Duration::from_millis(200)).await;
                vec![accepted(json!("slow-reply"))]
            }
            _ => vec![accepted(json!("fast-reply"))],
        }
    })
    .await;

    let rpc = connect(&broker).await;

    // Two requests in flight at once; the second reply arrives first
    let slow = rpc.send(&Request::new("slow")).await.unwrap();
    let fast = rpc.send(&Request::new("fast")).await.unwrap();

    let fast_response = rpc
        .wait_for_response(fast, Duration::from_secs(5))
        .await
        .unwrap();
    let slow_response = rpc
        .wait_for_response(slow, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(fast_response.payload, json!("fast-reply"));
    assert_eq!(slow_response.payload, json!("slow-reply"));

    broker.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_delivery_first_resolution_wins() {
    let broker = MockBroker::start(|_request| async move {
        vec![accepted(json!("first")), accepted(json!("second"))]
    })
    .await;

    let rpc = connect(&broker).await;

    let token = rpc.send(&Request::new("getDiaries")).await.unwrap();
    let response = rpc
        .wait_for_response(token, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(response.payload, json!("first"));

    // The dropped duplicate must not corrupt later round trips
    let token = rpc.send(&Request::new("getDiaries")).await.unwrap();
    let response = rpc
        .wait_for_response(token, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(response.payload, json!("first"));

    broker.shutdown().await;
}

#[tokio::test]
async fn test_timeout_then_late_reply_is_dropped() {
    let broker = MockBroker::start(|request| async move {
        match request.method.as_str() {
            "lagging" => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                vec![accepted(json!("too late"))]
            }
            _ => vec![accepted(json!("prompt"))],
        }
    })
    .await;

    let rpc = connect(&broker).await;

    let token = rpc.send(&Request::new("lagging")).await.unwrap();
    let result = rpc
        .wait_for_response(token, Duration::from_millis(50))
        .await;
    assert!(matches!(result, Err(Error::Timeout)));

    // Let the late reply arrive; it must be discarded silently
    tokio::time::sleep(Duration::from_millis(400)).await;

    let token = rpc.send(&Request::new("prompt")).await.unwrap();
    let response = rpc
        .wait_for_response(token, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(response.payload, json!("prompt"));

    broker.shutdown().await;
}

#[tokio::test]
async fn test_send_before_subscribe_is_rejected() {
    let broker = MockBroker::start(|_request| async move { vec![] }).await;

    let transport = WsTransport::connect(&broker.url(), None).await.unwrap();
    let rpc = RemoteProcedureCall::new(Arc::new(transport), "requester");

    let result = rpc.send(&Request::new("signin")).await;
    assert!(matches!(result, Err(Error::NotReady)));

    broker.shutdown().await;
}

#[tokio::test]
async fn test_composite_fails_fast_on_empty_diary_list() {
    let seen_methods = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = seen_methods.clone();

    let broker = MockBroker::start(move |request| {
        let seen = seen.clone();
        async move {
            seen.lock().await.push(request.method.clone());
            match request.method.as_str() {
                "getDiaries" => vec![accepted(json!([]))],
                _ => vec![accepted(json!([{"id": 1, "title": "page"}]))],
            }
        }
    })
    .await;

    let rpc = connect(&broker).await;
    let result = requests::get_pages_of_first_diary(&rpc, "tok1").await;
    assert!(matches!(result, Err(Error::NoDiariesFound)));

    // The dependent getPages request must never have been sent
    let methods = seen_methods.lock().await;
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0], "getDiaries");

    broker.shutdown().await;
}

#[tokio::test]
async fn test_composite_chains_first_diary_into_pages_request() {
    let broker = MockBroker::start(|request| async move {
        match request.method.as_str() {
            "getDiaries" => vec![accepted(json!([
                {"id": 3, "title": "travel"},
                {"id": 4, "title": "work"},
            ]))],
            "getPages" => {
                assert_eq!(request.params["diary"], 3);
                vec![accepted(json!([
                    {"id": 30, "title": "day one"},
                    {"id": 31, "title": "day two"},
                ]))]
            }
            other => panic!("unexpected method {other}"),
        }
    })
    .await;

    let rpc = connect(&broker).await;
    let (diary, pages) = requests::get_pages_of_first_diary(&rpc, "tok1")
        .await
        .unwrap();

    assert_eq!(diary.id, 3);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].title, "day one");

    broker.shutdown().await;
}
