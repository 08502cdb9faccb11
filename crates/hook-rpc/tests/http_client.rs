use hook_rpc::{HttpLedgerClient, LedgerClient, RpcError};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Reply = fn(&Value) -> (u16, String);

/// Spin up a one-route ledger endpoint answering with `reply`.
/// Returns its URL and every request body it received.
async fn spawn_ledger(reply: Reply) -> (String, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let make_svc = make_service_fn(move |_| {
        let recorder = recorder.clone();
        async move {
            Ok::<_, hyper::Error>(service_fn(move |req: Request<Body>| {
                let recorder = recorder.clone();
                async move {
                    let bytes = hyper::body::to_bytes(req.into_body()).await?;
                    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
                    let (status, text) = reply(&body);
                    recorder.lock().unwrap().push(body);
                    let response = Response::builder()
                        .status(StatusCode::from_u16(status).unwrap())
                        .header("Content-Type", "application/json")
                        .body(Body::from(text))
                        .unwrap();
                    Ok::<_, hyper::Error>(response)
                }
            }))
        }
    });

    let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
    let server = Server::bind(&addr).serve(make_svc);
    let url = format!("http://{}", server.local_addr());
    tokio::spawn(server);
    (url, seen)
}

#[tokio::test]
async fn test_submit_success_round_trip() {
    let (url, seen) = spawn_ledger(|_| {
        (
            200,
            json!({ "result": {
                "engine_result": "tesSUCCESS",
                "engine_result_message": "The transaction was applied. Only final in a validated ledger.",
                "tx_json": { "hash": "ABC123" },
                "validated_ledger_index": 1234,
                "status": "success"
            }})
            .to_string(),
        )
    })
    .await;

    let client = HttpLedgerClient::new(url);
    let result = client.submit("DEADBEEF").await.unwrap();

    assert_eq!(result.engine_result.as_deref(), Some("tesSUCCESS"));
    assert_eq!(result.tx_hash(), Some("ABC123"));
    assert_eq!(result.validated_ledger_index, Some(1234));

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0], json!({ "method": "submit", "params": [{ "tx_blob": "DEADBEEF" }] }));
}

#[tokio::test]
async fn test_submit_ledger_error_is_data_not_failure() {
    let (url, _) = spawn_ledger(|_| {
        (
            200,
            json!({ "result": { "error": "invalidTransaction", "error_exception": "fails local checks", "status": "error" } })
                .to_string(),
        )
    })
    .await;

    let result = HttpLedgerClient::new(url).submit("00").await.unwrap();
    assert!(result.engine_result.is_none());
    assert_eq!(result.error.as_deref(), Some("invalidTransaction"));
    assert_eq!(result.error_description(), Some("fails local checks"));
}

#[tokio::test]
async fn test_http_status_surfaces_as_error() {
    let (url, _) = spawn_ledger(|_| (503, "busy".to_string())).await;

    let err = HttpLedgerClient::new(url).submit("00").await.unwrap_err();
    assert!(matches!(err, RpcError::Http(503)));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let (url, _) = spawn_ledger(|_| (200, "{ not json".to_string())).await;

    let err = HttpLedgerClient::new(url).submit("00").await.unwrap_err();
    assert!(matches!(err, RpcError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = HttpLedgerClient::with_timeout(format!("http://127.0.0.1:{}", port), Some(Duration::from_secs(2)))
        .unwrap();
    let err = client.submit("00").await.unwrap_err();
    assert!(matches!(err, RpcError::Transport(_) | RpcError::Timeout));
}

#[tokio::test]
async fn test_fee_reads_drops() {
    let (url, seen) = spawn_ledger(|_| {
        (
            200,
            json!({ "result": { "drops": { "base_fee": "10", "open_ledger_fee": "2573" }, "status": "success" } })
                .to_string(),
        )
    })
    .await;

    let estimate = HttpLedgerClient::new(url).fee("CAFE").await.unwrap();
    assert_eq!(estimate.open_ledger_fee.as_deref(), Some("2573"));
    assert_eq!(seen.lock().unwrap()[0]["method"], "fee");
}

#[tokio::test]
async fn test_fee_without_drops_is_empty_estimate() {
    let (url, _) = spawn_ledger(|_| (200, json!({ "result": { "status": "success" } }).to_string())).await;

    let estimate = HttpLedgerClient::new(url).fee("CAFE").await.unwrap();
    assert!(estimate.open_ledger_fee.is_none());
}

#[tokio::test]
async fn test_fee_error_status_is_ledger_error() {
    let (url, _) = spawn_ledger(|_| {
        (200, json!({ "result": { "status": "error", "error": "invalidParams" } }).to_string())
    })
    .await;

    let err = HttpLedgerClient::new(url).fee("CAFE").await.unwrap_err();
    assert!(matches!(err, RpcError::Ledger { ref error, .. } if error == "invalidParams"));
}

#[tokio::test]
async fn test_account_info_sequence() {
    let (url, seen) = spawn_ledger(|body| {
        let account = body["params"][0]["account"].as_str().unwrap_or_default().to_string();
        (
            200,
            json!({ "result": { "account_data": { "Account": account, "Sequence": 917 }, "status": "success" } })
                .to_string(),
        )
    })
    .await;

    let info = HttpLedgerClient::new(url).account_info("rHook").await.unwrap();
    assert_eq!(info.account, "rHook");
    assert_eq!(info.sequence, 917);
    assert_eq!(seen.lock().unwrap()[0]["params"][0]["ledger_index"], "current");
}

#[tokio::test]
async fn test_account_info_not_found() {
    let (url, _) = spawn_ledger(|_| {
        (
            200,
            json!({ "result": { "status": "error", "error": "actNotFound", "error_message": "Account not found." } })
                .to_string(),
        )
    })
    .await;

    let err = HttpLedgerClient::new(url).account_info("rNobody").await.unwrap_err();
    assert!(matches!(err, RpcError::Ledger { .. }));
    assert_eq!(err.code(), -32603);
}
