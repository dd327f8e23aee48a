//! End-to-end engine tests against an in-process mock of the Steam endpoints.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use steamgate_core::{CallRequest, CallResult, ErrorKind, GatewayConfig};
use steamgate_tool::{Dispatcher, HttpUpstream, catalog};

const KEY: &str = "test-key-5f2c";

type Params = Query<HashMap<String, String>>;

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("key").map(String::as_str) == Some(KEY)
}

async fn current_players(Query(params): Params) -> Response {
    if !authorized(&params) {
        return (StatusCode::FORBIDDEN, "<html><body>Forbidden</body></html>").into_response();
    }
    match params.get("appid").map(String::as_str) {
        Some("570") => Json(json!({"response": {"player_count": 12000, "result": 1}})).into_response(),
        Some("42") => Json(json!({"response": {"result": 42}})).into_response(),
        Some("404") => StatusCode::NOT_FOUND.into_response(),
        Some("401") => StatusCode::UNAUTHORIZED.into_response(),
        Some("500") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "internal"}))).into_response(),
        Some("429") => StatusCode::TOO_MANY_REQUESTS.into_response(),
        _ => (StatusCode::BAD_REQUEST, "bad appid").into_response(),
    }
}

async fn game_schema(Query(params): Params) -> Response {
    match params.get("appid").map(String::as_str) {
        Some("1") => (StatusCode::OK, "not json at all").into_response(),
        Some("440") => Json(json!({"game": {"gameName": "Team Fortress 2"}})).into_response(),
        _ => Json(json!({})).into_response(),
    }
}

async fn global_stats(Query(params): Params) -> Response {
    let count = params.get("count").cloned().unwrap_or_default();
    let first = params.get("name[0]").cloned().unwrap_or_default();
    Json(json!({"response": {"globalstats": {first: {"total": "7"}}, "result": 1, "echo_count": count}}))
        .into_response()
}

async fn app_details(Query(params): Params) -> Response {
    if params.contains_key("key") {
        return (StatusCode::BAD_REQUEST, "store requests carry no key").into_response();
    }
    let id = params.get("appids").cloned().unwrap_or_default();
    if id == "10" {
        Json(json!({"10": {"success": true, "data": {"name": "Counter-Strike", "steam_appid": 10}}}))
            .into_response()
    } else if id == "503" {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    } else {
        Json(json!({id: {"success": false}})).into_response()
    }
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"apilist": {}}))
}

async fn spawn_mock() -> String {
    let router = Router::new()
        .route("/ISteamUserStats/GetNumberOfCurrentPlayers/v1/", get(current_players))
        .route("/ISteamUserStats/GetSchemaForGame/v2/", get(game_schema))
        .route("/ISteamUserStats/GetGlobalStatsForGame/v1/", get(global_stats))
        .route("/ISteamWebAPIUtil/GetSupportedAPIList/v1/", get(slow))
        .route("/api/appdetails", get(app_details));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn dispatcher_for(base: &str, timeout: Duration) -> Dispatcher {
    let config = GatewayConfig::new(KEY)
        .unwrap()
        .with_api_base_url(base)
        .unwrap()
        .with_store_base_url(base)
        .unwrap()
        .with_timeout(timeout);
    let upstream = HttpUpstream::new(Arc::new(config)).unwrap();
    Dispatcher::new(Arc::new(catalog::registry().unwrap()), Arc::new(upstream))
}

async fn call(dispatcher: &Dispatcher, tool: &str, args: Value) -> CallResult {
    dispatcher.dispatch(CallRequest::new(tool, args)).await
}

fn assert_no_key(result: &CallResult) {
    let text = serde_json::to_string(result).unwrap();
    assert!(!text.contains(KEY), "credential leaked: {text}");
}

#[tokio::test]
async fn test_success_payload_is_verbatim() {
    let base = spawn_mock().await;
    let dispatcher = dispatcher_for(&base, Duration::from_secs(5));

    let result = call(&dispatcher, "getCurrentPlayers", json!({"appid": 570})).await;
    assert_eq!(
        result,
        CallResult::success(json!({"response": {"player_count": 12000, "result": 1}}))
    );
}

#[tokio::test]
async fn test_status_codes_map_to_kinds() {
    let base = spawn_mock().await;
    let dispatcher = dispatcher_for(&base, Duration::from_secs(5));

    for (appid, kind) in [
        (404, ErrorKind::InvalidArguments),
        (7, ErrorKind::InvalidArguments),
        (401, ErrorKind::PermissionOrAuthError),
        (500, ErrorKind::UpstreamInternalError),
        (429, ErrorKind::UpstreamInternalError),
        (42, ErrorKind::UpstreamInternalError),
    ] {
        let result = call(&dispatcher, "getCurrentPlayers", json!({"appid": appid})).await;
        assert_eq!(result.kind(), Some(kind), "appid {appid}");
        assert_no_key(&result);
    }
}

#[tokio::test]
async fn test_status_detail_carries_body() {
    let base = spawn_mock().await;
    let dispatcher = dispatcher_for(&base, Duration::from_secs(5));

    let CallResult::Failure(failure) = call(&dispatcher, "getCurrentPlayers", json!({"appid": 500})).await else {
        panic!("expected failure");
    };
    let detail = failure.detail.unwrap();
    assert_eq!(detail["status"], 500);
    assert_eq!(detail["body"], json!({"error": "internal"}));
    assert_eq!(detail["target"], "/ISteamUserStats/GetNumberOfCurrentPlayers/v1/");
    assert!(failure.message.contains("appid 500"));
}

#[tokio::test]
async fn test_wrong_key_is_permission_error() {
    let base = spawn_mock().await;
    let config = GatewayConfig::new("wrong")
        .unwrap()
        .with_api_base_url(&base)
        .unwrap();
    let upstream = HttpUpstream::new(Arc::new(config)).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(catalog::registry().unwrap()), Arc::new(upstream));

    let CallResult::Failure(failure) = call(&dispatcher, "getCurrentPlayers", json!({"appid": 570})).await else {
        panic!("expected failure");
    };
    assert_eq!(failure.kind, ErrorKind::PermissionOrAuthError);
    // non-JSON bodies are kept as text
    assert!(failure.detail.unwrap()["body"].as_str().unwrap().contains("Forbidden"));
}

#[tokio::test]
async fn test_shape_failures() {
    let base = spawn_mock().await;
    let dispatcher = dispatcher_for(&base, Duration::from_secs(5));

    let missing_game = call(&dispatcher, "getGameSchema", json!({"appid": 570})).await;
    assert_eq!(missing_game.kind(), Some(ErrorKind::UpstreamInternalError));

    let not_json = call(&dispatcher, "getGameSchema", json!({"appid": 1})).await;
    assert_eq!(not_json.kind(), Some(ErrorKind::UpstreamInternalError));

    let ok = call(&dispatcher, "getGameSchema", json!({"appid": 440})).await;
    assert_eq!(ok.payload().unwrap()["game"]["gameName"], "Team Fortress 2");
}

#[tokio::test]
async fn test_indexed_parameters_reach_upstream() {
    let base = spawn_mock().await;
    let dispatcher = dispatcher_for(&base, Duration::from_secs(5));

    let result = call(
        &dispatcher,
        "getGlobalStatsForGame",
        json!({"appid": 550, "stat_names": ["global.map.emp_isle", "global.map.mid"]}),
    )
    .await;
    let payload = result.payload().unwrap();
    assert_eq!(payload["response"]["echo_count"], "2");
    assert!(payload["response"]["globalstats"].get("global.map.emp_isle").is_some());
}

#[tokio::test]
async fn test_app_details_fan_out_is_unauthenticated_and_partial() {
    let base = spawn_mock().await;
    let dispatcher = dispatcher_for(&base, Duration::from_secs(5));

    let result = call(&dispatcher, "getAppDetails", json!({"appids": [10, 999999999, 503]})).await;
    let payload = result.payload().expect("fan-out is always a success");
    assert_eq!(payload.as_object().unwrap().len(), 3);
    assert_eq!(payload["10"]["data"]["name"], "Counter-Strike");
    assert_eq!(payload["999999999"]["error"]["kind"], "UpstreamInternalError");
    assert_eq!(payload["503"]["error"]["kind"], "UpstreamInternalError");
    assert_eq!(payload["503"]["error"]["detail"]["status"], 503);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let dispatcher = dispatcher_for(&base, Duration::from_secs(5));

    let result = call(&dispatcher, "getCurrentPlayers", json!({"appid": 570})).await;
    assert_eq!(result.kind(), Some(ErrorKind::NetworkError));
    assert_no_key(&result);

    let batch = call(&dispatcher, "getAppDetails", json!({"appids": [10, 20]})).await;
    let payload = batch.payload().unwrap();
    assert_eq!(payload["10"]["error"]["kind"], "NetworkError");
    assert_eq!(payload["20"]["error"]["kind"], "NetworkError");
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let base = spawn_mock().await;
    let dispatcher = dispatcher_for(&base, Duration::from_millis(200));

    let result = call(&dispatcher, "getSupportedApiList", json!({})).await;
    assert_eq!(result.kind(), Some(ErrorKind::NetworkError));
    assert_no_key(&result);
}

/// Answers every connection with a 503 whose body is cut short
async fn spawn_truncating_server() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let _ = socket
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"err")
                .await;
            // closing here leaves the declared body unfinished
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_status_with_truncated_body_is_upstream_internal() {
    let base = spawn_truncating_server().await;
    let dispatcher = dispatcher_for(&base, Duration::from_secs(5));

    let result = call(&dispatcher, "getCurrentPlayers", json!({"appid": 570})).await;
    assert_eq!(result.kind(), Some(ErrorKind::UpstreamInternalError));
    let CallResult::Failure(failure) = &result else {
        panic!("expected failure, got {result:?}");
    };
    assert_eq!(failure.detail.as_ref().unwrap()["status"], 503);
    assert_no_key(&result);
}
