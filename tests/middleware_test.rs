use axum::Router;
use axum::extract::Extension;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::routing::get;
use axum_test::TestServer;
use rask_request_logger::app::config::{IgnoredEventTags, MessageConfig};
use rask_request_logger::app::{
    RequestLogger, RequestLogging, RequestLoggingBuilder, create_router, with_request_logging,
};
use rask_request_logger::snapshot::{REQUEST_FIELDS, RequestSnapshot};
use rask_request_logger::{EventError, LifecycleEvent, MemoryLogger, Severity};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn create_test_server(builder: RequestLoggingBuilder) -> (TestServer, MemoryLogger) {
    let logger = MemoryLogger::new();
    let logging = builder
        .logger(Arc::new(logger.clone()))
        .build()
        .expect("valid logging options");
    let server = TestServer::new(create_router(Arc::new(logging))).expect("test server");
    (server, logger)
}

#[tokio::test]
async fn test_completed_request_is_logged_with_req_and_res() {
    let (server, logger) = create_test_server(RequestLogging::builder());

    let response = server.get("/").await;
    response.assert_status_ok();

    let entries = logger.with_message("request completed");
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.severity, Severity::Info);

    let req = &entry.bindings["req"];
    let mut keys: Vec<&str> = req.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = REQUEST_FIELDS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);
    assert_eq!(req["method"], json!("GET"));
    assert_eq!(req["url"], json!("/"));
    assert!(!req["id"].as_str().unwrap().is_empty());

    let res = entry.record.get("res").unwrap();
    assert_eq!(res["statusCode"], json!(200));
    assert!(res["header"].as_str().unwrap().starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(entry.record.get("responseTime").unwrap().is_u64());
}

#[tokio::test]
async fn test_request_id_header_is_reused() {
    let (server, logger) = create_test_server(RequestLogging::builder());

    server
        .get("/")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-42"),
        )
        .await
        .assert_status_ok();

    let entries = logger.with_message("request completed");
    assert_eq!(entries[0].bindings["req"]["id"], json!("req-42"));
}

#[tokio::test]
async fn test_handler_events_resolve_through_tags() {
    let (server, logger) = create_test_server(
        RequestLogging::builder()
            .tag("db", "debug")
            .tag("orders", "trace")
            .merge_log_data(true),
    );

    server.get("/orders/7").await.assert_status_ok();

    let entries = logger.entries();
    let event = entries
        .iter()
        .find(|entry| entry.record.contains_key("orderId"))
        .expect("order event logged");
    assert_eq!(event.severity, Severity::Debug);
    assert_eq!(event.record.get("tags"), Some(&json!(["orders", "db"])));
    assert_eq!(event.record.get("orderId"), Some(&json!(7)));
    assert_eq!(event.bindings["req"]["url"], json!("/orders/7"));
}

#[tokio::test]
async fn test_ignored_path_invokes_neither_serializer_nor_logger() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let (server, logger) = create_test_server(
        RequestLogging::builder()
            .ignore_path("/health")
            .log_request_start(true)
            .request_serializer(move |req: &RequestSnapshot<'_>| {
                counter.fetch_add(1, Ordering::SeqCst);
                json!({ "url": req.url() })
            }),
    );

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "Healthy");

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(logger.is_empty());

    server.get("/").await.assert_status_ok();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(logger.len(), 2);
}

#[tokio::test]
async fn test_request_error_is_logged_at_warn() {
    let (server, logger) = create_test_server(RequestLogging::builder());

    let response = server.get("/fail").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let errors = logger.with_message("request error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, Severity::Warn);
    assert_eq!(
        errors[0].record.get("err"),
        Some(&json!({ "type": "Error", "message": "upstream unavailable", "sources": [] }))
    );

    let completed = logger.with_message("request completed");
    assert_eq!(completed[0].record.get("res").unwrap()["statusCode"], json!(500));
}

#[tokio::test]
async fn test_request_start_is_opt_in() {
    let (server, logger) = create_test_server(RequestLogging::builder().log_request_start(true));

    server.get("/").await.assert_status_ok();

    let entries = logger.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].msg(), Some("request start"));
    assert_eq!(entries[1].msg(), Some("request completed"));
}

#[tokio::test]
async fn test_disabled_event_kinds() {
    let (server, logger) = create_test_server(RequestLogging::builder().log_events(["onPostStart"]));

    server.get("/fail").await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    assert!(logger.is_empty());
}

#[tokio::test]
async fn test_request_complete_can_be_switched_off() {
    let (server, logger) =
        create_test_server(RequestLogging::builder().log_request_complete(false));

    server.get("/").await.assert_status_ok();

    assert!(logger.with_message("request completed").is_empty());
}

#[tokio::test]
async fn test_ignored_request_tag_groups() {
    let groups = IgnoredEventTags {
        log: vec![],
        request: vec![vec!["orders".to_string(), "db".to_string()]],
    };
    let (server, logger) = create_test_server(RequestLogging::builder().ignored_event_tags(groups));

    server.get("/orders/1").await.assert_status_ok();

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].msg(), Some("request completed"));
}

async fn charge(Extension(logger): Extension<RequestLogger>) -> &'static str {
    logger.log(&LifecycleEvent::new(["payment", "noisy"]).with_error(EventError::msg("card declined")));
    logger.log(&LifecycleEvent::new(["payment", "noisy"]));
    "declined"
}

#[tokio::test]
async fn test_request_error_events_bypass_ignored_tag_groups() {
    let logger = MemoryLogger::new();
    let groups = IgnoredEventTags {
        log: vec![],
        request: vec![vec!["noisy".to_string()]],
    };
    let logging = RequestLogging::builder()
        .ignored_event_tags(groups)
        .log_request_complete(false)
        .logger(Arc::new(logger.clone()))
        .build()
        .expect("valid logging options");
    let router = with_request_logging(Router::new().route("/charge", get(charge)), Arc::new(logging));
    let server = TestServer::new(router).expect("test server");

    server.get("/charge").await.assert_status_ok();

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, Severity::Warn);
    assert_eq!(entries[0].record.get("err").unwrap()["message"], json!("card declined"));
    assert_eq!(entries[0].bindings["req"]["url"], json!("/charge"));
}

#[tokio::test]
async fn test_custom_serializers_and_messages() {
    let messages = MessageConfig {
        request_complete: "done".to_string(),
        ..MessageConfig::default()
    };
    let (server, logger) = create_test_server(
        RequestLogging::builder()
            .messages(messages)
            .request_serializer(|req: &RequestSnapshot<'_>| json!(format!("{} {}", req.method(), req.url())))
            .response_serializer(|res| json!({ "status": res.status_code() })),
    );

    server.get("/").await.assert_status_ok();

    let entries = logger.with_message("done");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].bindings["req"], Value::String("GET /".to_string()));
    assert_eq!(entries[0].record.get("res"), Some(&json!({ "status": 200 })));
}
