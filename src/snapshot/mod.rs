//! Log-safe snapshots of live request, response and error objects.
//!
//! A snapshot exposes a fixed set of fields and nothing else. The raw object
//! stays reachable through `raw_handle()` for serializers that ask for it,
//! but it is skipped by `Serialize`, so a structured dump of a snapshot can
//! never pull in extensions, bodies or other internal state.

mod error;
mod headers;
mod request;
mod response;

pub use error::{ERROR_FIELDS, ErrorSnapshot};
pub use headers::HeaderView;
pub use request::{REQUEST_FIELDS, REQUEST_ID_HEADER, RequestId, RequestSnapshot};
pub use response::{RESPONSE_FIELDS, ResponseSnapshot};

use crate::domain::EventError;
use serde::Serialize;
use serde_json::Value;

pub struct SnapshotFactory;

impl SnapshotFactory {
    pub fn from_request(raw: &http::request::Parts) -> RequestSnapshot<'_> {
        RequestSnapshot::project(raw)
    }

    pub fn from_response(raw: &http::response::Parts) -> ResponseSnapshot<'_> {
        ResponseSnapshot::project(raw)
    }

    pub fn from_error(raw: &EventError) -> ErrorSnapshot<'_> {
        ErrorSnapshot::project(raw)
    }
}

/// Serializes a snapshot (or any serializer output) into a JSON value.
///
/// Snapshots only hold string keyed maps, so this does not fail in practice;
/// if it ever does the field is logged as `null` instead of dropping the
/// whole record.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::warn!("Failed to serialize log field: {}", e);
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ConnectInfo;
    use http::{Request, Response, StatusCode, Version};
    use serde_json::json;
    use std::net::SocketAddr;

    #[derive(Debug, Clone)]
    struct SessionSecret(#[allow(dead_code)] String);

    fn request_parts() -> http::request::Parts {
        let (mut parts, _body) = Request::builder()
            .method("POST")
            .uri("/orders?limit=10")
            .header("content-type", "application/json")
            .header("x-request-id", "from-header")
            .body(())
            .unwrap()
            .into_parts();
        parts
            .extensions
            .insert(ConnectInfo("10.1.2.3:52100".parse::<SocketAddr>().unwrap()));
        parts.extensions.insert(SessionSecret("hunter2".into()));
        parts
    }

    #[test]
    fn test_request_snapshot_has_exactly_the_documented_fields() {
        let parts = request_parts();
        let value = to_json(&SnapshotFactory::from_request(&parts));

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = REQUEST_FIELDS.to_vec();
        let mut actual = keys.clone();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(actual, expected);

        assert_eq!(value["id"], "from-header");
        assert_eq!(value["method"], "POST");
        assert_eq!(value["url"], "/orders?limit=10");
        assert_eq!(value["headers"]["content-type"], "application/json");
        assert_eq!(value["remoteAddress"], "10.1.2.3");
        assert_eq!(value["remotePort"], 52100);
        assert!(!value.to_string().contains("hunter2"));
    }

    #[test]
    fn test_request_id_extension_wins_over_header() {
        let mut parts = request_parts();
        parts.extensions.insert(RequestId("from-extension".into()));

        let snapshot = SnapshotFactory::from_request(&parts);
        assert_eq!(snapshot.id(), "from-extension");
    }

    #[test]
    fn test_request_snapshot_without_connect_info() {
        let (parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let snapshot = SnapshotFactory::from_request(&parts);

        assert_eq!(snapshot.id(), "");
        assert_eq!(snapshot.remote_address(), None);
        let value = to_json(&snapshot);
        assert_eq!(value["remoteAddress"], Value::Null);
        assert_eq!(value["remotePort"], Value::Null);
    }

    #[test]
    fn test_raw_handle_reaches_the_original_request() {
        let parts = request_parts();
        let snapshot = SnapshotFactory::from_request(&parts);

        assert!(std::ptr::eq(snapshot.raw_handle(), &parts));
        assert!(snapshot.raw_handle().extensions.get::<SessionSecret>().is_some());
    }

    #[test]
    fn test_response_snapshot() {
        let (parts, _) = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .version(Version::HTTP_11)
            .header("content-type", "text/plain")
            .body(())
            .unwrap()
            .into_parts();

        let snapshot = SnapshotFactory::from_response(&parts);
        assert_eq!(snapshot.status_code(), 404);
        assert_eq!(
            snapshot.header(),
            "HTTP/1.1 404 Not Found\r\ncontent-type: text/plain\r\n\r\n"
        );
        assert!(std::ptr::eq(snapshot.raw_handle(), &parts));

        let value = to_json(&snapshot);
        assert_eq!(
            value,
            json!({
                "statusCode": 404,
                "header": "HTTP/1.1 404 Not Found\r\ncontent-type: text/plain\r\n\r\n"
            })
        );
    }

    #[test]
    fn test_error_snapshot() {
        let error = EventError::new(std::io::Error::other("disk full"));
        let snapshot = SnapshotFactory::from_error(&error);

        let value = to_json(&snapshot);
        assert_eq!(
            value,
            json!({ "type": "Error", "message": "disk full", "sources": [] })
        );
        assert_eq!(snapshot.raw_handle().message(), "disk full");
        assert_eq!(ERROR_FIELDS.len(), value.as_object().unwrap().len());
        assert_eq!(RESPONSE_FIELDS, ["statusCode", "header"]);
    }
}
