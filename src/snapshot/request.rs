use super::headers::HeaderView;
use axum::extract::ConnectInfo;
use http::request::Parts;
use http::uri::PathAndQuery;
use http::HeaderMap;
use serde::Serialize;
use std::net::SocketAddr;

/// Header consulted when no [`RequestId`] extension is present.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Enumerable fields of a serialized [`RequestSnapshot`], in output order.
pub const REQUEST_FIELDS: [&str; 6] = [
    "id",
    "method",
    "url",
    "headers",
    "remoteAddress",
    "remotePort",
];

/// Request identifier, stored in the request extensions by the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fixed-shape view of an incoming request.
///
/// Everything borrows from the raw request except the rendered remote
/// address. The raw request is never serialized; a custom serializer that
/// needs it asks for it through [`RequestSnapshot::raw_handle`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSnapshot<'a> {
    id: &'a str,
    method: &'a str,
    url: &'a str,
    headers: HeaderView<'a>,
    remote_address: Option<String>,
    remote_port: Option<u16>,
    #[serde(skip)]
    raw: &'a Parts,
}

impl<'a> RequestSnapshot<'a> {
    pub(super) fn project(raw: &'a Parts) -> Self {
        let id = raw
            .extensions
            .get::<RequestId>()
            .map(RequestId::as_str)
            .or_else(|| {
                raw.headers
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
            })
            .unwrap_or_default();

        let url = raw
            .uri
            .path_and_query()
            .map(PathAndQuery::as_str)
            .unwrap_or_else(|| raw.uri.path());

        let remote = raw
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            id,
            method: raw.method.as_str(),
            url,
            headers: HeaderView::new(&raw.headers),
            remote_address: remote.map(|addr| addr.ip().to_string()),
            remote_port: remote.map(|addr| addr.port()),
            raw,
        }
    }

    pub fn id(&self) -> &'a str {
        self.id
    }

    pub fn method(&self) -> &'a str {
        self.method
    }

    pub fn url(&self) -> &'a str {
        self.url
    }

    pub fn headers(&self) -> &'a HeaderMap {
        self.headers.inner()
    }

    pub fn remote_address(&self) -> Option<&str> {
        self.remote_address.as_deref()
    }

    pub fn remote_port(&self) -> Option<u16> {
        self.remote_port
    }

    /// The request this snapshot was taken from.
    pub fn raw_handle(&self) -> &'a Parts {
        self.raw
    }
}
