use super::plugin::{RequestLogger, RequestLogging};
use crate::domain::EventError;
use crate::snapshot::{REQUEST_ID_HEADER, RequestId};
use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;

/// Response extension marking a request as failed.
///
/// Handlers insert it into the response they return; the middleware logs it
/// as a `request error` record.
#[derive(Debug, Clone)]
pub struct ResponseError(pub EventError);

impl ResponseError {
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(EventError::new(error))
    }
}

/// Installs the request logging middleware on `router`.
pub fn with_request_logging<S>(router: Router<S>, logging: Arc<RequestLogging>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(from_fn_with_state(logging, log_requests))
}

/// Binds a [`RequestLogger`] to each request and logs its outcome.
pub async fn log_requests(
    State(logging): State<Arc<RequestLogging>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    if logging.is_ignored_path(parts.uri.path()) {
        parts.extensions.insert(RequestLogger::disabled());
        return next.run(Request::from_parts(parts, body)).await;
    }

    if parts.extensions.get::<RequestId>().is_none() {
        let id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| RequestId(value.to_string()))
            .unwrap_or_else(RequestId::generate);
        parts.extensions.insert(id);
    }

    let request_logger = logging.request_logger(&parts);
    request_logger.request_start();
    parts.extensions.insert(request_logger.clone());

    let started = Instant::now();
    let response = next.run(Request::from_parts(parts, body)).await;
    let elapsed = started.elapsed();

    let (parts, body) = response.into_parts();
    if let Some(ResponseError(error)) = parts.extensions.get::<ResponseError>() {
        request_logger.request_error(error);
    }
    request_logger.request_complete(&parts, elapsed);

    Response::from_parts(parts, body)
}
