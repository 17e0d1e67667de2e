//! Serializer protocol for request, response and error values.
//!
//! A serializer turns a raw object into the JSON that ends up in the log
//! record. Callers may supply their own serializer per kind; it is always
//! composed with the snapshot projector, so custom code only ever sees the
//! snapshot and never the raw object. Panics raised inside a custom
//! serializer are not caught here.

use crate::domain::EventError;
use crate::snapshot::{ErrorSnapshot, RequestSnapshot, ResponseSnapshot, SnapshotFactory, to_json};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Raw object → JSON. Shared and cheap to clone.
pub type Serializer<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// Custom serializers, one signature per kind.
pub type RequestSerializerFn = dyn Fn(&RequestSnapshot<'_>) -> Value + Send + Sync;
pub type ResponseSerializerFn = dyn Fn(&ResponseSnapshot<'_>) -> Value + Send + Sync;
pub type ErrorSerializerFn = dyn Fn(&ErrorSnapshot<'_>) -> Value + Send + Sync;

/// Ties a raw type to its snapshot projection and custom serializer shape.
pub trait SnapshotKind: 'static {
    type Raw: 'static;
    type Custom: ?Sized + Send + Sync + 'static;

    /// Process-wide default serializer, built once.
    fn default_serializer() -> Serializer<Self::Raw>;

    /// Projects `raw` and hands the snapshot to `custom`.
    fn apply(custom: &Self::Custom, raw: &Self::Raw) -> Value;
}

pub struct RequestKind;
pub struct ResponseKind;
pub struct ErrorKind;

static DEFAULT_REQUEST: LazyLock<Serializer<http::request::Parts>> = LazyLock::new(|| {
    Arc::new(|raw: &http::request::Parts| to_json(&SnapshotFactory::from_request(raw)))
});

static DEFAULT_RESPONSE: LazyLock<Serializer<http::response::Parts>> = LazyLock::new(|| {
    Arc::new(|raw: &http::response::Parts| to_json(&SnapshotFactory::from_response(raw)))
});

static DEFAULT_ERROR: LazyLock<Serializer<EventError>> =
    LazyLock::new(|| Arc::new(|raw: &EventError| to_json(&SnapshotFactory::from_error(raw))));

impl SnapshotKind for RequestKind {
    type Raw = http::request::Parts;
    type Custom = RequestSerializerFn;

    fn default_serializer() -> Serializer<Self::Raw> {
        Arc::clone(&*DEFAULT_REQUEST)
    }

    fn apply(custom: &Self::Custom, raw: &Self::Raw) -> Value {
        custom(&SnapshotFactory::from_request(raw))
    }
}

impl SnapshotKind for ResponseKind {
    type Raw = http::response::Parts;
    type Custom = ResponseSerializerFn;

    fn default_serializer() -> Serializer<Self::Raw> {
        Arc::clone(&*DEFAULT_RESPONSE)
    }

    fn apply(custom: &Self::Custom, raw: &Self::Raw) -> Value {
        custom(&SnapshotFactory::from_response(raw))
    }
}

impl SnapshotKind for ErrorKind {
    type Raw = EventError;
    type Custom = ErrorSerializerFn;

    fn default_serializer() -> Serializer<Self::Raw> {
        Arc::clone(&*DEFAULT_ERROR)
    }

    fn apply(custom: &Self::Custom, raw: &Self::Raw) -> Value {
        custom(&SnapshotFactory::from_error(raw))
    }
}

pub struct SerializerWrapper;

impl SerializerWrapper {
    /// Composes `user` with the snapshot projector of `K`.
    ///
    /// Without a custom serializer `default` is returned as is (same `Arc`),
    /// so the default path costs no extra indirection. `default` is only used
    /// in that case: a custom serializer is fed the projection of
    /// [`SnapshotKind::apply`] and never calls `default`.
    pub fn wrap<K: SnapshotKind>(
        user: Option<Arc<K::Custom>>,
        default: &Serializer<K::Raw>,
    ) -> Serializer<K::Raw> {
        match user {
            None => Arc::clone(default),
            Some(user) => Arc::new(move |raw: &K::Raw| K::apply(&*user, raw)),
        }
    }
}

/// The serializers used for `req`, `res` and `err` fields.
#[derive(Clone)]
pub struct Serializers {
    pub req: Serializer<http::request::Parts>,
    pub res: Serializer<http::response::Parts>,
    pub err: Serializer<EventError>,
}

impl Serializers {
    pub fn new(
        req: Option<Arc<RequestSerializerFn>>,
        res: Option<Arc<ResponseSerializerFn>>,
        err: Option<Arc<ErrorSerializerFn>>,
    ) -> Self {
        Self {
            req: SerializerWrapper::wrap::<RequestKind>(req, &RequestKind::default_serializer()),
            res: SerializerWrapper::wrap::<ResponseKind>(res, &ResponseKind::default_serializer()),
            err: SerializerWrapper::wrap::<ErrorKind>(err, &ErrorKind::default_serializer()),
        }
    }

    pub fn request(&self, raw: &http::request::Parts) -> Value {
        (self.req)(raw)
    }

    pub fn response(&self, raw: &http::response::Parts) -> Value {
        (self.res)(raw)
    }

    pub fn error(&self, raw: &EventError) -> Value {
        (self.err)(raw)
    }
}

impl Default for Serializers {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl fmt::Debug for Serializers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let custom = |is_default: bool| if is_default { "default" } else { "custom" };
        f.debug_struct("Serializers")
            .field("req", &custom(Arc::ptr_eq(&self.req, &*DEFAULT_REQUEST)))
            .field("res", &custom(Arc::ptr_eq(&self.res, &*DEFAULT_RESPONSE)))
            .field("err", &custom(Arc::ptr_eq(&self.err, &*DEFAULT_ERROR)))
            .finish()
    }
}
