use http::response::Parts;
use serde::Serialize;
use std::fmt::Write;

pub const RESPONSE_FIELDS: [&str; 2] = ["statusCode", "header"];

/// Fixed-shape view of an outgoing response: status code plus the rendered
/// status line and header block, as it would go over the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSnapshot<'a> {
    status_code: u16,
    header: String,
    #[serde(skip)]
    raw: &'a Parts,
}

impl<'a> ResponseSnapshot<'a> {
    pub(super) fn project(raw: &'a Parts) -> Self {
        Self {
            status_code: raw.status.as_u16(),
            header: render_header_block(raw),
            raw,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn raw_handle(&self) -> &'a Parts {
        self.raw
    }
}

fn render_header_block(raw: &Parts) -> String {
    let mut block = String::with_capacity(64 + raw.headers.len() * 32);
    let _ = write!(
        block,
        "{:?} {} {}\r\n",
        raw.version,
        raw.status.as_u16(),
        raw.status.canonical_reason().unwrap_or_default()
    );
    for (name, value) in &raw.headers {
        block.push_str(name.as_str());
        block.push_str(": ");
        block.push_str(&String::from_utf8_lossy(value.as_bytes()));
        block.push_str("\r\n");
    }
    block.push_str("\r\n");
    block
}
