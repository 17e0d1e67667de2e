use http::HeaderMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;

/// Serializes a borrowed `HeaderMap` as `{ name: value }`.
///
/// Repeated headers become an array of values. Non UTF-8 bytes are replaced
/// rather than rejected; a log line is not the place to fail on them.
#[derive(Debug, Clone, Copy)]
pub struct HeaderView<'a>(&'a HeaderMap);

impl<'a> HeaderView<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self(headers)
    }

    pub fn inner(&self) -> &'a HeaderMap {
        self.0
    }
}

impl Serialize for HeaderView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.keys_len()))?;
        for name in self.0.keys() {
            let mut values: Vec<Cow<'_, str>> = self
                .0
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect();

            if values.len() == 1 {
                map.serialize_entry(name.as_str(), &values.remove(0))?;
            } else {
                map.serialize_entry(name.as_str(), &values)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use http::header::{ACCEPT, HOST, SET_COOKIE};
    use serde_json::json;

    #[test]
    fn test_single_and_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("example.com"));
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let value = serde_json::to_value(HeaderView::new(&headers)).unwrap();
        assert_eq!(
            value,
            json!({ "host": "example.com", "set-cookie": ["a=1", "b=2"] })
        );
    }

    #[test]
    fn test_non_utf8_value_is_rendered_lossily() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_bytes(b"text/\xfe").unwrap());

        let value = serde_json::to_value(HeaderView::new(&headers)).unwrap();
        assert_eq!(value["accept"], json!("text/\u{fffd}"));
    }
}
