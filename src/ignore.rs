use std::collections::HashSet;

/// Request paths that get no request logger at all.
///
/// Exact string match against the request path (no query string, no glob
/// or regex semantics). Built once from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreTable {
    paths: HashSet<String>,
}

impl IgnoreTable {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        !self.paths.is_empty() && self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
