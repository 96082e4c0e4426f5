//! Default request headers.
//!
//! The remote service only needs a browser-like `user-agent`. Callers can set
//! their own before issuing any operation; the default never replaces it.
//! Keys are matched exactly, so `User-Agent` does not suppress the default.

use std::collections::BTreeMap;

/// User agent sent when the caller has not set `user-agent` themselves.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/47.0.2526.111 Safari/537.36";

pub const USER_AGENT: &str = "user-agent";

/// Header mapping owned by one client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fill in the default `user-agent` if absent. Idempotent.
    pub fn apply_defaults(&mut self) -> &Self {
        if !self.entries.contains_key(USER_AGENT) {
            self.entries
                .insert(USER_AGENT.to_string(), DEFAULT_USER_AGENT.to_string());
        }
        self
    }

    /// Copy of these headers with the defaults filled in.
    pub fn with_defaults(&self) -> Headers {
        let mut headers = self.clone();
        headers.apply_defaults();
        headers
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
