//! Request options and their layered merge.
//!
//! Options are a JSON object so callers can pass transport settings without
//! the client having to know about them up front. Recognized keys:
//!
//! | key       | type             | meaning                               |
//! |-----------|------------------|---------------------------------------|
//! | `json`    | any              | request body, serialized as JSON      |
//! | `query`   | object           | query-string parameters               |
//! | `headers` | object           | extra request headers                 |
//! | `timeout` | number (seconds) | whole-request timeout                 |
//! | `verify`  | bool             | TLS certificate verification          |
//!
//! Anything else is carried through to the transport untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSON: &str = "json";
pub const QUERY: &str = "query";
pub const HEADERS: &str = "headers";
pub const TIMEOUT: &str = "timeout";
pub const VERIFY: &str = "verify";

/// A set of request options, keyed like a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestOptions(Map<String, Value>);

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Lowercase every key of the `headers` object so that header names
    /// collide case-insensitively when layers are merged. Keys that only
    /// differ in case within this layer collapse to one.
    pub fn normalize_headers(mut self) -> Self {
        if let Some(Value::Object(headers)) = self.0.get_mut(HEADERS) {
            let taken = std::mem::take(headers);
            *headers = taken
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect();
        }
        self
    }

    /// Layer `overrides` on top of `self` and return the result.
    ///
    /// Last writer wins per leaf key: where both sides hold an object under the
    /// same key the objects are merged recursively, otherwise the value from
    /// `overrides` replaces the one in `self`. Arrays count as leaves.
    pub fn merge(&self, overrides: &RequestOptions) -> RequestOptions {
        let mut merged = self.0.clone();
        merge_recursive(&mut merged, &overrides.0);
        RequestOptions(merged)
    }
}

impl From<Map<String, Value>> for RequestOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Recursively merge `overrides` into `base` in place.
pub fn merge_recursive(base: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        if let (Some(Value::Object(target)), Value::Object(patch)) = (base.get_mut(key), value) {
            merge_recursive(target, patch);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}
