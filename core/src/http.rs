//! HTTP transport types exchanged between the client and its transport.
//!
//! # Design
//! Requests and responses are plain data. `PaymentsWsClient` builds an
//! `HttpRequest`, hands it to an `HttpTransport`, and normalizes the
//! `HttpResponse` it gets back. Keeping the wire shape as data lets tests
//! swap the network for an in-memory transport and assert on exactly what
//! would have been sent.

use std::fmt;

use serde_json::{Map, Value};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute. `options` holds the merged transport-level options
/// (`timeout`, `verify`, ...) left over once headers, query and body have been
/// pulled out; transports interpret the keys they understand.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    pub options: Map<String, Value>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "https://example.test/v1/ping".to_string(),
            headers: vec![("Authorization".to_string(), "Bearer k".to_string())],
            query: Vec::new(),
            body: None,
            options: Map::new(),
        };
        assert_eq!(req.header("authorization"), Some("Bearer k"));
        assert!(req.header("accept").is_none());
    }
}
