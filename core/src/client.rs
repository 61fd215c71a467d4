//! Transport client for the PaymentsWs API.
//!
//! # Design
//! Each call is split the same way: `build_request` turns a method, an
//! endpoint and per-call options into an `HttpRequest` without touching the
//! network, the configured `HttpTransport` executes it, and
//! `parse_response` folds whatever came back into a `NormalizedResponse`.
//! None of the request methods can fail: transport faults and unparseable
//! bodies become a synthetic 500 response, and non-2xx statuses pass through
//! as the server's own JSON.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::{ClientConfig, Mode};
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{self, RequestOptions};
use crate::tokens::TokenService;
use crate::transport::{HttpTransport, UreqTransport};
use crate::types::{status_from_value, NormalizedResponse};

/// Blocking client for the PaymentsWs REST API.
#[derive(Clone)]
pub struct PaymentsWsClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl PaymentsWsClient {
    pub fn new(api_key: impl Into<String>, mode: Mode) -> Self {
        Self::from_config(ClientConfig::new(api_key, mode))
    }

    /// `extra_options` are layered under every request's own options,
    /// e.g. `{"verify": false}` for a sandbox with a self-signed certificate.
    pub fn with_options(api_key: impl Into<String>, mode: Mode, extra_options: RequestOptions) -> Self {
        Self::from_config(ClientConfig::with_options(api_key, mode, extra_options))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Arc::new(UreqTransport::new()),
        }
    }

    pub fn set_api_host(&mut self, host: impl Into<String>) {
        self.config.set_host(host);
    }

    pub fn set_api_is_https(&mut self, is_https: bool) {
        self.config.set_https(is_https);
    }

    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.config.set_api_version(version);
    }

    /// Replace the underlying transport.
    pub fn set_http_client<T: HttpTransport + 'static>(&mut self, transport: T) {
        self.transport = Arc::new(transport);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api_url(&self) -> &str {
        self.config.api_url()
    }

    /// Token operations bound to this client.
    pub fn tokens(&self) -> TokenService<'_> {
        TokenService::new(self)
    }

    pub fn get(&self, endpoint: &str, query: Map<String, Value>) -> NormalizedResponse {
        let call_options = RequestOptions::new().with(options::QUERY, Value::Object(query));
        self.request(HttpMethod::Get, endpoint, call_options)
    }

    pub fn post(&self, endpoint: &str, json: Option<Value>) -> NormalizedResponse {
        self.request(HttpMethod::Post, endpoint, body_options(json))
    }

    pub fn put(&self, endpoint: &str, json: Option<Value>) -> NormalizedResponse {
        self.request(HttpMethod::Put, endpoint, body_options(json))
    }

    pub fn delete(&self, endpoint: &str, json: Option<Value>) -> NormalizedResponse {
        self.request(HttpMethod::Delete, endpoint, body_options(json))
    }

    /// Send one request and normalize the outcome.
    pub fn request(&self, method: HttpMethod, endpoint: &str, call_options: RequestOptions) -> NormalizedResponse {
        let request = self.build_request(method, endpoint, call_options);
        debug!(method = %request.method, url = %request.url, "sending PaymentsWs request");

        match self.transport.execute(&request) {
            Ok(response) => {
                debug!(status = response.status, url = %request.url, "PaymentsWs response received");
                parse_response(response)
            }
            Err(err) => {
                warn!(method = %request.method, url = %request.url, error = %err, "PaymentsWs transport fault");
                NormalizedResponse::fault(err.to_string())
            }
        }
    }

    /// Construction-time extra options with `per_call` layered on top.
    /// Header names are lowercased in both layers first, so a header only
    /// ever appears once whatever case each layer spelled it in.
    pub fn request_options(&self, per_call: &RequestOptions) -> RequestOptions {
        let base = self.config.extra_options().clone().normalize_headers();
        base.merge(&per_call.clone().normalize_headers())
    }

    /// The exact request `request` would hand to the transport.
    pub fn build_request(&self, method: HttpMethod, endpoint: &str, call_options: RequestOptions) -> HttpRequest {
        let per_call = call_options.normalize_headers().merge(&self.auth_headers());
        let mut merged = self.request_options(&per_call);

        let headers = merged
            .remove(options::HEADERS)
            .map(string_pairs)
            .unwrap_or_default();
        let query = merged
            .remove(options::QUERY)
            .map(string_pairs)
            .unwrap_or_default();
        let body = match merged.remove(options::JSON) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.to_string()),
        };

        HttpRequest {
            method,
            url: format!("{}{}", self.config.api_url(), endpoint.trim_start_matches('/')),
            headers,
            query,
            body,
            options: merged.into_map(),
        }
    }

    fn auth_headers(&self) -> RequestOptions {
        RequestOptions::new().with(
            options::HEADERS,
            json!({
                "accept": "application/json",
                "authorization": format!("Bearer {}", self.config.api_key()),
            }),
        )
    }
}

impl fmt::Debug for PaymentsWsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentsWsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Fold a raw response into a `NormalizedResponse`.
///
/// A body that is not a JSON object yields the 500 fault shape. An object
/// whose `status` is missing or not an integer gets the HTTP status code.
pub fn parse_response(response: HttpResponse) -> NormalizedResponse {
    match decode_body(&response) {
        Ok(normalized) => normalized,
        Err(err) => {
            warn!(status = response.status, error = %err, "unparseable PaymentsWs response body");
            NormalizedResponse::fault(err.to_string())
        }
    }
}

fn decode_body(response: &HttpResponse) -> Result<NormalizedResponse, TransportError> {
    let value: Value =
        serde_json::from_str(&response.body).map_err(|e| TransportError::InvalidJson(e.to_string()))?;
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(TransportError::InvalidJson(format!("expected a JSON object, got {other}")));
        }
    };
    if object.get("status").and_then(status_from_value).is_none() {
        object.insert("status".to_string(), Value::from(response.status));
    }
    serde_json::from_value(Value::Object(object)).map_err(|e| TransportError::InvalidJson(e.to_string()))
}

/// `None` still writes an explicit null so a construction-time `json`
/// option can never turn into a body here.
fn body_options(json: Option<Value>) -> RequestOptions {
    RequestOptions::new().with(options::JSON, json.unwrap_or(Value::Null))
}

/// Flatten a JSON object into string pairs. Strings are taken verbatim,
/// other scalars use their JSON text, nulls are dropped.
fn string_pairs(value: Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect()
}
