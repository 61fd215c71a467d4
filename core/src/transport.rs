//! Network execution of `HttpRequest` values.
//!
//! # Design
//! `HttpTransport` is the seam between request shaping and I/O. The client
//! owns one behind an `Arc` and never looks past the trait, so tests and
//! callers with special needs can substitute their own through
//! `PaymentsWsClient::set_http_client`.
//!
//! `UreqTransport` is the default. It reuses a single agent (and its
//! connection pool) for every call unless the request carries `timeout` or
//! `verify` options, in which case a dedicated agent is configured for that
//! call.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options;

/// Executes one HTTP round trip.
///
/// Implementations must return non-2xx responses as `Ok`; only failures
/// that prevent a response from being read belong in `Err`.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by ureq.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent(),
        }
    }

    /// Shared agent, or a dedicated one when the request overrides
    /// timeout or TLS verification.
    fn agent_for(&self, transport_options: &Map<String, Value>) -> Result<Agent, TransportError> {
        let timeout = parse_timeout(transport_options)?;
        let verify = parse_verify(transport_options)?;
        if timeout.is_none() && verify {
            return Ok(self.agent.clone());
        }

        let mut builder = Agent::config_builder().http_status_as_error(false);
        if let Some(timeout) = timeout {
            builder = builder.timeout_global(Some(timeout));
        }
        if !verify {
            builder = builder.tls_config(TlsConfig::builder().disable_verification(true).build());
        }
        Ok(builder.build().new_agent())
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent_for(&request.options)?;
        let url = request.url.as_str();
        let body = request.body.as_deref();

        let mut response = match request.method {
            HttpMethod::Get => decorate(agent.get(url), request).call(),
            HttpMethod::Delete => match body {
                Some(_) => send(decorate(agent.delete(url).force_send_body(), request), body),
                None => decorate(agent.delete(url), request).call(),
            },
            HttpMethod::Post => send(decorate(agent.post(url), request), body),
            HttpMethod::Put => send(decorate(agent.put(url), request), body),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn decorate<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}

fn send(
    builder: RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder
            .content_type("application/json")
            .send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn parse_timeout(transport_options: &Map<String, Value>) -> Result<Option<Duration>, TransportError> {
    match transport_options.get(options::TIMEOUT) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| Some(Duration::from_secs_f64(secs)))
            .ok_or_else(|| TransportError::InvalidOption {
                key: options::TIMEOUT.to_string(),
                reason: format!("expected a non-negative number of seconds, got {value}"),
            }),
    }
}

fn parse_verify(transport_options: &Map<String, Value>) -> Result<bool, TransportError> {
    match transport_options.get(options::VERIFY) {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(verify)) => Ok(*verify),
        Some(other) => Err(TransportError::InvalidOption {
            key: options::VERIFY.to_string(),
            reason: format!("expected a boolean, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn timeout_accepts_integers_and_fractions() {
        assert_eq!(parse_timeout(&map(json!({"timeout": 2}))).unwrap(), Some(Duration::from_secs(2)));
        assert_eq!(
            parse_timeout(&map(json!({"timeout": 0.5}))).unwrap(),
            Some(Duration::from_millis(500))
        );
        assert_eq!(parse_timeout(&map(json!({}))).unwrap(), None);
    }

    #[test]
    fn timeout_rejects_non_numbers() {
        let err = parse_timeout(&map(json!({"timeout": "soon"}))).unwrap_err();
        assert!(matches!(err, TransportError::InvalidOption { ref key, .. } if key == "timeout"));
        assert!(parse_timeout(&map(json!({"timeout": -1}))).is_err());
    }

    #[test]
    fn verify_defaults_to_true() {
        assert!(parse_verify(&map(json!({}))).unwrap());
        assert!(!parse_verify(&map(json!({"verify": false}))).unwrap());
        assert!(parse_verify(&map(json!({"verify": "no"}))).is_err());
    }
}
