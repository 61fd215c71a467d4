//! Error types for the PaymentsWs client.
//!
//! # Design
//! Request methods never return these to the caller. A `TransportError` is
//! folded into a synthetic 500 `NormalizedResponse` whose message is the
//! error's `Display` text, so the variants exist for logging and for custom
//! transports to report what went wrong. `ConfigError` is only produced while
//! building a configuration from the environment.

use thiserror::Error;

/// Faults below the application tier: the request never produced a usable
/// JSON document.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure reported by ureq.
    #[error("request failed: {0}")]
    Request(#[from] ureq::Error),

    /// A transport option had the wrong JSON type.
    #[error("invalid request option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    /// The response body was not a JSON object.
    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    /// Any other failure raised by a custom transport.
    #[error("{0}")]
    Other(String),
}

/// Errors raised while loading a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
