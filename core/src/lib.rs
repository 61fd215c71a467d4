//! Blocking client for the PaymentsWs tokenization API.
//!
//! # Overview
//! Sensitive values (card numbers and the like) are sent to the PaymentsWs
//! vault once and replaced by an opaque token. `PaymentsWsClient` handles
//! endpoint configuration, auth headers and response normalization;
//! `TokenService` maps tokenize, detokenize, validate and delete onto single
//! HTTP calls.
//!
//! ```no_run
//! use paymentsws::{Mode, PaymentsWsClient};
//!
//! let client = PaymentsWsClient::new("your_api_key", Mode::Sandbox);
//! let created = client.tokens().tokenize("hello");
//! if let Some(token) = created.token() {
//!     let original = client.tokens().detokenize(token.as_str());
//!     println!("{:?}", original.items);
//! }
//! ```
//!
//! # Design
//! - Every call returns a `NormalizedResponse`; transport faults become a
//!   synthetic `status: 500` response instead of an error.
//! - The network sits behind the `HttpTransport` trait, ureq by default.
//! - Construction-time `RequestOptions` are deep-merged under each call's own.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "test-support"))]
pub mod mocks;
pub mod options;
pub mod tokens;
pub mod transport;
pub mod types;

pub use client::{parse_response, PaymentsWsClient};
pub use config::{ClientConfig, Mode};
pub use error::{ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::RequestOptions;
pub use tokens::TokenService;
pub use transport::{HttpTransport, UreqTransport};
pub use types::{CardData, NormalizedResponse, Token, TokenizablePayload};
