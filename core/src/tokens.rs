//! Token operations: tokenize, detokenize, validate, delete.
//!
//! Each operation is exactly one call on the borrowed `PaymentsWsClient`.
//! Tokens are sent as a single percent-encoded path segment and are
//! otherwise opaque here; the remote vault decides whether they are valid.

use serde_json::{Map, Value};

use crate::client::PaymentsWsClient;
use crate::types::{NormalizedResponse, TokenizablePayload};

const CREATE_PATH: &str = "tokens/create";

/// Token vault operations over a configured client.
#[derive(Debug, Clone, Copy)]
pub struct TokenService<'a> {
    client: &'a PaymentsWsClient,
}

impl<'a> TokenService<'a> {
    pub fn new(client: &'a PaymentsWsClient) -> Self {
        Self { client }
    }

    /// `POST tokens/create` with `{"data": data}`. The new token comes back
    /// in `items.token`; see [`NormalizedResponse::token`].
    pub fn tokenize(&self, data: impl Into<TokenizablePayload>) -> NormalizedResponse {
        let payload: TokenizablePayload = data.into();
        let mut body = Map::new();
        body.insert("data".to_string(), Value::from(payload));
        self.client.post(CREATE_PATH, Some(Value::Object(body)))
    }

    /// `PUT tokens/{token}/detokenize`. The original data is in `items`.
    pub fn detokenize(&self, token: &str) -> NormalizedResponse {
        self.client.put(&format!("{}/detokenize", token_path(token)), None)
    }

    /// `PUT tokens/{token}/validate`.
    pub fn validate(&self, token: &str) -> NormalizedResponse {
        self.client.put(&format!("{}/validate", token_path(token)), None)
    }

    /// `DELETE tokens/{token}`. Removes the token and its stored data.
    pub fn delete(&self, token: &str) -> NormalizedResponse {
        self.client.delete(&token_path(token), None)
    }
}

fn token_path(token: &str) -> String {
    format!("tokens/{}", urlencoding::encode(token))
}
