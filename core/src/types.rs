//! Domain types for the token API.
//!
//! # Design
//! The remote service defines the meaning of every field. `NormalizedResponse`
//! names the three fields all endpoints share and keeps anything else the
//! server sends in `extra`, so nothing is lost when a caller needs it.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Opaque token issued by the remote vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Data to be tokenized: a bare string or a map of named fields.
///
/// Serializes as the inner string or object with no tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenizablePayload {
    Raw(String),
    Fields(Map<String, Value>),
}

impl TokenizablePayload {
    /// Build a `Fields` payload from any iterator of key/value pairs.
    pub fn fields<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Fields(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<String> for TokenizablePayload {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for TokenizablePayload {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<Map<String, Value>> for TokenizablePayload {
    fn from(value: Map<String, Value>) -> Self {
        Self::Fields(value)
    }
}

impl From<CardData> for TokenizablePayload {
    fn from(card: CardData) -> Self {
        Self::fields([
            ("pan", card.pan),
            ("expirationDate", card.expiration_date),
            ("cardHolder", card.card_holder),
        ])
    }
}

impl From<TokenizablePayload> for Value {
    fn from(payload: TokenizablePayload) -> Self {
        match payload {
            TokenizablePayload::Raw(raw) => Value::String(raw),
            TokenizablePayload::Fields(fields) => Value::Object(fields),
        }
    }
}

/// Card details in the field layout the vault expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub pan: String,
    /// `MM/YY`.
    pub expiration_date: String,
    pub card_holder: String,
}

/// Uniform result shape returned by every client call.
///
/// Deserialization is lenient so that an application error is never
/// mistaken for a malformed body: `status` may be a number or a numeric
/// string, and a `message` that is not a string is kept as its JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    #[serde(deserialize_with = "lenient_status")]
    pub status: i64,
    #[serde(default, deserialize_with = "lenient_message")]
    pub message: Option<String>,
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedResponse {
    pub const FAULT_STATUS: i64 = 500;

    /// Synthetic response for a request that never produced usable JSON.
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            status: Self::FAULT_STATUS,
            message: Some(message.into()),
            items: None,
            extra: Map::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `items.token`, where a successful tokenize call places the new token.
    pub fn token(&self) -> Option<Token> {
        self.items
            .as_ref()?
            .get("token")?
            .as_str()
            .map(Token::from)
    }
}

/// Integer status from a JSON number or numeric string.
pub(crate) fn status_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    status_from_value(&value).ok_or_else(|| de::Error::custom(format!("status is not an integer: {value}")))
}

fn lenient_message<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(message) => Some(message),
        other => Some(other.to_string()),
    })
}
