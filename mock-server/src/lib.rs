//! In-memory stand-in for the PaymentsWs token vault.
//!
//! Serves the four token endpoints under `/v1` with the same
//! `{status, message, items}` envelope the real service uses, and rejects
//! requests without a bearer token.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_VERSION: &str = "v1";

/// Response envelope shared by every endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub status: u16,
    pub message: Option<String>,
    pub items: Option<Value>,
}

impl Envelope {
    fn new(status: StatusCode, message: &str, items: Option<Value>) -> Self {
        Self {
            status: status.as_u16(),
            message: Some(message.to_string()),
            items,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[derive(Deserialize)]
pub struct CreateToken {
    pub data: Option<Value>,
}

pub type Vault = Arc<RwLock<HashMap<String, Value>>>;

pub fn app() -> Router {
    let vault: Vault = Arc::new(RwLock::new(HashMap::new()));
    let tokens = Router::new()
        .route("/tokens/create", post(create_token))
        .route("/tokens/{token}", axum::routing::delete(delete_token))
        .route("/tokens/{token}/detokenize", put(detokenize))
        .route("/tokens/{token}/validate", put(validate))
        .layer(middleware::from_fn(require_bearer))
        .with_state(vault);
    Router::new().nest(&format!("/{API_VERSION}"), tokens)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| !key.trim().is_empty());
    if !authorized {
        return Envelope::new(StatusCode::UNAUTHORIZED, "Unauthorized", None).into_response();
    }
    next.run(request).await
}

async fn create_token(State(vault): State<Vault>, Json(input): Json<CreateToken>) -> Envelope {
    let Some(data) = input.data.filter(|data| !data.is_null()) else {
        return Envelope::new(StatusCode::UNPROCESSABLE_ENTITY, "Missing data", None);
    };
    let token = Uuid::new_v4().simple().to_string();
    vault.write().await.insert(token.clone(), data);
    tracing::debug!(%token, "token created");
    Envelope::new(
        StatusCode::OK,
        "Token created",
        Some(serde_json::json!({ "token": token })),
    )
}

async fn detokenize(State(vault): State<Vault>, Path(token): Path<String>) -> Envelope {
    match vault.read().await.get(&token) {
        Some(data) => Envelope::new(
            StatusCode::OK,
            "Token detokenized",
            Some(serde_json::json!({ "token": token, "data": data })),
        ),
        None => not_found(),
    }
}

async fn validate(State(vault): State<Vault>, Path(token): Path<String>) -> Envelope {
    if vault.read().await.contains_key(&token) {
        Envelope::new(
            StatusCode::OK,
            "Token is valid",
            Some(serde_json::json!({ "token": token, "valid": true })),
        )
    } else {
        not_found()
    }
}

async fn delete_token(State(vault): State<Vault>, Path(token): Path<String>) -> Envelope {
    match vault.write().await.remove(&token) {
        Some(_) => {
            tracing::debug!(%token, "token deleted");
            Envelope::new(StatusCode::OK, "Token deleted", None)
        }
        None => not_found(),
    }
}

fn not_found() -> Envelope {
    Envelope::new(StatusCode::NOT_FOUND, "Token not found", None)
}
