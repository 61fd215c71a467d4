//! In-memory transports for testing without a network.
//!
//! Enabled with the `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! paymentsws = { path = "...", features = ["test-support"] }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::HttpTransport;

// ── RecordingTransport ────────────────────────────────────────────────────────

/// Records every request and answers with queued responses.
///
/// When the queue is empty it answers `200 {"status":200,"message":"OK","items":null}`.
/// Clones share the same log and queue.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and raw body.
    pub fn respond_with(&self, status: u16, body: impl Into<String>) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.into(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpTransport for RecordingTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let queued = self.responses.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"status":200,"message":"OK","items":null}"#.to_string(),
        }))
    }
}

// ── FailingTransport ──────────────────────────────────────────────────────────

/// Fails every request with `TransportError::Other`, counting attempts.
#[derive(Clone)]
pub struct FailingTransport {
    message: String,
    attempts: Arc<Mutex<usize>>,
}

impl FailingTransport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: Arc::new(Mutex::new(0)),
        }
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl HttpTransport for FailingTransport {
    fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        *self.attempts.lock().unwrap() += 1;
        Err(TransportError::Other(self.message.clone()))
    }
}
