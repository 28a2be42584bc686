//! Testing utilities.
//!
//! [`MockTransport`] replays canned replies and records every request, so
//! applications can exercise the client without network calls.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, RwLock};

use crate::error::{CategorizationError, Result};
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::RawResponse;

/// A canned transport outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Complete response with the given status and body.
    Response { status: u16, body: Vec<u8> },
    /// The request never completed.
    TransportFailure(String),
    /// Headers arrived with `status`, then the body broke off.
    ReadFailure { status: u16, message: String },
}

impl MockReply {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::Response {
            status,
            body: body.into().into_bytes(),
        }
    }

    fn into_result(self) -> Result<RawResponse> {
        match self {
            Self::Response { status, body } => Ok(RawResponse::new(status, HeaderMap::new(), body)),
            Self::TransportFailure(message) => Err(CategorizationError::Transport(Box::new(
                io::Error::new(io::ErrorKind::ConnectionRefused, message),
            ))),
            Self::ReadFailure { status, message } => Err(CategorizationError::Read {
                status,
                source: Box::new(io::Error::new(io::ErrorKind::UnexpectedEof, message)),
            }),
        }
    }
}

/// A mock transport for testing.
///
/// Queued replies are served first, in order; after that the fallback reply
/// (if any) is repeated. Without either, calls fail with a transport error.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    queue: Arc<RwLock<VecDeque<MockReply>>>,
    fallback: Option<MockReply>,
    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer with `reply`.
    pub fn replying(reply: MockReply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::default()
        }
    }

    /// Queue a reply for the next unanswered call.
    pub fn push_reply(&self, reply: MockReply) -> &Self {
        self.queue.write().unwrap().push_back(reply);
        self
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn last_call(&self) -> Option<ApiRequest> {
        self.calls.read().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        self.calls.write().unwrap().push(request);

        let reply = self
            .queue
            .write()
            .unwrap()
            .pop_front()
            .or_else(|| self.fallback.clone());

        match reply {
            Some(reply) => reply.into_result(),
            None => MockReply::TransportFailure("no mock reply configured".into()).into_result(),
        }
    }
}
