//! Scripted transport for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::GraphqlTransport;
use crate::errors::LookupError;
use crate::outcome::UpstreamReply;
use crate::query::GraphqlRequest;

/// What a [`StubTransport`] does when called.
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Return this reply.
    Reply(UpstreamReply),
    /// Fail before any status is available.
    Fail(String),
    /// Panic inside the transport.
    Panic(String),
}

/// Transport that replays a fixed behavior and counts calls.
#[derive(Debug)]
pub struct StubTransport {
    behavior: StubBehavior,
    calls: AtomicUsize,
    last_request: Mutex<Option<GraphqlRequest>>,
}

impl StubTransport {
    /// Creates a stub with an explicit behavior.
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Replies 200 OK with `body` serialized as JSON.
    pub fn json(body: Value) -> Self {
        Self::new(StubBehavior::Reply(UpstreamReply::ok(body.to_string())))
    }

    /// Replies with the given reply.
    pub fn replying(reply: UpstreamReply) -> Self {
        Self::new(StubBehavior::Reply(reply))
    }

    /// Fails every call with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(StubBehavior::Fail(reason.into()))
    }

    /// Panics on every call with `message`.
    pub fn panicking(message: impl Into<String>) -> Self {
        Self::new(StubBehavior::Panic(message.into()))
    }

    /// Number of times `execute` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most recent request received.
    pub fn last_request(&self) -> Option<GraphqlRequest> {
        self.last_request.lock().clone()
    }
}

#[async_trait]
impl GraphqlTransport for StubTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<UpstreamReply, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());

        match &self.behavior {
            StubBehavior::Reply(reply) => Ok(reply.clone()),
            StubBehavior::Fail(reason) => Err(LookupError::internal(reason.clone())),
            StubBehavior::Panic(message) => panic!("{message}"),
        }
    }
}
