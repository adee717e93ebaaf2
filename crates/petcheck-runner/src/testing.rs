//! Scripted transport for tests: no network

use std::cell::RefCell;

use serde_json::Value;

use crate::client::{ApiRequest, ApiResponse, HttpClient, TransportError};

type Responder = Box<dyn Fn(&ApiRequest) -> Option<(u16, Value)>>;

/// Answers every request from a closure and records what was sent.
pub(crate) struct FakeClient {
    respond: Responder,
    sent: RefCell<Vec<ApiRequest>>,
}

impl FakeClient {
    pub(crate) fn new(respond: impl Fn(&ApiRequest) -> (u16, Value) + 'static) -> Self {
        Self {
            respond: Box::new(move |req| Some(respond(req))),
            sent: RefCell::new(Vec::new()),
        }
    }

    /// Every request fails at the transport level.
    pub(crate) fn unreachable() -> Self {
        Self {
            respond: Box::new(|_| None),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }
}

impl HttpClient for FakeClient {
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        let (status, body) = (self.respond)(request).ok_or_else(|| {
            TransportError::Send(request.label(), "connection refused".into())
        })?;
        Ok(ApiResponse::new(status, body).with_content_type("application/json"))
    }
}
