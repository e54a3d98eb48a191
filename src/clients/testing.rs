//! In-memory transport used by the unit tests of the client stack.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::{HttpError, HttpRequest, HttpResponse, InvalidHttpRequestError, Transport};

/// Replays canned responses in order and records every request it sees.
///
/// Once the script runs out the last response is repeated. A failing
/// transport answers every request with an error instead.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    failing: bool,
    responses: Mutex<VecDeque<HttpResponse>>,
    last: Mutex<Option<HttpResponse>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.seen.lock().unwrap().push(request.clone());
        if self.failing {
            return Err(HttpError::InvalidRequest(InvalidHttpRequestError::EmptyPath));
        }
        let next = self.responses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(response) = next {
            *last = Some(response);
        }
        Ok(last.clone().unwrap_or_else(|| response(200, Value::Null)))
    }
}

pub fn response(code: u16, body: Value) -> HttpResponse {
    HttpResponse::new(code, HashMap::new(), body)
}

pub fn response_with_header(code: u16, name: &str, value: &str) -> HttpResponse {
    let mut headers = HashMap::new();
    headers.insert(name.to_ascii_lowercase(), vec![value.to_string()]);
    HttpResponse::new(code, headers, Value::Null)
}
