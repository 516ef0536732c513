//! Scripted `RemoteSource` used by the facade tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::remote::{RemoteRequest, RemoteResponse, RemoteSource};
use super::{ApiError, ApiResult};

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedRemote {
    responses: Mutex<VecDeque<ApiResult<RemoteResponse>>>,
    requests: Mutex<Vec<RemoteRequest>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: RemoteResponse) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push(RemoteResponse::new(status, body.to_string()))
    }

    pub fn push_err(&self, error: ApiError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<RemoteRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RemoteSource for ScriptedRemote {
    async fn send(&self, request: RemoteRequest) -> ApiResult<RemoteResponse> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for {}", path))
    }
}
