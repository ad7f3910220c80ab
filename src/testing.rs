//! Test double for the transport layer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::{ApiClient, ApiRequest, RawResponse, Transport};
use crate::error::ApiResult;

pub type Recorded = Arc<Mutex<Vec<ApiRequest>>>;

/// Replays canned responses in order and records every request it sees.
/// Once the queue is empty it answers `200` with an empty body.
pub struct FakeTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Recorded,
}

impl FakeTransport {
    pub fn new(responses: Vec<(u16, &str)>) -> Self {
        let responses = responses
            .into_iter()
            .map(|(status, body)| RawResponse {
                status,
                body: body.to_string(),
            })
            .collect();
        Self {
            responses: Mutex::new(responses),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Recorded {
        Arc::clone(&self.requests)
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &ApiRequest) -> ApiResult<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or(RawResponse {
            status: 200,
            body: String::new(),
        }))
    }
}

pub fn fake_client(responses: Vec<(u16, &str)>) -> (ApiClient, Recorded) {
    let transport = FakeTransport::new(responses);
    let requests = transport.requests();
    (ApiClient::new(transport), requests)
}
