use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::RpcError;
use crate::transport::{HttpReply, Transport};

/// One request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// A mock transport for testing. Replays canned replies in order and
/// records every request it receives.
pub struct MockTransport {
    replies: Mutex<VecDeque<HttpReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock lock").clone()
    }

    /// The single request this mock saw. Panics on zero or several.
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().expect("one request")
    }

    fn record(&self, request: RecordedRequest) -> Result<HttpReply, RpcError> {
        self.requests.lock().expect("mock lock").push(request);
        self.replies
            .lock()
            .expect("mock lock")
            .pop_front()
            .ok_or_else(|| RpcError::InvalidResponse("mock transport has no reply queued".into()))
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<HttpReply>,
}

impl MockTransportBuilder {
    pub fn reply_json(mut self, status: StatusCode, body: Value) -> Self {
        self.replies
            .push_back(HttpReply::new(status, body.to_string()));
        self
    }

    /// A 200 reply carrying `{result, error: null, id}`.
    pub fn reply_result(self, result: Value) -> Self {
        self.reply_json(
            StatusCode::OK,
            serde_json::json!({"result": result, "error": null, "id": "rpc-bitcoin"}),
        )
    }

    pub fn reply_raw(mut self, status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        self.replies.push_back(HttpReply::new(status, body));
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: Mutex::new(self.replies),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply, RpcError> {
        self.record(RecordedRequest {
            method: "POST",
            path: path.to_owned(),
            body: Some(body.clone()),
        })
    }

    async fn get(&self, path: &str) -> Result<HttpReply, RpcError> {
        self.record(RecordedRequest {
            method: "GET",
            path: path.to_owned(),
            body: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_replies_in_order_and_records_requests() {
        let mock = MockTransport::builder()
            .reply_result(serde_json::json!(1))
            .reply_raw(StatusCode::NOT_FOUND, "gone")
            .build();

        let first = mock
            .post_json("/", &serde_json::json!({"method": "a"}))
            .await
            .unwrap();
        assert_eq!(first.status, StatusCode::OK);
        let second = mock.get("/rest/chaininfo.json").await.unwrap();
        assert_eq!(second.status, StatusCode::NOT_FOUND);
        assert!(mock.get("/").await.is_err());

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[1].path, "/rest/chaininfo.json");
        assert_eq!(requests[1].body, None);
    }
}
