use std::sync::Mutex;

use serde_json::Value;

use super::{ListOptions, ResourceApi};
use crate::import::error::{ImportError, ImportResult};

/// A call received by [`MockApi`]
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List {
        resource: String,
        options: ListOptions,
    },
    Show {
        resource: String,
        id: String,
    },
}

/// Scripted answer: the API body, or an error status and message
type MockAnswer = Result<Value, (u16, String)>;

struct MockResponse {
    resource: String,
    id: Option<String>,
    answer: MockAnswer,
}

/// Mock API for testing, records every call and replays scripted responses
pub struct MockApi {
    responses: Mutex<Vec<MockResponse>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the answer to the next list call for `resource`
    pub fn on_list(self, resource: &str, answer: MockAnswer) -> Self {
        self.push(resource, None, answer);
        self
    }

    /// Script the answer to the next show call for `resource`/`id`
    pub fn on_show(self, resource: &str, id: &str, answer: MockAnswer) -> Self {
        self.push(resource, Some(id.to_string()), answer);
        self
    }

    /// Get all received calls in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, resource: &str, id: Option<String>, answer: MockAnswer) {
        self.responses.lock().unwrap().push(MockResponse {
            resource: resource.to_string(),
            id,
            answer,
        });
    }

    fn answer(&self, resource: &str, id: Option<&str>) -> ImportResult<Value> {
        let mut responses = self.responses.lock().unwrap();

        let Some(index) = responses
            .iter()
            .position(|r| r.resource == resource && r.id.as_deref() == id)
        else {
            return Err(ImportError::Api {
                status: 500,
                path: format!("/api/v1/{}", resource),
                message: "no scripted response".to_string(),
            });
        };

        let path = match id {
            Some(id) => format!("/api/v1/{}/{}", resource, id),
            None => format!("/api/v1/{}", resource),
        };

        responses
            .remove(index)
            .answer
            .map_err(|(status, message)| ImportError::Api {
                status,
                path,
                message,
            })
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceApi for MockApi {
    async fn list(&self, resource: &str, options: &ListOptions) -> ImportResult<Value> {
        self.calls.lock().unwrap().push(MockCall::List {
            resource: resource.to_string(),
            options: options.clone(),
        });
        self.answer(resource, None)
    }

    async fn show(&self, resource: &str, id: &str) -> ImportResult<Value> {
        self.calls.lock().unwrap().push(MockCall::Show {
            resource: resource.to_string(),
            id: id.to_string(),
        });
        self.answer(resource, Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_api_replays_scripted_responses() {
        let api = MockApi::new().on_show("dash", "42", Ok(json!({"id": 42})));

        let value = api.show("dash", "42").await.unwrap();
        assert_eq!(value, json!({"id": 42}));

        let again = api.show("dash", "42").await;
        assert!(again.is_err());
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_api_scripted_error() {
        let api = MockApi::new().on_list("monitor", Err((403, "Forbidden".to_string())));

        let result = api.list("monitor", &ListOptions::default()).await;
        assert!(matches!(result, Err(ImportError::Api { status: 403, .. })));
    }
}
