//! Mock tutor for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tutorkit_core::traits::{GenerateRequest, GenerateResponse, TutorClient};

/// A mock tutoring backend for exercising the pipeline without real API
/// calls.
///
/// Returns configurable responses based on prompt content matching.
pub struct MockTutor {
    /// Map of prompt substring → response text.
    responses: HashMap<String, String>,
    /// Default response if no prompt matches.
    default_response: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockTutor {
    /// Create a new mock with the given prompt→response mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: r#"{"key_takeaways": ["placeholder"]}"#.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: response.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of calls made to this tutor.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last request made to this tutor.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl TutorClient for MockTutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        // Find a matching response based on prompt content
        let text = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        Ok(GenerateResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorkit_core::traits::ResponseFormat;

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            prompt: prompt.into(),
            system_instruction: None,
            response_format: ResponseFormat::Json,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let tutor = MockTutor::with_fixed_response(r#"{"key_takeaways": ["one"]}"#);
        let response = tutor.generate(&request("anything")).await.unwrap();
        assert_eq!(response.text, r#"{"key_takeaways": ["one"]}"#);
        assert_eq!(tutor.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_matching() {
        let mut responses = HashMap::new();
        responses.insert(
            "key_takeaways".to_string(),
            r#"{"key_takeaways": ["matched"]}"#.to_string(),
        );
        responses.insert(
            "practical_scenario".to_string(),
            r#"{"practical_scenario": {"description": "matched"}}"#.to_string(),
        );

        let tutor = MockTutor::new(responses);

        let resp = tutor
            .generate(&request("please produce \"key_takeaways\" for this section"))
            .await
            .unwrap();
        assert!(resp.text.contains("key_takeaways"));

        let resp = tutor
            .generate(&request("please produce \"practical_scenario\" for this section"))
            .await
            .unwrap();
        assert!(resp.text.contains("practical_scenario"));
        assert_eq!(tutor.call_count(), 2);
    }

    #[tokio::test]
    async fn records_last_request() {
        let tutor = MockTutor::with_fixed_response("ok");
        tutor.generate(&request("the exact prompt")).await.unwrap();
        let last = tutor.last_request().unwrap();
        assert_eq!(last.prompt, "the exact prompt");
    }
}
