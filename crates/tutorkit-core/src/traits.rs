//! Core trait definition for generative tutoring backends.
//!
//! Implemented by the `tutorkit-providers` crate; the core only depends on
//! this seam so the session and pipeline can be tested against a mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for backends that generate study aids and tutoring answers.
#[async_trait]
pub trait TutorClient: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Run one generation request to completion.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
}

/// Required response format for a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free-form prose, used for tutoring chat.
    Text,
    /// The provider must return a bare JSON document, used for artifacts.
    Json,
}

/// One generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The main prompt, already carrying the section context.
    pub prompt: String,
    /// Optional system instruction framing the model's role.
    #[serde(default)]
    pub system_instruction: Option<String>,
    pub response_format: ResponseFormat,
}

/// Response from a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response text, before any fence stripping or parsing.
    pub text: String,
}

/// System instruction for the scoped tutoring chat.
pub const TUTOR_SYSTEM_PROMPT: &str = "You are a helpful study tutor. Keep your answers concise and relevant to the user's question and the provided course context. If the question is unrelated to the course material, politely decline.";
