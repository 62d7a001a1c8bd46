//! tutorkit-providers — Generative tutoring backends.
//!
//! Implements the `TutorClient` trait for Google Gemini, plus a mock backend
//! for offline use, so tutorkit can generate study aids and chat answers.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;

pub use config::{create_client, load_config, load_config_from, ProviderConfig, TutorConfig};
pub use error::ProviderError;
