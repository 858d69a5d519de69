//! Text-generation endpoint access.

pub mod json;
pub mod openai;

use async_trait::async_trait;

use crate::error::GenerateError;

pub use json::extract_json;
pub use openai::OpenAiClient;

/// Turns a staged diff into a commit message.
///
/// This abstraction allows mocking the network call in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    /// Make exactly one generation request for `diff`.
    async fn generate(&self, diff: &str) -> Result<String, GenerateError>;
}
