pub mod openrouter;

use error_stack::Report;
use futures::future::BoxFuture;

use crate::error::LlmError;

/// Opaque text-in/text-out channel to a text-generation service.
///
/// Uses `BoxFuture` (from `futures` crate) instead of `async fn` in trait
/// to keep the trait object-safe (`dyn TextGenerator`).
pub trait TextGenerator: Send + Sync {
    /// Send a single prompt and return the complete response text.
    fn generate(&self, prompt: &str) -> BoxFuture<'_, Result<String, Report<LlmError>>>;
}
