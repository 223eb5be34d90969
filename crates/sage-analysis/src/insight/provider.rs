//! Narrative provider trait for abstracting the insight collaborator.
//!
//! This module defines the [`NarrativeProvider`] trait so the pipeline can
//! work with any text-generation backend. The provider handle is constructed
//! by the embedding layer and passed into the pipeline explicitly; there is
//! no module-level client state.
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/insight/` (e.g. `openai.rs`)
//! 2. Implement the [`NarrativeProvider`] trait for your provider struct
//! 3. Export the provider in `src/insight/mod.rs`

use anyhow::Result;
use serde_json::Value;

/// Trait for services that turn a profiling context into narrative text.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one handle may serve concurrent
/// pipeline invocations with distinct contexts.
///
/// # Error Handling
///
/// Implementations should return meaningful errors via `anyhow::Result`.
/// The insight stage recovers from any provider error by falling back to
/// the all-empty default report; provider failures never abort a pipeline.
pub trait NarrativeProvider: Send + Sync {
    /// Generate narrative insights for a sanitized profiling context.
    ///
    /// The returned text is expected to contain a JSON object with the
    /// fields `summary`, `key_insights`, `risks` and `recommendations`,
    /// either as the whole response or embedded in surrounding prose. The
    /// caller tolerates both and defaults missing fields.
    fn generate_insights(&self, context: &Value) -> Result<String>;

    /// Get the provider name for logging and debugging.
    fn name(&self) -> &str;

    /// Get the model being used by this provider.
    ///
    /// Returns `None` if the provider doesn't expose model information.
    fn model(&self) -> Option<&str> {
        None
    }
}
