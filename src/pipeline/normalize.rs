//! Normalization: turn extracted text into JSON-shaped text via the
//! completion backend.
//!
//! This stage never fails and never retries. A backend error degrades to
//! the literal [`ERROR_MARKER`] string with a diagnostic attached, so the
//! conversion record is always persisted with *some* value in its JSON
//! field. No JSON parsing or validation happens here — whatever the
//! backend produced (minus outer fences) is passed through unchanged.

use crate::backend::CompletionBackend;
use crate::config::ConversionConfig;
use crate::error::StageError;
use crate::output::Normalization;
use crate::pipeline::sanitize::strip_json_fences;
use crate::prompts::{build_prompt, NORMALIZE_PROMPT};
use tracing::{debug, warn};

/// The literal text stored when the backend call fails.
pub const ERROR_MARKER: &str = "error generating response";

/// Normalize `text` into JSON-shaped text. Never fails.
pub async fn normalize(
    backend: &dyn CompletionBackend,
    text: &str,
    config: &ConversionConfig,
) -> Normalization {
    let instruction = config.prompt.as_deref().unwrap_or(NORMALIZE_PROMPT);
    let prompt = build_prompt(instruction, text);

    match backend.complete(&prompt).await {
        Ok(completion) => {
            let json = strip_json_fences(&completion);
            debug!(
                "Normalization: {} chars in, {} chars out",
                text.len(),
                json.len()
            );
            Normalization {
                json,
                diagnostic: None,
            }
        }
        Err(e) => {
            warn!("Completion backend failed, storing error marker: {e}");
            Normalization {
                json: ERROR_MARKER.to_string(),
                diagnostic: Some(StageError::BackendFailed {
                    detail: e.to_string(),
                }),
            }
        }
    }
}
