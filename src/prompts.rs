//! The normalization instruction prompt.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing how the backend is instructed
//!    requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can import and inspect the prompt
//!    directly without spinning up a real backend.
//!
//! Callers can override the default via
//! [`crate::config::ConversionConfig::prompt`]; the constant here is used
//! only when no override is provided.

/// Default instruction prepended to the extracted text before the backend
/// call. The response is expected to be a bare JSON object; any code fences
/// the model emits anyway are stripped by
/// [`crate::pipeline::sanitize::strip_json_fences`].
pub const NORMALIZE_PROMPT: &str = "Convert the following text to very detailed pure JSON format. Remove all markdown formatting and code block indicators completely. Return the JSON object directly with no additional text, explanation, or formatting";

/// Build the full prompt for one normalization call: the instruction, a
/// blank line, then the extracted text verbatim.
pub fn build_prompt(instruction: &str, text: &str) -> String {
    format!("{instruction}\n\n{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_layout() {
        let p = build_prompt(NORMALIZE_PROMPT, "hello");
        assert!(p.starts_with(NORMALIZE_PROMPT));
        assert!(p.ends_with("\n\nhello"));
    }

    #[test]
    fn empty_input_still_gets_instruction() {
        // Unsupported uploads normalize an empty string; the instruction
        // must still be present.
        let p = build_prompt(NORMALIZE_PROMPT, "");
        assert_eq!(p, format!("{NORMALIZE_PROMPT}\n\n"));
    }

    #[test]
    fn default_prompt_forbids_fences() {
        assert!(NORMALIZE_PROMPT.contains("code block indicators"));
        assert!(NORMALIZE_PROMPT.contains("pure JSON"));
    }
}
