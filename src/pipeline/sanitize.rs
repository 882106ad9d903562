//! Output sanitisation: deterministic cleanup of backend completions.
//!
//! ## Why is sanitisation necessary?
//!
//! Even when the prompt forbids code fences, text-generation models
//! routinely wrap their JSON in ` ```json … ``` ` markers. Stripping the
//! fences here rather than in the prompt keeps the prompt focused on *what
//! to produce* and makes the cleanup independently testable.
//!
//! Only the outer fence markers are touched. The content between them —
//! valid JSON or not — passes through byte-for-byte; this module performs
//! no JSON parsing or validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// One leading ` ```json ` marker (case-sensitive) plus any trailing
/// whitespace on that marker, anchored to the start.
static RE_LEADING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```json[ \t]*\n?").unwrap());

/// One trailing ` ``` ` marker plus surrounding whitespace, anchored to
/// the end.
static RE_TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n?```\s*$").unwrap());

/// Strip an outer ` ```json … ``` ` fence pair from a completion, then trim
/// surrounding whitespace.
///
/// Each marker is removed independently, so a completion with only an
/// opening fence (truncated output) still loses the marker. Completions
/// without fences are returned trimmed and otherwise unchanged.
pub fn strip_json_fences(completion: &str) -> String {
    let s = completion.trim();
    let s = RE_LEADING_FENCE.replace(s, "");
    let s = RE_TRAILING_FENCE.replace(&s, "");
    s.trim().to_string()
}
