//! Pipeline stages for document-to-JSON conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch OCR backend) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ extract ──▶ normalize ──▶ sanitize
//! (blob)   (pdf/docx/    (backend      (strip
//!           image/ocr)    completion)   fences)
//! ```
//!
//! 1. [`extract`]   — dispatch on the classified format; each extractor
//!    degrades to empty text on failure instead of aborting
//! 2. [`pdf`]       — native text layer + OCR over rendered pages; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`docx`]      — paragraph walk in document order
//! 4. [`image`]     — OCR directly on the stored file
//! 5. [`ocr`]       — the shared tesseract engine, probed once at startup
//! 6. [`normalize`] — drive the completion backend; the only stage with
//!    network I/O, degrades to an error marker on failure
//! 7. [`sanitize`]  — deterministic fence-stripping of the completion

pub mod docx;
pub mod extract;
pub mod image;
pub mod normalize;
pub mod ocr;
pub mod pdf;
pub mod sanitize;
