//! OCR provider abstraction.
//!
//! Defines the [`OcrProvider`] trait so the pipeline can run against OCR.space
//! or a substitute. OCR is optional: providers never return errors, they
//! return an [`OcrOutcome`] that the caller reads text from.

pub mod ocr_space;

/// Result of one OCR attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    /// No API key configured; no request was made.
    Disabled,
    /// Recognized text, trimmed. May be empty.
    Text(String),
    /// The provider could not be reached or reported an error.
    Failed(String),
}

impl OcrOutcome {
    /// Text to merge into the query. Empty unless recognition succeeded.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Disabled | Self::Failed(_) => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Async trait implemented by each OCR backend.
#[async_trait::async_trait]
pub trait OcrProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn recognize(&self, image: &[u8]) -> OcrOutcome;
}
