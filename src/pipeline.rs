//! One submission, start to finish.
//!
//! photo decode -> OCR -> query composition -> search. Each stage is awaited
//! before the next starts. Nothing is kept between submissions.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{GenericImageView, ImageFormat};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::ocr::{OcrOutcome, OcrProvider};
use crate::query::compose;
use crate::schema::SearchResultItem;
use crate::search::PartSearch;

pub const NOTHING_TO_SEARCH: &str = "Please type something or upload a photo.";
pub const NO_MATCHES_HINT: &str =
    "No matches. Try another angle: brand + model, or clearer photo of the label/part.";

/// An uploaded photo, as received.
#[derive(Debug, Clone)]
pub struct Photo {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What the user sent in one form submission.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub text: String,
    pub photo: Option<Photo>,
}

/// A decoded photo ready to show back to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    #[serde(skip_serializing)]
    pub data_url: String,
    pub format: &'static str,
    pub width: u32,
    pub height: u32,
}

/// How the submission ended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// Typed text and OCR text were both empty; search was not called.
    NothingToSearch,
    Found {
        query: String,
        count: u64,
        items: Vec<SearchResultItem>,
    },
    Failed {
        query: String,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub submission_id: Uuid,
    pub preview: Option<Preview>,
    pub ocr_text: String,
    /// OCR was attempted and the provider failed.
    pub ocr_failed: bool,
    pub warnings: Vec<String>,
    pub resolution: Resolution,
}

/// Sniff, check and decode an uploaded photo. Only JPEG and PNG are accepted.
pub fn decode_photo(bytes: &[u8]) -> anyhow::Result<Preview> {
    let format = image::guess_format(bytes).context("unrecognized image data")?;
    let mime = match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        other => anyhow::bail!("unsupported image type {:?} (use JPG or PNG)", other),
    };

    let img = image::load_from_memory_with_format(bytes, format)
        .context("failed to decode image")?;
    let (width, height) = img.dimensions();

    Ok(Preview {
        data_url: format!("data:{};base64,{}", mime, BASE64.encode(bytes)),
        format: mime,
        width,
        height,
    })
}

/// [`decode_photo`] on the blocking pool, off the async workers.
pub async fn decode_upload(bytes: Vec<u8>) -> anyhow::Result<Preview> {
    tokio::task::spawn_blocking(move || decode_photo(&bytes))
        .await
        .map_err(|e| anyhow::anyhow!("decode task failed: {}", e))?
}

/// Runs submissions against an OCR provider and a search backend.
#[derive(Clone)]
pub struct Pipeline {
    ocr: Arc<dyn OcrProvider>,
    search: Arc<dyn PartSearch>,
}

impl Pipeline {
    pub fn new(ocr: Arc<dyn OcrProvider>, search: Arc<dyn PartSearch>) -> Self {
        Self { ocr, search }
    }

    pub async fn run(&self, submission: Submission) -> Report {
        let submission_id = Uuid::new_v4();
        let span = info_span!("submission", id = %submission_id);
        self.run_inner(submission_id, submission)
            .instrument(span)
            .await
    }

    async fn run_inner(&self, submission_id: Uuid, submission: Submission) -> Report {
        let mut warnings = Vec::new();
        let mut preview = None;
        let mut ocr = OcrOutcome::Disabled;

        if let Some(photo) = submission.photo.as_ref().filter(|p| !p.bytes.is_empty()) {
            info!("Received photo: {} ({} bytes)", photo.filename, photo.bytes.len());
            match decode_upload(photo.bytes.clone()).await {
                Ok(p) => {
                    info!("Decoded {} {}x{}", p.format, p.width, p.height);
                    preview = Some(p);
                    ocr = self.ocr.recognize(&photo.bytes).await;
                    if let OcrOutcome::Failed(reason) = &ocr {
                        warn!("OCR via {} failed, continuing without it: {}", self.ocr.name(), reason);
                    }
                }
                Err(e) => {
                    warn!("Could not process image {}: {:#}", photo.filename, e);
                    warnings.push(format!("Could not process image: {:#}", e));
                }
            }
        }

        let query = compose(&submission.text, ocr.text());
        let resolution = if query.is_empty() {
            info!("Nothing to search");
            Resolution::NothingToSearch
        } else {
            info!("Searching for: {}", query);
            match self.search.search(&query).await {
                Ok(response) => Resolution::Found {
                    query,
                    count: response.count,
                    items: response.results,
                },
                Err(e) => {
                    warn!("Search failed: {}", e);
                    Resolution::Failed {
                        query,
                        message: e.to_string(),
                    }
                }
            }
        };

        Report {
            submission_id,
            preview,
            ocr_text: ocr.text().to_string(),
            ocr_failed: ocr.is_failed(),
            warnings,
            resolution,
        }
    }
}
