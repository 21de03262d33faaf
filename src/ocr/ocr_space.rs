//! OCR.space provider (https://ocr.space/ocrapi).

use super::{OcrOutcome, OcrProvider};
use crate::config::Settings;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const UPLOAD_FILENAME: &str = "upload.jpg";

// ── OCR.space response types ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(rename = "IsErroredOnProcessing", default)]
    is_errored_on_processing: bool,
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Option<Vec<ParsedResult>>,
    #[serde(rename = "ErrorMessage", default)]
    error_message: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: Option<String>,
}

// ── Provider implementation ─────────────────────────────────────────────────

pub struct OcrSpaceProvider {
    api_key: String,
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OcrSpaceProvider {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            api_key: settings.ocr_space_key.clone(),
            url: settings.ocr_space_url.clone(),
            timeout: settings.ocr_timeout,
            client,
        }
    }

    async fn parse_image(&self, image: &[u8]) -> anyhow::Result<String> {
        use reqwest::multipart::{Form, Part};

        let part = Part::bytes(image.to_vec()).file_name(UPLOAD_FILENAME);

        let form = Form::new()
            .part("filename", part)
            .text("apikey", self.api_key.clone())
            .text("language", "eng")
            .text("OCREngine", "2")
            .text("isTable", "false");

        info!("OcrSpaceProvider: sending {} bytes", image.len());

        let resp = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .context("OCR.space request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("OCR.space API error ({}): {}", status, text);
        }

        let raw_text = resp.text().await.context("Failed to read OCR.space body")?;
        debug!(
            "OcrSpaceProvider: raw response ({} bytes): {}",
            raw_text.len(),
            raw_text.chars().take(500).collect::<String>()
        );
        let parsed: ParseResponse =
            serde_json::from_str(&raw_text).context("Failed to parse OCR.space response")?;

        if parsed.is_errored_on_processing {
            anyhow::bail!("OCR.space processing error: {}", parsed.error_message);
        }

        let text = parsed
            .parsed_results
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.parsed_text.unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(text.trim().to_string())
    }
}

#[async_trait::async_trait]
impl OcrProvider for OcrSpaceProvider {
    fn name(&self) -> &str {
        "ocr_space"
    }

    async fn recognize(&self, image: &[u8]) -> OcrOutcome {
        if self.api_key.is_empty() {
            debug!("OcrSpaceProvider: no API key, skipping OCR");
            return OcrOutcome::Disabled;
        }

        match self.parse_image(image).await {
            Ok(text) => {
                info!("OcrSpaceProvider: recognized {} chars", text.chars().count());
                OcrOutcome::Text(text)
            }
            Err(e) => {
                warn!("OcrSpaceProvider: {:#}", e);
                OcrOutcome::Failed(format!("{:#}", e))
            }
        }
    }
}
