//! Google Cloud Vision text detection client.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::{debug, info};

use slipscan_core::OcrError;
use slipscan_core::models::OcrConfig;

/// Image annotation client for `TEXT_DETECTION`.
pub struct VisionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

impl VisionClient {
    pub fn new(config: &OcrConfig, api_key: String) -> Result<Self, OcrError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    /// Recover the full-page text of an image.
    pub async fn detect_text(&self, image: &[u8]) -> Result<String, OcrError> {
        if image.is_empty() {
            return Err(OcrError::InvalidImage("empty image payload".to_string()));
        }

        info!("Requesting text detection for {} byte image", image.len());

        let body = serde_json::json!({
            "requests": [{
                "image": { "content": STANDARD.encode(image) },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        if !status.is_success() {
            debug!("Vision responded with {}: {}", status, text);
        }

        parse_response(&text)
    }
}

/// Pull the full-page text out of an `images:annotate` response body.
fn parse_response(body: &str) -> Result<String, OcrError> {
    let parsed: AnnotateResponse =
        serde_json::from_str(body).map_err(|e| OcrError::Provider(e.to_string()))?;

    if let Some(error) = parsed.error {
        return Err(OcrError::Provider(error.message));
    }

    let first = parsed
        .responses
        .into_iter()
        .next()
        .ok_or(OcrError::EmptyResponse)?;

    if let Some(error) = first.error {
        return Err(OcrError::Provider(error.message));
    }

    first
        .full_text_annotation
        .map(|annotation| annotation.text)
        .ok_or(OcrError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_text() {
        let body = r#"{
            "responses": [{
                "textAnnotations": [],
                "fullTextAnnotation": { "text": "Fresh Mart\n03/04/2024\nTOTAL\n$58.12\n", "pages": [] }
            }]
        }"#;

        assert_eq!(
            parse_response(body).unwrap(),
            "Fresh Mart\n03/04/2024\nTOTAL\n$58.12\n"
        );
    }

    #[test]
    fn test_parse_no_text() {
        assert!(matches!(
            parse_response(r#"{"responses": [{}]}"#),
            Err(OcrError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response(r#"{"responses": []}"#),
            Err(OcrError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_errors() {
        let top_level = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        assert!(matches!(
            parse_response(top_level),
            Err(OcrError::Provider(m)) if m == "API key not valid"
        ));

        let per_image = r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#;
        assert!(matches!(parse_response(per_image), Err(OcrError::Provider(_))));

        assert!(matches!(parse_response("<html>"), Err(OcrError::Provider(_))));
    }
}
