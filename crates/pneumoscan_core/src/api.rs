//! Wire types for the screening service's batch endpoint.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /batch-predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Base64-encoded images, in submission order.
    pub images: Vec<String>,
}

/// Top-level response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub batch_results: Vec<BatchResult>,
}

/// Per-image entry in the response. The service returns entries in
/// submission order; the client renders them as received and cannot
/// verify that contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Echo of the submitted image, base64 JPEG.
    pub image: String,
    /// Class label, e.g. "PNEUMONIA" or "NORMAL".
    pub result: String,
    /// Display string produced by the service, e.g. "97.31%".
    pub confidence: String,
    /// Grad-CAM overlay, base64 JPEG.
    pub heatmap: String,
}

/// A response field that could not be decoded.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("undecodable {field} field in batch result: {source}")]
    Base64 {
        field: &'static str,
        source: base64::DecodeError,
    },
}

impl BatchResult {
    /// Raw bytes of the echoed image.
    pub fn decode_image(&self) -> Result<Vec<u8>, ResponseError> {
        decode_field("image", &self.image)
    }

    /// Raw bytes of the heatmap overlay.
    pub fn decode_heatmap(&self) -> Result<Vec<u8>, ResponseError> {
        decode_field("heatmap", &self.heatmap)
    }
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, ResponseError> {
    STANDARD
        .decode(value)
        .map_err(|source| ResponseError::Base64 { field, source })
}
