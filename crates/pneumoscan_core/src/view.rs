//! View models for the preview and result grids.
//!
//! Rendering is split from data transformation: these functions turn a
//! batch or a service response into plain card rows, and the GUI layer
//! only draws them. Cards carry 1-based indices because that is what the
//! user sees on screen.

use crate::api::{PredictResponse, ResponseError};
use crate::batch::Batch;

/// Label the service uses for a positive pneumonia finding. Matched
/// case-sensitively; every other label is treated as a healthy outcome.
pub const WARNING_LABEL: &str = "PNEUMONIA";

/// Visual tone of a result label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTone {
    /// The pneumonia sentinel, rendered in the warning color.
    Warning,
    /// Any other label, rendered in the positive color.
    Positive,
}

/// Tone for a class label. A two-way branch, not an allow-list.
pub fn label_tone(label: &str) -> LabelTone {
    if label == WARNING_LABEL {
        LabelTone::Warning
    } else {
        LabelTone::Positive
    }
}

/// One card in the preview grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCard {
    /// 1-based position, shown as "Image N".
    pub index: usize,
    pub bytes: Vec<u8>,
}

/// Preview cards for every image in the batch, in selection order.
pub fn preview_cards(batch: &Batch) -> Vec<PreviewCard> {
    batch
        .iter()
        .enumerate()
        .map(|(i, img)| PreviewCard {
            index: i + 1,
            bytes: img.bytes.clone(),
        })
        .collect()
}

/// One card in the result grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    /// 1-based position, shown as "Image N".
    pub index: usize,
    pub label: String,
    pub tone: LabelTone,
    /// Display string from the service, rendered verbatim.
    pub confidence: String,
    /// Echoed image bytes (JPEG).
    pub image: Vec<u8>,
    /// Grad-CAM overlay bytes (JPEG).
    pub heatmap: Vec<u8>,
}

/// Result cards for every response entry, in response order. Fails on the
/// first undecodable image or heatmap field rather than rendering a
/// partial grid.
pub fn result_cards(response: &PredictResponse) -> Result<Vec<ResultCard>, ResponseError> {
    response
        .batch_results
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Ok(ResultCard {
                index: i + 1,
                label: item.result.clone(),
                tone: label_tone(&item.result),
                confidence: item.confidence.clone(),
                image: item.decode_image()?,
                heatmap: item.decode_heatmap()?,
            })
        })
        .collect()
}
