//! Core logic for the PneumoScan desktop client.
//!
//! Everything UI-free lives here: the batch of selected images, the wire
//! types for the screening service's batch endpoint, the preview/result
//! card view models, CSV export, and persisted user settings. The GUI
//! crate renders these models and talks to the network; this crate never
//! touches either.

pub mod api;
pub mod batch;
pub mod export;
pub mod settings;
pub mod view;

pub use api::{BatchResult, PredictRequest, PredictResponse, ResponseError};
pub use batch::{Batch, BatchError, SelectedImage};
pub use export::export_csv;
pub use settings::{Settings, ThemeMode};
pub use view::{LabelTone, PreviewCard, ResultCard, preview_cards, result_cards};
