//! Application state and per-frame rendering.

mod settings;

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::{App, Frame, egui};
use pneumoscan_core::{
    Batch, PreviewCard, ResultCard, Settings, ThemeMode, export_csv, preview_cards, result_cards,
};
use rfd::{FileDialog, MessageDialog, MessageLevel};

use crate::api::ApiClient;
use crate::theme;

const CARD_WIDTH: f32 = 240.0;
const IMAGE_MAX_HEIGHT: f32 = 192.0;
const MAX_TEXTURES: usize = 256;

/// Outcome of a background prediction request.
enum PredictOutcome {
    Done(Vec<ResultCard>),
    Failed(String),
}

/// Decoded-image texture cache (basic LRU), keyed per card slot. Cleared
/// whenever the previews or results it indexes are replaced.
#[derive(Default)]
struct TextureCache {
    textures: HashMap<String, egui::TextureHandle>,
    keys: VecDeque<String>,
}

impl TextureCache {
    fn get_or_load(
        &mut self,
        ctx: &egui::Context,
        key: &str,
        bytes: &[u8],
    ) -> Option<egui::load::SizedTexture> {
        if let Some(tex) = self.textures.get(key) {
            return Some(egui::load::SizedTexture::from_handle(tex));
        }

        match image::load_from_memory(bytes) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (w, h) = rgba.dimensions();
                let size = [w as usize, h as usize];
                let pixels = rgba.into_raw();
                let color = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
                let tex = ctx.load_texture(key.to_string(), color, egui::TextureOptions::LINEAR);
                self.textures.insert(key.to_string(), tex);
                self.keys.push_back(key.to_string());
                if self.textures.len() > MAX_TEXTURES
                    && let Some(old) = self.keys.pop_front()
                {
                    self.textures.remove(&old);
                }
                self.textures
                    .get(key)
                    .map(egui::load::SizedTexture::from_handle)
            }
            Err(e) => {
                tracing::warn!("Failed to decode image for {key}: {e}");
                None
            }
        }
    }

    /// Show the decoded image, or the gray placeholder when the bytes are
    /// not a decodable image.
    fn show_image(
        &mut self,
        ctx: &egui::Context,
        ui: &mut egui::Ui,
        key: &str,
        bytes: &[u8],
    ) {
        if let Some(tex) = self.get_or_load(ctx, key, bytes) {
            ui.add(
                egui::Image::new(tex)
                    .max_height(IMAGE_MAX_HEIGHT)
                    .max_width(CARD_WIDTH - 24.0),
            );
        } else {
            let desired = egui::Vec2::new(CARD_WIDTH - 24.0, IMAGE_MAX_HEIGHT / 2.0);
            let (resp, painter) = ui.allocate_painter(desired, egui::Sense::hover());
            let r = resp.rect;
            painter.rect_filled(r, 4.0, egui::Color32::from_gray(40));
            painter.rect_stroke(
                r,
                4.0,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                egui::StrokeKind::Inside,
            );
        }
    }

    fn clear(&mut self) {
        self.textures.clear();
        self.keys.clear();
    }
}

pub struct UiApp {
    settings: Settings,
    settings_path: Option<PathBuf>,
    server_url_dirty: bool,
    batch: Batch,
    previews: Vec<PreviewCard>,
    results: Vec<ResultCard>,
    busy: bool,
    status: String,
    outcome_rx: Option<Receiver<PredictOutcome>>,
    textures: TextureCache,
}

impl UiApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = settings::settings_path();
        let settings = match &settings_path {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };
        theme::apply_theme(&cc.egui_ctx, settings.theme);
        Self {
            settings,
            settings_path,
            server_url_dirty: false,
            batch: Batch::default(),
            previews: Vec::new(),
            results: Vec::new(),
            busy: false,
            status: String::new(),
            outcome_rx: None,
            textures: TextureCache::default(),
        }
    }

    /// Replace the batch wholesale with the picker's selection and build
    /// previews in selection order. A failed read keeps the old batch.
    fn replace_batch(&mut self, paths: Vec<PathBuf>) {
        match Batch::from_paths(paths) {
            Ok(batch) => {
                self.previews = preview_cards(&batch);
                self.batch = batch;
                self.textures.clear();
                self.status = format!("Selected {} image(s)", self.batch.len());
            }
            Err(e) => {
                self.status = format!("Selection failed: {e}");
            }
        }
    }

    /// Empties the batch and removes previews and results. Does not cancel
    /// an in-flight prediction; a late response still renders.
    fn clear_batch(&mut self) {
        self.batch.clear();
        self.previews.clear();
        self.results.clear();
        self.textures.clear();
        self.status.clear();
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.settings.theme = self.settings.theme.toggled();
        theme::apply_theme(ctx, self.settings.theme);
        self.persist_settings();
    }

    fn start_prediction(&mut self, ctx: &egui::Context) {
        if self.batch.is_empty() {
            MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title("PneumoScan")
                .set_description("Upload some images!")
                .show();
            return;
        }

        let client = match ApiClient::new(self.settings.server_url.clone()) {
            Ok(client) => client,
            Err(e) => {
                self.status = format!("Prediction failed: {e}");
                return;
            }
        };

        let images = self.batch.to_base64();
        let (tx, rx) = mpsc::channel();
        let repaint_ctx = ctx.clone();
        thread::spawn(move || {
            let outcome = match client.predict_batch(images) {
                Ok(response) => match result_cards(&response) {
                    Ok(cards) => PredictOutcome::Done(cards),
                    Err(e) => PredictOutcome::Failed(e.to_string()),
                },
                Err(e) => PredictOutcome::Failed(format!("{e:#}")),
            };
            let _ = tx.send(outcome);
            repaint_ctx.request_repaint();
        });

        self.outcome_rx = Some(rx);
        self.busy = true;
        self.status = "Predicting...".to_string();
    }

    fn poll_prediction(&mut self) {
        let Some(rx) = &self.outcome_rx else { return };
        match rx.try_recv() {
            Ok(PredictOutcome::Done(cards)) => {
                self.busy = false;
                self.outcome_rx = None;
                self.status = format!("Predicted {} image(s)", cards.len());
                self.textures.clear();
                self.results = cards;
            }
            Ok(PredictOutcome::Failed(msg)) => {
                self.busy = false;
                self.outcome_rx = None;
                self.status = format!("Prediction failed: {msg}");
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.busy = false;
                self.outcome_rx = None;
                self.status = "Prediction worker stopped unexpectedly".to_string();
            }
        }
    }

    fn render_previews(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.label(format!("Batch: {} image(s)", self.previews.len()));
        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            for i in 0..self.previews.len() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(CARD_WIDTH);
                    ui.vertical_centered(|ui| {
                        let card = &self.previews[i];
                        let key = format!("preview:{}", card.index);
                        self.textures.show_image(ctx, ui, &key, &card.bytes);
                        ui.add_space(4.0);
                        ui.label(egui::RichText::new(format!("Image {}", card.index)).strong());
                    });
                });
            }
        });
    }

    fn render_results(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.heading("Batch results");
        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            for i in 0..self.results.len() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(CARD_WIDTH);
                    ui.vertical_centered(|ui| {
                        let card = &self.results[i];
                        ui.label(egui::RichText::new(format!("Image {}", card.index)).strong());
                        ui.add_space(4.0);

                        let image_key = format!("result:{}:image", card.index);
                        self.textures.show_image(ctx, ui, &image_key, &card.image);

                        ui.add_space(4.0);
                        ui.horizontal_wrapped(|ui| {
                            ui.label("Result:");
                            ui.label(
                                egui::RichText::new(&card.label)
                                    .color(theme::tone_color(card.tone))
                                    .strong(),
                            );
                        });
                        ui.label(format!("Confidence: {}", card.confidence));

                        ui.add_space(4.0);
                        ui.label(egui::RichText::new("Heatmap:").strong());
                        let heatmap_key = format!("result:{}:heatmap", card.index);
                        self.textures.show_image(ctx, ui, &heatmap_key, &card.heatmap);
                    });
                });
            }
        });
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_prediction();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!self.busy, egui::Button::new("Select images..."))
                    .clicked()
                    && let Some(paths) = FileDialog::new()
                        .add_filter("Images", &["jpg", "jpeg", "png"])
                        .set_directory(".")
                        .pick_files()
                {
                    self.replace_batch(paths);
                }

                if ui
                    .add_enabled(!self.busy, egui::Button::new("Predict batch"))
                    .clicked()
                {
                    self.start_prediction(ctx);
                }

                let can_export = !self.results.is_empty() && !self.busy;
                if ui
                    .add_enabled(can_export, egui::Button::new("Export CSV"))
                    .clicked()
                    && let Some(path) = FileDialog::new()
                        .add_filter("CSV", &["csv"])
                        .set_file_name("pneumoscan_batch.csv")
                        .save_file()
                {
                    if let Err(e) = export_csv(&self.results, &path) {
                        self.status = format!("Export failed: {e}");
                    } else {
                        self.status = format!("CSV exported: {}", path.display());
                    }
                }

                if ui.button("Clear").clicked() {
                    self.clear_batch();
                }

                let theme_label = match self.settings.theme {
                    ThemeMode::Light => "Dark mode",
                    ThemeMode::Dark => "Light mode",
                };
                if ui.button(theme_label).clicked() {
                    self.toggle_theme(ctx);
                }

                if !self.status.is_empty() {
                    ui.label(&self.status);
                }
            });
            self.render_settings_strip(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    if self.busy {
                        ui.horizontal(|ui| {
                            ui.add(egui::Spinner::new().size(22.0));
                            ui.label("Predicting...");
                        });
                        ui.add_space(6.0);
                    }

                    if self.previews.is_empty() && self.results.is_empty() && !self.busy {
                        ui.heading("Select chest X-ray images to begin");
                    }

                    if !self.previews.is_empty() {
                        self.render_previews(ctx, ui);
                    }

                    if !self.results.is_empty() {
                        ui.add_space(10.0);
                        self.render_results(ctx, ui);
                    }
                });
        });
    }
}
