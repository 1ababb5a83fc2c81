//! Theme application and label colors for the egui UI.

use eframe::egui;
use pneumoscan_core::{LabelTone, ThemeMode};

/// Apply the selected theme to the egui context.
pub fn apply_theme(ctx: &egui::Context, theme: ThemeMode) {
    let visuals = match theme {
        ThemeMode::Light => egui::Visuals::light(),
        ThemeMode::Dark => egui::Visuals::dark(),
    };
    ctx.set_visuals(visuals);
}

/// Warning color for a positive pneumonia finding.
const WARNING: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
/// Positive color for every other label.
const POSITIVE: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);

/// Color a result label renders in.
pub fn tone_color(tone: LabelTone) -> egui::Color32 {
    match tone {
        LabelTone::Warning => WARNING,
        LabelTone::Positive => POSITIVE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tones_map_to_distinct_colors() {
        assert_ne!(
            tone_color(LabelTone::Warning),
            tone_color(LabelTone::Positive)
        );
    }
}
