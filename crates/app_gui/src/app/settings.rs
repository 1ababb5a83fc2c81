//! Settings strip rendering and the on-disk settings location.

use std::path::PathBuf;

use directories_next::ProjectDirs;
use eframe::egui;

use super::UiApp;

/// Platform config location for the settings file, e.g.
/// `~/.config/pneumoscan/settings.toml` on Linux.
pub(super) fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pneumoscan")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
}

impl UiApp {
    /// Renders the server URL field and version line under the button row.
    /// URL edits persist once the field loses focus.
    pub(super) fn render_settings_strip(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Server");
            let response = ui.text_edit_singleline(&mut self.settings.server_url);
            if response.changed() {
                self.server_url_dirty = true;
            }
            if response.lost_focus() && self.server_url_dirty {
                self.server_url_dirty = false;
                self.persist_settings();
                self.status = "Server URL updated.".to_string();
            }

            ui.label(format!("PneumoScan {}", env!("PNEUMOSCAN_VERSION")));
        });
        ui.add_space(4.0);
    }

    /// Write the current settings to disk; failures land in the status
    /// line rather than interrupting the session.
    pub(super) fn persist_settings(&mut self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save(path) {
            tracing::warn!("cannot persist settings: {e:#}");
            self.status = format!("Settings not saved: {e}");
        }
    }
}
