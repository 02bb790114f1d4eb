//! Status bar component

use egui::Ui;

/// Status bar information
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    /// Server the catalog comes from
    pub server: String,
    /// Name of the highlighted image
    pub highlighted: Option<String>,
    /// Thumbnail fetches currently running
    pub loading: usize,
    /// Thumbnails that failed to load
    pub failed: usize,
}

impl StatusInfo {
    /// Right-hand activity text, empty when idle
    pub fn activity(&self) -> String {
        let mut parts = Vec::new();
        if self.loading > 0 {
            parts.push(format!("Loading {} thumbnails", self.loading));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        parts.join(" · ")
    }
}

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    pub fn ui(ui: &mut Ui, info: &StatusInfo) {
        ui.horizontal(|ui| {
            ui.label(&info.server);

            if let Some(name) = &info.highlighted {
                ui.separator();
                ui.label(name);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let activity = info.activity();
                if !activity.is_empty() {
                    ui.label(activity);
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_text() {
        let mut info = StatusInfo::default();
        assert_eq!(info.activity(), "");

        info.loading = 3;
        assert_eq!(info.activity(), "Loading 3 thumbnails");

        info.failed = 1;
        assert_eq!(info.activity(), "Loading 3 thumbnails · 1 failed");
    }
}
