//! Toolbar with catalog totals and cache actions

use egui::{RichText, Ui};

/// Values the toolbar displays
#[derive(Debug, Clone, Default)]
pub struct ToolbarInfo {
    pub total_files: usize,
    pub total_size: String,
    /// Delete-all is disabled while a previous one is running
    pub delete_all_in_flight: bool,
}

/// Toolbar actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Refresh,
    DeleteAll,
}

/// Toolbar component
pub struct Toolbar;

impl Toolbar {
    pub fn ui(ui: &mut Ui, info: &ToolbarInfo) -> Option<ToolbarAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label(format!("Total number of files: {}", info.total_files));
            ui.separator();
            ui.label(format!("Total size: {}", info.total_size));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let delete_label = if info.delete_all_in_flight {
                    "Deleting..."
                } else {
                    "Delete all cache"
                };
                let delete = ui
                    .add_enabled(
                        !info.delete_all_in_flight,
                        egui::Button::new(RichText::new(delete_label).color(ui.visuals().error_fg_color)),
                    )
                    .on_hover_text("Remove every cached image");
                if delete.clicked() {
                    action = Some(ToolbarAction::DeleteAll);
                }

                if ui.button("🔄 Refresh").on_hover_text("Refresh (F5)").clicked() {
                    action = Some(ToolbarAction::Refresh);
                }
            });
        });

        action
    }
}
