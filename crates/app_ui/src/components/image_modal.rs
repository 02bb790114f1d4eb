//! Modal image viewer drawn over the grid

use egui::{Align2, Area, Color32, Context, FontId, Id, Order, Pos2, Rect, RichText, Sense, TextureHandle, UiBuilder, Vec2};

use crate::theme::Theme;

/// Action returned from the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Next,
    Prev,
    Close,
}

/// What the modal currently shows
pub enum ModalContent<'a> {
    Loading,
    Ready(&'a TextureHandle),
    Failed,
}

/// Caption shown under the image
pub struct ModalCaption<'a> {
    pub name: &'a str,
    pub position: usize,
    pub total: usize,
    pub size_label: &'a str,
}

/// Modal viewer component
pub struct ImageModal {
    /// Zoom applied on top of fit-to-window
    zoom: f32,
    /// Name of the image the zoom belongs to
    zoomed_name: Option<String>,
}

const CONTROL_BAR: f32 = 48.0;
const MARGIN: f32 = 24.0;

impl ImageModal {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            zoomed_name: None,
        }
    }

    /// Render the modal; returns at most one action per frame
    pub fn ui(
        &mut self,
        ctx: &Context,
        theme: &Theme,
        content: ModalContent<'_>,
        caption: &ModalCaption<'_>,
    ) -> Option<ModalAction> {
        if self.zoomed_name.as_deref() != Some(caption.name) {
            self.zoom = 1.0;
            self.zoomed_name = Some(caption.name.to_string());
        }

        let screen = ctx.screen_rect();
        let mut action = None;

        Area::new(Id::new("image_modal"))
            .order(Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let backdrop = ui.allocate_rect(screen, Sense::click());
                ui.painter().rect_filled(screen, 0.0, theme.backdrop);

                let stage = Rect::from_min_max(
                    screen.min + Vec2::splat(MARGIN),
                    screen.max - Vec2::new(MARGIN, MARGIN + CONTROL_BAR),
                );

                match content {
                    ModalContent::Ready(texture) => {
                        let size = fit_to_stage(texture.size_vec2(), stage.size()) * self.zoom;
                        let image_rect = Rect::from_center_size(stage.center(), size);
                        let image_response = ui.allocate_rect(image_rect, Sense::click());

                        if image_response.hovered() {
                            let scroll = ui.input(|i| i.raw_scroll_delta.y);
                            if scroll != 0.0 {
                                let factor = if scroll > 0.0 { 1.1 } else { 1.0 / 1.1 };
                                self.zoom = (self.zoom * factor).clamp(0.25, 8.0);
                            }
                        }
                        if image_response.double_clicked() {
                            self.zoom = 1.0;
                        }

                        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                        ui.painter().with_clip_rect(stage).image(texture.id(), image_rect, uv, Color32::WHITE);
                    }
                    ModalContent::Loading => {
                        ui.put(
                            Rect::from_center_size(stage.center(), Vec2::splat(48.0)),
                            egui::Spinner::new().size(48.0),
                        );
                    }
                    ModalContent::Failed => {
                        ui.painter().text(
                            stage.center(),
                            Align2::CENTER_CENTER,
                            "Failed to load image",
                            FontId::proportional(20.0),
                            theme.error,
                        );
                    }
                }

                let close_rect = Rect::from_min_size(
                    Pos2::new(screen.max.x - MARGIN - 32.0, screen.min.y + 8.0),
                    Vec2::splat(32.0),
                );
                if ui
                    .put(close_rect, egui::Button::new(RichText::new("✕").size(18.0)))
                    .on_hover_text("Close (Esc)")
                    .clicked()
                {
                    action = Some(ModalAction::Close);
                }

                let bar = Rect::from_min_max(
                    Pos2::new(screen.min.x + MARGIN, screen.max.y - CONTROL_BAR),
                    Pos2::new(screen.max.x - MARGIN, screen.max.y - 8.0),
                );
                ui.allocate_new_ui(UiBuilder::new().max_rect(bar), |ui| {
                    ui.horizontal_centered(|ui| {
                        if ui.button(RichText::new("◀").size(18.0)).on_hover_text("Previous (←)").clicked() {
                            action = Some(ModalAction::Prev);
                        }
                        ui.label(
                            RichText::new(format!(
                                "{}  ({} / {})  {}",
                                caption.name, caption.position, caption.total, caption.size_label
                            ))
                            .color(Color32::WHITE),
                        );
                        if ui.button(RichText::new("▶").size(18.0)).on_hover_text("Next (→)").clicked() {
                            action = Some(ModalAction::Next);
                        }
                    });
                });

                if action.is_none() && backdrop.clicked() {
                    action = Some(ModalAction::Close);
                }
            });

        action
    }
}

impl Default for ImageModal {
    fn default() -> Self {
        Self::new()
    }
}

/// Fit an image into the stage without upscaling
pub fn fit_to_stage(image: Vec2, stage: Vec2) -> Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (stage.x / image.x).min(stage.y / image.y).min(1.0);
    image * scale
}
