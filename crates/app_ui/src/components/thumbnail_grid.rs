//! Lazily loaded thumbnail grid
//!
//! Only rows near the scroll viewport are laid out and painted. Every cell
//! laid out in a frame is reported back with its bounds so the caller can run
//! the intersection check and start fetches.

use app_core::{Bounds, LoadState};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, TextureHandle, Ui, Vec2};
use std::ops::Range;

use crate::theme::Theme;

/// Action returned from grid interaction
#[derive(Debug, Clone, PartialEq)]
pub enum GridAction {
    /// Primary click on a cell
    Open(usize),
    /// Secondary click on a cell, with the pointer position
    ContextMenu { index: usize, pos: Pos2 },
}

/// Everything needed to paint one cell
pub struct GridCell<'a> {
    pub name: &'a str,
    pub size_label: &'a str,
    pub age: String,
    pub state: LoadState,
    pub texture: Option<&'a TextureHandle>,
    pub highlighted: bool,
}

/// Result of drawing the grid for one frame
#[derive(Debug, Default)]
pub struct GridOutput {
    /// Cells laid out this frame, in content coordinates
    pub laid_out: Vec<(usize, Bounds)>,
    /// Scroll viewport, in content coordinates
    pub viewport: Option<Bounds>,
    pub action: Option<GridAction>,
}

/// Grid geometry for a fixed cell size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell: Vec2,
    pub spacing: f32,
    pub columns: usize,
}

const LABEL_HEIGHT: f32 = 36.0;
const CELL_PADDING: f32 = 4.0;

impl GridLayout {
    /// Fit as many columns of `thumbnail_size` cells as `width` allows
    pub fn new(thumbnail_size: f32, spacing: f32, width: f32) -> Self {
        let cell = Vec2::new(
            thumbnail_size + CELL_PADDING * 2.0,
            thumbnail_size + CELL_PADDING * 2.0 + LABEL_HEIGHT,
        );
        let columns = ((width + spacing) / (cell.x + spacing)).floor().max(1.0) as usize;
        Self {
            cell,
            spacing,
            columns,
        }
    }

    pub fn row_height(&self) -> f32 {
        self.cell.y + self.spacing
    }

    pub fn rows(&self, len: usize) -> usize {
        len.div_ceil(self.columns)
    }

    pub fn content_height(&self, len: usize) -> f32 {
        let rows = self.rows(len);
        if rows == 0 {
            0.0
        } else {
            rows as f32 * self.row_height() - self.spacing
        }
    }

    /// Cell rectangle relative to the content origin
    pub fn cell_rect(&self, index: usize) -> Rect {
        let row = index / self.columns;
        let col = index % self.columns;
        let min = Pos2::new(
            col as f32 * (self.cell.x + self.spacing),
            row as f32 * self.row_height(),
        );
        Rect::from_min_size(min, self.cell)
    }

    /// Indices of cells in rows overlapping `top..bottom`
    pub fn visible_range(&self, top: f32, bottom: f32, len: usize) -> Range<usize> {
        if len == 0 || bottom <= top {
            return 0..0;
        }
        let first_row = (top.max(0.0) / self.row_height()).floor() as usize;
        let last_row = (bottom / self.row_height()).ceil() as usize;
        let start = (first_row * self.columns).min(len);
        let end = (last_row * self.columns).min(len);
        start..end
    }
}

/// Thumbnail grid component
pub struct ThumbnailGrid {
    pub thumbnail_size: f32,
    pub spacing: f32,
    /// Extra distance below the viewport that is still laid out
    pub lookahead: f32,
}

impl ThumbnailGrid {
    pub fn new(thumbnail_size: f32, lookahead: f32) -> Self {
        Self {
            thumbnail_size: thumbnail_size.clamp(64.0, 512.0),
            spacing: 8.0,
            lookahead: lookahead.max(0.0),
        }
    }

    /// Render the grid
    pub fn ui<'a>(
        &self,
        ui: &mut Ui,
        theme: &Theme,
        len: usize,
        cell_at: impl Fn(usize) -> Option<GridCell<'a>>,
    ) -> GridOutput {
        let mut output = GridOutput::default();

        if len == 0 {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("No cached images").color(theme.text_secondary));
            });
            return output;
        }

        let layout = GridLayout::new(self.thumbnail_size, self.spacing, ui.available_width());

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_viewport(ui, |ui, viewport| {
                ui.set_height(layout.content_height(len));
                let origin = ui.max_rect().min.to_vec2();

                output.viewport = Some(to_bounds(viewport));

                let range = layout.visible_range(viewport.min.y, viewport.max.y + self.lookahead, len);
                for index in range {
                    let Some(cell) = cell_at(index) else { continue };
                    let local = layout.cell_rect(index);
                    output.laid_out.push((index, to_bounds(local)));

                    let rect = local.translate(origin);
                    let response = ui.interact(rect, ui.id().with(("grid_cell", index)), Sense::click());

                    if ui.is_rect_visible(rect) {
                        self.paint_cell(ui, theme, rect, &cell, response.hovered());
                    }

                    if response.clicked() {
                        output.action = Some(GridAction::Open(index));
                    } else if response.secondary_clicked() {
                        let pos = response.interact_pointer_pos().unwrap_or(rect.center());
                        output.action = Some(GridAction::ContextMenu { index, pos });
                    }

                    response.on_hover_text(cell.name);
                }
            });

        output
    }

    fn paint_cell(&self, ui: &Ui, theme: &Theme, rect: Rect, cell: &GridCell<'_>, hovered: bool) {
        let painter = ui.painter();

        let bg = if hovered {
            theme.primary
        } else {
            theme.surface
        };
        painter.rect_filled(rect, 6.0, bg);

        let thumb_rect = Rect::from_min_size(
            rect.min + Vec2::splat(CELL_PADDING),
            Vec2::splat(self.thumbnail_size),
        );

        match (cell.state, cell.texture) {
            (LoadState::Loaded, Some(texture)) => {
                let image_rect = Rect::from_center_size(
                    thumb_rect.center(),
                    fit_into(texture.size_vec2(), thumb_rect.size()),
                );
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture.id(), image_rect, uv, Color32::WHITE);
            }
            (LoadState::Failed, _) => {
                painter.rect_filled(thumb_rect, 4.0, theme.skeleton);
                painter.text(
                    thumb_rect.center(),
                    Align2::CENTER_CENTER,
                    "⚠",
                    FontId::proportional(32.0),
                    theme.error,
                );
            }
            _ => {
                // Skeleton pulses while waiting for the image
                let t = ui.input(|i| i.time) as f32;
                let pulse = 0.75 + 0.25 * (t * 3.0).sin().abs();
                painter.rect_filled(thumb_rect, 4.0, theme.skeleton.gamma_multiply(pulse));
                if cell.state == LoadState::Pending {
                    ui.ctx().request_repaint();
                }
            }
        }

        if cell.highlighted {
            painter.rect_stroke(rect, 6.0, Stroke::new(2.0, theme.highlight));
        }

        let name_pos = Pos2::new(rect.center().x, thumb_rect.max.y + 4.0);
        painter.text(
            name_pos,
            Align2::CENTER_TOP,
            truncate_name(cell.name, (self.thumbnail_size / 7.0) as usize),
            FontId::proportional(12.0),
            theme.text,
        );
        painter.text(
            name_pos + Vec2::new(0.0, 16.0),
            Align2::CENTER_TOP,
            format!("{} · {}", cell.size_label, cell.age),
            FontId::proportional(11.0),
            theme.text_secondary,
        );
    }
}

fn to_bounds(rect: Rect) -> Bounds {
    Bounds::new(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
}

/// Largest size with the aspect ratio of `image` that fits in `frame`
pub fn fit_into(image: Vec2, frame: Vec2) -> Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (frame.x / image.x).min(frame.y / image.y);
    image * scale
}

/// Shorten a name to at most `max_chars` characters, ending in an ellipsis
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = name.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_from_width() {
        // cell width = 100 + 8 = 108, stride 116
        let layout = GridLayout::new(100.0, 8.0, 340.0);
        assert_eq!(layout.columns, 3);
        assert_eq!(GridLayout::new(100.0, 8.0, 50.0).columns, 1);
    }

    #[test]
    fn test_cell_rect_and_height() {
        let layout = GridLayout::new(100.0, 8.0, 340.0);
        let rect = layout.cell_rect(4);
        assert_eq!(rect.min, Pos2::new(116.0, layout.row_height()));
        assert_eq!(layout.rows(7), 3);
        assert_eq!(layout.content_height(0), 0.0);
        assert_eq!(layout.content_height(3), layout.cell.y);
    }

    #[test]
    fn test_visible_range() {
        let layout = GridLayout::new(100.0, 8.0, 340.0);
        let row = layout.row_height();

        assert_eq!(layout.visible_range(0.0, row * 2.0, 20), 0..6);
        assert_eq!(layout.visible_range(row * 1.5, row * 2.5, 20), 3..9);
        assert_eq!(layout.visible_range(0.0, row * 100.0, 7), 0..7);
        assert_eq!(layout.visible_range(0.0, row, 0), 0..0);
    }

    #[test]
    fn test_fit_into_keeps_aspect() {
        assert_eq!(fit_into(Vec2::new(200.0, 100.0), Vec2::splat(100.0)), Vec2::new(100.0, 50.0));
        assert_eq!(fit_into(Vec2::new(50.0, 100.0), Vec2::splat(100.0)), Vec2::new(50.0, 100.0));
        assert_eq!(fit_into(Vec2::ZERO, Vec2::splat(100.0)), Vec2::ZERO);
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short.png", 20), "short.png");
        assert_eq!(truncate_name("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_name("日本語のファイル名", 4), "日本語…");
    }
}
