//! Per-image context menu

use egui::{Area, Context, Frame, Id, Key, Order, Pos2, Rect};

/// Action returned from the context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuAction {
    OpenInExplorer,
    Delete,
    /// Click outside the menu or Escape
    Dismiss,
}

/// Context menu component
pub struct ContextMenuView;

impl ContextMenuView {
    /// Render the menu at `anchor` for the image `name`
    pub fn ui(ctx: &Context, anchor: Pos2, name: &str) -> Option<ContextMenuAction> {
        let mut action = None;

        let area = Area::new(Id::new("image_context_menu"))
            .order(Order::Foreground)
            .fixed_pos(anchor)
            .constrain(true)
            .show(ctx, |ui| {
                Frame::menu(ui.style()).show(ui, |ui| {
                    ui.set_min_width(180.0);
                    ui.label(egui::RichText::new(name).weak().small());
                    ui.separator();
                    if ui.button("Open in file explorer").clicked() {
                        action = Some(ContextMenuAction::OpenInExplorer);
                    }
                    if ui.button("Delete").clicked() {
                        action = Some(ContextMenuAction::Delete);
                    }
                });
            });

        if action.is_some() {
            return action;
        }

        let (clicked_at, escape) = ctx.input(|i| {
            let clicked_at = if i.pointer.any_click() {
                i.pointer.interact_pos()
            } else {
                None
            };
            (clicked_at, i.key_pressed(Key::Escape))
        });

        if escape || is_outside(area.response.rect, clicked_at) {
            return Some(ContextMenuAction::Dismiss);
        }
        None
    }
}

/// Whether a click happened and landed outside the menu
fn is_outside(menu: Rect, click: Option<Pos2>) -> bool {
    click.map_or(false, |pos| !menu.contains(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_outside() {
        let menu = Rect::from_min_max(Pos2::new(10.0, 10.0), Pos2::new(110.0, 60.0));
        assert!(!is_outside(menu, None));
        assert!(!is_outside(menu, Some(Pos2::new(50.0, 30.0))));
        assert!(is_outside(menu, Some(Pos2::new(5.0, 30.0))));
        assert!(is_outside(menu, Some(Pos2::new(50.0, 100.0))));
    }
}
