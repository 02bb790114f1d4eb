//! Dialog components

use app_core::{Notice, NoticeLevel};
use egui::{Align2, Area, Context, Id, Key, Order, RichText, Sense, Window};
use std::collections::VecDeque;

use crate::theme::Theme;

/// Shows queued notices one at a time, each until acknowledged.
///
/// While a notice is on screen a backdrop covers the whole window and takes
/// every pointer event, so nothing underneath can be clicked.
#[derive(Debug, Default)]
pub struct NoticeDialog {
    pending: VecDeque<Notice>,
}

impl NoticeDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.pending.push_back(notice);
    }

    pub fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        self.pending.extend(notices);
    }

    /// Notice currently on screen
    pub fn current(&self) -> Option<&Notice> {
        self.pending.front()
    }

    pub fn is_open(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Dismiss the notice on screen and return it
    pub fn acknowledge(&mut self) -> Option<Notice> {
        self.pending.pop_front()
    }

    /// Render the front notice; returns it once acknowledged
    pub fn ui(&mut self, ctx: &Context, theme: &Theme) -> Option<Notice> {
        let notice = self.pending.front()?;

        let (title, color) = match notice.level {
            NoticeLevel::Info => ("Cache Viewer", theme.text),
            NoticeLevel::Error => ("Error", theme.error),
        };

        let screen = ctx.screen_rect();
        let backdrop = Area::new(Id::new("notice_backdrop"))
            .order(Order::Foreground)
            .fixed_pos(screen.min)
            .interactable(true)
            .show(ctx, |ui| {
                ui.allocate_rect(screen, Sense::click_and_drag());
                ui.painter().rect_filled(screen, 0.0, theme.backdrop);
            });
        // Above the image modal and the context menu, below the window
        ctx.move_to_top(backdrop.response.layer_id);

        let mut acknowledged = false;

        Window::new(title)
            .id(Id::new("notice_dialog"))
            .collapsible(false)
            .resizable(false)
            .order(Order::Tooltip)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(260.0);
                ui.label(RichText::new(&notice.message).color(color));
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        acknowledged = true;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(Key::Enter)) {
            acknowledged = true;
        }

        if acknowledged {
            self.acknowledge()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, Modifiers, Pos2, PointerButton, RawInput, Rect, Vec2};

    #[test]
    fn test_notices_shown_in_order() {
        let mut dialog = NoticeDialog::new();
        assert!(!dialog.is_open());
        assert!(dialog.current().is_none());

        dialog.extend(vec![Notice::info("Deleted a.png"), Notice::error("Failed to delete image.")]);
        assert!(dialog.is_open());
        assert_eq!(dialog.current().map(|n| n.message.as_str()), Some("Deleted a.png"));

        assert_eq!(dialog.acknowledge(), Some(Notice::info("Deleted a.png")));
        assert_eq!(dialog.current().map(|n| n.level), Some(NoticeLevel::Error));

        dialog.acknowledge();
        assert!(!dialog.is_open());
        assert_eq!(dialog.acknowledge(), None);
    }

    /// Drives one frame with a button in the top-left corner and the dialog
    /// on top. Returns whether the button was clicked and what was acknowledged.
    fn frame(
        ctx: &Context,
        dialog: &mut NoticeDialog,
        events: Vec<Event>,
    ) -> (bool, Option<Notice>) {
        let theme = Theme::dark();
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))),
            events,
            ..Default::default()
        };

        let mut clicked = false;
        let mut acknowledged = None;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                clicked = ui.button("Delete all cache").clicked();
            });
            acknowledged = dialog.ui(ctx, &theme);
        });
        (clicked, acknowledged)
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    fn click(ctx: &Context, dialog: &mut NoticeDialog, pos: Pos2) -> bool {
        frame(ctx, dialog, vec![Event::PointerMoved(pos)]);
        let (pressed, _) = frame(ctx, dialog, vec![button(pos, true)]);
        let (released, _) = frame(ctx, dialog, vec![button(pos, false)]);
        pressed || released
    }

    // Inside the central panel's first button
    const UNDER_DIALOG: Pos2 = Pos2::new(20.0, 16.0);

    #[test]
    fn test_controls_clickable_without_notice() {
        let ctx = Context::default();
        let mut dialog = NoticeDialog::new();
        frame(&ctx, &mut dialog, Vec::new());

        assert!(click(&ctx, &mut dialog, UNDER_DIALOG));
    }

    #[test]
    fn test_notice_blocks_controls_underneath() {
        let ctx = Context::default();
        let mut dialog = NoticeDialog::new();
        dialog.push(Notice::info("All cache has been deleted."));
        frame(&ctx, &mut dialog, Vec::new());

        assert!(!click(&ctx, &mut dialog, UNDER_DIALOG));
        assert!(dialog.is_open());
    }

    #[test]
    fn test_enter_acknowledges_front_notice() {
        let ctx = Context::default();
        let mut dialog = NoticeDialog::new();
        dialog.extend(vec![Notice::info("one"), Notice::info("two")]);
        frame(&ctx, &mut dialog, Vec::new());

        let enter = Event::Key {
            key: Key::Enter,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: Modifiers::NONE,
        };
        let (_, acknowledged) = frame(&ctx, &mut dialog, vec![enter]);
        assert_eq!(acknowledged, Some(Notice::info("one")));
        assert_eq!(dialog.current(), Some(&Notice::info("two")));
    }
}
