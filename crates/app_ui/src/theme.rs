//! Application theming

use egui::{Color32, Visuals};

/// Application theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub surface: Color32,
    pub primary: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub error: Color32,
    /// Fill of a thumbnail cell whose image has not arrived yet
    pub skeleton: Color32,
    /// Border of the highlighted grid cell
    pub highlight: Color32,
    /// Dimmed layer behind the modal viewer
    pub backdrop: Color32,
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(24, 24, 27),
            surface: Color32::from_rgb(39, 39, 42),
            primary: Color32::from_rgb(63, 63, 70),
            text: Color32::from_rgb(244, 244, 245),
            text_secondary: Color32::from_rgb(161, 161, 170),
            accent: Color32::from_rgb(88, 101, 242),
            error: Color32::from_rgb(237, 66, 69),
            skeleton: Color32::from_rgb(52, 52, 58),
            highlight: Color32::from_rgb(88, 101, 242),
            backdrop: Color32::from_black_alpha(220),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(250, 250, 250),
            surface: Color32::from_rgb(255, 255, 255),
            primary: Color32::from_rgb(228, 228, 231),
            text: Color32::from_rgb(24, 24, 27),
            text_secondary: Color32::from_rgb(113, 113, 122),
            accent: Color32::from_rgb(88, 101, 242),
            error: Color32::from_rgb(220, 38, 38),
            skeleton: Color32::from_rgb(228, 228, 231),
            highlight: Color32::from_rgb(88, 101, 242),
            backdrop: Color32::from_black_alpha(200),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.name == "dark"
    }

    /// Apply theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let mut visuals = if self.is_dark() {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        visuals.panel_fill = self.surface;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.background;
        visuals.faint_bg_color = self.primary;

        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.fg_stroke.color = self.text;

        visuals.widgets.inactive.bg_fill = self.primary;
        visuals.widgets.inactive.weak_bg_fill = self.primary;
        visuals.widgets.inactive.fg_stroke.color = self.text;

        visuals.widgets.hovered.bg_fill = self.accent.linear_multiply(0.3);
        visuals.widgets.hovered.weak_bg_fill = self.accent.linear_multiply(0.3);
        visuals.widgets.hovered.fg_stroke.color = self.text;

        visuals.widgets.active.bg_fill = self.accent.linear_multiply(0.5);
        visuals.widgets.active.fg_stroke.color = self.text;

        visuals.selection.bg_fill = self.accent.linear_multiply(0.3);
        visuals.selection.stroke.color = self.accent;

        style.visuals = visuals;
        ctx.set_style(style);
    }

    /// Get theme by name, falling back to dark
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("Unknown theme '{}', using dark", other);
                Self::dark()
            }
        }
    }

    /// Clear color for the wgpu render pass
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, _] = self.background.to_normalized_gamma_f32();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
